//! 地図表示
//!
//! MatchSession の結果・選択・出発地を MapSync 経由で Google Maps に反映する。
//! マーカーのクリックと情報ウィンドウの close はセッション側の select / back になる。

use crate::api;
use crate::api::fetch::js_error_message;
use crate::maps::surface::EventHandler;
use crate::maps::{compute_route, ensure_maps, GoogleMapSurface, SurfaceEvent};
use give_and_get_common::{MapEvent, MapSync, MatchSession, RouteRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;

type MapState = StoredValue<MapSync<GoogleMapSurface>, LocalStorage>;

#[derive(Debug, Clone, PartialEq)]
enum MapStatus {
    Loading,
    Ready,
    Failed(String),
}

/// 経路計算を実行し、完了時に MapSync へ戻す
fn run_route(map: MapState, request: Option<RouteRequest>) {
    let Some(request) = request else {
        return;
    };
    spawn_local(async move {
        let result = compute_route(request.origin, request.destination).await;
        map.try_update_value(|map| map.finish_route(&request, result));
    });
}

fn event_handler(session: RwSignal<MatchSession>, map: MapState) -> EventHandler {
    Rc::new(move |event| match event {
        SurfaceEvent::MarkerClicked(id) => {
            let event = map.try_with_value(|map| map.handle_marker_click(&id)).flatten();
            if let Some(MapEvent::Selected(id)) = event {
                session.update(|s| {
                    s.select(&id);
                });
            }
        }
        SurfaceEvent::InfoClosed => session.update(MatchSession::back),
    })
}

#[component]
pub fn MapView(session: RwSignal<MatchSession>) -> impl IntoView {
    let container = NodeRef::<leptos::html::Div>::new();
    let map: MapState = StoredValue::new_local(MapSync::new(session.with_untracked(MatchSession::origin)));
    let status = RwSignal::new(MapStatus::Loading);
    let attempt = RwSignal::new(0u32);

    let results = Memo::new(move |_| session.with(|s| s.results().clone()));
    let selection = Memo::new(move |_| session.with(|s| s.selection().clone()));
    let origin = Memo::new(move |_| session.with(MatchSession::origin));

    // スクリプト読込 → 地図生成（再試行ボタンで attempt が増える）
    Effect::new(move |_| {
        attempt.track();
        let Some(element) = container.get() else {
            return;
        };
        status.set(MapStatus::Loading);
        spawn_local(async move {
            if let Err(e) = ensure_maps(&api::config()).await {
                gloo::console::error!(e.to_string());
                status.set(MapStatus::Failed(e.to_string()));
                return;
            }
            let center = map.with_value(MapSync::origin);
            match GoogleMapSurface::new(&element, center, event_handler(session, map)) {
                Ok(surface) => {
                    let request = map.try_update_value(|map| map.attach(surface)).flatten();
                    status.set(MapStatus::Ready);
                    run_route(map, request);
                }
                Err(e) => status.set(MapStatus::Failed(js_error_message(&e))),
            }
        });
    });

    // 反映順は 結果 → 選択 → 出発地
    Effect::new(move |_| {
        let locations = results.get();
        let request = map.try_update_value(|map| map.set_locations(locations)).flatten();
        run_route(map, request);
    });

    Effect::new(move |_| {
        let selection = selection.get();
        let request = map.try_update_value(|map| map.apply_selection(&selection)).flatten();
        run_route(map, request);
    });

    Effect::new(move |_| {
        let origin = origin.get();
        let request = map.try_update_value(|map| map.set_origin(origin)).flatten();
        map.with_value(|map| {
            if let Some(surface) = map.surface() {
                surface.recenter(origin);
            }
        });
        run_route(map, request);
    });

    let failure = move || match status.get() {
        MapStatus::Failed(message) => Some(message),
        _ => None,
    };

    view! {
        <div class="map-panel">
            <div class="map" node_ref=container></div>
            <Show when=move || status.get() == MapStatus::Loading>
                <div class="map-overlay">"Loading map..."</div>
            </Show>
            {move || {
                failure()
                    .map(|message| {
                        view! {
                            <div class="map-overlay alert alert-error">
                                <p>{format!("Map unavailable: {}", message)}</p>
                                <button
                                    class="btn btn-secondary btn-small"
                                    on:click=move |_| attempt.update(|n| *n += 1)
                                >
                                    "Retry"
                                </button>
                            </div>
                        }
                    })
            }}
        </div>
    }
}
