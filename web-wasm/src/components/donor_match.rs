//! 寄付先を探す（ログイン必須）

use super::donation_list::DonationPanel;
use super::location_detail::LocationDetail;
use super::location_list::LocationList;
use super::map_view::MapView;
use crate::api;
use crate::geolocation::current_position;
use give_and_get_common::session::DONOR_RADIUS_OPTIONS;
use give_and_get_common::{DonationList, MatchSession};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 現在の条件で検索（古い結果はセッション側で捨てる）
fn search_supplies(session: RwSignal<MatchSession>, donations: RwSignal<DonationList>) {
    let mut job = None;
    session.update(|s| {
        let request = donations.with_untracked(|list| s.supply_request(list));
        job = Some((s.begin_query(), request));
    });
    let Some((ticket, request)) = job else {
        return;
    };
    spawn_local(async move {
        let result = api::client().match_supplies(&request).await;
        session.update(|s| {
            s.finish_query(ticket, result);
        });
    });
}

#[component]
pub fn DonorMatch() -> impl IntoView {
    let session = RwSignal::new(MatchSession::for_donor());
    let donations = RwSignal::new(DonationList::new());

    spawn_local(async move {
        let origin = current_position().await;
        session.update(|s| {
            s.set_origin(origin);
        });
        search_supplies(session, donations);
    });

    let on_radius = move |ev: leptos::ev::Event| {
        if let Ok(radius) = event_target_value(&ev).parse::<u32>() {
            session.update(|s| s.set_radius(radius));
            search_supplies(session, donations);
        }
    };
    let has_selection = move || session.with(|s| s.selected_entry().is_some());

    view! {
        <section class="match-view">
            <div class="match-sidebar">
                <h2>"Find Organizations to Donate To"</h2>
                <DonationPanel donations=donations />
                <div class="form-group">
                    <label for="donor-radius">"Search Radius"</label>
                    <select id="donor-radius" on:change=on_radius>
                        {DONOR_RADIUS_OPTIONS
                            .into_iter()
                            .map(|miles| {
                                view! {
                                    <option value=miles.to_string() selected=move || session.with(|s| s.radius() == miles)>
                                        {format!("{} mi", miles)}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </div>
                <button
                    class="btn btn-primary"
                    disabled=move || session.with(MatchSession::is_loading)
                    on:click=move |_| search_supplies(session, donations)
                >
                    "Find Matches"
                </button>
                <Show when=has_selection fallback=move || view! { <LocationList session=session /> }>
                    <LocationDetail session=session />
                </Show>
            </div>
            <MapView session=session />
        </section>
    }
}
