//! 地図同期
//!
//! 結果集合・選択状態・経路先を地図の描画（MapSurface）に反映する状態機械。
//!
//! - Uninitialized: スクリプト未読込。受け取った結果は保持し、attach時に描画する
//! - Ready: 結果が変わるたびにマーカーを全削除してから作り直す（差分更新はしない）
//!
//! マーカーのクリックや情報ウィンドウの close は `MapEvent` として持ち主に返すだけで、
//! 選択状態は持ち主（MatchSession）が決める。

pub mod cancel;
pub mod info;
pub mod loader;

pub use cancel::CancelToken;
pub use info::{escape_html, info_window_html};
pub use loader::{LoadState, ScriptLoader};

use crate::session::SelectionState;
use crate::types::{Coordinate, LocationEntry, LocationSet};

/// 地図描画の抽象（ブラウザではGoogle Maps）
pub trait MapSurface {
    type Marker;
    type Route;

    fn add_marker(&mut self, entry: &LocationEntry, position: Coordinate, info_html: &str) -> Self::Marker;
    fn remove_marker(&mut self, marker: Self::Marker);
    fn open_info(&mut self, marker: &Self::Marker);
    fn close_info(&mut self, marker: &Self::Marker);
    fn show_route(&mut self, route: &Self::Route);
    fn clear_route(&mut self);
    /// ブロッキングな通知（経路計算の失敗）
    fn alert(&mut self, message: &str);
}

/// 持ち主に返すイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapEvent {
    Selected(String),
    /// 「戻る」と同じ扱い
    InfoClosed,
}

/// 経路計算の依頼
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub target: String,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub token: CancelToken,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Rendered,
    /// 取消済みのため破棄
    Stale,
    Failed(String),
}

pub struct MapSync<S: MapSurface> {
    surface: Option<S>,
    origin: Coordinate,
    locations: LocationSet,
    markers: Vec<(String, S::Marker)>,
    selected: Option<String>,
    route_target: Option<String>,
    in_flight: Option<CancelToken>,
}

impl<S: MapSurface> MapSync<S> {
    pub fn new(origin: Coordinate) -> Self {
        Self {
            surface: None,
            origin,
            locations: LocationSet::default(),
            markers: Vec::new(),
            selected: None,
            route_target: None,
            in_flight: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// 地図の準備完了（保持していた結果・選択・経路を反映）
    pub fn attach(&mut self, surface: S) -> Option<RouteRequest> {
        self.surface = Some(surface);
        self.render_markers();
        self.sync_info_windows();
        self.request_route()
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// 出発地の変更（経路表示中なら引き直す）
    pub fn set_origin(&mut self, origin: Coordinate) -> Option<RouteRequest> {
        self.origin = origin;
        self.request_route()
    }

    /// 結果集合の置き換え
    pub fn set_locations(&mut self, locations: LocationSet) -> Option<RouteRequest> {
        self.locations = locations;
        if self.selected.as_deref().is_some_and(|id| !self.locations.contains(id)) {
            self.selected = None;
        }
        if self.route_target.as_deref().is_some_and(|id| !self.locations.contains(id)) {
            self.route_target = None;
        }
        self.render_markers();
        self.sync_info_windows();
        self.request_route()
    }

    pub fn handle_marker_click(&self, id: &str) -> Option<MapEvent> {
        self.locations
            .contains(id)
            .then(|| MapEvent::Selected(id.to_string()))
    }

    pub fn handle_info_closed(&self) -> MapEvent {
        MapEvent::InfoClosed
    }

    /// 選択変更（全ウィンドウを閉じてから選択中のものだけ開く）
    pub fn set_selected(&mut self, id: Option<&str>) {
        self.selected = id.map(str::to_string);
        self.sync_info_windows();
    }

    /// 経路先の変更
    pub fn set_route_target(&mut self, id: Option<&str>) -> Option<RouteRequest> {
        if self.route_target.as_deref() == id {
            return None;
        }
        self.route_target = id.map(str::to_string);
        self.request_route()
    }

    /// 選択状態をまとめて反映
    pub fn apply_selection(&mut self, selection: &SelectionState) -> Option<RouteRequest> {
        self.set_selected(selection.selected.as_deref());
        self.set_route_target(selection.route_target.as_deref())
    }

    /// 経路計算の完了
    pub fn finish_route(&mut self, request: &RouteRequest, result: Result<S::Route, String>) -> RouteOutcome {
        if request.token.is_cancelled() {
            log::debug!("discarding stale route to {}", request.target);
            return RouteOutcome::Stale;
        }
        self.in_flight = None;

        let Some(surface) = self.surface.as_mut() else {
            return RouteOutcome::Stale;
        };
        match result {
            Ok(route) => {
                surface.show_route(&route);
                RouteOutcome::Rendered
            }
            Err(status) => {
                let message = format!("Directions request failed due to {}", status);
                log::warn!("{}", message);
                surface.alert(&message);
                RouteOutcome::Failed(message)
            }
        }
    }

    /// 表示中マーカーのID（描画順）
    pub fn marker_ids(&self) -> Vec<&str> {
        self.markers.iter().map(|(id, _)| id.as_str()).collect()
    }

    fn render_markers(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        for (_, marker) in self.markers.drain(..) {
            surface.remove_marker(marker);
        }

        for entry in self.locations.iter() {
            let Some(position) = entry.location.filter(Coordinate::is_valid) else {
                log::debug!("no coordinate for {}, skipping marker", entry.id);
                continue;
            };
            let html = info_window_html(entry);
            let marker = surface.add_marker(entry, position, &html);
            self.markers.push((entry.id.clone(), marker));
        }
        log::debug!("rendered {} markers", self.markers.len());
    }

    fn sync_info_windows(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        for (_, marker) in &self.markers {
            surface.close_info(marker);
        }
        if let Some(selected) = self.selected.as_deref() {
            if let Some((_, marker)) = self.markers.iter().find(|(id, _)| id == selected) {
                surface.open_info(marker);
            }
        }
    }

    /// 経路先に応じて依頼を出す（進行中の依頼は取り消す）
    ///
    /// 座標の分からない経路先では表示中の経路も消す。
    fn request_route(&mut self) -> Option<RouteRequest> {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }

        let surface = self.surface.as_mut()?;
        let Some(target) = self.route_target.clone() else {
            surface.clear_route();
            return None;
        };

        let destination = self
            .locations
            .get(&target)
            .and_then(|entry| entry.location)
            .filter(Coordinate::is_valid);
        let Some(destination) = destination else {
            log::debug!("route target {} has no known coordinate", target);
            surface.clear_route();
            return None;
        };

        let token = CancelToken::new();
        self.in_flight = Some(token.clone());
        Some(RouteRequest {
            target,
            origin: self.origin,
            destination,
            token,
        })
    }
}
