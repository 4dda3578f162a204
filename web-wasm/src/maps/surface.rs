//! Google Maps による MapSurface 実装

use super::bindings::{DirectionsRenderer, DirectionsService, InfoWindow, Map, Marker};
use crate::api::fetch::js_error_message;
use give_and_get_common::{Coordinate, LocationEntry, MapSurface};
use serde::Serialize;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlElement;

const DEFAULT_ZOOM: u32 = 12;

/// 地図上の操作（持ち主に渡す）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    MarkerClicked(String),
    InfoClosed,
}

pub type EventHandler = Rc<dyn Fn(SurfaceEvent)>;

/// マーカーと情報ウィンドウ（リスナーはここで保持し、削除時に解放）
pub struct MarkerHandle {
    marker: Marker,
    info: InfoWindow,
    _on_click: Closure<dyn FnMut()>,
    _on_close: Closure<dyn FnMut()>,
}

pub struct GoogleMapSurface {
    map: Map,
    renderer: DirectionsRenderer,
    on_event: EventHandler,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapOptions {
    center: Coordinate,
    zoom: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteOptions {
    origin: Coordinate,
    destination: Coordinate,
    travel_mode: &'static str,
}

impl GoogleMapSurface {
    pub fn new(element: &HtmlElement, center: Coordinate, on_event: EventHandler) -> Result<Self, JsValue> {
        let options = to_js(&MapOptions { center, zoom: DEFAULT_ZOOM })?;
        let map = Map::new(element, &options);

        let renderer = DirectionsRenderer::new(&js_sys::Object::new());
        renderer.set_map(Some(&map));

        Ok(Self { map, renderer, on_event })
    }

    pub fn recenter(&self, center: Coordinate) {
        match to_js(&center) {
            Ok(position) => self.map.set_center(&position),
            Err(e) => gloo::console::warn!(format!("recenter failed: {}", js_error_message(&e))),
        }
    }
}

impl MapSurface for GoogleMapSurface {
    type Marker = MarkerHandle;
    type Route = JsValue;

    fn add_marker(&mut self, entry: &LocationEntry, position: Coordinate, info_html: &str) -> MarkerHandle {
        let options = js_sys::Object::new();
        set(&options, "position", &to_js(&position).unwrap_or(JsValue::NULL));
        set(&options, "map", &self.map);
        set(&options, "title", &JsValue::from_str(&entry.name));
        let marker = Marker::new(&options);

        let info_options = js_sys::Object::new();
        set(&info_options, "content", &JsValue::from_str(info_html));
        let info = InfoWindow::new(&info_options);

        let on_click = {
            let on_event = self.on_event.clone();
            let id = entry.id.clone();
            Closure::<dyn FnMut()>::new(move || on_event(SurfaceEvent::MarkerClicked(id.clone())))
        };
        marker.add_listener("click", on_click.as_ref().unchecked_ref());

        let on_close = {
            let on_event = self.on_event.clone();
            Closure::<dyn FnMut()>::new(move || on_event(SurfaceEvent::InfoClosed))
        };
        info.add_listener("closeclick", on_close.as_ref().unchecked_ref());

        MarkerHandle {
            marker,
            info,
            _on_click: on_click,
            _on_close: on_close,
        }
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        handle.info.close();
        handle.marker.set_map(None);
    }

    fn open_info(&mut self, handle: &MarkerHandle) {
        let options = js_sys::Object::new();
        set(&options, "anchor", &handle.marker);
        set(&options, "map", &self.map);
        handle.info.open(&options);
    }

    fn close_info(&mut self, handle: &MarkerHandle) {
        handle.info.close();
    }

    fn show_route(&mut self, route: &JsValue) {
        self.renderer.set_directions(route);
    }

    fn clear_route(&mut self) {
        self.renderer.set("directions", &JsValue::NULL);
    }

    fn alert(&mut self, message: &str) {
        gloo::dialogs::alert(message);
    }
}

/// 経路計算（失敗時はステータス文字列）
pub async fn compute_route(origin: Coordinate, destination: Coordinate) -> Result<JsValue, String> {
    let request = to_js(&RouteOptions {
        origin,
        destination,
        travel_mode: "DRIVING",
    })
    .map_err(|e| js_error_message(&e))?;

    let service = DirectionsService::new();
    JsFuture::from(service.route(&request))
        .await
        .map_err(|e| route_status(&e))
}

/// reject 値から `code`（NOT_FOUND 等）を取り出す
fn route_status(error: &JsValue) -> String {
    js_sys::Reflect::get(error, &JsValue::from_str("code"))
        .ok()
        .and_then(|code| code.as_string())
        .unwrap_or_else(|| js_error_message(error))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn set(target: &js_sys::Object, key: &str, value: &JsValue) {
    let _ = js_sys::Reflect::set(target, &JsValue::from_str(key), value);
}
