//! Google Maps JavaScript API のバインディング（使う分だけ）

use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["google", "maps"])]
    pub type Map;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps"])]
    pub fn new(element: &HtmlElement, options: &JsValue) -> Map;

    #[wasm_bindgen(method, js_name = setCenter)]
    pub fn set_center(this: &Map, position: &JsValue);

    #[wasm_bindgen(js_namespace = ["google", "maps"])]
    pub type Marker;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps"])]
    pub fn new(options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = setMap)]
    pub fn set_map(this: &Marker, map: Option<&Map>);

    #[wasm_bindgen(method, js_name = addListener)]
    pub fn add_listener(this: &Marker, event: &str, handler: &js_sys::Function) -> JsValue;

    #[wasm_bindgen(js_namespace = ["google", "maps"])]
    pub type InfoWindow;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps"])]
    pub fn new(options: &JsValue) -> InfoWindow;

    #[wasm_bindgen(method)]
    pub fn open(this: &InfoWindow, options: &JsValue);

    #[wasm_bindgen(method)]
    pub fn close(this: &InfoWindow);

    #[wasm_bindgen(method, js_name = addListener)]
    pub fn add_listener(this: &InfoWindow, event: &str, handler: &js_sys::Function) -> JsValue;

    #[wasm_bindgen(js_namespace = ["google", "maps"])]
    pub type DirectionsService;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps"])]
    pub fn new() -> DirectionsService;

    /// 結果は Promise（失敗時は reject）
    #[wasm_bindgen(method)]
    pub fn route(this: &DirectionsService, request: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["google", "maps"])]
    pub type DirectionsRenderer;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps"])]
    pub fn new(options: &JsValue) -> DirectionsRenderer;

    #[wasm_bindgen(method, js_name = setMap)]
    pub fn set_map(this: &DirectionsRenderer, map: Option<&Map>);

    #[wasm_bindgen(method, js_name = setDirections)]
    pub fn set_directions(this: &DirectionsRenderer, directions: &JsValue);

    /// `set("directions", null)` で描画済みの経路を消す
    #[wasm_bindgen(method)]
    pub fn set(this: &DirectionsRenderer, key: &str, value: &JsValue);
}
