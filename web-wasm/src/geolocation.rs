//! 現在地の取得

use give_and_get_common::Coordinate;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::GeolocationPosition;

/// 現在地（取得できなければ既定地点）
pub async fn current_position() -> Coordinate {
    match request_position().await {
        Ok(coordinate) if coordinate.is_valid() => coordinate,
        Ok(_) => Coordinate::FALLBACK,
        Err(e) => {
            gloo::console::warn!(format!(
                "geolocation unavailable, using default location: {}",
                crate::api::fetch::js_error_message(&e)
            ));
            Coordinate::FALLBACK
        }
    }
}

async fn request_position() -> Result<Coordinate, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window is not available"))?;
    let geolocation = window.navigator().geolocation()?;

    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        if let Err(e) = geolocation.get_current_position_with_error_callback(&resolve, Some(&reject)) {
            let _ = reject.call1(&JsValue::NULL, &e);
        }
    });

    let position: GeolocationPosition = JsFuture::from(promise).await?.unchecked_into();
    let coords = position.coords();
    Ok(Coordinate::new(coords.latitude(), coords.longitude()))
}
