//! fetch によるHTTP送信

use give_and_get_common::{ApiError, ApiTransport, HttpMethod, HttpReply};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// ブラウザの fetch（タイムアウトなし）
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl ApiTransport for FetchTransport {
    async fn send(&self, method: HttpMethod, url: &str, body: Option<String>) -> Result<HttpReply, ApiError> {
        fetch(method, url, body.as_deref())
            .await
            .map_err(|e| ApiError::Network(js_error_message(&e)))
    }
}

async fn fetch(method: HttpMethod, url: &str, body: Option<&str>) -> Result<HttpReply, JsValue> {
    let mut opts = RequestInit::new();
    opts.method(method.as_str());
    opts.mode(RequestMode::Cors);
    if let Some(body) = body {
        opts.body(Some(&JsValue::from_str(body)));
    }

    let request = Request::new_with_str_and_init(url, &opts)?;
    if body.is_some() {
        request.headers().set("Content-Type", "application/json")?;
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window is not available"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    let status = resp.status();
    let text = JsFuture::from(resp.text()?).await?;
    Ok(HttpReply {
        status,
        body: text.as_string().unwrap_or_default(),
    })
}

/// JS例外を文字列に
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(message) = value.as_string() {
        return message;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{:?}", value)
}
