//! 地図スクリプトの読込（ページ内で1つのローダーを共有）

use crate::api::fetch::js_error_message;
use give_and_get_common::config::MAPS_SCRIPT_KEY;
use give_and_get_common::map::ScriptLoader;
use give_and_get_common::{ClientConfig, LoadError};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlScriptElement;

thread_local! {
    static LOADER: Rc<ScriptLoader> = Rc::new(ScriptLoader::new());
}

/// Google Maps を読み込む（読込済みなら即完了、失敗後の呼び出しは再試行）
pub async fn ensure_maps(config: &ClientConfig) -> Result<(), LoadError> {
    let url = config
        .maps_script_url()
        .map_err(|e| LoadError::new(MAPS_SCRIPT_KEY, e.to_string()))?;
    let loader = LOADER.with(Rc::clone);
    loader.load(MAPS_SCRIPT_KEY, move || inject_script(url)).await
}

async fn inject_script(url: String) -> Result<(), LoadError> {
    let fail = |reason: String| LoadError::new(MAPS_SCRIPT_KEY, reason);

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| fail("document is not available".into()))?;
    let script: HtmlScriptElement = document
        .create_element("script")
        .map_err(|e| fail(js_error_message(&e)))?
        .unchecked_into();
    script.set_src(&url);
    script.set_async(true);

    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        script.set_onload(Some(&resolve));
        script.set_onerror(Some(&reject));
    });

    let head = document.head().ok_or_else(|| fail("document has no <head>".into()))?;
    head.append_child(&script).map_err(|e| fail(js_error_message(&e)))?;

    match JsFuture::from(promise).await {
        Ok(_) => Ok(()),
        Err(_) => {
            // 再試行で新しいタグを入れるため外す
            script.remove();
            Err(fail("the maps script could not be loaded".into()))
        }
    }
}
