//! メインアプリケーションコンポーネント（画面遷移とログインフラグ）

use crate::auth_store::BrowserAuthStore;
use crate::components::{
    donor_match::DonorMatch, donor_signup::DonorSignup, get_help::GetHelp, header::Header, landing::Landing,
    login::Login, organization_form::OrganizationSignup,
};
use give_and_get_common::nav::guard;
use give_and_get_common::{AuthStore, Route};
use gloo::events::EventListener;
use leptos::prelude::*;
use wasm_bindgen::JsValue;

fn current_path() -> String {
    window().location().pathname().unwrap_or_else(|_| "/".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Push,
    /// ガードで書き換えた場合や戻る・進むではエントリを増やさない
    Replace,
}

/// アドレスバーを route に合わせる（失敗は警告のみ）
fn update_history(route: Route, mode: HistoryMode) {
    let updated = window().history().and_then(|history| match mode {
        HistoryMode::Push => history.push_state_with_url(&JsValue::NULL, "", Some(route.path())),
        HistoryMode::Replace => history.replace_state_with_url(&JsValue::NULL, "", Some(route.path())),
    });
    if let Err(e) = updated {
        gloo::console::warn!(format!(
            "history update failed: {}",
            crate::api::fetch::js_error_message(&e)
        ));
    }
}

#[component]
pub fn App() -> impl IntoView {
    let requested = Route::from_path(&current_path());
    let initial = guard(requested, &BrowserAuthStore);
    if initial != requested {
        update_history(initial, HistoryMode::Replace);
    }

    let route = RwSignal::new(initial);
    let authed = RwSignal::new(BrowserAuthStore.is_authenticated());

    let navigate = Callback::new(move |target: Route| {
        let target = guard(target, &BrowserAuthStore);
        if target != route.get_untracked() {
            update_history(target, HistoryMode::Push);
        }
        route.set(target);
    });

    // 戻る・進む
    EventListener::new(&window(), "popstate", move |_| {
        let target = guard(Route::from_path(&current_path()), &BrowserAuthStore);
        update_history(target, HistoryMode::Replace);
        route.set(target);
    })
    .forget();

    Effect::new(move |_| document().set_title(route.get().title()));

    let on_logout = Callback::new(move |_: ()| {
        BrowserAuthStore.set_authenticated(false);
        authed.set(false);
        navigate.run(Route::Landing);
    });

    let on_login = Callback::new(move |target: Route| {
        BrowserAuthStore.set_authenticated(true);
        authed.set(true);
        navigate.run(target);
    });

    view! {
        <div class="container">
            <Header route=route authed=authed navigate=navigate on_logout=on_logout />
            <main class="page">
                {move || match route.get() {
                    Route::Landing => view! { <Landing navigate=navigate /> }.into_any(),
                    Route::Login => view! { <Login on_login=on_login /> }.into_any(),
                    Route::DonorSignup => view! { <DonorSignup navigate=navigate /> }.into_any(),
                    Route::OrganizationSignup => view! { <OrganizationSignup /> }.into_any(),
                    Route::DonorMatch => view! { <DonorMatch /> }.into_any(),
                    Route::GetHelp => view! { <GetHelp /> }.into_any(),
                }}
            </main>
        </div>
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn history_length() -> u32 {
        window().history().and_then(|h| h.length()).expect("history")
    }

    #[wasm_bindgen_test]
    fn wasm_replace_keeps_history_length() {
        update_history(Route::Landing, HistoryMode::Push);
        let before = history_length();

        update_history(Route::Login, HistoryMode::Replace);
        assert_eq!(current_path(), "/login");
        assert_eq!(history_length(), before);
    }

    #[wasm_bindgen_test]
    fn wasm_push_adds_entry() {
        let before = history_length();
        update_history(Route::GetHelp, HistoryMode::Push);
        assert_eq!(current_path(), "/get-help");
        assert_eq!(history_length(), before + 1);
    }
}
