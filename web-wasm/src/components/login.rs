//! ログイン画面
//!
//! 認証はローカルのフラグのみ。入力があればフラグを立てて種別ごとの画面へ進む。

use give_and_get_common::nav::LoginKind;
use give_and_get_common::Route;
use leptos::prelude::*;

#[component]
pub fn Login(on_login: Callback<Route>) -> impl IntoView {
    let (kind, set_kind) = signal(LoginKind::Individual);
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal(None::<&'static str>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if email.with(|e| e.trim().is_empty()) || password.with(String::is_empty) {
            set_error.set(Some("Please enter your email and password."));
            return;
        }
        set_error.set(None);
        on_login.run(kind.get_untracked().landing_route());
    };

    let kind_button = move |value: LoginKind, label: &'static str| {
        view! {
            <button
                type="button"
                class=move || if kind.get() == value { "btn btn-primary" } else { "btn btn-secondary" }
                on:click=move |_| set_kind.set(value)
            >
                {label}
            </button>
        }
    };

    view! {
        <section class="login">
            <h2>"Log In"</h2>
            <div class="login-kind">
                {kind_button(LoginKind::Individual, "Individual")}
                {kind_button(LoginKind::Center, "Center")}
            </div>
            <form on:submit=on_submit>
                <div class="form-group">
                    <label for="login-email">"Email"</label>
                    <input
                        type="email"
                        id="login-email"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="login-password">"Password"</label>
                    <input
                        type="password"
                        id="login-password"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </div>
                {move || error.get().map(|message| view! { <div class="alert alert-error">{message}</div> })}
                <button type="submit" class="btn btn-primary">"Log In"</button>
            </form>
        </section>
    }
}
