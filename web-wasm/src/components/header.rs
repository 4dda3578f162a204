//! ヘッダーコンポーネント

use give_and_get_common::Route;
use leptos::prelude::*;

const NAV_ITEMS: [(Route, &str); 4] = [
    (Route::Landing, "Home"),
    (Route::GetHelp, "Get Help"),
    (Route::DonorMatch, "Donate"),
    (Route::OrganizationSignup, "Organizations"),
];

#[component]
pub fn Header(
    route: RwSignal<Route>,
    authed: RwSignal<bool>,
    navigate: Callback<Route>,
    on_logout: Callback<()>,
) -> impl IntoView {
    view! {
        <header class="header">
            <h1 class="brand" on:click=move |_| navigate.run(Route::Landing)>"Give & Get"</h1>
            <nav class="nav">
                {NAV_ITEMS
                    .into_iter()
                    .map(|(target, label)| {
                        view! {
                            <button
                                class=move || if route.get() == target { "nav-link active" } else { "nav-link" }
                                on:click=move |_| navigate.run(target)
                            >
                                {label}
                            </button>
                        }
                    })
                    .collect_view()}
                <Show
                    when=move || authed.get()
                    fallback=move || {
                        view! {
                            <button class="btn btn-secondary btn-small" on:click=move |_| navigate.run(Route::Login)>
                                "Log In"
                            </button>
                        }
                    }
                >
                    <button class="btn btn-tertiary btn-small" on:click=move |_| on_logout.run(())>
                        "Log Out"
                    </button>
                </Show>
            </nav>
        </header>
    }
}
