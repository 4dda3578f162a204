//! トップページ（入口ボタンと About）

use crate::api;
use give_and_get_common::{AboutContent, Route};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn Landing(navigate: Callback<Route>) -> impl IntoView {
    let about = RwSignal::new(None::<AboutContent>);

    spawn_local(async move {
        let content = api::client().about().await;
        about.set(Some(content));
    });

    view! {
        <section class="hero">
            <h2>"Connecting people in need with those who can help"</h2>
            <div class="hero-actions">
                <button class="btn btn-primary" on:click=move |_| navigate.run(Route::GetHelp)>
                    "I Need Help"
                </button>
                <button class="btn btn-primary" on:click=move |_| navigate.run(Route::DonorSignup)>
                    "I Want to Donate"
                </button>
                <button class="btn btn-secondary" on:click=move |_| navigate.run(Route::OrganizationSignup)>
                    "Register an Organization"
                </button>
            </div>
        </section>

        <Show
            when=move || about.with(Option::is_some)
            fallback=|| view! { <p class="text-muted">"Loading..."</p> }
        >
            {move || about.get().map(|content| view! { <About content=content /> })}
        </Show>
    }
}

#[component]
fn About(content: AboutContent) -> impl IntoView {
    let AboutContent { mission, story, impact, values, contact } = content;

    view! {
        <section class="about">
            <h2>{mission.title}</h2>
            <p>{mission.description}</p>
            <p class="vision">{mission.vision}</p>

            {story.map(|story| {
                view! {
                    <h3>{story.title}</h3>
                    <p>{story.content}</p>
                }
            })}

            <h3>{impact.title}</h3>
            <div class="impact-grid">
                {impact
                    .highlights
                    .into_iter()
                    .map(|highlight| {
                        view! {
                            <div class="impact-card">
                                <span class="impact-number">{highlight.number}</span>
                                <span class="impact-label">{highlight.label}</span>
                                <p>{highlight.description}</p>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>

            <div class="values">
                {values
                    .into_iter()
                    .map(|value| {
                        view! {
                            <div class="value-card">
                                <h4>{value.title}</h4>
                                <p>{value.description}</p>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>

            {contact.map(|contact| {
                let mailto = format!("mailto:{}", contact.email);
                view! {
                    <div class="contact">
                        <h3>{contact.title}</h3>
                        <p>{contact.description}</p>
                        <a href=mailto>{contact.email}</a>
                    </div>
                }
            })}
        </section>
    }
}
