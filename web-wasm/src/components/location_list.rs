//! マッチ結果の一覧

use give_and_get_common::{LocationEntry, MatchSession};
use leptos::prelude::*;

#[component]
pub fn LocationList(session: RwSignal<MatchSession>) -> impl IntoView {
    let entries = move || session.with(|s| s.results().iter().cloned().collect::<Vec<_>>());
    let error = move || session.with(|s| s.error().map(str::to_string));

    view! {
        <div class="location-list">
            {move || error().map(|message| view! { <div class="alert alert-error">{message}</div> })}
            <Show when=move || session.with(MatchSession::is_loading)>
                <p class="text-muted">"Searching..."</p>
            </Show>
            <Show
                when=move || session.with(|s| !s.results().is_empty())
                fallback=|| view! { <p class="text-muted">"No matching organizations found."</p> }
            >
                <ul>
                    <For each=entries key=|entry| entry.id.clone() let:entry>
                        <LocationRow session=session entry=entry />
                    </For>
                </ul>
            </Show>
        </div>
    }
}

#[component]
fn LocationRow(session: RwSignal<MatchSession>, entry: LocationEntry) -> impl IntoView {
    let id = entry.id.clone();
    let type_label = entry.type_label();

    view! {
        <li
            class="location-card"
            on:click=move |_| {
                session.update(|s| {
                    s.select(&id);
                })
            }
        >
            <span class="rank">{format!("#{}", entry.id)}</span>
            <h4>{entry.name}</h4>
            <span class="badge">{type_label}</span>
            <p>{entry.address}</p>
            <span class="score">{format!("Score: {:.1}", entry.score)}</span>
        </li>
    }
}
