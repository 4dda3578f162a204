//! 選択した団体の詳細

use give_and_get_common::types::NeedRecord;
use give_and_get_common::validation::humanize;
use give_and_get_common::{LocationEntry, MatchSession};
use leptos::prelude::*;

/// 表示する必要物資の件数
const TOP_NEEDS: usize = 3;

/// 「品名 (カテゴリ): N still needed」
fn need_line(need: &NeedRecord) -> String {
    let category = if need.category.is_empty() {
        String::new()
    } else {
        format!(" ({})", need.category)
    };
    format!("{}{}: {} still needed", need.item, category, need.remaining())
}

#[component]
pub fn LocationDetail(session: RwSignal<MatchSession>) -> impl IntoView {
    let entry = move || session.with(|s| s.selected_entry().cloned());

    view! {
        {move || entry().map(|entry| view! { <Detail entry=entry /> })}
        <button class="btn btn-secondary" on:click=move |_| session.update(MatchSession::back)>
            "Back to Results"
        </button>
    }
}

#[component]
fn Detail(entry: LocationEntry) -> impl IntoView {
    let hours = entry
        .hours
        .by_day()
        .iter()
        .map(|(day, value)| {
            let value = if value.is_empty() { "-".to_string() } else { value.to_string() };
            view! { <tr><th>{humanize(day)}</th><td>{value}</td></tr> }
        })
        .collect_view();

    let needs = entry
        .top_needs(TOP_NEEDS)
        .iter()
        .map(|need| {
            let urgency = need.urgency.as_str();
            view! {
                <li class=format!("need urgency-{}", urgency)>
                    {need_line(need)}
                    <span class="badge">{humanize(urgency)}</span>
                </li>
            }
        })
        .collect_view();

    let contact = entry.contact.clone().map(|contact| {
        view! {
            <div class="contact">
                {(!contact.phone.is_empty()).then(|| view! { <p>{format!("Phone: {}", contact.phone)}</p> })}
                {(!contact.email.is_empty()).then(|| view! { <p>{format!("Email: {}", contact.email)}</p> })}
                {(!contact.website.is_empty()).then(|| {
                    view! {
                        <p>
                            <a href=contact.website.clone() target="_blank" rel="noopener noreferrer">
                                {contact.website.clone()}
                            </a>
                        </p>
                    }
                })}
            </div>
        }
    });
    let has_needs = !entry.needs.is_empty();

    view! {
        <div class="location-detail">
            <h3>{entry.name.clone()}</h3>
            <span class="badge">{entry.type_label()}</span>
            <p>{entry.address.clone()}</p>
            {(!entry.description.is_empty()).then(|| view! { <p class="description">{entry.description.clone()}</p> })}
            {contact}
            <h4>"Hours"</h4>
            <table class="hours">{hours}</table>
            <h4>"Top Needs"</h4>
            {if has_needs {
                view! { <ul class="needs">{needs}</ul> }.into_any()
            } else {
                view! { <p class="text-muted">"No current needs listed."</p> }.into_any()
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use give_and_get_common::Urgency;

    #[test]
    fn test_need_line_shows_remaining_gap() {
        let need = NeedRecord {
            item: "Blankets".to_string(),
            category: "household".to_string(),
            needed: 30,
            have: 12,
            urgency: Urgency::High,
        };
        assert_eq!(need_line(&need), "Blankets (household): 18 still needed");

        let covered = NeedRecord {
            item: "Soap".to_string(),
            needed: 5,
            have: 9,
            ..Default::default()
        };
        assert_eq!(need_line(&covered), "Soap: 0 still needed");
    }
}
