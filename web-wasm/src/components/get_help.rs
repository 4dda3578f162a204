//! 支援を探す（条件入力 → 団体検索）

use super::location_detail::LocationDetail;
use super::location_list::LocationList;
use super::map_view::MapView;
use super::survey_form::SurveyPanel;
use crate::api;
use crate::geolocation::current_position;
use give_and_get_common::{MatchSession, Submission, SurveyForm};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn GetHelp() -> impl IntoView {
    let session = RwSignal::new(MatchSession::for_people());
    let survey = RwSignal::new(Submission::new(SurveyForm::new()));
    let (searched, set_searched) = signal(false);

    spawn_local(async move {
        let origin = current_position().await;
        session.update(|s| {
            s.set_origin(origin);
        });
    });

    let on_search = Callback::new(move |_: ()| {
        let mut job = None;
        session.update(|s| {
            let request = survey.with_untracked(|submission| s.people_request(submission.form()));
            job = Some((s.begin_query(), request));
        });
        let Some((ticket, request)) = job else {
            return;
        };
        set_searched.set(true);
        spawn_local(async move {
            let result = api::client().match_people(&request).await;
            session.update(|s| {
                s.finish_query(ticket, result);
            });
        });
    });

    let has_selection = move || session.with(|s| s.selected_entry().is_some());

    view! {
        <section class="match-view">
            <div class="match-sidebar">
                <h2>"Get Help"</h2>
                <p class="text-muted">"Tell us what you need and we'll find organizations near you."</p>
                <SurveyPanel submission=survey session=session on_search=on_search />
                <Show when=move || searched.get()>
                    <Show when=has_selection fallback=move || view! { <LocationList session=session /> }>
                        <LocationDetail session=session />
                    </Show>
                </Show>
            </div>
            <MapView session=session />
        </section>
    }
}
