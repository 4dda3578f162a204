//! 支援を求める人の条件入力

use super::fields::{CheckboxField, SelectField, TextField};
use give_and_get_common::form::FieldKind;
use give_and_get_common::forms::survey::{
    GENDER_OPTIONS, IMMIGRATION_OPTIONS, SURVEY_TEMPLATE, URGENCY_OPTIONS, YES_NO_OPTIONS,
};
use give_and_get_common::validation::humanize;
use give_and_get_common::{FieldSpec, Form, MatchSession, Submission, SurveyForm};
use leptos::prelude::*;

const FLEXIBILITY_OPTIONS: [(&str, &str); 2] = [("flexible", "Flexible"), ("fixed", "Fixed")];

/// 入力欄の種類
#[derive(Debug, Clone, Copy, PartialEq)]
enum Control {
    Select(&'static [(&'static str, &'static str)]),
    Checkbox,
    Number,
    Text,
}

fn control_for(spec: &FieldSpec) -> Control {
    let options: Option<&'static [(&'static str, &'static str)]> = match spec.name {
        "urgency_level" => Some(&URGENCY_OPTIONS),
        "gender" => Some(&GENDER_OPTIONS),
        "immigration_status" => Some(&IMMIGRATION_OPTIONS),
        "duration_flexibility" => Some(&FLEXIBILITY_OPTIONS),
        "veteran_status" | "criminal_record" | "sobriety" => Some(&YES_NO_OPTIONS),
        _ => None,
    };
    match (options, spec.kind()) {
        (Some(options), _) => Control::Select(options),
        (None, FieldKind::Bool) => Control::Checkbox,
        (None, FieldKind::Number) => Control::Number,
        (None, _) => Control::Text,
    }
}

/// 検索半径は入力欄から外し、セッション側で持つ
fn is_survey_input(spec: &FieldSpec) -> bool {
    spec.name != "max_travel_distance_miles"
}

#[component]
pub fn SurveyPanel(
    submission: RwSignal<Submission<SurveyForm>>,
    session: RwSignal<MatchSession>,
    on_search: Callback<()>,
) -> impl IntoView {
    let controls = SURVEY_TEMPLATE
        .iter()
        .filter(|spec| is_survey_input(spec))
        .map(|spec| {
            let name = spec.name;
            match control_for(spec) {
                Control::Select(options) => {
                    view! { <SelectField submission=submission name=name label=humanize(name) options=options /> }
                        .into_any()
                }
                Control::Checkbox => {
                    view! { <CheckboxField submission=submission name=name label=humanize(name) /> }.into_any()
                }
                Control::Number => {
                    view! { <TextField submission=submission name=name label=humanize(name) input_type="number" /> }
                        .into_any()
                }
                Control::Text => view! { <TextField submission=submission name=name label=humanize(name) /> }.into_any(),
            }
        })
        .collect_view();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let mut valid = false;
        submission.update(|s| valid = s.form_mut().validate());
        if valid {
            on_search.run(());
        }
    };

    let has_errors = move || submission.with(|s| !s.form().errors().is_empty());
    let loading = move || session.with(MatchSession::is_loading);

    view! {
        <form class="survey" on:submit=on_submit>
            <div class="survey-grid">{controls}</div>
            <div class="form-group">
                <label for="search-radius">"Search Radius (miles)"</label>
                <input
                    type="number"
                    id="search-radius"
                    min="1"
                    prop:value=move || session.with(|s| s.radius().to_string())
                    on:change=move |ev| {
                        if let Ok(radius) = event_target_value(&ev).trim().parse::<u32>() {
                            session.update(|s| s.set_radius(radius));
                        }
                    }
                />
            </div>
            <Show when=has_errors>
                <div class="alert alert-error">"Please correct the highlighted fields."</div>
            </Show>
            <button type="submit" class="btn btn-primary" disabled=loading>
                {move || if loading() { "Searching..." } else { "Find Help" }}
            </button>
        </form>
    }
}
