//! 団体登録（種別・連絡先・営業時間・設備・必要物資）

use super::fields::{echo_rows, CheckboxField, Confirmation, FieldError, SubmitError, TextField};
use crate::api;
use give_and_get_common::form::FieldKind;
use give_and_get_common::forms::organization::{hour_option_for, HourOption, HOUR_OPTIONS, ORG_TEMPLATE};
use give_and_get_common::types::WEEKDAYS;
use give_and_get_common::validation::humanize;
use give_and_get_common::{
    FieldGroup, Form, Need, NeedField, OrganizationForm, SubmitReceipt, SubmitStatus, Submission, Urgency,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

type OrgSubmission = RwSignal<Submission<OrganizationForm>>;

#[component]
pub fn OrganizationSignup() -> impl IntoView {
    let submission = RwSignal::new(Submission::new(OrganizationForm::new()));

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let mut pending = None;
        submission.update(|s| pending = s.begin());
        let Some(pending) = pending else {
            return;
        };
        spawn_local(async move {
            let result = api::client()
                .validate_organization(&pending.payload)
                .await
                .map(Into::into);
            submission.update(|s| s.finish(pending, result));
        });
    };

    let succeeded = move || {
        submission.with(|s| match s.status() {
            SubmitStatus::Succeeded { echo, receipt } => Some((receipt.clone(), echo.clone())),
            _ => None,
        })
    };
    let busy = move || submission.with(|s| s.status().is_busy());
    let type_error = Signal::derive(move || submission.with(|s| s.form().errors().get("type").map(str::to_string)));

    view! {
        <section class="signup">
            <h2>"Organization Registration"</h2>
            <Show
                when=move || succeeded().is_none()
                fallback=move || {
                    succeeded()
                        .map(|(receipt, echo)| {
                            view! {
                                <Receipt receipt=receipt echo=echo />
                                <button
                                    class="btn btn-secondary"
                                    on:click=move |_| submission.update(|s| s.back_to_form())
                                >
                                    "Register Another"
                                </button>
                            }
                        })
                }
            >
                <form on:submit=on_submit>
                    <fieldset>
                        <legend>"Organization Type"</legend>
                        <CheckboxField submission=submission name="type.shelter" label="Shelter" />
                        <CheckboxField submission=submission name="type.charity" label="Charity" />
                        <FieldError message=type_error />
                    </fieldset>

                    <fieldset>
                        <legend>"Basics"</legend>
                        <TextField submission=submission name="name" label="Organization Name" />
                        <TextField submission=submission name="address" label="Address" />
                        <TextField submission=submission name="EIN" label="EIN" />
                        <TextField submission=submission name="image_address_url" label="Image URL" input_type="url" />
                        <TextField submission=submission name="description" label="Description" />
                    </fieldset>

                    <fieldset>
                        <legend>"Contact"</legend>
                        <TextField submission=submission name="contact.phone" label="Phone" placeholder="123-456-7890" />
                        <TextField submission=submission name="contact.email" label="Email" input_type="email" />
                        <TextField submission=submission name="contact.website" label="Website" input_type="url" />
                    </fieldset>

                    <fieldset>
                        <legend>"Hours of Operation"</legend>
                        {WEEKDAYS.into_iter().map(|day| view! { <HoursRow submission=submission day=day /> }).collect_view()}
                    </fieldset>

                    <fieldset>
                        <legend>"Amenities"</legend>
                        <div class="checkbox-grid">
                            {ORG_TEMPLATE
                                .iter()
                                .filter(|spec| spec.group == FieldGroup::Amenities && spec.kind() == FieldKind::Bool)
                                .map(|spec| {
                                    view! { <CheckboxField submission=submission name=spec.name label=humanize(spec.name) /> }
                                })
                                .collect_view()}
                        </div>
                        <TextField submission=submission name="languages" label="Languages (comma separated)" />
                        <TextField submission=submission name="beds_available" label="Beds Available" input_type="number" />
                        <TextField submission=submission name="fees" label="Fees" input_type="number" />
                        <TextField submission=submission name="age_minimum" label="Minimum Age" input_type="number" />
                        <TextField submission=submission name="age_maximum" label="Maximum Age" input_type="number" />
                    </fieldset>

                    <NeedsEditor submission=submission />

                    <SubmitError submission=submission />
                    <button type="submit" class="btn btn-primary" disabled=busy>
                        {move || if busy() { "Submitting..." } else { "Register" }}
                    </button>
                </form>
            </Show>
        </section>
    }
}

/// 曜日ごとの営業時間（プリセット選択、Customなら自由入力）
#[component]
fn HoursRow(submission: OrgSubmission, day: &'static str) -> impl IntoView {
    let key = format!("hours.{}", day);
    let current = move || submission.with(|s| s.form().hours(day));
    let custom = RwSignal::new(hour_option_for(&current()) == HourOption::Custom);
    let (draft, set_draft) = signal(if custom.get_untracked() { current() } else { String::new() });
    let (input_error, set_input_error) = signal(None::<String>);

    let set_hours = move |value: String| {
        let mut outcome = Ok(());
        submission.update(|s| outcome = s.form_mut().set_hours(day, &value));
        set_input_error.set(outcome.err().map(|e| e.to_string()));
    };

    let on_select = move |ev: leptos::ev::Event| {
        let label = event_target_value(&ev);
        match HOUR_OPTIONS.iter().find(|option| option.label() == label) {
            Some(HourOption::Preset { value, .. }) => {
                custom.set(false);
                set_hours(value.to_string());
            }
            _ => custom.set(true),
        }
    };

    let form_error = Signal::derive(move || submission.with(|s| s.form().errors().get(&key).map(str::to_string)));
    let error = Signal::derive(move || input_error.get().or_else(|| form_error.get()));

    view! {
        <div class="form-group hours-row">
            <label>{humanize(day)}</label>
            <select on:change=on_select>
                {HOUR_OPTIONS
                    .iter()
                    .map(|option| {
                        let option = *option;
                        let selected = move || {
                            if custom.get() {
                                option == HourOption::Custom
                            } else {
                                hour_option_for(&current()) == option
                            }
                        };
                        view! { <option value=option.label() selected=selected>{option.label()}</option> }
                    })
                    .collect_view()}
            </select>
            <Show when=move || custom.get()>
                <input
                    type="text"
                    placeholder="HHMM-HHMM"
                    prop:value=move || draft.get()
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                    on:change=move |ev| set_hours(event_target_value(&ev))
                />
            </Show>
            <FieldError message=error />
        </div>
    }
}

#[component]
fn NeedsEditor(submission: OrgSubmission) -> impl IntoView {
    let rows = move || submission.with(|s| (0..s.form().needs().len()).collect::<Vec<_>>());

    view! {
        <fieldset>
            <legend>"Current Needs"</legend>
            <For each=rows key=|index| *index let:index>
                <NeedRow submission=submission index=index />
            </For>
            <button
                type="button"
                class="btn btn-secondary btn-small"
                on:click=move |_| {
                    submission.update(|s| {
                        s.form_mut().add_need();
                    })
                }
            >
                "Add Need"
            </button>
        </fieldset>
    }
}

#[component]
fn NeedRow(submission: OrgSubmission, index: usize) -> impl IntoView {
    let read = move |f: fn(&Need) -> String| {
        submission.with(|s| s.form().needs().get(index).map(f).unwrap_or_default())
    };
    let write = move |field: NeedField, value: String| {
        submission.update(|s| {
            if let Err(e) = s.form_mut().update_need(index, field, &value) {
                gloo::console::warn!(format!("need update ignored: {}", e));
            }
        });
    };

    view! {
        <div class="need-row">
            <input
                type="text"
                placeholder="Item"
                prop:value=move || read(|n| n.item.clone())
                on:input=move |ev| write(NeedField::Item, event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Category"
                prop:value=move || read(|n| n.category.clone())
                on:input=move |ev| write(NeedField::Category, event_target_value(&ev))
            />
            <input
                type="number"
                min="0"
                title="Needed"
                prop:value=move || read(|n| n.needed.clone())
                on:input=move |ev| write(NeedField::Needed, event_target_value(&ev))
            />
            <input
                type="number"
                min="0"
                title="Have"
                prop:value=move || read(|n| n.have.clone())
                on:input=move |ev| write(NeedField::Have, event_target_value(&ev))
            />
            <select on:change=move |ev| write(NeedField::Urgency, event_target_value(&ev))>
                {Urgency::ALL
                    .into_iter()
                    .map(|urgency| {
                        let selected = move || read(|n| n.urgency.as_str().to_string()) == urgency.as_str();
                        view! {
                            <option value=urgency.as_str() selected=selected>
                                {humanize(urgency.as_str())}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
            <button
                type="button"
                class="btn btn-tertiary btn-small"
                on:click=move |_| {
                    submission.update(|s| {
                        s.form_mut().remove_need(index);
                    })
                }
            >
                "Remove"
            </button>
        </div>
    }
}

/// 登録結果（検証の詳細があれば併せて表示）
#[component]
fn Receipt(receipt: SubmitReceipt, echo: serde_json::Value) -> impl IntoView {
    let verification = receipt.verification.clone().map(|verification| {
        view! {
            <div class="verification">
                <h3>"Verification"</h3>
                <p>{format!("Status: {}", verification.status)}</p>
                <p>{format!("Trust score: {:.2} ({})", verification.trust_score, verification.trust_level)}</p>
                <dl>
                    {echo_rows(&verification.checks)
                        .into_iter()
                        .map(|(check, result)| view! { <dt>{check}</dt><dd>{result}</dd> })
                        .collect_view()}
                </dl>
            </div>
        }
    });
    let message = match &receipt.id {
        Some(id) => format!("{} (ID: {})", receipt.message, id),
        None => receipt.message.clone(),
    };

    view! {
        <Confirmation message=message echo=echo />
        {verification}
    }
}
