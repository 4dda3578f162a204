//! 寄付者登録

use super::fields::{Confirmation, SubmitError, TextField};
use crate::api;
use give_and_get_common::{DonorForm, Route, SubmitStatus, Submission};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn DonorSignup(navigate: Callback<Route>) -> impl IntoView {
    let submission = RwSignal::new(Submission::new(DonorForm::new()));

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let mut pending = None;
        submission.update(|s| pending = s.begin());
        let Some(pending) = pending else {
            return;
        };
        spawn_local(async move {
            let result = api::client().create_user(&pending.payload).await.map(Into::into);
            submission.update(|s| s.finish(pending, result));
        });
    };

    let succeeded = move || {
        submission.with(|s| match s.status() {
            SubmitStatus::Succeeded { echo, receipt } => Some((receipt.message.clone(), echo.clone())),
            _ => None,
        })
    };
    let busy = move || submission.with(|s| s.status().is_busy());

    view! {
        <section class="signup">
            <h2>"Donor Sign Up"</h2>
            <Show
                when=move || succeeded().is_none()
                fallback=move || {
                    succeeded()
                        .map(|(message, echo)| {
                            view! {
                                <Confirmation message=message echo=echo>
                                    <button class="btn btn-primary" on:click=move |_| navigate.run(Route::Login)>
                                        "Log In"
                                    </button>
                                    <button
                                        class="btn btn-secondary"
                                        on:click=move |_| submission.update(|s| s.back_to_form())
                                    >
                                        "Register Another"
                                    </button>
                                </Confirmation>
                            }
                        })
                }
            >
                <form on:submit=on_submit>
                    <TextField submission=submission name="name" label="Full Name" />
                    <TextField submission=submission name="phone_number" label="Phone Number" placeholder="123-456-7890" />
                    <TextField submission=submission name="email" label="Email" input_type="email" />
                    <TextField submission=submission name="address" label="Address" />
                    <TextField submission=submission name="password" label="Password" input_type="password" />
                    <TextField
                        submission=submission
                        name="confirmPassword"
                        label="Confirm Password"
                        input_type="password"
                    />
                    <SubmitError submission=submission />
                    <button type="submit" class="btn btn-primary" disabled=busy>
                        {move || if busy() { "Submitting..." } else { "Sign Up" }}
                    </button>
                </form>
            </Show>
        </section>
    }
}
