//! フォーム入力欄（Submission の状態に直接つなぐ）

use give_and_get_common::{FieldValue, Form, Submission};
use leptos::prelude::*;
use serde_json::Value;

/// 入力イベントを反映（未知のフィールドはログのみ）
pub fn apply_input<F>(submission: RwSignal<Submission<F>>, name: &str, value: FieldValue)
where
    F: Form + Send + Sync + 'static,
{
    submission.update(|s| {
        if let Err(e) = s.input(name, value) {
            gloo::console::warn!(format!("input ignored: {}", e));
        }
    });
}

#[component]
pub fn FieldError(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some()>
            <p class="field-error">{move || message.get().unwrap_or_default()}</p>
        </Show>
    }
}

#[component]
pub fn TextField<F>(
    submission: RwSignal<Submission<F>>,
    name: &'static str,
    #[prop(into)] label: String,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional)] placeholder: &'static str,
) -> impl IntoView
where
    F: Form + Send + Sync + 'static,
{
    let error = Signal::derive(move || submission.with(|s| s.form().errors().get(name).map(str::to_string)));

    view! {
        <div class="form-group">
            <label for=name>{label}</label>
            <input
                type=input_type
                id=name
                placeholder=placeholder
                class=move || if error.get().is_some() { "invalid" } else { "" }
                prop:value=move || submission.with(|s| s.form().state().text(name))
                on:input=move |ev| apply_input(submission, name, event_target_value(&ev).into())
            />
            <FieldError message=error />
        </div>
    }
}

#[component]
pub fn CheckboxField<F>(
    submission: RwSignal<Submission<F>>,
    name: &'static str,
    #[prop(into)] label: String,
) -> impl IntoView
where
    F: Form + Send + Sync + 'static,
{
    view! {
        <label class="checkbox">
            <input
                type="checkbox"
                prop:checked=move || submission.with(|s| s.form().state().flag(name))
                on:change=move |ev| apply_input(submission, name, event_target_checked(&ev).into())
            />
            {label}
        </label>
    }
}

/// 選択肢（値, 表示名）から選ぶ
#[component]
pub fn SelectField<F>(
    submission: RwSignal<Submission<F>>,
    name: &'static str,
    #[prop(into)] label: String,
    options: &'static [(&'static str, &'static str)],
) -> impl IntoView
where
    F: Form + Send + Sync + 'static,
{
    let current = move || submission.with(|s| s.form().state().text(name));
    let error = Signal::derive(move || submission.with(|s| s.form().errors().get(name).map(str::to_string)));

    view! {
        <div class="form-group">
            <label for=name>{label}</label>
            <select
                id=name
                on:change=move |ev| apply_input(submission, name, event_target_value(&ev).into())
            >
                {options
                    .iter()
                    .map(|(value, text)| {
                        let value = *value;
                        view! {
                            <option value=value selected=move || current() == value>
                                {*text}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
            <FieldError message=error />
        </div>
    }
}

/// 送信結果のエラーメッセージ
#[component]
pub fn SubmitError<F>(submission: RwSignal<Submission<F>>) -> impl IntoView
where
    F: Form + Send + Sync + 'static,
{
    let message = move || submission.with(|s| s.status().error_message().map(str::to_string));
    view! {
        <Show when=move || message().is_some()>
            <div class="alert alert-error">{move || message().unwrap_or_default()}</div>
        </Show>
    }
}

/// 完了画面の表示行（入れ子の値は JSON のまま）
pub fn echo_rows(echo: &Value) -> Vec<(String, String)> {
    let Some(object) = echo.as_object() else {
        return Vec::new();
    };
    object
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), text)
        })
        .collect()
}

/// 送信完了の表示
#[component]
pub fn Confirmation(message: String, echo: Value, #[prop(optional)] children: Option<Children>) -> impl IntoView {
    view! {
        <div class="confirmation">
            <div class="alert alert-success">{message}</div>
            <dl class="echo">
                {echo_rows(&echo)
                    .into_iter()
                    .map(|(key, text)| view! { <dt>{key}</dt><dd>{text}</dd> })
                    .collect_view()}
            </dl>
            {children.map(|children| children())}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_echo_rows_flattens_top_level() {
        let rows = echo_rows(&json!({
            "name": "Ann",
            "beds": 3,
            "type": {"shelter": true},
            "skipped": null,
        }));
        assert_eq!(rows.len(), 3);
        assert!(rows.contains(&("name".to_string(), "Ann".to_string())));
        assert!(rows.contains(&("beds".to_string(), "3".to_string())));
        assert!(rows.contains(&("type".to_string(), r#"{"shelter":true}"#.to_string())));
        assert!(echo_rows(&json!("plain")).is_empty());
    }
}
