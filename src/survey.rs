//! 支援希望者の条件（JSONファイル・`--set FIELD=VALUE`）

use crate::error::{AppError, Result};
use give_and_get_common::{Error as CommonError, FieldValue, Form, SurveyForm};
use serde_json::Value;
use std::path::Path;

/// ファイルと個別指定から条件フォームを作り、検証する
pub fn build_survey(file: Option<&Path>, answers: &[String]) -> Result<SurveyForm> {
    let mut form = SurveyForm::new();
    if let Some(path) = file {
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        apply_json(&mut form, &value)?;
    }
    for answer in answers {
        apply_answer(&mut form, answer)?;
    }

    if !form.validate() {
        return Err(CommonError::Validation(form.errors().clone()).into());
    }
    Ok(form)
}

/// `{"age": 30, "owns_pets": true, ...}` を反映
pub fn apply_json(form: &mut SurveyForm, value: &Value) -> Result<()> {
    let Value::Object(answers) = value else {
        return Err(AppError::Survey("expected a JSON object of field names to values".into()));
    };
    for (field, raw) in answers {
        form.input(field, field_value(field, raw)?)?;
    }
    Ok(())
}

/// `FIELD=VALUE` を反映
pub fn apply_answer(form: &mut SurveyForm, raw: &str) -> Result<()> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| AppError::Survey(format!("expected FIELD=VALUE, got `{}`", raw)))?;
    form.input(field.trim(), value.trim().into())?;
    Ok(())
}

fn field_value(field: &str, raw: &Value) -> Result<FieldValue> {
    Ok(match raw {
        Value::Null => FieldValue::Text(String::new()),
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(n) => FieldValue::Number(n),
            None => FieldValue::Text(n.to_string()),
        },
        Value::String(s) => FieldValue::Text(s.clone()),
        Value::Array(items) => FieldValue::Text(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Object(_) => {
            return Err(AppError::Survey(format!("`{}` must be a plain value, not an object", field)));
        }
    })
}
