//! 入力検証
//!
//! フォームごとに固定のルール列を持ち、送信前に同期的に評価する。
//! 1フィールドにつきメッセージは1件（最初に失敗したルールが優先）。

use crate::form::{FieldValue, FormState};
use chrono::NaiveTime;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// パスワード最小長
pub const MIN_PASSWORD_LEN: usize = 8;

lazy_static::lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^\d{3}-\d{3}-\d{4}$").unwrap();
}

/// `local@domain.tld` 形式か
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// `NNN-NNN-NNNN` 形式か
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone.trim())
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// 営業時間をパース
///
/// `closed` → Ok(None), `0900-1700` → Ok(Some((09:00, 17:00)))
pub fn parse_hours(value: &str) -> Result<Option<(NaiveTime, NaiveTime)>, String> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("closed") {
        return Ok(None);
    }

    let (open, close) = trimmed
        .split_once('-')
        .ok_or_else(|| format!("`{}` is not in HHMM-HHMM format", trimmed))?;
    let open = parse_hhmm(open)?;
    let close = parse_hhmm(close)?;
    Ok(Some((open, close)))
}

fn parse_hhmm(raw: &str) -> Result<NaiveTime, String> {
    let raw = raw.trim();
    if raw.len() != 4 || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("`{}` is not a HHMM time", raw));
    }
    let hour: u32 = raw[..2].parse().map_err(|_| format!("`{}` is not a HHMM time", raw))?;
    let minute: u32 = raw[2..].parse().map_err(|_| format!("`{}` is not a HHMM time", raw))?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| format!("`{}` is not a valid time", raw))
}

/// 表示用ラベル（`phone_number` → `Phone number`）
pub fn humanize(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// 検証エラー（フィールドキー → メッセージ）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// 既にメッセージがあるフィールドは上書きしない
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn clear(&mut self, field: &str) -> bool {
        self.0.remove(field).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

/// 検証ルール
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// 必須（messageがNoneなら "<Label> is required"）
    Required { field: &'static str, message: Option<&'static str> },
    /// メール形式（空欄はスキップ）
    Email { field: &'static str },
    /// 電話番号形式（空欄はスキップ）
    Phone { field: &'static str },
    MinLength { field: &'static str, min: usize },
    /// 他フィールドと一致
    Matches { field: &'static str, other: &'static str, message: &'static str },
    /// いずれか1つ以上チェック
    AnyOf { key: &'static str, fields: &'static [&'static str], message: &'static str },
    /// 数値範囲（空欄はスキップ）
    Range { field: &'static str, min: i64, max: i64 },
    /// 数値下限（空欄はスキップ）
    AtLeast { field: &'static str, min: i64 },
    /// 選択肢のいずれか（空欄はスキップ）
    OneOf { field: &'static str, options: &'static [&'static str] },
    /// 営業時間（`closed` または `HHMM-HHMM`）
    Hours { field: &'static str },
}

/// ルール列を評価
pub fn validate(state: &FormState, rules: &[Rule]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    for rule in rules {
        match *rule {
            Rule::Required { field, message } => {
                let Some((key, value)) = lookup(state, field) else { continue };
                if value.is_blank() {
                    let message = message
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("{} is required", humanize(field_name(field))));
                    errors.insert(key, message);
                }
            }
            Rule::Email { field } => {
                let Some((key, value)) = lookup(state, field) else { continue };
                if !value.is_blank() && !is_valid_email(&value.as_text()) {
                    errors.insert(key, "Invalid email format");
                }
            }
            Rule::Phone { field } => {
                let Some((key, value)) = lookup(state, field) else { continue };
                if !value.is_blank() && !is_valid_phone(&value.as_text()) {
                    errors.insert(key, "Phone format should be XXX-XXX-XXXX");
                }
            }
            Rule::MinLength { field, min } => {
                let Some((key, value)) = lookup(state, field) else { continue };
                let text = value.as_text();
                if !value.is_blank() && text.chars().count() < min {
                    errors.insert(
                        key,
                        format!("{} must be at least {} characters", humanize(field_name(field)), min),
                    );
                }
            }
            Rule::Matches { field, other, message } => {
                let (Some((key, value)), Some((_, other_value))) =
                    (lookup(state, field), lookup(state, other))
                else {
                    continue;
                };
                if !value.is_blank() && value.as_text() != other_value.as_text() {
                    errors.insert(key, message);
                }
            }
            Rule::AnyOf { key, fields, message } => {
                let any_checked = fields
                    .iter()
                    .filter_map(|field| lookup(state, field))
                    .any(|(_, value)| matches!(value, FieldValue::Bool(true)));
                if !any_checked {
                    errors.insert(key, message);
                }
            }
            Rule::Range { field, min, max } => {
                let Some((key, value)) = lookup(state, field) else { continue };
                if value.is_blank() {
                    continue;
                }
                let in_range = match value {
                    FieldValue::Number(n) => (min..=max).contains(n),
                    FieldValue::Text(s) => crate::form::coerce_number(s)
                        .map(|n| (min..=max).contains(&n))
                        .unwrap_or(false),
                    FieldValue::Bool(_) => false,
                };
                if !in_range {
                    errors.insert(
                        key,
                        format!("{} must be between {} and {}", humanize(field_name(field)), min, max),
                    );
                }
            }
            Rule::AtLeast { field, min } => {
                let Some((key, value)) = lookup(state, field) else { continue };
                if value.is_blank() {
                    continue;
                }
                let ok = match value {
                    FieldValue::Number(n) => *n >= min,
                    FieldValue::Text(s) => crate::form::coerce_number(s).map(|n| n >= min).unwrap_or(false),
                    FieldValue::Bool(_) => false,
                };
                if !ok {
                    errors.insert(key, format!("{} must be at least {}", humanize(field_name(field)), min));
                }
            }
            Rule::OneOf { field, options } => {
                let Some((key, value)) = lookup(state, field) else { continue };
                let text = value.as_text();
                if !value.is_blank() && !options.contains(&text.trim()) {
                    errors.insert(
                        key,
                        format!("{} must be one of: {}", humanize(field_name(field)), options.join(", ")),
                    );
                }
            }
            Rule::Hours { field } => {
                let Some((key, value)) = lookup(state, field) else { continue };
                if value.is_blank() {
                    continue;
                }
                if let Err(reason) = parse_hours(&value.as_text()) {
                    errors.insert(key, format!("Hours should be 'closed' or HHMM-HHMM ({})", reason));
                }
            }
        }
    }

    if !errors.is_empty() {
        log::debug!("validation failed: {}", errors);
    }
    errors
}

fn lookup<'a>(state: &'a FormState, field: &str) -> Option<(String, &'a FieldValue)> {
    match state.resolve(field) {
        Ok(key) => state.get(&key).map(|value| (key.to_string(), value)),
        Err(e) => {
            log::warn!("validation rule refers to {}: {}", field, e);
            None
        }
    }
}

fn field_name(field: &str) -> &str {
    field.rsplit('.').next().unwrap_or(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FieldGroup, FieldSpec};

    const TEMPLATE: &[FieldSpec] = &[
        FieldSpec::text("name", FieldGroup::Root, ""),
        FieldSpec::text("password", FieldGroup::Root, ""),
        FieldSpec::text("confirm", FieldGroup::Root, ""),
        FieldSpec::text("phone", FieldGroup::Contact, ""),
        FieldSpec::flag("shelter", FieldGroup::Type, false),
        FieldSpec::flag("charity", FieldGroup::Type, false),
        FieldSpec::number("age", FieldGroup::Root, 25),
        FieldSpec::text("monday", FieldGroup::Hours, "0000-2359"),
    ];

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@b.com"));
    }

    #[test]
    fn test_phone_shape() {
        assert!(is_valid_phone("123-456-7890"));
        assert!(!is_valid_phone("1234567890"));
        assert!(!is_valid_phone("123-4567-890"));
    }

    #[test]
    fn test_password_length() {
        assert!(!is_valid_password("short"));
        assert!(is_valid_password("longenough1"));
        assert!(is_valid_password("12345678"));
    }

    #[test]
    fn test_parse_hours() {
        assert_eq!(parse_hours("closed"), Ok(None));
        let (open, close) = parse_hours("0900-1700").unwrap().unwrap();
        assert_eq!(open, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(close, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        assert!(parse_hours("0000-2359").is_ok());
        assert!(parse_hours("2500-2600").is_err());
        assert!(parse_hours("9-5").is_err());
        assert!(parse_hours("nine to five").is_err());
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("phone_number"), "Phone number");
        assert_eq!(humanize("name"), "Name");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn test_required_uses_default_and_custom_messages() {
        let state = FormState::new(TEMPLATE);
        let errors = validate(
            &state,
            &[
                Rule::Required { field: "name", message: None },
                Rule::Required { field: "confirm", message: Some("Please confirm your password") },
            ],
        );
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("confirm"), Some("Please confirm your password"));
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let mut state = FormState::new(TEMPLATE);
        state.set_input("password", "short".into()).unwrap();
        state.set_input("confirm", "other".into()).unwrap();
        let errors = validate(
            &state,
            &[
                Rule::MinLength { field: "password", min: 8 },
                Rule::Required { field: "password", message: None },
                Rule::Matches { field: "confirm", other: "password", message: "Passwords do not match" },
            ],
        );
        assert_eq!(errors.get("password"), Some("Password must be at least 8 characters"));
        assert_eq!(errors.get("confirm"), Some("Passwords do not match"));
    }

    #[test]
    fn test_matches_passes_when_equal() {
        let mut state = FormState::new(TEMPLATE);
        state.set_input("password", "longenough1".into()).unwrap();
        state.set_input("confirm", "longenough1".into()).unwrap();
        let errors = validate(
            &state,
            &[Rule::Matches { field: "confirm", other: "password", message: "Passwords do not match" }],
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_phone_rule_uses_qualified_key() {
        let mut state = FormState::new(TEMPLATE);
        state.set_input("phone", "5551234".into()).unwrap();
        let errors = validate(&state, &[Rule::Phone { field: "contact.phone" }]);
        assert_eq!(errors.get("contact.phone"), Some("Phone format should be XXX-XXX-XXXX"));
    }

    #[test]
    fn test_any_of() {
        let rules = [Rule::AnyOf {
            key: "type",
            fields: &["type.shelter", "type.charity"],
            message: "Please select at least one organization type.",
        }];
        let mut state = FormState::new(TEMPLATE);
        assert!(validate(&state, &rules).contains("type"));

        state.set_input("charity", true.into()).unwrap();
        assert!(validate(&state, &rules).is_empty());
    }

    #[test]
    fn test_range() {
        let rules = [Rule::Range { field: "age", min: 0, max: 120 }];
        let mut state = FormState::new(TEMPLATE);
        assert!(validate(&state, &rules).is_empty());

        state.set_input("age", "130".into()).unwrap();
        assert_eq!(validate(&state, &rules).get("age"), Some("Age must be between 0 and 120"));

        state.set_input("age", "old".into()).unwrap();
        assert!(validate(&state, &rules).contains("age"));
    }

    #[test]
    fn test_at_least_and_one_of() {
        let rules = [
            Rule::AtLeast { field: "age", min: 18 },
            Rule::OneOf { field: "name", options: &["male", "female", "other"] },
        ];
        let mut state = FormState::new(TEMPLATE);
        state.set_input("name", "other".into()).unwrap();
        assert!(validate(&state, &rules).is_empty());

        state.set_input("age", "12".into()).unwrap();
        state.set_input("name", "unknown".into()).unwrap();
        let errors = validate(&state, &rules);
        assert_eq!(errors.get("age"), Some("Age must be at least 18"));
        assert_eq!(errors.get("name"), Some("Name must be one of: male, female, other"));
    }

    #[test]
    fn test_hours_rule() {
        let rules = [Rule::Hours { field: "hours.monday" }];
        let mut state = FormState::new(TEMPLATE);
        assert!(validate(&state, &rules).is_empty());

        state.set_input("monday", "9am-5pm".into()).unwrap();
        assert!(validate(&state, &rules).contains("hours.monday"));
    }

    #[test]
    fn test_errors_display_and_clear() {
        let mut errors = ValidationErrors::new();
        errors.insert("name", "Name is required");
        errors.insert("name", "ignored");
        errors.insert("email", "Invalid email format");
        assert_eq!(errors.len(), 2);
        assert_eq!(format!("{}", errors), "email: Invalid email format; name: Name is required");
        assert!(errors.clear("name"));
        assert!(!errors.clear("name"));
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email"]);
    }
}
