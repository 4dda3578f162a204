//! 支援を求める人の条件フォーム（`person_filters`）

use super::{Form, FormCore};
use crate::error::Result;
use crate::form::{FieldGroup::Root, FieldSpec, FieldValue, FormState};
use crate::validation::{Rule, ValidationErrors};
use serde_json::Value;

/// 検索半径の既定値（マイル）
pub const DEFAULT_SURVEY_RADIUS: u32 = 25;

pub const URGENCY_OPTIONS: [(&str, &str); 3] = [
    ("immediate", "Immediate"),
    ("within_week", "Within a Week"),
    ("within_month", "Within a Month"),
];

pub const GENDER_OPTIONS: [(&str, &str); 3] = [
    ("male", "Male"),
    ("female", "Female"),
    ("other", "Other/Prefer not to say"),
];

pub const IMMIGRATION_OPTIONS: [(&str, &str); 6] = [
    ("", "Prefer not to say"),
    ("citizen", "Citizen"),
    ("permanent_resident", "Permanent Resident"),
    ("temporary_resident", "Temporary Resident"),
    ("refugee", "Refugee"),
    ("other", "Other"),
];

pub const YES_NO_OPTIONS: [(&str, &str); 2] = [("no", "No"), ("yes", "Yes")];

pub const SURVEY_TEMPLATE: &[FieldSpec] = &[
    FieldSpec::flag("needs_housing", Root, true),
    FieldSpec::number("beds_needed", Root, 1),
    FieldSpec::flag("needs_handicapped_access", Root, false),
    FieldSpec::flag("owns_pets", Root, false),
    FieldSpec::number("preferred_duration_days", Root, 30),
    FieldSpec::number("days_homeless", Root, 0).optional(),
    FieldSpec::flag("prefers_family_rooming", Root, false),
    FieldSpec::flag("can_pay_fees", Root, false),
    FieldSpec::number("max_affordable_fee", Root, 0),
    FieldSpec::flag("lgbtq_identity", Root, false),
    FieldSpec::flag("prefers_medical_support", Root, false),
    FieldSpec::flag("prefers_counseling", Root, false),
    FieldSpec::flag("prefers_meals_provided", Root, false),
    FieldSpec::flag("prefers_showers", Root, false),
    FieldSpec::text("duration_flexibility", Root, "flexible"),
    FieldSpec::text("urgency_level", Root, "within_week"),
    FieldSpec::number("max_travel_distance_miles", Root, 25),
    FieldSpec::text("gender", Root, "other"),
    FieldSpec::number("age", Root, 25),
    FieldSpec::text("language", Root, "english"),
    FieldSpec::text("immigration_status", Root, "").optional(),
    FieldSpec::text("veteran_status", Root, "no"),
    FieldSpec::text("criminal_record", Root, "no"),
    FieldSpec::text("sobriety", Root, "no"),
    FieldSpec::flag("has_id", Root, true),
    FieldSpec::flag("needs_food", Root, false),
    FieldSpec::flag("needs_clothing", Root, false),
    FieldSpec::flag("needs_medical", Root, false),
    FieldSpec::flag("needs_mental_health", Root, false),
];

const SURVEY_RULES: &[Rule] = &[
    Rule::Range { field: "age", min: 0, max: 120 },
    Rule::AtLeast { field: "beds_needed", min: 1 },
    Rule::AtLeast { field: "preferred_duration_days", min: 1 },
    Rule::AtLeast { field: "days_homeless", min: 0 },
    Rule::AtLeast { field: "max_affordable_fee", min: 0 },
    Rule::OneOf { field: "urgency_level", options: &["immediate", "within_week", "within_month"] },
    Rule::OneOf { field: "gender", options: &["male", "female", "other"] },
    Rule::OneOf { field: "duration_flexibility", options: &["flexible", "fixed"] },
    Rule::OneOf {
        field: "immigration_status",
        options: &["citizen", "permanent_resident", "temporary_resident", "refugee", "other"],
    },
    Rule::OneOf { field: "veteran_status", options: &["yes", "no"] },
    Rule::OneOf { field: "criminal_record", options: &["yes", "no"] },
    Rule::OneOf { field: "sobriety", options: &["yes", "no"] },
];

#[derive(Debug, Clone)]
pub struct SurveyForm {
    core: FormCore,
    radius: u32,
}

impl Default for SurveyForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyForm {
    pub fn new() -> Self {
        Self {
            core: FormCore::new(FormState::new(SURVEY_TEMPLATE), SURVEY_RULES),
            radius: DEFAULT_SURVEY_RADIUS,
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: u32) {
        self.radius = radius.max(1);
    }

    /// 住まいを探しているか（画面の出し分けに使う）
    pub fn needs_housing(&self) -> bool {
        self.core.state.flag("needs_housing")
    }
}

impl Form for SurveyForm {
    fn input(&mut self, name: &str, value: FieldValue) -> Result<()> {
        self.core.input(name, value)
    }

    fn validate(&mut self) -> bool {
        self.core.validate()
    }

    fn errors(&self) -> &ValidationErrors {
        &self.core.errors
    }

    fn state(&self) -> &FormState {
        &self.core.state
    }

    /// 移動距離は選択中の検索半径で上書きする
    fn payload(&self) -> Value {
        let mut payload = self.core.state.to_payload();
        payload.insert("max_travel_distance_miles".to_string(), Value::from(self.radius));
        Value::Object(payload)
    }

    fn reset(&mut self) {
        self.core.reset();
        self.radius = DEFAULT_SURVEY_RADIUS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let mut form = SurveyForm::new();
        assert!(form.validate());
        assert!(form.needs_housing());
    }

    #[test]
    fn test_radius_overrides_travel_distance() {
        let mut form = SurveyForm::new();
        form.input("max_travel_distance_miles", "5".into()).unwrap();
        form.set_radius(50);
        let payload = form.payload();
        assert_eq!(payload["max_travel_distance_miles"], 50);
    }

    #[test]
    fn test_optional_fields_are_null() {
        let form = SurveyForm::new();
        let payload = form.payload();
        assert!(payload["days_homeless"].is_null());
        assert!(payload["immigration_status"].is_null());
        assert_eq!(payload["age"], 25);
        assert_eq!(payload["has_id"], true);
    }

    #[test]
    fn test_optional_fields_when_set() {
        let mut form = SurveyForm::new();
        form.input("days_homeless", "14".into()).unwrap();
        form.input("immigration_status", "refugee".into()).unwrap();
        assert!(form.validate());
        let payload = form.payload();
        assert_eq!(payload["days_homeless"], 14);
        assert_eq!(payload["immigration_status"], "refugee");
    }

    #[test]
    fn test_out_of_range_values() {
        let mut form = SurveyForm::new();
        form.input("age", "150".into()).unwrap();
        form.input("beds_needed", "0".into()).unwrap();
        form.input("gender", "robot".into()).unwrap();
        assert!(!form.validate());
        assert_eq!(form.errors().len(), 3);
        assert_eq!(form.errors().get("beds_needed"), Some("Beds needed must be at least 1"));
    }

    #[test]
    fn test_reset_restores_radius() {
        let mut form = SurveyForm::new();
        form.set_radius(0);
        assert_eq!(form.radius(), 1);
        form.input("needs_housing", false.into()).unwrap();
        form.reset();
        assert_eq!(form.radius(), DEFAULT_SURVEY_RADIUS);
        assert!(form.needs_housing());
    }
}
