//! 団体登録フォーム
//!
//! テンプレートはバックエンドの団体スキーマに合わせている。
//! `email`・`phone` などはトップレベルに同名がないので素の名前で入力できる。

use super::{Form, FormCore};
use crate::error::{Error, Result};
use crate::form::{FieldGroup, FieldSpec, FieldValue, FormState};
use crate::needs::{NeedField, NeedsList};
use crate::types::WEEKDAYS;
use crate::validation::{parse_hours, Rule, ValidationErrors};
use serde_json::Value;

use FieldGroup::{Amenities, Contact, Hours, Root, Type};

const ALL_DAY: &str = "0000-2359";

pub const ORG_TEMPLATE: &[FieldSpec] = &[
    FieldSpec::text("image_address_url", Root, ""),
    FieldSpec::flag("shelter", Type, false),
    FieldSpec::flag("charity", Type, false),
    FieldSpec::text("EIN", Root, ""),
    FieldSpec::text("name", Root, ""),
    FieldSpec::text("address", Root, ""),
    FieldSpec::flag("accessible", Amenities, false),
    FieldSpec::flag("lgbtq_only", Amenities, false),
    FieldSpec::flag("male_only", Amenities, false),
    FieldSpec::flag("female_only", Amenities, false),
    FieldSpec::flag("all_gender", Amenities, false),
    FieldSpec::flag("pet_friendly", Amenities, false),
    FieldSpec::list("languages", Amenities, "english"),
    FieldSpec::flag("family_rooming", Amenities, false),
    FieldSpec::number("beds_available", Amenities, 0),
    FieldSpec::flag("medical_support", Amenities, false),
    FieldSpec::flag("counseling_support", Amenities, false),
    FieldSpec::number("fees", Amenities, 0),
    FieldSpec::number("age_minimum", Amenities, 0),
    FieldSpec::number("age_maximum", Amenities, 120),
    FieldSpec::flag("veteran_only", Amenities, false),
    FieldSpec::flag("immigrant_only", Amenities, false),
    FieldSpec::flag("refugee_only", Amenities, false),
    FieldSpec::flag("good_criminal_record_standing", Amenities, false),
    FieldSpec::flag("sobriety_required", Amenities, false),
    FieldSpec::flag("showers", Amenities, false),
    FieldSpec::flag("id_required", Amenities, false),
    FieldSpec::text("monday", Hours, ALL_DAY),
    FieldSpec::text("tuesday", Hours, ALL_DAY),
    FieldSpec::text("wednesday", Hours, ALL_DAY),
    FieldSpec::text("thursday", Hours, ALL_DAY),
    FieldSpec::text("friday", Hours, ALL_DAY),
    FieldSpec::text("saturday", Hours, ALL_DAY),
    FieldSpec::text("sunday", Hours, ALL_DAY),
    FieldSpec::text("description", Root, ""),
    FieldSpec::text("phone", Contact, ""),
    FieldSpec::text("email", Contact, ""),
    FieldSpec::text("website", Contact, ""),
];

pub const TYPE_REQUIRED_MESSAGE: &str = "Please select at least one organization type.";

const ORG_RULES: &[Rule] = &[
    Rule::AnyOf {
        key: "type",
        fields: &["type.shelter", "type.charity"],
        message: TYPE_REQUIRED_MESSAGE,
    },
    Rule::Required { field: "name", message: None },
    Rule::Required { field: "address", message: None },
    Rule::Email { field: "contact.email" },
    Rule::Phone { field: "contact.phone" },
    Rule::Range { field: "age_minimum", min: 0, max: 120 },
    Rule::Range { field: "age_maximum", min: 0, max: 120 },
    Rule::Hours { field: "hours.monday" },
    Rule::Hours { field: "hours.tuesday" },
    Rule::Hours { field: "hours.wednesday" },
    Rule::Hours { field: "hours.thursday" },
    Rule::Hours { field: "hours.friday" },
    Rule::Hours { field: "hours.saturday" },
    Rule::Hours { field: "hours.sunday" },
];

/// 営業時間の選択肢
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourOption {
    Preset { label: &'static str, value: &'static str },
    /// 利用者が `HHMM-HHMM` を入力する
    Custom,
}

impl HourOption {
    pub fn label(&self) -> &'static str {
        match self {
            HourOption::Preset { label, .. } => *label,
            HourOption::Custom => "Custom",
        }
    }
}

pub const HOUR_OPTIONS: [HourOption; 6] = [
    HourOption::Preset { label: "Closed", value: "closed" },
    HourOption::Preset { label: "24 Hours", value: ALL_DAY },
    HourOption::Preset { label: "8 AM - 5 PM", value: "0800-1700" },
    HourOption::Preset { label: "9 AM - 6 PM", value: "0900-1800" },
    HourOption::Preset { label: "10 AM - 7 PM", value: "1000-1900" },
    HourOption::Custom,
];

/// 現在の値に対応する選択肢（プリセットになければCustom）
pub fn hour_option_for(value: &str) -> HourOption {
    HOUR_OPTIONS
        .iter()
        .copied()
        .find(|option| matches!(option, HourOption::Preset { value: v, .. } if *v == value))
        .unwrap_or(HourOption::Custom)
}

#[derive(Debug, Clone)]
pub struct OrganizationForm {
    core: FormCore,
    needs: NeedsList,
}

impl Default for OrganizationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl OrganizationForm {
    pub fn new() -> Self {
        Self {
            core: FormCore::new(FormState::new(ORG_TEMPLATE), ORG_RULES),
            needs: NeedsList::new(),
        }
    }

    pub fn needs(&self) -> &NeedsList {
        &self.needs
    }

    pub fn add_need(&mut self) -> usize {
        self.needs.add()
    }

    pub fn update_need(&mut self, index: usize, field: NeedField, value: &str) -> Result<()> {
        self.needs.update(index, field, value)
    }

    pub fn remove_need(&mut self, index: usize) -> bool {
        self.needs.remove(index).is_some()
    }

    /// 曜日の営業時間を設定
    ///
    /// カスタム入力は形式をここで検査する
    pub fn set_hours(&mut self, day: &str, value: &str) -> Result<()> {
        let day = day.trim().to_lowercase();
        if !WEEKDAYS.contains(&day.as_str()) {
            return Err(Error::UnknownField(format!("hours.{}", day)));
        }
        parse_hours(value).map_err(|reason| Error::InvalidValue {
            field: format!("hours.{}", day),
            reason,
        })?;
        self.core.input(&format!("hours.{}", day), value.trim().into())
    }

    pub fn hours(&self, day: &str) -> String {
        self.core.state.text(&format!("hours.{}", day))
    }
}

impl Form for OrganizationForm {
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

    fn payload(&self) -> Value {
        let mut payload = self.core.state.to_payload();
        let needs = serde_json::to_value(self.needs.to_payload()).unwrap_or_else(|_| Value::Object(Default::default()));
        payload.insert("needs".to_string(), needs);
        Value::Object(payload)
    }

    fn reset(&mut self) {
        self.core.reset();
        self.needs.clear();
    }
}
