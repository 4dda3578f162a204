//! 寄付者登録フォーム

use super::{Form, FormCore};
use crate::error::Result;
use crate::form::{FieldGroup, FieldSpec, FieldValue, FormState};
use crate::validation::{Rule, ValidationErrors, MIN_PASSWORD_LEN};
use serde::Serialize;
use serde_json::{json, Value};

pub const DONOR_TEMPLATE: &[FieldSpec] = &[
    FieldSpec::text("name", FieldGroup::Root, ""),
    FieldSpec::text("phone_number", FieldGroup::Root, ""),
    FieldSpec::text("email", FieldGroup::Root, ""),
    FieldSpec::text("address", FieldGroup::Root, ""),
    FieldSpec::text("password", FieldGroup::Root, ""),
    FieldSpec::text("confirmPassword", FieldGroup::Root, ""),
];

const DONOR_RULES: &[Rule] = &[
    Rule::Required { field: "name", message: None },
    Rule::Required { field: "email", message: None },
    Rule::Email { field: "email" },
    Rule::Required { field: "phone_number", message: None },
    Rule::Phone { field: "phone_number" },
    Rule::Required { field: "address", message: None },
    Rule::Required { field: "password", message: None },
    Rule::MinLength { field: "password", min: MIN_PASSWORD_LEN },
    Rule::Required { field: "confirmPassword", message: Some("Please confirm your password") },
    Rule::Matches { field: "confirmPassword", other: "password", message: "Passwords do not match" },
];

/// `/api/user/create` に送る内容
///
/// 住所と確認用パスワードは送らない
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonorPayload {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub charity: bool,
    pub shelter: bool,
    pub donor: bool,
    pub phone_number: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct DonorForm {
    core: FormCore,
}

impl Default for DonorForm {
    fn default() -> Self {
        Self::new()
    }
}

impl DonorForm {
    pub fn new() -> Self {
        Self {
            core: FormCore::new(FormState::new(DONOR_TEMPLATE), DONOR_RULES),
        }
    }

    pub fn to_payload(&self) -> DonorPayload {
        let state = &self.core.state;
        DonorPayload {
            id: "0".to_string(),
            name: state.text("name").trim().to_string(),
            charity: false,
            shelter: false,
            donor: true,
            phone_number: state.text("phone_number").trim().to_string(),
            email: state.text("email").trim().to_string(),
            password: state.text("password"),
        }
    }

    /// `/api/donor/validate` 用（連絡先のみ）
    pub fn validation_request(&self) -> Value {
        let state = &self.core.state;
        json!({
            "name": state.text("name").trim(),
            "email": state.text("email").trim(),
            "phone": state.text("phone_number").trim(),
            "address": state.text("address").trim(),
        })
    }
}

impl Form for DonorForm {
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
        serde_json::to_value(self.to_payload()).unwrap_or(Value::Null)
    }

    /// 完了画面は名前・メール・住所のみ
    fn echo(&self) -> Value {
        let state = &self.core.state;
        json!({
            "name": state.text("name").trim(),
            "email": state.text("email").trim(),
            "address": state.text("address").trim(),
        })
    }

    fn reset(&mut self) {
        self.core.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> DonorForm {
        let mut form = DonorForm::new();
        form.input("name", "Ann Donor".into()).unwrap();
        form.input("phone_number", "814-555-0100".into()).unwrap();
        form.input("email", "ann@example.com".into()).unwrap();
        form.input("address", "1 College Ave".into()).unwrap();
        form.input("password", "longenough1".into()).unwrap();
        form.input("confirmPassword", "longenough1".into()).unwrap();
        form
    }

    #[test]
    fn test_blank_form_flags_exactly_required_fields() {
        let mut form = DonorForm::new();
        assert!(!form.validate());
        let fields: Vec<&str> = form.errors().fields().collect();
        assert_eq!(fields, vec!["address", "confirmPassword", "email", "name", "password", "phone_number"]);
        assert_eq!(form.errors().get("phone_number"), Some("Phone number is required"));
        assert_eq!(form.errors().get("confirmPassword"), Some("Please confirm your password"));
    }

    #[test]
    fn test_format_errors() {
        let mut form = filled();
        form.input("email", "ann@example".into()).unwrap();
        form.input("phone_number", "8145550100".into()).unwrap();
        form.input("password", "short".into()).unwrap();
        assert!(!form.validate());
        assert_eq!(form.errors().get("email"), Some("Invalid email format"));
        assert_eq!(form.errors().get("phone_number"), Some("Phone format should be XXX-XXX-XXXX"));
        assert_eq!(form.errors().get("password"), Some("Password must be at least 8 characters"));
        assert_eq!(form.errors().get("confirmPassword"), Some("Passwords do not match"));
    }

    #[test]
    fn test_input_clears_field_error() {
        let mut form = DonorForm::new();
        form.validate();
        assert!(form.errors().contains("name"));
        form.input("name", "A".into()).unwrap();
        assert!(!form.errors().contains("name"));
        assert!(form.errors().contains("email"));
    }

    #[test]
    fn test_valid_payload_shape() {
        let mut form = filled();
        assert!(form.validate());
        let payload = form.payload();
        assert_eq!(payload["_id"], "0");
        assert_eq!(payload["donor"], true);
        assert_eq!(payload["charity"], false);
        assert_eq!(payload["shelter"], false);
        assert_eq!(payload["phone_number"], "814-555-0100");
        assert!(payload.get("address").is_none());
        assert!(payload.get("confirmPassword").is_none());
    }

    #[test]
    fn test_echo_and_reset() {
        let mut form = filled();
        let echo = form.echo();
        assert_eq!(echo["address"], "1 College Ave");
        assert!(echo.get("password").is_none());
        form.reset();
        assert_eq!(form.state().text("name"), "");
    }

    #[test]
    fn test_validation_request() {
        let form = filled();
        let request = form.validation_request();
        assert_eq!(request["phone"], "814-555-0100");
    }
}
