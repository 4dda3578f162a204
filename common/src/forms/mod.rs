//! 登録・検索フォーム
//!
//! - DonorForm: 寄付者登録
//! - OrganizationForm: 団体登録（必要物資・営業時間を含む）
//! - SurveyForm: 支援を求める人の条件入力

pub mod donor;
pub mod organization;
pub mod survey;

pub use donor::DonorForm;
pub use organization::OrganizationForm;
pub use survey::SurveyForm;

use crate::error::Result;
use crate::form::{FieldValue, FormState};
use crate::validation::{validate, Rule, ValidationErrors};
use serde_json::Value;

/// フォーム共通の操作
pub trait Form {
    /// 入力イベント（該当フィールドとそのグループのエラーを消す）
    fn input(&mut self, name: &str, value: FieldValue) -> Result<()>;

    /// 検証してエラーを更新、問題なければtrue
    fn validate(&mut self) -> bool;

    fn errors(&self) -> &ValidationErrors;

    fn state(&self) -> &FormState;

    /// 送信ペイロード
    fn payload(&self) -> Value;

    /// 完了画面に表示する内容
    fn echo(&self) -> Value {
        self.payload()
    }

    /// テンプレートに戻す
    fn reset(&mut self);
}

/// 状態・エラー・ルールの組
#[derive(Debug, Clone)]
pub(crate) struct FormCore {
    pub state: FormState,
    pub errors: ValidationErrors,
    rules: &'static [Rule],
}

impl FormCore {
    pub fn new(state: FormState, rules: &'static [Rule]) -> Self {
        Self {
            state,
            errors: ValidationErrors::new(),
            rules,
        }
    }

    pub fn input(&mut self, name: &str, value: FieldValue) -> Result<()> {
        let key = self.state.set_input(name, value)?;
        self.errors.clear(&key.to_string());
        if let Some(group) = key.group.key() {
            self.errors.clear(group);
        }
        Ok(())
    }

    pub fn validate(&mut self) -> bool {
        self.errors = validate(&self.state, self.rules);
        self.errors.is_empty()
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.errors = ValidationErrors::new();
    }
}
