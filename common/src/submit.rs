//! 送信状態機械
//!
//! Editing → (検証OK) Submitting → Succeeded / Rejected / Failed
//!
//! 検証に失敗した場合は通信せず Editing のまま。自動再送はしない。

use crate::error::ApiError;
use crate::form::FieldValue;
use crate::forms::Form;
use crate::types::{CreateUserReply, Verification, VerificationReply};
use serde_json::Value;
use std::future::Future;

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStatus {
    Editing,
    Submitting,
    /// 完了画面（送信内容の表示用データとサーバーのメッセージ）
    Succeeded { echo: Value, receipt: SubmitReceipt },
    /// サーバーが拒否（メッセージはそのまま表示）
    Rejected(String),
    /// 通信失敗など（汎用メッセージ）
    Failed(String),
}

impl SubmitStatus {
    pub fn is_busy(&self) -> bool {
        matches!(self, SubmitStatus::Submitting)
    }

    /// 表示するエラーメッセージ
    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmitStatus::Rejected(message) | SubmitStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// 登録成功時の応答
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitReceipt {
    pub message: String,
    pub id: Option<String>,
    pub verification: Option<Verification>,
}

impl From<CreateUserReply> for SubmitReceipt {
    fn from(reply: CreateUserReply) -> Self {
        Self {
            message: reply.message,
            id: reply.user_id,
            verification: None,
        }
    }
}

impl From<VerificationReply> for SubmitReceipt {
    fn from(reply: VerificationReply) -> Self {
        Self {
            message: reply.message,
            id: reply.organization_id,
            verification: reply.verification,
        }
    }
}

/// 送信中のリクエスト
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub payload: Value,
    echo: Value,
}

/// フォームと送信状態
#[derive(Debug, Clone)]
pub struct Submission<F> {
    form: F,
    status: SubmitStatus,
    submitted: Vec<Value>,
}

impl<F: Form> Submission<F> {
    pub fn new(form: F) -> Self {
        Self {
            form,
            status: SubmitStatus::Editing,
            submitted: Vec::new(),
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    /// 必要物資など、Form トレイト外の編集用
    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn status(&self) -> &SubmitStatus {
        &self.status
    }

    /// これまでに成功した送信ペイロード
    pub fn submitted(&self) -> &[Value] {
        &self.submitted
    }

    pub fn input(&mut self, name: &str, value: FieldValue) -> crate::error::Result<()> {
        self.form.input(name, value)
    }

    /// 送信開始
    ///
    /// 送信中、または検証に失敗した場合は None（通信しない）
    pub fn begin(&mut self) -> Option<PendingSubmission> {
        if self.status.is_busy() {
            log::debug!("submit ignored: request already in flight");
            return None;
        }
        if !self.form.validate() {
            self.status = SubmitStatus::Editing;
            return None;
        }
        self.status = SubmitStatus::Submitting;
        Some(PendingSubmission {
            payload: self.form.payload(),
            echo: self.form.echo(),
        })
    }

    /// 送信結果を反映
    pub fn finish(&mut self, pending: PendingSubmission, result: Result<SubmitReceipt, ApiError>) {
        self.status = match result {
            Ok(receipt) => {
                log::info!("submission accepted: {}", receipt.message);
                self.submitted.push(pending.payload);
                self.form.reset();
                SubmitStatus::Succeeded { echo: pending.echo, receipt }
            }
            Err(ApiError::Rejected(message)) => {
                log::warn!("submission rejected: {}", message);
                SubmitStatus::Rejected(message)
            }
            Err(e) => {
                log::error!("submission failed: {}", e);
                SubmitStatus::Failed(e.user_message())
            }
        };
    }

    /// 検証→送信→反映を一度に行う
    ///
    /// 送信しなかった場合は false
    pub async fn submit<S, Fut, R>(&mut self, send: S) -> bool
    where
        S: FnOnce(Value) -> Fut,
        Fut: Future<Output = Result<R, ApiError>>,
        R: Into<SubmitReceipt>,
    {
        let Some(pending) = self.begin() else {
            return false;
        };
        let result = send(pending.payload.clone()).await.map(Into::into);
        self.finish(pending, result);
        true
    }

    /// 完了・エラー表示からフォームに戻る
    pub fn back_to_form(&mut self) {
        if !self.status.is_busy() {
            self.status = SubmitStatus::Editing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{DonorForm, OrganizationForm};
    use futures::executor::block_on;
    use std::cell::Cell;

    fn filled_donor() -> Submission<DonorForm> {
        let mut submission = Submission::new(DonorForm::new());
        for (name, value) in [
            ("name", "Ann"),
            ("phone_number", "814-555-0100"),
            ("email", "ann@example.com"),
            ("address", "1 College Ave"),
            ("password", "longenough1"),
            ("confirmPassword", "longenough1"),
        ] {
            submission.input(name, value.into()).unwrap();
        }
        submission
    }

    #[test]
    fn test_invalid_form_makes_no_request() {
        let calls = Cell::new(0);
        let mut submission = Submission::new(OrganizationForm::new());
        let sent = block_on(submission.submit(|_payload| {
            calls.set(calls.get() + 1);
            async { Ok::<_, ApiError>(SubmitReceipt::default()) }
        }));
        assert!(!sent);
        assert_eq!(calls.get(), 0);
        assert_eq!(submission.status(), &SubmitStatus::Editing);
        assert!(submission.form().errors().contains("type"));
    }

    #[test]
    fn test_success_resets_and_records() {
        let mut submission = filled_donor();
        let sent = block_on(submission.submit(|payload| async move {
            assert_eq!(payload["email"], "ann@example.com");
            Ok::<_, ApiError>(CreateUserReply {
                status: "success".into(),
                message: "User created".into(),
                user_id: Some("u1".into()),
            })
        }));
        assert!(sent);
        match submission.status() {
            SubmitStatus::Succeeded { echo, receipt } => {
                assert_eq!(echo["name"], "Ann");
                assert_eq!(receipt.id.as_deref(), Some("u1"));
            }
            other => panic!("unexpected status: {:?}", other),
        }
        assert_eq!(submission.submitted().len(), 1);
        assert_eq!(submission.form().state().text("name"), "");
    }

    #[test]
    fn test_rejection_is_verbatim_and_keeps_form() {
        let mut submission = filled_donor();
        block_on(submission.submit(|_| async {
            Err::<SubmitReceipt, _>(ApiError::Rejected("Email already registered".into()))
        }));
        assert_eq!(submission.status().error_message(), Some("Email already registered"));
        assert_eq!(submission.form().state().text("name"), "Ann");
        assert!(submission.submitted().is_empty());
    }

    #[test]
    fn test_network_failure_is_generic() {
        let mut submission = filled_donor();
        block_on(submission.submit(|_| async {
            Err::<SubmitReceipt, _>(ApiError::Network("dns error".into()))
        }));
        match submission.status() {
            SubmitStatus::Failed(message) => assert!(message.contains("try again")),
            other => panic!("unexpected status: {:?}", other),
        }
        assert_eq!(submission.form().state().text("email"), "ann@example.com");
    }

    #[test]
    fn test_no_double_submit() {
        let mut submission = filled_donor();
        let pending = submission.begin().expect("valid form");
        assert!(submission.status().is_busy());
        assert!(submission.begin().is_none());
        submission.finish(pending, Ok(SubmitReceipt::default()));
        assert!(!submission.status().is_busy());
    }

    #[test]
    fn test_back_to_form() {
        let mut submission = filled_donor();
        let pending = submission.begin().unwrap();
        submission.finish(pending, Err(ApiError::Decode("bad".into())));
        submission.back_to_form();
        assert_eq!(submission.status(), &SubmitStatus::Editing);
    }
}
