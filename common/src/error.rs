//! エラー型定義

use crate::validation::ValidationErrors;
use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Ambiguous field `{name}`, use one of: {candidates}")]
    AmbiguousField { name: String, candidates: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// APIエラー（サーバー拒否・通信失敗・レスポンス不正）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// サーバーが返した検証/業務エラー（そのまま表示する）
    #[error("{0}")]
    Rejected(String),

    #[error("Could not connect to backend: {0}")]
    Network(String),

    #[error("Unexpected response from backend: {0}")]
    Decode(String),
}

impl ApiError {
    /// ユーザー向けメッセージ
    ///
    /// サーバー拒否は原文のまま、通信系は汎用の再試行メッセージにする
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected(message) => message.clone(),
            ApiError::Network(_) => "Could not connect to backend. Please try again later.".to_string(),
            ApiError::Decode(_) => "The backend sent an unexpected response. Please try again later.".to_string(),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

/// 外部スクリプト読込エラー
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to load {key}: {reason}")]
pub struct LoadError {
    pub key: String,
    pub reason: String,
}

impl LoadError {
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_display_config() {
        let error = Error::Config("maps API key is not set".to_string());
        assert_eq!(format!("{}", error), "Config error: maps API key is not set");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_api_error_is_transparent() {
        let error: Error = ApiError::Rejected("EIN already registered".to_string()).into();
        assert_eq!(format!("{}", error), "EIN already registered");
    }

    #[test]
    fn test_user_message_rejected_is_verbatim() {
        let error = ApiError::Rejected("Organization failed automated verification.".to_string());
        assert_eq!(error.user_message(), "Organization failed automated verification.");
    }

    #[test]
    fn test_user_message_network_is_generic() {
        let error = ApiError::Network("connection refused".to_string());
        let message = error.user_message();
        assert!(message.contains("try again"));
        assert!(!message.contains("connection refused"));
        assert!(error.is_network());
    }

    #[test]
    fn test_load_error_display() {
        let error = LoadError::new("google-maps", "script error");
        assert_eq!(format!("{}", error), "Failed to load google-maps: script error");
    }
}
