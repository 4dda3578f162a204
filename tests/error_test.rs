//! エラーケーステスト
//!
//! 共通ライブラリのエラーがCLIのエラーへ変換されることを検証

use give_and_get::error::AppError;
use give_and_get::survey;
use give_and_get_common::{ApiError, Error as CommonError};
use std::path::Path;
use tempfile::tempdir;

/// サーバーの拒否メッセージはそのまま表示される
#[test]
fn test_rejection_message_is_verbatim() {
    let err: AppError = ApiError::Rejected("Email already registered".into()).into();
    assert_eq!(err.to_string(), "Email already registered");
}

/// 共通エラーは透過的に表示される
#[test]
fn test_common_error_is_transparent() {
    let err: AppError = CommonError::UnknownField("favorite_color".into()).into();
    assert!(matches!(err, AppError::Common(_)));
    assert_eq!(err.to_string(), "Unknown field: favorite_color");
}

/// 存在しない条件ファイル
#[test]
fn test_missing_survey_file() {
    let result = survey::build_survey(Some(Path::new("/nonexistent/survey-12345.json")), &[]);
    assert!(matches!(result, Err(AppError::Io(_))));
}

/// JSONとして読めない条件ファイル
#[test]
fn test_malformed_survey_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("survey.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = survey::build_survey(Some(&path), &[]);
    assert!(matches!(result, Err(AppError::JsonParse(_))));
}

/// 条件ファイルの値が検証に失敗する
#[test]
fn test_survey_file_with_invalid_values() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("survey.json");
    std::fs::write(&path, r#"{"gender": "unknown", "beds_needed": 0}"#).unwrap();

    match survey::build_survey(Some(&path), &[]) {
        Err(AppError::Common(CommonError::Validation(errors))) => {
            assert!(errors.contains("gender"));
            assert!(errors.contains("beds_needed"));
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}
