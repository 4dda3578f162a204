use give_and_get_common::{ApiError, Error as CommonError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Common(#[from] CommonError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// 送信に失敗（通信エラーなど、メッセージは利用者向け）
    #[error("{0}")]
    Submit(String),

    #[error("Match query failed: {0}")]
    Match(String),

    #[error("No location with id {0} in the results")]
    UnknownLocation(String),

    #[error("Invalid survey file: {0}")]
    Survey(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<dialoguer::Error> for AppError {
    fn from(e: dialoguer::Error) -> Self {
        AppError::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
