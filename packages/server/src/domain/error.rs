//! ドメイン層のエラー定義

use thiserror::Error;

/// 値オブジェクトの生成時エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{0} has an invalid format")]
    InvalidFormat(&'static str),
}

/// Poll エンティティの生成時エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("a poll needs at least {min} options, got {actual}")]
    TooFewOptions { min: usize, actual: usize },

    #[error("a poll accepts at most {max} options, got {actual}")]
    TooManyOptions { max: usize, actual: usize },
}

/// Repository（投票ストレージ）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Poll '{0}' not found")]
    PollNotFound(String),

    #[error("Option '{option_id}' does not belong to poll '{poll_id}'")]
    OptionNotFound { poll_id: String, option_id: String },

    #[error("Poll '{0}' is closed")]
    PollClosed(String),

    #[error("Short code '{0}' is already taken")]
    DuplicateShortCode(String),

    #[error("Poll storage unavailable: {0}")]
    Unavailable(String),
}

/// Room Registry のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Connection '{0}' is not registered or has already terminated")]
    ConnectionClosed(String),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Connection '{0}' not found")]
    ConnectionNotFound(String),

    #[error("Push failed: {0}")]
    PushFailed(String),

    #[error("Failed to encode event: {0}")]
    Encode(String),
}
