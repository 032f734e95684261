//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{MessagePushError, RepositoryError, ValueObjectError};

/// 集計の取得エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("Poll '{0}' not found")]
    PollNotFound(String),

    #[error("Poll storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<RepositoryError> for AggregateError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::PollNotFound(poll_id) => Self::PollNotFound(poll_id),
            other => Self::StorageUnavailable(other.to_string()),
        }
    }
}

/// 投票のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitVoteError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Poll '{0}' not found")]
    PollNotFound(String),

    #[error("Poll '{0}' is closed")]
    PollClosed(String),

    #[error("Option '{option_id}' does not belong to poll '{poll_id}'")]
    InvalidOption { poll_id: String, option_id: String },

    #[error("Poll storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<ValueObjectError> for SubmitVoteError {
    fn from(error: ValueObjectError) -> Self {
        Self::InvalidInput(error.to_string())
    }
}

impl From<RepositoryError> for SubmitVoteError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::PollNotFound(poll_id) => Self::PollNotFound(poll_id),
            RepositoryError::PollClosed(poll_id) => Self::PollClosed(poll_id),
            RepositoryError::OptionNotFound { poll_id, option_id } => {
                Self::InvalidOption { poll_id, option_id }
            }
            other => Self::StorageUnavailable(other.to_string()),
        }
    }
}

impl From<AggregateError> for SubmitVoteError {
    fn from(error: AggregateError) -> Self {
        match error {
            AggregateError::PollNotFound(poll_id) => Self::PollNotFound(poll_id),
            AggregateError::StorageUnavailable(reason) => Self::StorageUnavailable(reason),
        }
    }
}

/// Poll 作成のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreatePollError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Poll storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Poll 取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchPollError {
    #[error("Either id or shortCode must be provided")]
    MissingIdentifier,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Poll not found")]
    PollNotFound,

    #[error("Poll storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<AggregateError> for FetchPollError {
    fn from(error: AggregateError) -> Self {
        match error {
            AggregateError::PollNotFound(_) => Self::PollNotFound,
            AggregateError::StorageUnavailable(reason) => Self::StorageUnavailable(reason),
        }
    }
}

/// Room への参加エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinPollError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Poll '{0}' not found")]
    PollNotFound(String),

    #[error("Connection '{0}' has already terminated")]
    ConnectionClosed(String),

    #[error("Poll storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Room からの退出・参加人数取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresenceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// ブロードキャストのエラー
///
/// 個々の接続への配送失敗はここに含まれない（DeliveryReport で数える）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Push(#[from] MessagePushError),
}
