//! HTTP error responses.
//!
//! UseCase errors are mapped to a status code and a `{"message": ...}` body.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    infrastructure::dto::http::ErrorResponse,
    usecase::{CreatePollError, FetchPollError, PresenceError, SubmitVoteError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("Responding {}: {}", self.status, self.message);
        } else {
            tracing::warn!("Responding {}: {}", self.status, self.message);
        }
        (
            self.status,
            Json(ErrorResponse {
                message: self.message,
            }),
        )
            .into_response()
    }
}

/// Undecodable request bodies are invalid input, whatever axum's own status would be.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<SubmitVoteError> for ApiError {
    fn from(error: SubmitVoteError) -> Self {
        let status = match &error {
            SubmitVoteError::InvalidInput(_) | SubmitVoteError::InvalidOption { .. } => {
                StatusCode::BAD_REQUEST
            }
            SubmitVoteError::PollNotFound(_) => StatusCode::NOT_FOUND,
            SubmitVoteError::PollClosed(_) => StatusCode::CONFLICT,
            SubmitVoteError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, error.to_string())
    }
}

impl From<CreatePollError> for ApiError {
    fn from(error: CreatePollError) -> Self {
        let status = match &error {
            CreatePollError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CreatePollError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, error.to_string())
    }
}

impl From<FetchPollError> for ApiError {
    fn from(error: FetchPollError) -> Self {
        let status = match &error {
            FetchPollError::MissingIdentifier | FetchPollError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            FetchPollError::PollNotFound => StatusCode::NOT_FOUND,
            FetchPollError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, error.to_string())
    }
}

impl From<PresenceError> for ApiError {
    fn from(error: PresenceError) -> Self {
        match error {
            PresenceError::InvalidInput(_) => Self::bad_request(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::FromRequest, http::Request};

    use crate::infrastructure::dto::http::VoteRequest;

    #[test]
    fn test_vote_errors_map_to_status_codes() {
        // テスト項目: 投票エラーの種類ごとに HTTP ステータスが決まる
        let cases = [
            (
                SubmitVoteError::InvalidInput("voterId must not be empty".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                SubmitVoteError::InvalidOption {
                    poll_id: "p1".to_string(),
                    option_id: "c".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                SubmitVoteError::PollNotFound("p1".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                SubmitVoteError::PollClosed("p1".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                SubmitVoteError::StorageUnavailable("timeout".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status, expected);
        }
    }

    #[test]
    fn test_fetch_errors_map_to_status_codes() {
        // テスト項目: Poll 取得エラーの種類ごとに HTTP ステータスが決まる
        assert_eq!(
            ApiError::from(FetchPollError::MissingIdentifier).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(FetchPollError::PollNotFound).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(FetchPollError::StorageUnavailable("down".to_string())).status,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_json_rejection_is_bad_request() {
        // テスト項目: JSON ボディの読み取り失敗は 400 として扱う
        // given (前提条件):
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"pollId":5}"#))
            .unwrap();

        // when (操作):
        let rejection = Json::<VoteRequest>::from_request(request, &())
            .await
            .unwrap_err();
        let error = ApiError::from(rejection);

        // then (期待する結果):
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert!(error.message.starts_with("Invalid request body"));
    }

    #[test]
    fn test_message_is_error_display() {
        // テスト項目: レスポンスのメッセージはエラーの表示文字列
        let error = ApiError::from(SubmitVoteError::PollClosed("p1".to_string()));
        assert_eq!(error.message, "Poll 'p1' is closed");
    }
}
