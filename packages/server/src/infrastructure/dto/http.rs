//! HTTP API request and response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::OptionCountDto;

/// `POST /api/polls`
///
/// Fields are optional so that missing values are reported as validation
/// errors instead of extractor rejections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
    /// Unix milliseconds
    pub closes_at: Option<i64>,
}

/// `POST /api/polls/fetch`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchPollRequest {
    pub id: Option<String>,
    pub short_code: Option<String>,
}

/// `POST /api/vote`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub poll_id: Option<String>,
    pub option_id: Option<String>,
    pub voter_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub id: String,
    pub short_code: String,
    pub question: String,
    pub options: Vec<OptionCountDto>,
    pub voter_count: u64,
    pub version: u64,
    /// "open" or "closed"
    pub status: String,
    pub closes_at: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsDto {
    pub poll_id: String,
    pub version: u64,
    pub options: Vec<OptionCountDto>,
    pub voter_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResponse {
    pub message: String,
    pub results: ResultsDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantCountResponse {
    pub poll_id: String,
    pub participant_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: Option<String>,
}
