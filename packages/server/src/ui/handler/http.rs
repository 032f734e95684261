//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::{
        conversion::poll_response,
        http::{
            CreatePollRequest, FetchPollRequest, HealthResponse, ParticipantCountResponse,
            PollResponse, VoteRequest, VoteResponse,
        },
    },
    ui::{error::ApiError, state::AppState},
    usecase::{FetchPollError, PollDetail, PollLookup},
};
use tohyo_shared::time::{now_millis, timestamp_to_rfc3339};

fn to_poll_response(detail: &PollDetail) -> PollResponse {
    poll_response(&detail.poll, &detail.snapshot, detail.status)
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: timestamp_to_rfc3339(now_millis()),
    })
}

/// Create a poll
pub async fn create_poll(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreatePollRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PollResponse>), ApiError> {
    let Json(request) = payload?;
    let (Some(question), Some(options)) = (request.question, request.options) else {
        return Err(ApiError::bad_request(
            "Question and at least two options are required",
        ));
    };

    let poll = state
        .create_poll_usecase
        .execute(question, options, request.closes_at)
        .await?;

    // Domain Model から DTO への変換（作成直後の集計と状態を添える）
    let detail = state
        .fetch_poll_usecase
        .execute(PollLookup::Id(poll.id.into_string()))
        .await?;
    Ok((StatusCode::CREATED, Json(to_poll_response(&detail))))
}

/// Fetch a poll by id or short code
pub async fn fetch_poll(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FetchPollRequest>, JsonRejection>,
) -> Result<Json<PollResponse>, ApiError> {
    let Json(request) = payload?;
    let lookup = PollLookup::from_parts(request.id, request.short_code)
        .ok_or(FetchPollError::MissingIdentifier)?;
    let detail = state.fetch_poll_usecase.execute(lookup).await?;
    Ok(Json(to_poll_response(&detail)))
}

/// Cast or change a vote
pub async fn submit_vote(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<VoteResponse>, ApiError> {
    let Json(request) = payload?;
    let (Some(poll_id), Some(option_id), Some(voter_id)) =
        (request.poll_id, request.option_id, request.voter_id)
    else {
        return Err(ApiError::bad_request(
            "pollId, optionId and voterId are required",
        ));
    };

    let snapshot = state
        .submit_vote_usecase
        .execute(poll_id, option_id, voter_id)
        .await?;

    Ok(Json(VoteResponse {
        message: "Vote recorded".to_string(),
        results: (&snapshot).into(),
    }))
}

/// Number of connections currently viewing a poll
pub async fn get_participant_count(
    State(state): State<Arc<AppState>>,
    Path(poll_id): Path<String>,
) -> Result<Json<ParticipantCountResponse>, ApiError> {
    let participant_count = state
        .participant_count_usecase
        .execute(poll_id.clone())
        .await?;
    Ok(Json(ParticipantCountResponse {
        poll_id,
        participant_count,
    }))
}
