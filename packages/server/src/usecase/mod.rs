//! UseCase 層
//!
//! ドメイン層の trait だけに依存し、投票・集計・Room の操作手順を組み立てます。

pub mod broadcast;
pub mod compute_aggregate;
pub mod connect_participant;
pub mod create_poll;
pub mod disconnect_participant;
pub mod error;
pub mod fetch_poll;
pub mod join_poll;
pub mod leave_poll;
pub mod participant_count;
pub mod submit_vote;

pub use broadcast::BroadcastEngine;
pub use compute_aggregate::ComputeAggregateUseCase;
pub use connect_participant::ConnectParticipantUseCase;
pub use create_poll::CreatePollUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{
    AggregateError, BroadcastError, CreatePollError, FetchPollError, JoinPollError,
    PresenceError, SubmitVoteError,
};
pub use fetch_poll::{FetchPollUseCase, PollDetail, PollLookup};
pub use join_poll::JoinPollUseCase;
pub use leave_poll::LeavePollUseCase;
pub use participant_count::ParticipantCountUseCase;
pub use submit_vote::SubmitVoteUseCase;
