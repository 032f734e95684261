//! WebSocket message DTOs.

use serde::{Deserialize, Serialize};

/// Outbound event type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    NewVote,
    ParticipantUpdate,
    Error,
}

/// Vote count of one option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionCountDto {
    pub id: String,
    pub text: String,
    pub votes: u64,
}

/// Full results snapshot pushed to every room member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteUpdateMessage {
    pub r#type: MessageType,
    pub poll_id: String,
    pub version: u64,
    pub options: Vec<OptionCountDto>,
    pub voter_count: u64,
}

/// Current number of connections viewing the poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantUpdateMessage {
    pub r#type: MessageType,
    pub poll_id: String,
    pub participant_count: usize,
}

/// Failure notice sent only to the connection that caused it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub r#type: MessageType,
    pub message: String,
}

/// Messages a client may send over the socket
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    JoinPoll {
        #[serde(rename = "pollId")]
        poll_id: String,
    },
    LeavePoll {
        #[serde(rename = "pollId")]
        poll_id: String,
    },
}
