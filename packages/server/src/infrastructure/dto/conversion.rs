//! Conversion logic between DTOs and domain entities.

use tohyo_shared::time::timestamp_to_rfc3339;

use crate::domain::{AggregateSnapshot, OptionCount, Poll, PollStatus, PushEvent};
use crate::infrastructure::dto::{http, websocket as ws};

// ========================================
// Domain → DTO
// ========================================

impl From<&OptionCount> for ws::OptionCountDto {
    fn from(model: &OptionCount) -> Self {
        Self {
            id: model.option_id.as_str().to_string(),
            text: model.text.as_str().to_string(),
            votes: model.votes,
        }
    }
}

impl From<&AggregateSnapshot> for ws::VoteUpdateMessage {
    fn from(model: &AggregateSnapshot) -> Self {
        Self {
            r#type: ws::MessageType::NewVote,
            poll_id: model.poll_id.as_str().to_string(),
            version: model.version,
            options: model.option_counts.iter().map(Into::into).collect(),
            voter_count: model.total_voters,
        }
    }
}

impl From<&AggregateSnapshot> for http::ResultsDto {
    fn from(model: &AggregateSnapshot) -> Self {
        Self {
            poll_id: model.poll_id.as_str().to_string(),
            version: model.version,
            options: model.option_counts.iter().map(Into::into).collect(),
            voter_count: model.total_voters,
        }
    }
}

/// Build the HTTP view of a poll together with its current results.
pub fn poll_response(poll: &Poll, snapshot: &AggregateSnapshot, status: PollStatus) -> http::PollResponse {
    http::PollResponse {
        id: poll.id.as_str().to_string(),
        short_code: poll.short_code.as_str().to_string(),
        question: poll.question.as_str().to_string(),
        options: snapshot.option_counts.iter().map(Into::into).collect(),
        voter_count: snapshot.total_voters,
        version: snapshot.version,
        status: match status {
            PollStatus::Open => "open",
            PollStatus::Closed => "closed",
        }
        .to_string(),
        closes_at: poll
            .closes_at
            .and_then(|closes_at| timestamp_to_rfc3339(closes_at.value())),
        created_at: timestamp_to_rfc3339(poll.created_at.value()),
    }
}

/// Serialize an outbound event to its JSON wire form.
pub fn encode_event(event: &PushEvent) -> Result<String, serde_json::Error> {
    match event {
        PushEvent::VoteUpdate(snapshot) => {
            serde_json::to_string(&ws::VoteUpdateMessage::from(snapshot))
        }
        PushEvent::PresenceUpdate {
            poll_id,
            participant_count,
        } => serde_json::to_string(&ws::ParticipantUpdateMessage {
            r#type: ws::MessageType::ParticipantUpdate,
            poll_id: poll_id.as_str().to_string(),
            participant_count: *participant_count,
        }),
        PushEvent::Error { message } => serde_json::to_string(&ws::ErrorMessage {
            r#type: ws::MessageType::Error,
            message: message.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PollId, VoteTally, entity::fixtures::poll_with_options};

    #[test]
    fn test_vote_update_wire_format() {
        // テスト項目: 集計スナップショットが new-vote イベントの JSON に変換される
        // given (前提条件):
        let poll = poll_with_options("p1", None);
        let snapshot = AggregateSnapshot::from_tally(&poll, &VoteTally::default());

        // when (操作):
        let json = encode_event(&PushEvent::VoteUpdate(snapshot)).unwrap();

        // then (期待する結果):
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "new-vote");
        assert_eq!(value["pollId"], "p1");
        assert_eq!(value["voterCount"], 0);
        assert_eq!(value["options"][0]["id"], "a");
        assert_eq!(value["options"][0]["text"], "A");
        assert_eq!(value["options"][1]["votes"], 0);
    }

    #[test]
    fn test_presence_update_wire_format() {
        // テスト項目: 参加人数の更新が participant-update イベントの JSON に変換される
        // given (前提条件):
        let event = PushEvent::PresenceUpdate {
            poll_id: PollId::new("p1".to_string()).unwrap(),
            participant_count: 3,
        };

        // when (操作):
        let json = encode_event(&event).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            r#"{"type":"participant-update","pollId":"p1","participantCount":3}"#
        );
    }

    #[test]
    fn test_client_message_parsing() {
        // テスト項目: クライアントからの join-poll メッセージを解釈できる
        // given (前提条件):
        let raw = r#"{"type":"join-poll","pollId":"p1"}"#;

        // when (操作):
        let message: ws::ClientMessage = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(
            message,
            ws::ClientMessage::JoinPoll {
                poll_id: "p1".to_string()
            }
        );
    }

    #[test]
    fn test_poll_response_reports_status_and_times() {
        // テスト項目: Poll の HTTP レスポンスに状態と締切時刻が含まれる
        // given (前提条件):
        let poll = poll_with_options("p1", Some(1_672_531_200_000));
        let snapshot = AggregateSnapshot::from_tally(&poll, &VoteTally::default());

        // when (操作):
        let response = poll_response(&poll, &snapshot, PollStatus::Closed);

        // then (期待する結果):
        assert_eq!(response.status, "closed");
        assert_eq!(
            response.closes_at.as_deref(),
            Some("2023-01-01T00:00:00.000Z")
        );
        assert_eq!(response.short_code, "ABC123");
        assert_eq!(response.options.len(), 2);
    }
}
