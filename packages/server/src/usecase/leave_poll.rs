//! UseCase: Room からの退出
//!
//! 退出が Registry に反映された後の人数を、残っているメンバーに通知します。

use std::sync::Arc;

use crate::domain::{ConnectionId, PollId, RoomRegistry};

use super::{broadcast::BroadcastEngine, error::PresenceError};

/// Room 退出のユースケース
pub struct LeavePollUseCase {
    registry: Arc<dyn RoomRegistry>,
    broadcast_engine: Arc<BroadcastEngine>,
}

impl LeavePollUseCase {
    /// 新しい LeavePollUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, broadcast_engine: Arc<BroadcastEngine>) -> Self {
        Self {
            registry,
            broadcast_engine,
        }
    }

    /// Room からの退出を実行し、退出後の人数を返す
    ///
    /// 参加していない Room からの退出は何もしない（人数の通知もしない）。
    pub async fn execute(
        &self,
        poll_id: String,
        connection_id: &ConnectionId,
    ) -> Result<usize, PresenceError> {
        let poll_id =
            PollId::new(poll_id).map_err(|e| PresenceError::InvalidInput(e.to_string()))?;

        let was_member = self
            .registry
            .members(&poll_id)
            .await
            .contains(connection_id);
        let remaining = self.registry.leave(&poll_id, connection_id).await;
        if !was_member {
            return Ok(remaining);
        }

        tracing::info!(
            "Connection '{}' left poll '{}' ({} watching)",
            connection_id,
            poll_id,
            remaining
        );
        if let Err(e) = self
            .broadcast_engine
            .broadcast_presence_update(&poll_id)
            .await
        {
            tracing::warn!(
                "Failed to broadcast participant count for poll '{}': {}",
                poll_id,
                e
            );
        }

        Ok(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::MessagePusher,
        infrastructure::{
            dto::websocket::ParticipantUpdateMessage,
            message_pusher::WebSocketMessagePusher,
            repository::{InMemoryPollRepository, InMemoryRoomRegistry},
        },
        usecase::compute_aggregate::ComputeAggregateUseCase,
    };
    use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

    struct Fixture {
        usecase: LeavePollUseCase,
        registry: Arc<InMemoryRoomRegistry>,
        pusher: Arc<WebSocketMessagePusher>,
    }

    fn create_fixture() -> Fixture {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new(Default::default()));
        let aggregates = Arc::new(ComputeAggregateUseCase::new(Arc::new(
            InMemoryPollRepository::new(),
        )));
        let engine = Arc::new(BroadcastEngine::new(
            registry.clone(),
            pusher.clone(),
            aggregates,
        ));
        Fixture {
            usecase: LeavePollUseCase::new(registry.clone(), engine),
            registry,
            pusher,
        }
    }

    async fn join(fixture: &Fixture, id: &str) -> (ConnectionId, UnboundedReceiver<String>) {
        let connection_id = ConnectionId::new(id.to_string()).unwrap();
        let (tx, rx) = unbounded_channel();
        fixture.registry.register(connection_id.clone()).await;
        fixture
            .pusher
            .register_client(connection_id.clone(), tx)
            .await;
        fixture
            .registry
            .join(&PollId::new("p1".to_string()).unwrap(), &connection_id)
            .await
            .unwrap();
        (connection_id, rx)
    }

    #[tokio::test]
    async fn test_leave_notifies_remaining_members() {
        // テスト項目: C1, C2 が参加し C1 が退出すると、人数は 1 で C2 に 1 が通知される
        // given (前提条件):
        let fixture = create_fixture();
        let (c1, mut rx1) = join(&fixture, "c1").await;
        let (_c2, mut rx2) = join(&fixture, "c2").await;

        // when (操作):
        let remaining = fixture.usecase.execute("p1".to_string(), &c1).await.unwrap();

        // then (期待する結果):
        assert_eq!(remaining, 1);
        let presence: ParticipantUpdateMessage =
            serde_json::from_str(&rx2.try_recv().unwrap()).unwrap();
        assert_eq!(presence.participant_count, 1);
        assert!(rx1.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_leave_room_not_joined_is_silent() {
        // テスト項目: 参加していない Room からの退出は何も通知しない
        // given (前提条件):
        let fixture = create_fixture();
        let (_c1, mut rx1) = join(&fixture, "c1").await;
        let outsider = ConnectionId::new("c9".to_string()).unwrap();
        fixture.registry.register(outsider.clone()).await;

        // when (操作):
        let remaining = fixture
            .usecase
            .execute("p1".to_string(), &outsider)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(remaining, 1);
        assert!(rx1.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_leave_with_malformed_poll_id() {
        // テスト項目: 形式が不正な pollId は InvalidInput
        // given (前提条件):
        let fixture = create_fixture();
        let (c1, _rx1) = join(&fixture, "c1").await;

        // when (操作):
        let result = fixture.usecase.execute("p/1".to_string(), &c1).await;

        // then (期待する結果):
        assert!(matches!(result, Err(PresenceError::InvalidInput(_))));
    }
}
