//! Broadcast Engine
//!
//! 「集計が変わった」「参加人数が変わった」の 2 種類の通知を、Room の全メンバーに送ります。
//! 投票経路（HTTP）と接続経路（WebSocket）の両方から、同じインスタンスを共有して使います。
//!
//! ## 順序保証
//!
//! 同じ Poll へのブロードキャストは Poll ごとのロックで直列化され、毎回ロック取得後に
//! 最新の状態を読み直します。接続ごとの送信キューは FIFO なので、各メンバーが
//! 新しいスナップショットの後に古いスナップショットを受け取ることはありません。
//! 異なる Poll 間の順序は保証しません。
//!
//! ## 配送
//!
//! 配送はベストエフォートです。届かなかったメンバーはその更新を取りこぼすだけで、
//! 次のブロードキャストが完全なスナップショットを運ぶため自然に回復します。

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, DeliveryReport, MessagePusher, PollId, PushEvent, RoomRegistry,
};

use super::{compute_aggregate::ComputeAggregateUseCase, error::BroadcastError};

pub struct BroadcastEngine {
    registry: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    aggregates: Arc<ComputeAggregateUseCase>,
    /// Per-poll turn lock; polls are never deleted, so entries are kept.
    sequencers: Mutex<HashMap<PollId, Arc<Mutex<()>>>>,
}

impl BroadcastEngine {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        aggregates: Arc<ComputeAggregateUseCase>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            aggregates,
            sequencers: Mutex::new(HashMap::new()),
        }
    }

    async fn sequencer(&self, poll_id: &PollId) -> Arc<Mutex<()>> {
        let mut sequencers = self.sequencers.lock().await;
        sequencers.entry(poll_id.clone()).or_default().clone()
    }

    /// 集計を再計算し、Room の全メンバーに送る
    ///
    /// メンバーがいなければ集計もせずに何もしない。
    pub async fn broadcast_vote_update(
        &self,
        poll_id: &PollId,
    ) -> Result<DeliveryReport, BroadcastError> {
        let sequencer = self.sequencer(poll_id).await;
        let _turn = sequencer.lock().await;

        let members = self.registry.members(poll_id).await;
        if members.is_empty() {
            tracing::debug!("No one is watching poll '{}', skipping vote update", poll_id);
            return Ok(DeliveryReport::default());
        }

        let snapshot = self.aggregates.execute(poll_id).await?;
        let voter_count = snapshot.total_voters;
        let report = self
            .message_pusher
            .broadcast(members, &PushEvent::VoteUpdate(snapshot))
            .await?;

        tracing::info!(
            "Broadcast vote update for poll '{}'. Voters: {} (delivered: {}, failed: {})",
            poll_id,
            voter_count,
            report.delivered,
            report.failed
        );
        Ok(report)
    }

    /// Room の現在の人数を、Room の全メンバーに送る
    pub async fn broadcast_presence_update(
        &self,
        poll_id: &PollId,
    ) -> Result<DeliveryReport, BroadcastError> {
        let sequencer = self.sequencer(poll_id).await;
        let _turn = sequencer.lock().await;

        // Targets and the reported count come from the same read.
        let members = self.registry.members(poll_id).await;
        if members.is_empty() {
            tracing::debug!("Room for poll '{}' is empty, skipping presence update", poll_id);
            return Ok(DeliveryReport::default());
        }

        let participant_count = members.len();
        let report = self
            .message_pusher
            .broadcast(
                members,
                &PushEvent::PresenceUpdate {
                    poll_id: poll_id.clone(),
                    participant_count,
                },
            )
            .await?;

        tracing::info!(
            "Broadcast participant count for poll '{}': {}",
            poll_id,
            participant_count
        );
        Ok(report)
    }

    /// 1 つの接続にだけ現在の集計を送る（Room 参加直後の初期表示用）
    ///
    /// 同じ Poll のブロードキャストと同じ順番待ちに並ぶので、
    /// この接続に古いスナップショットが後から届くことはない。
    pub async fn send_vote_snapshot(
        &self,
        poll_id: &PollId,
        connection_id: &ConnectionId,
    ) -> Result<(), BroadcastError> {
        let sequencer = self.sequencer(poll_id).await;
        let _turn = sequencer.lock().await;

        let snapshot = self.aggregates.execute(poll_id).await?;
        self.message_pusher
            .push_to(connection_id, &PushEvent::VoteUpdate(snapshot))
            .await?;
        Ok(())
    }
}
