//! UseCase: 接続の終了
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 接続終了時の leave_all、送信キューの登録解除、参加人数の再通知
//!
//! ### なぜこのテストが必要か
//! - 接続が切れた理由（正常終了、送信タイムアウト、受信エラー）に関係なく、
//!   Room にゴーストメンバーが残ってはいけない
//! - 残ったメンバーは退出後の人数を受け取る
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数の Room に参加していた接続の終了
//! - エッジケース：最後のメンバーの終了（通知先なし）、2 回目の終了処理

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PollId, RoomRegistry};

use super::broadcast::BroadcastEngine;

/// 接続終了のユースケース
pub struct DisconnectParticipantUseCase {
    /// Room Registry
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Broadcast Engine
    broadcast_engine: Arc<BroadcastEngine>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        broadcast_engine: Arc<BroadcastEngine>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            broadcast_engine,
        }
    }

    /// 接続終了を実行
    ///
    /// # Returns
    ///
    /// 接続が参加していた Poll の一覧（それぞれに退出後の人数が通知済み）
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<PollId> {
        // 1. 全ての Room から退出（以降の join は拒否される）
        let left = self.registry.leave_all(connection_id).await;

        // 2. 送信キューの登録解除
        self.message_pusher.unregister_client(connection_id).await;

        // 3. 退出した Room ごとに人数を通知
        for poll_id in &left {
            if let Err(e) = self
                .broadcast_engine
                .broadcast_presence_update(poll_id)
                .await
            {
                tracing::warn!(
                    "Failed to broadcast participant count for poll '{}': {}",
                    poll_id,
                    e
                );
            }
        }

        tracing::info!(
            "Connection '{}' closed (left {} room(s))",
            connection_id,
            left.len()
        );
        left
    }
}
