//! UseCase: Room への参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinPollUseCase::execute() メソッド
//! - 参加直後の集計送信と、Room 全体への参加人数の通知
//!
//! ### なぜこのテストが必要か
//! - 参加した接続は、次の投票を待たずに現在の集計を表示できなければならない
//! - 参加人数の通知は、参加が Registry に反映された後の人数を運ぶ
//!
//! ### どのような状況を想定しているか
//! - 正常系：1 人目、2 人目の参加
//! - 異常系：存在しない Poll、既に切断処理が始まった接続

use std::sync::Arc;

use crate::domain::{ConnectionId, PollId, PollRepository, RoomError, RoomRegistry};

use super::{broadcast::BroadcastEngine, error::JoinPollError};

/// Room 参加のユースケース
pub struct JoinPollUseCase {
    /// Repository（Poll の存在確認に使う）
    repository: Arc<dyn PollRepository>,
    /// Room Registry
    registry: Arc<dyn RoomRegistry>,
    /// Broadcast Engine
    broadcast_engine: Arc<BroadcastEngine>,
}

impl JoinPollUseCase {
    /// 新しい JoinPollUseCase を作成
    pub fn new(
        repository: Arc<dyn PollRepository>,
        registry: Arc<dyn RoomRegistry>,
        broadcast_engine: Arc<BroadcastEngine>,
    ) -> Self {
        Self {
            repository,
            registry,
            broadcast_engine,
        }
    }

    /// Room への参加を実行
    ///
    /// # Arguments
    ///
    /// * `poll_id` - 参加する Poll の ID（クライアントから受け取った生の文字列）
    /// * `connection_id` - 参加する接続
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 参加後の Room の人数
    /// * `Err(JoinPollError)` - 参加失敗
    pub async fn execute(
        &self,
        poll_id: String,
        connection_id: &ConnectionId,
    ) -> Result<usize, JoinPollError> {
        // 1. 入力の検証
        let poll_id =
            PollId::new(poll_id).map_err(|e| JoinPollError::InvalidInput(e.to_string()))?;

        // 2. Poll の存在確認
        let exists = self
            .repository
            .find_poll(&poll_id)
            .await
            .map_err(|e| JoinPollError::StorageUnavailable(e.to_string()))?
            .is_some();
        if !exists {
            return Err(JoinPollError::PollNotFound(poll_id.to_string()));
        }

        // 3. Registry に参加
        let size = self
            .registry
            .join(&poll_id, connection_id)
            .await
            .map_err(|e| match e {
                RoomError::ConnectionClosed(id) => JoinPollError::ConnectionClosed(id),
            })?;
        tracing::info!(
            "Connection '{}' joined poll '{}' ({} watching)",
            connection_id,
            poll_id,
            size
        );

        // 4. 参加した接続にだけ現在の集計を送る
        if let Err(e) = self
            .broadcast_engine
            .send_vote_snapshot(&poll_id, connection_id)
            .await
        {
            tracing::warn!(
                "Failed to send current results of poll '{}' to '{}': {}",
                poll_id,
                connection_id,
                e
            );
        }

        // 5. Room 全体に参加人数を通知
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

        Ok(size)
    }
}
