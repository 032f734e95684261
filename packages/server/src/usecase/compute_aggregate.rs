//! UseCase: 集計の計算（Aggregate Calculator）
//!
//! 台帳の現在の状態から、選択肢ごとの票数と投票者数を導出します。
//! 副作用はなく、書き込みと並行して何度呼んでも安全です。

use std::sync::Arc;

use crate::domain::{AggregateSnapshot, Poll, PollId, PollRepository};

use super::error::AggregateError;

/// 集計計算のユースケース
pub struct ComputeAggregateUseCase {
    repository: Arc<dyn PollRepository>,
}

impl ComputeAggregateUseCase {
    /// 新しい ComputeAggregateUseCase を作成
    pub fn new(repository: Arc<dyn PollRepository>) -> Self {
        Self { repository }
    }

    /// Poll ID から集計スナップショットを計算
    pub async fn execute(&self, poll_id: &PollId) -> Result<AggregateSnapshot, AggregateError> {
        let poll = self
            .repository
            .find_poll(poll_id)
            .await?
            .ok_or_else(|| AggregateError::PollNotFound(poll_id.to_string()))?;
        self.snapshot_of(&poll).await
    }

    /// 取得済みの Poll の集計スナップショットを計算
    pub async fn snapshot_of(&self, poll: &Poll) -> Result<AggregateSnapshot, AggregateError> {
        let tally = self.repository.tally_votes(&poll.id).await?;
        Ok(AggregateSnapshot::from_tally(poll, &tally))
    }
}
