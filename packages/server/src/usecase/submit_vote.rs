//! UseCase: 投票（Vote Ledger）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubmitVoteUseCase::execute() メソッド
//! - 1 人 1 票の不変条件、締切後の拒否、選択肢の検証、ストレージ障害の扱い
//!
//! ### なぜこのテストが必要か
//! - 投票は (pollId, voterId) 単位の insert-or-replace でなければならない
//! - 締切後の投票は台帳を変えず、ブロードキャストも起こさない
//! - ストレージ障害は呼び出し元に失敗として返し、握りつぶさない
//!
//! ### どのような状況を想定しているか
//! - 正常系：初回投票、再投票による票の移動
//! - 異常系：存在しない Poll、締め切られた Poll、他の Poll の選択肢、不正な入力
//! - 異常系：ストレージに到達できない

use std::sync::Arc;

use crate::domain::{
    AggregateSnapshot, OptionId, PollId, PollLifecycleGate, PollRepository, Vote, VoterId,
};

use super::{
    broadcast::BroadcastEngine, compute_aggregate::ComputeAggregateUseCase,
    error::SubmitVoteError,
};

/// 投票のユースケース
pub struct SubmitVoteUseCase {
    /// Repository（投票ストレージの抽象化）
    repository: Arc<dyn PollRepository>,
    /// Poll Lifecycle Gate（締切判定）
    gate: Arc<PollLifecycleGate>,
    /// Aggregate Calculator
    aggregates: Arc<ComputeAggregateUseCase>,
    /// Broadcast Engine
    broadcast_engine: Arc<BroadcastEngine>,
}

impl SubmitVoteUseCase {
    /// 新しい SubmitVoteUseCase を作成
    pub fn new(
        repository: Arc<dyn PollRepository>,
        gate: Arc<PollLifecycleGate>,
        aggregates: Arc<ComputeAggregateUseCase>,
        broadcast_engine: Arc<BroadcastEngine>,
    ) -> Self {
        Self {
            repository,
            gate,
            aggregates,
            broadcast_engine,
        }
    }

    /// 投票を実行
    ///
    /// # Arguments
    ///
    /// * `poll_id` - 投票先の Poll ID
    /// * `option_id` - 選んだ選択肢の ID
    /// * `voter_id` - クライアントが生成した投票者トークン（検証しない）
    ///
    /// # Returns
    ///
    /// * `Ok(AggregateSnapshot)` - 書き込みを反映した最新の集計
    /// * `Err(SubmitVoteError)` - 投票失敗（台帳は変化しない）
    ///
    /// 成功した投票は Room の全メンバーにブロードキャストされる。
    /// ブロードキャストの失敗はログに残すだけで、投票の結果には影響しない。
    pub async fn execute(
        &self,
        poll_id: String,
        option_id: String,
        voter_id: String,
    ) -> Result<AggregateSnapshot, SubmitVoteError> {
        // 1. 入力の検証
        let poll_id = PollId::try_from(poll_id)?;
        let option_id = OptionId::try_from(option_id)?;
        let voter_id = VoterId::try_from(voter_id)?;

        // 2. 締切確認（Poll が存在しなければ PollNotFound）
        if !self.gate.is_open(&poll_id).await? {
            tracing::info!("Rejected vote for closed poll '{}'", poll_id);
            return Err(SubmitVoteError::PollClosed(poll_id.to_string()));
        }

        // 3. Poll の取得（書き込み時にも Repository が締切を再確認する）
        let poll = self
            .repository
            .find_poll(&poll_id)
            .await?
            .ok_or_else(|| SubmitVoteError::PollNotFound(poll_id.to_string()))?;
        let cast_at = self.gate.now();

        // 4. 選択肢の確認
        if !poll.has_option(&option_id) {
            return Err(SubmitVoteError::InvalidOption {
                poll_id: poll_id.to_string(),
                option_id: option_id.to_string(),
            });
        }

        // 5. insert-or-replace
        let write = self
            .repository
            .upsert_vote(Vote::new(poll_id.clone(), voter_id, option_id, cast_at))
            .await
            .inspect_err(|e| {
                tracing::error!("Failed to process vote for poll '{}': {}", poll_id, e)
            })?;
        tracing::debug!(
            "Vote recorded for poll '{}' (version {}, revote: {})",
            poll_id,
            write.version,
            write.replaced.is_some()
        );

        // 6. 書き込み後の集計
        let snapshot = self.aggregates.snapshot_of(&poll).await?;

        // 7. Room へのブロードキャスト
        if let Err(e) = self.broadcast_engine.broadcast_vote_update(&poll_id).await {
            tracing::warn!("Failed to broadcast vote update for poll '{}': {}", poll_id, e);
        }

        Ok(snapshot)
    }
}
