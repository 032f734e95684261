//! Repository trait 定義
//!
//! ドメイン層が必要とする投票ストレージへのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{OptionId, Poll, PollId, RepositoryError, ShortCode, Vote, VoteTally};

/// 投票の書き込み結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteWrite {
    /// 上書きされた以前の選択肢（初回投票なら None）
    pub replaced: Option<OptionId>,
    /// 書き込み後の Poll の台帳バージョン
    pub version: u64,
}

/// Poll Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
///
/// ## 一貫性の要件
///
/// - `upsert_vote` は (pollId, voterId) 単位でアトミックに insert-or-replace する
/// - `upsert_vote` は書き込みと同じ排他区間で現在時刻を読み直して締切を確認し、
///   締め切られていれば `RepositoryError::PollClosed` を返す（`vote.cast_at` 時点で
///   締め切られていた場合も同じ）
/// - 書き込み完了後に開始した `tally_votes` はその書き込みを必ず観測する
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PollRepository: Send + Sync {
    /// Poll を保存（ShortCode が重複していれば `DuplicateShortCode`）
    async fn insert_poll(&self, poll: Poll) -> Result<(), RepositoryError>;

    /// ID で Poll を取得
    async fn find_poll(&self, poll_id: &PollId) -> Result<Option<Poll>, RepositoryError>;

    /// ShortCode で Poll を取得
    async fn find_poll_by_short_code(
        &self,
        short_code: &ShortCode,
    ) -> Result<Option<Poll>, RepositoryError>;

    /// 投票を insert-or-replace
    async fn upsert_vote(&self, vote: Vote) -> Result<VoteWrite, RepositoryError>;

    /// Poll の選択肢ごとの票数と投票者数を取得
    async fn tally_votes(&self, poll_id: &PollId) -> Result<VoteTally, RepositoryError>;
}
