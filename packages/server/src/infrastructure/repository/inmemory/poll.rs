//! InMemory Poll Repository 実装
//!
//! ドメイン層が定義する PollRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! Poll ごとに独立した Mutex を持つため、異なる Poll への投票は互いにブロックしません。
//! 同じ Poll への書き込みはその Mutex で直列化され、(pollId, voterId) の
//! insert-or-replace と締切確認が 1 つの排他区間で行われます。
//! 締切確認の時刻は排他区間に入ってから Clock で読み直します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tohyo_shared::time::{Clock, SystemClock};
use tokio::sync::{Mutex, RwLock};

use crate::domain::{
    OptionId, Poll, PollId, PollRepository, RepositoryError, ShortCode, Timestamp, Vote,
    VoteTally, VoteWrite, VoterId,
};

/// 1 つの Poll とその投票
struct PollRecord {
    poll: Poll,
    /// (pollId, voterId) → optionId。キーが voterId なので 1 人 1 行が保証される
    votes: HashMap<VoterId, OptionId>,
    /// 受け付けた書き込みの通し番号
    version: u64,
}

/// インメモリ Poll Repository 実装
pub struct InMemoryPollRepository {
    polls: RwLock<HashMap<PollId, Arc<Mutex<PollRecord>>>>,
    /// Lock order: `short_codes` before `polls`
    short_codes: RwLock<HashMap<ShortCode, PollId>>,
    /// 書き込み時の締切確認に使う時計
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryPollRepository {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

impl InMemoryPollRepository {
    /// 新しい InMemoryPollRepository を作成（システム時計を使う）
    pub fn new() -> Self {
        Self::default()
    }

    /// 締切確認に使う時計を指定して作成
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            polls: RwLock::new(HashMap::new()),
            short_codes: RwLock::new(HashMap::new()),
            clock,
        }
    }

    async fn record(&self, poll_id: &PollId) -> Result<Arc<Mutex<PollRecord>>, RepositoryError> {
        let polls = self.polls.read().await;
        polls
            .get(poll_id)
            .cloned()
            .ok_or_else(|| RepositoryError::PollNotFound(poll_id.to_string()))
    }
}

#[async_trait]
impl PollRepository for InMemoryPollRepository {
    async fn insert_poll(&self, poll: Poll) -> Result<(), RepositoryError> {
        let mut short_codes = self.short_codes.write().await;
        if short_codes.contains_key(&poll.short_code) {
            return Err(RepositoryError::DuplicateShortCode(
                poll.short_code.to_string(),
            ));
        }

        let mut polls = self.polls.write().await;
        short_codes.insert(poll.short_code.clone(), poll.id.clone());
        polls.insert(
            poll.id.clone(),
            Arc::new(Mutex::new(PollRecord {
                poll,
                votes: HashMap::new(),
                version: 0,
            })),
        );
        Ok(())
    }

    async fn find_poll(&self, poll_id: &PollId) -> Result<Option<Poll>, RepositoryError> {
        let record = {
            let polls = self.polls.read().await;
            polls.get(poll_id).cloned()
        };
        match record {
            Some(record) => Ok(Some(record.lock().await.poll.clone())),
            None => Ok(None),
        }
    }

    async fn find_poll_by_short_code(
        &self,
        short_code: &ShortCode,
    ) -> Result<Option<Poll>, RepositoryError> {
        let poll_id = {
            let short_codes = self.short_codes.read().await;
            short_codes.get(short_code).cloned()
        };
        match poll_id {
            Some(poll_id) => self.find_poll(&poll_id).await,
            None => Ok(None),
        }
    }

    async fn upsert_vote(&self, vote: Vote) -> Result<VoteWrite, RepositoryError> {
        let record = self.record(&vote.poll_id).await?;
        let mut record = record.lock().await;

        if !record.poll.has_option(&vote.option_id) {
            return Err(RepositoryError::OptionNotFound {
                poll_id: vote.poll_id.to_string(),
                option_id: vote.option_id.to_string(),
            });
        }
        // ロック待ちの間に締切を過ぎていないか、書き込み直前の時刻で確認する
        let committed_at = Timestamp::new(self.clock.now_millis()).max(vote.cast_at);
        if !record.poll.is_open_at(committed_at) {
            return Err(RepositoryError::PollClosed(vote.poll_id.to_string()));
        }

        let replaced = record.votes.insert(vote.voter_id, vote.option_id);
        record.version += 1;

        Ok(VoteWrite {
            replaced,
            version: record.version,
        })
    }

    async fn tally_votes(&self, poll_id: &PollId) -> Result<VoteTally, RepositoryError> {
        let record = self.record(poll_id).await?;
        let record = record.lock().await;

        let mut counts: HashMap<OptionId, u64> = HashMap::new();
        for option_id in record.votes.values() {
            *counts.entry(option_id.clone()).or_insert(0) += 1;
        }

        Ok(VoteTally {
            counts,
            total_voters: record.votes.len() as u64,
            version: record.version,
        })
    }
}
