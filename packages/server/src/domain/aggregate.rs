//! 集計スナップショット（Aggregate Calculator）
//!
//! 投票の集計結果は永続化せず、変更のたびに Vote の集合から再計算します。
//! ブロードキャストされるのは常に完全なスナップショットであり、差分ではありません。

use std::collections::HashMap;

use super::{
    entity::Poll,
    value_object::{OptionId, OptionText, PollId},
};

/// Raw per-poll vote counts as read from storage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteTally {
    /// Votes per option id; options without votes may be absent
    pub counts: HashMap<OptionId, u64>,
    /// Number of vote rows, i.e. distinct voters
    pub total_voters: u64,
    /// Ledger write sequence number at the time of the read
    pub version: u64,
}

/// Vote count of one option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionCount {
    pub option_id: OptionId,
    pub text: OptionText,
    pub votes: u64,
}

/// Full, non-incremental view of a poll's results at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSnapshot {
    pub poll_id: PollId,
    /// Every option of the poll in poll order, zero counts included
    pub option_counts: Vec<OptionCount>,
    pub total_voters: u64,
    pub version: u64,
}

impl AggregateSnapshot {
    /// Combine the poll's option list with a tally read from storage.
    pub fn from_tally(poll: &Poll, tally: &VoteTally) -> Self {
        let option_counts = poll
            .options
            .iter()
            .map(|option| OptionCount {
                option_id: option.id.clone(),
                text: option.text.clone(),
                votes: tally.counts.get(&option.id).copied().unwrap_or(0),
            })
            .collect();

        Self {
            poll_id: poll.id.clone(),
            option_counts,
            total_voters: tally.total_voters,
            version: tally.version,
        }
    }

    pub fn votes_for(&self, option_id: &OptionId) -> Option<u64> {
        self.option_counts
            .iter()
            .find(|count| &count.option_id == option_id)
            .map(|count| count.votes)
    }
}
