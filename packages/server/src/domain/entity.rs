//! エンティティ
//!
//! - `Poll`: 質問と選択肢、締切時刻を持つ投票
//! - `PollOption`: Poll に属する選択肢
//! - `Vote`: (pollId, voterId) をキーとする 1 票

use super::{
    error::PollError,
    value_object::{OptionId, OptionText, PollId, QuestionText, ShortCode, Timestamp, VoterId},
};

/// Minimum number of options a poll must offer
pub const MIN_OPTIONS: usize = 2;
/// Maximum number of options a poll may offer
pub const MAX_OPTIONS: usize = 20;

/// Whether a poll currently accepts votes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    Open,
    Closed,
}

/// One selectable option of a poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOption {
    pub id: OptionId,
    pub text: OptionText,
}

impl PollOption {
    pub fn new(id: OptionId, text: OptionText) -> Self {
        Self { id, text }
    }
}

/// A published question with a fixed, ordered set of options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    pub id: PollId,
    pub short_code: ShortCode,
    pub question: QuestionText,
    pub options: Vec<PollOption>,
    pub closes_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Poll {
    pub fn new(
        id: PollId,
        short_code: ShortCode,
        question: QuestionText,
        options: Vec<PollOption>,
        closes_at: Option<Timestamp>,
        created_at: Timestamp,
    ) -> Result<Self, PollError> {
        if options.len() < MIN_OPTIONS {
            return Err(PollError::TooFewOptions {
                min: MIN_OPTIONS,
                actual: options.len(),
            });
        }
        if options.len() > MAX_OPTIONS {
            return Err(PollError::TooManyOptions {
                max: MAX_OPTIONS,
                actual: options.len(),
            });
        }

        Ok(Self {
            id,
            short_code,
            question,
            options,
            closes_at,
            created_at,
        })
    }

    pub fn has_option(&self, option_id: &OptionId) -> bool {
        self.options.iter().any(|option| &option.id == option_id)
    }

    /// Open while `at` is strictly before the close time; always open without one.
    pub fn status_at(&self, at: Timestamp) -> PollStatus {
        match self.closes_at {
            Some(closes_at) if at >= closes_at => PollStatus::Closed,
            _ => PollStatus::Open,
        }
    }

    pub fn is_open_at(&self, at: Timestamp) -> bool {
        self.status_at(at) == PollStatus::Open
    }
}

/// A voter's current choice in one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub poll_id: PollId,
    pub voter_id: VoterId,
    pub option_id: OptionId,
    pub cast_at: Timestamp,
}

impl Vote {
    pub fn new(poll_id: PollId, voter_id: VoterId, option_id: OptionId, cast_at: Timestamp) -> Self {
        Self {
            poll_id,
            voter_id,
            option_id,
            cast_at,
        }
    }
}
