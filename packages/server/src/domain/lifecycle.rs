//! Poll Lifecycle Gate
//!
//! Poll が投票を受け付けているかを、現在時刻と締切時刻の比較だけで判定します。
//! 状態遷移イベントは発行しません。締切は時間経過の結果として、呼び出し側が遅延評価で観測します。

use std::sync::Arc;

use tohyo_shared::time::Clock;

use super::{Poll, PollId, PollRepository, PollStatus, RepositoryError, Timestamp};

pub struct PollLifecycleGate {
    repository: Arc<dyn PollRepository>,
    clock: Arc<dyn Clock>,
}

impl PollLifecycleGate {
    pub fn new(repository: Arc<dyn PollRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    pub fn status_of(&self, poll: &Poll) -> PollStatus {
        poll.status_at(self.now())
    }

    pub fn admits(&self, poll: &Poll) -> bool {
        self.status_of(poll) == PollStatus::Open
    }

    /// Look the poll up and report whether it accepts votes right now.
    pub async fn is_open(&self, poll_id: &PollId) -> Result<bool, RepositoryError> {
        let poll = self
            .repository
            .find_poll(poll_id)
            .await?
            .ok_or_else(|| RepositoryError::PollNotFound(poll_id.to_string()))?;
        Ok(self.admits(&poll))
    }
}
