//! UseCase: Room の参加人数の取得

use std::sync::Arc;

use crate::domain::{PollId, RoomRegistry};

use super::error::PresenceError;

/// 参加人数取得のユースケース
pub struct ParticipantCountUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl ParticipantCountUseCase {
    /// 新しい ParticipantCountUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// いまその Poll を開いている接続の数（Room がなければ 0）
    pub async fn execute(&self, poll_id: String) -> Result<usize, PresenceError> {
        let poll_id =
            PollId::new(poll_id).map_err(|e| PresenceError::InvalidInput(e.to_string()))?;
        Ok(self.registry.size(&poll_id).await)
    }
}
