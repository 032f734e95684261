//! UseCase: 接続の開始
//!
//! 新しい WebSocket 接続を Room Registry と MessagePusher の両方に登録します。
//! 登録前の接続は Room に参加できず、メッセージも受け取れません。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel, RoomRegistry};

/// 接続開始のユースケース
pub struct ConnectParticipantUseCase {
    /// Room Registry
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 接続を登録
    ///
    /// # Arguments
    ///
    /// * `connection_id` - サーバーが払い出した接続 ID
    /// * `sender` - 接続の送信キュー（書き込みタスクが読み出す）
    pub async fn execute(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.registry.register(connection_id.clone()).await;
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;
        tracing::info!("Connection '{}' opened", connection_id);
    }
}
