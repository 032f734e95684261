//! MessagePusher trait 定義
//!
//! 接続中のクライアントへのイベント通知の抽象化です。
//! 送信は接続ごとの送信キューに積むだけで、ネットワーク I/O は接続ごとのタスクが行います。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{AggregateSnapshot, ConnectionId, MessagePushError, PollId};

/// 接続ごとの送信キュー
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// クライアントに通知するイベント
///
/// 全て冪等に再送可能な完全スナップショットです。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    /// 集計結果の更新
    VoteUpdate(AggregateSnapshot),
    /// Room の参加人数の更新
    PresenceUpdate {
        poll_id: PollId,
        participant_count: usize,
    },
    /// 特定の接続への失敗通知
    Error { message: String },
}

/// ブロードキャストの配送結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
}

impl DeliveryReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }
}

/// MessagePusher trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信キューを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信キューを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定の接続にイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &PushEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続にイベントを送信
    ///
    /// 一部の接続への送信失敗は `DeliveryReport::failed` に数えるだけで、エラーにはしない。
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &PushEvent,
    ) -> Result<DeliveryReport, MessagePushError>;
}
