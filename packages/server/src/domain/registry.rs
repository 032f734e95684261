//! Room Registry trait 定義
//!
//! Poll ごとに「いまその Poll を開いている接続」の集合を管理します。
//! メンバーシップの不変条件と排他制御はアプリケーションコードが持ちます。

use async_trait::async_trait;

use super::{ConnectionId, PollId, RoomError};

/// Room Registry trait
///
/// ## 不変条件
///
/// 接続 C が Room P のメンバーであるのは、C の最後の `join(P, C)` が
/// `leave(P, C)` および `leave_all(C)` よりも新しい場合に限る。
///
/// 全ての変更と `size` の読み取りは Poll 単位で排他される。
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// 接続を登録（`join` の前に必要）
    async fn register(&self, connection_id: ConnectionId);

    /// Room に参加し、参加後の人数を返す（既に参加済みなら何もしない）
    async fn join(&self, poll_id: &PollId, connection_id: &ConnectionId)
    -> Result<usize, RoomError>;

    /// Room から退出し、退出後の人数を返す（空になった Room は削除される）
    async fn leave(&self, poll_id: &PollId, connection_id: &ConnectionId) -> usize;

    /// 接続が参加していた全ての Room から退出し、退出した Poll の一覧を返す
    ///
    /// 接続終了時に 1 回だけ呼ばれる。以降の `join` は拒否される。
    async fn leave_all(&self, connection_id: &ConnectionId) -> Vec<PollId>;

    /// Room の現在の人数（Room が存在しなければ 0）
    async fn size(&self, poll_id: &PollId) -> usize;

    /// Room の現在のメンバー
    async fn members(&self, poll_id: &PollId) -> Vec<ConnectionId>;
}
