//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//!
//! ## 排他制御
//!
//! - Room ごとに独立した Mutex（`RoomMembers`）を持ち、変更と人数の読み取りは Room 単位で排他される
//! - 外側の HashMap のロックは Room の検索・作成・削除の間だけ保持する
//! - 接続ごとの参加 Room 一覧（`ConnectionRooms`）も独立した Mutex を持つ
//! - ロック順序は常に「接続 → Room」
//!
//! 空になった Room は `retired` にしてから HashMap から外す。
//! `retired` の Room を掴んだ `join` は新しい Room を取り直す。
//! 新しい Room は最初のメンバーを入れた状態で HashMap に登録するため、
//! HashMap 上の `retired` でない Room は常に 1 人以上のメンバーを持つ。

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, PollId, RoomError, RoomRegistry};

struct RoomMembers {
    members: HashSet<ConnectionId>,
    retired: bool,
}

#[derive(Default)]
struct ConnectionRooms {
    polls: HashSet<PollId>,
    closed: bool,
}

/// インメモリ Room Registry 実装
#[derive(Default)]
pub struct InMemoryRoomRegistry {
    rooms: Mutex<HashMap<PollId, Arc<Mutex<RoomMembers>>>>,
    connections: Mutex<HashMap<ConnectionId, Arc<Mutex<ConnectionRooms>>>>,
}

impl InMemoryRoomRegistry {
    /// 新しい InMemoryRoomRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 現在存在する Room の数
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    async fn room(&self, poll_id: &PollId) -> Option<Arc<Mutex<RoomMembers>>> {
        self.rooms.lock().await.get(poll_id).cloned()
    }

    /// Remove one member and drop the room entry once it is empty.
    ///
    /// Returns the remaining member count.
    async fn remove_member(&self, poll_id: &PollId, connection_id: &ConnectionId) -> usize {
        let Some(room) = self.room(poll_id).await else {
            return 0;
        };
        let mut members = room.lock().await;
        if members.retired {
            return 0;
        }
        members.members.remove(connection_id);

        let remaining = members.members.len();
        if remaining == 0 {
            members.retired = true;
            let mut rooms = self.rooms.lock().await;
            if rooms
                .get(poll_id)
                .is_some_and(|current| Arc::ptr_eq(current, &room))
            {
                rooms.remove(poll_id);
            }
            tracing::debug!("Room '{}' is empty and was removed", poll_id);
        }
        remaining
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn register(&self, connection_id: ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.entry(connection_id).or_default();
    }

    async fn join(
        &self,
        poll_id: &PollId,
        connection_id: &ConnectionId,
    ) -> Result<usize, RoomError> {
        let connection = {
            let connections = self.connections.lock().await;
            connections.get(connection_id).cloned()
        }
        .ok_or_else(|| RoomError::ConnectionClosed(connection_id.to_string()))?;

        let mut joined = connection.lock().await;
        if joined.closed {
            return Err(RoomError::ConnectionClosed(connection_id.to_string()));
        }

        loop {
            let room = {
                let mut rooms = self.rooms.lock().await;
                match rooms.get(poll_id) {
                    Some(room) => room.clone(),
                    None => {
                        let members = RoomMembers {
                            members: HashSet::from([connection_id.clone()]),
                            retired: false,
                        };
                        rooms.insert(poll_id.clone(), Arc::new(Mutex::new(members)));
                        joined.polls.insert(poll_id.clone());
                        return Ok(1);
                    }
                }
            };
            let mut members = room.lock().await;
            if members.retired {
                continue;
            }
            // No await between the two inserts, so a cancelled join never
            // leaves a member the connection does not know about.
            joined.polls.insert(poll_id.clone());
            members.members.insert(connection_id.clone());
            return Ok(members.members.len());
        }
    }

    async fn leave(&self, poll_id: &PollId, connection_id: &ConnectionId) -> usize {
        let connection = {
            let connections = self.connections.lock().await;
            connections.get(connection_id).cloned()
        };
        match connection {
            Some(connection) => {
                let mut joined = connection.lock().await;
                joined.polls.remove(poll_id);
                self.remove_member(poll_id, connection_id).await
            }
            None => self.size(poll_id).await,
        }
    }

    async fn leave_all(&self, connection_id: &ConnectionId) -> Vec<PollId> {
        let Some(connection) = self.connections.lock().await.remove(connection_id) else {
            return Vec::new();
        };

        let mut joined = connection.lock().await;
        joined.closed = true;
        let polls: Vec<PollId> = joined.polls.drain().collect();
        for poll_id in &polls {
            self.remove_member(poll_id, connection_id).await;
        }
        polls
    }

    async fn size(&self, poll_id: &PollId) -> usize {
        match self.room(poll_id).await {
            Some(room) => {
                let members = room.lock().await;
                if members.retired {
                    0
                } else {
                    members.members.len()
                }
            }
            None => 0,
        }
    }

    async fn members(&self, poll_id: &PollId) -> Vec<ConnectionId> {
        match self.room(poll_id).await {
            Some(room) => {
                let members = room.lock().await;
                if members.retired {
                    Vec::new()
                } else {
                    members.members.iter().cloned().collect()
                }
            }
            None => Vec::new(),
        }
    }
}
