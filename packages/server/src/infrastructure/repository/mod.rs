//! Repository / Registry の実装
//!
//! - `inmemory`: プロセス内 HashMap による実装
//! - 将来的に: `postgres` など

pub mod inmemory;

pub use inmemory::{InMemoryPollRepository, InMemoryRoomRegistry};
