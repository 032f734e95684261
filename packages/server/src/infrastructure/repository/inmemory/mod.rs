//! インメモリ実装

pub mod poll;
pub mod room;

pub use poll::InMemoryPollRepository;
pub use room::InMemoryRoomRegistry;
