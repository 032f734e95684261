//! ドメイン層
//!
//! 投票・集計・Room のドメインモデルと、Infrastructure 層が実装する trait を定義します。

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod factory;
pub mod lifecycle;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use aggregate::{AggregateSnapshot, OptionCount, VoteTally};
pub use entity::{MAX_OPTIONS, MIN_OPTIONS, Poll, PollOption, PollStatus, Vote};
pub use error::{MessagePushError, PollError, RepositoryError, RoomError, ValueObjectError};
pub use factory::{ConnectionIdFactory, OptionIdFactory, PollIdFactory, ShortCodeFactory};
pub use lifecycle::PollLifecycleGate;
pub use message_pusher::{DeliveryReport, MessagePusher, PushEvent, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use registry::RoomRegistry;
pub use repository::{PollRepository, VoteWrite};
#[cfg(test)]
pub use repository::MockPollRepository;
pub use value_object::{
    ConnectionId, OptionId, OptionText, PollId, QuestionText, ShortCode, Timestamp, VoterId,
};
