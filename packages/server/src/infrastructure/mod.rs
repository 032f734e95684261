//! Infrastructure 層
//!
//! ドメイン層の trait（PollRepository, RoomRegistry, MessagePusher）の具体的な実装と、
//! プロトコルごとの DTO を提供します。

pub mod dto;
pub mod message_pusher;
pub mod repository;
