//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{create_poll, fetch_poll, get_participant_count, health_check, submit_vote};
pub use websocket::websocket_handler;
