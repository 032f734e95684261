//! Live poll server: HTTP API and WebSocket room transport.

mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use error::ApiError;
pub use server::Server;
pub use state::AppState;
