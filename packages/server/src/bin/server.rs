//! Live poll server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tohyo-server
//! cargo run --bin tohyo-server -- --host 0.0.0.0 --port 3000
//! ```

use std::{collections::HashMap, sync::Arc};

use clap::Parser;
use tohyo_server::{
    config::ServerConfig,
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryPollRepository, InMemoryRoomRegistry},
    },
    ui::{AppState, Server},
};
use tohyo_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};
use tokio::sync::Mutex;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. RoomRegistry
    // 4. BroadcastEngine and UseCases (AppState)
    // 5. Server

    // 1. Create Repository (in-memory poll storage, sharing the gate's clock)
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let repository = Arc::new(InMemoryPollRepository::with_clock(clock.clone()));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher_clients = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(message_pusher_clients));

    // 3. Create RoomRegistry
    let registry = Arc::new(InMemoryRoomRegistry::new());

    // 4. Create BroadcastEngine and UseCases
    let app_state = AppState::new(
        repository,
        message_pusher,
        registry,
        clock,
        config.send_timeout(),
    );

    // 5. Create and run the server
    let server = Server::new(app_state, config.cors_origin.clone());
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
