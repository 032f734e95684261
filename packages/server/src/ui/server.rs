//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header::InvalidHeaderValue},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{
    handler::{
        create_poll, fetch_poll, get_participant_count, health_check, submit_vote,
        websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Live poll server
///
/// # Example
///
/// ```ignore
/// let state = AppState::new(repository, message_pusher, registry, clock, send_timeout);
/// let server = Server::new(state, None);
/// server.run("127.0.0.1".to_string(), 8000).await?;
/// ```
pub struct Server {
    app_state: Arc<AppState>,
    /// Allowed CORS origin (any origin when `None`)
    cors_origin: Option<String>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(app_state: AppState, cors_origin: Option<String>) -> Self {
        Self {
            app_state: Arc::new(app_state),
            cors_origin,
        }
    }

    fn cors_layer(&self) -> Result<CorsLayer, InvalidHeaderValue> {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any);
        Ok(match &self.cors_origin {
            Some(origin) => layer.allow_origin(origin.parse::<HeaderValue>()?),
            None => layer.allow_origin(Any),
        })
    }

    /// Build the router with every HTTP and WebSocket route.
    pub fn router(&self) -> Result<Router, InvalidHeaderValue> {
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/polls", post(create_poll))
            .route("/api/polls/fetch", post(fetch_poll))
            .route("/api/polls/{poll_id}/participants", get(get_participant_count))
            .route("/api/vote", post(submit_vote))
            .layer(self.cors_layer()?)
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone());
        Ok(app)
    }

    /// Serve on an already bound listener until the shutdown signal fires.
    pub async fn serve(self, listener: TcpListener) -> Result<(), BoxError> {
        let app = self.router()?;

        tracing::info!("Live poll server listening on {}", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Run the live poll server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8000)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), BoxError> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        self.serve(listener).await
    }
}
