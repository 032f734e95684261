//! Server configuration from command line arguments and environment variables.

use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "tohyo-server")]
#[command(about = "Live poll server with real-time vote and presence broadcast", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "TOHYO_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Upper bound for a single WebSocket send, in milliseconds
    #[arg(
        long,
        env = "TOHYO_SEND_TIMEOUT_MS",
        default_value_t = 5000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub send_timeout_ms: u64,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "TOHYO_LOG_LEVEL", default_value = "debug")]
    pub log_level: String,

    /// Allowed CORS origin (any origin when unset)
    #[arg(long, env = "TOHYO_CORS_ORIGIN")]
    pub cors_origin: Option<String>,
}

impl ServerConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}
