//! PulseHub Server
//!
//! Run with: cargo run
//!
//! # Configuration
//!
//! Loaded from `config.toml` (searched in the user config dir,
//! `/etc/pulsehub/`, then the working directory), with environment
//! overrides:
//! - `PULSEHUB_HOST`: Host to bind to (default: 0.0.0.0)
//! - `PULSEHUB_PORT`: Port to listen on (default: 8080)
//! - `PULSEHUB_MAILBOX_CAPACITY`: Per-client outbound buffer (default: 256)
//! - `PULSEHUB_LOG_LEVEL`: Log level (default: info)
//! - `PULSEHUB_LOG_FORMAT`: "pretty" or "json" (default: pretty)
//! - `RUST_LOG`: Full filter directive, overrides the log level

use pulsehub::api::{serve, AppState};
use pulsehub::config::Config;
use pulsehub::websocket::Hub;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_default();

    init_tracing(&config);

    tracing::info!("Starting PulseHub v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Per-client mailbox capacity: {}",
        config.hub.mailbox_capacity
    );

    let hub = Hub::new(config.hub.clone());
    let state = AppState::new(hub, config.server.clone());

    serve(state, &config.server).await?;

    tracing::info!("PulseHub stopped");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "pulsehub={},tower_http=info",
            config.logging.level
        ))
    });

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
