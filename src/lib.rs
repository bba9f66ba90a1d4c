//! # PulseHub
//!
//! Real-time notification hub for a posts/comments backend. Connected
//! clients hold a persistent WebSocket and receive every event the rest
//! of the system publishes: new posts, new comments, like-count changes.
//!
//! ## Design
//!
//! - **Single-owner registry**: one control loop owns the set of
//!   connected clients; registration, unregistration, and broadcasts all
//!   arrive through its ingress channels, so the registry needs no lock
//! - **Bounded mailboxes**: each client drains its own bounded queue onto
//!   the wire; a client that falls behind is evicted instead of waited on
//! - **Fire-and-forget publishing**: publishers never see delivery
//!   failures - slow and dead consumers are resolved inside the hub
//!
//! ## Modules
//!
//! - [`websocket`]: the hub, client delivery loops, and upgrade handler
//! - [`api`]: HTTP server exposing `/api/v1/ws` and health probes
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pulsehub::websocket::{Envelope, Hub, HubConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let hub = Hub::new(HubConfig::default());
//!
//!     // Collaborators (post/comment services) publish events; every
//!     // connected client receives the serialized envelope.
//!     hub.publish_event(&Envelope::new_comment(7));
//! }
//! ```

pub mod api;
pub mod config;
pub mod websocket;

// Re-export top-level types for convenience
pub use api::{build_router, serve, ApiError, ApiResult, AppState};

pub use config::{Config, ConfigError, LoggingConfig, ServerConfig};

pub use websocket::{
    websocket_handler, Client, ClientHandle, ClientId, Envelope, EventKind, Hub, HubConfig,
};
