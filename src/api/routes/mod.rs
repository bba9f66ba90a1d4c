//! API Routes
//!
//! Route handlers organized by functionality. The WebSocket upgrade
//! handler lives with the rest of the real-time code in
//! [`crate::websocket`].

pub mod health;
