//! WebSocket Real-Time Notifications
//!
//! Fans out event notifications (new post, new comment, likes changed) to
//! every connected client over a persistent, send-only WebSocket channel.
//!
//! ## Architecture
//!
//! - **Hub**: single authority over the client registry; one control loop
//!   serializes registration, unregistration, and broadcast
//! - **Client**: one bounded mailbox bridged to one connection by an
//!   independent delivery loop
//! - **Handler**: handles the WebSocket upgrade and client creation
//! - **Messages**: the JSON envelope published to clients
//!
//! Control flow: publisher → hub ingress → hub loop → per-client mailbox →
//! delivery loop → wire. A client that stops draining its mailbox is
//! evicted rather than waited on.
//!
//! ## Example
//!
//! ```javascript
//! // Browser
//! const ws = new WebSocket('ws://localhost:8080/api/v1/ws');
//!
//! ws.onmessage = (event) => {
//!   const note = JSON.parse(event.data);
//!   // { type: "newComment", message: "New comment created.",
//!   //   content: { postId: 7 } }
//!   console.log('Received:', note);
//! };
//! ```

mod client;
mod handler;
mod hub;
mod messages;

pub use client::{Client, ClientHandle, ClientId};
pub use handler::websocket_handler;
pub use hub::{Hub, HubConfig};
pub use messages::{Envelope, EventKind};
