//! WebSocket Handler
//!
//! Turns one inbound upgrade request into one live client.

use axum::{
    extract::{ws::WebSocket, State, WebSocketUpgrade},
    response::Response,
};
use futures_util::StreamExt;
use std::sync::Arc;

use super::client::Client;
use super::hub::Hub;
use crate::api::AppState;

/// WebSocket upgrade handler for `GET /api/v1/ws`.
///
/// A malformed handshake is rejected by the extractor with an error
/// status before any client exists or the hub is touched.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let hub = state.hub.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

/// Wrap an established connection as a client and hand it to the hub.
///
/// Returns as soon as the delivery loop is spawned; registration and loop
/// startup are fire-and-forget.
async fn handle_socket(socket: WebSocket, hub: Hub) {
    // The channel is send-only from server to client; the inbound stream
    // half is dropped unread.
    let (sink, _stream) = socket.split();

    let (handle, client) = Client::new(hub.mailbox_capacity());
    let id = handle.id();
    hub.register(handle);

    tracing::info!(client_id = %id, "websocket connected");
    tokio::spawn(client.run(sink));
}
