//! WebSocket Hub
//!
//! The single authority over the client registry. All registration,
//! unregistration, and broadcast traffic funnels through three ingress
//! channels into one control loop; the registry is owned and mutated by
//! that loop alone, so no lock guards it.
//!
//! Backpressure policy: broadcasts use a non-blocking enqueue per client.
//! A client whose mailbox is full (or already closed) is evicted on the
//! spot - one stalled consumer never delays delivery to the rest.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::client::{ClientHandle, ClientId};
use super::messages::Envelope;

/// Configuration for the hub
#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    /// Capacity of each client's outbound mailbox
    #[serde(default = "default_mailbox_capacity")]
    pub mailbox_capacity: usize,
}

fn default_mailbox_capacity() -> usize {
    256
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: default_mailbox_capacity(),
        }
    }
}

/// Handle to the hub's control loop.
///
/// Cheap to clone; every component that registers connections or publishes
/// events holds one. `Hub::new` spawns the control loop, and the loop runs
/// until every handle has been dropped, so independent hubs can coexist
/// (one per test, for instance).
#[derive(Clone)]
pub struct Hub {
    register_tx: mpsc::UnboundedSender<ClientHandle>,
    unregister_tx: mpsc::UnboundedSender<ClientId>,
    broadcast_tx: mpsc::UnboundedSender<String>,
    connected: Arc<AtomicUsize>,
    config: HubConfig,
}

impl Hub {
    /// Create a hub and spawn its control loop.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: HubConfig) -> Self {
        let (register_tx, register_rx) = mpsc::unbounded_channel();
        let (unregister_tx, unregister_rx) = mpsc::unbounded_channel();
        let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();
        let connected = Arc::new(AtomicUsize::new(0));

        let control = ControlLoop {
            clients: HashMap::new(),
            register_rx,
            unregister_rx,
            broadcast_rx,
            connected: Arc::clone(&connected),
        };
        tokio::spawn(control.run());

        Self {
            register_tx,
            unregister_tx,
            broadcast_tx,
            connected,
            config,
        }
    }

    /// Register a freshly constructed client. Infallible, fire-and-forget.
    pub fn register(&self, client: ClientHandle) {
        let _ = self.register_tx.send(client);
    }

    /// Unregister a client, closing its mailbox. Idempotent: unknown ids
    /// are ignored.
    pub fn unregister(&self, id: ClientId) {
        let _ = self.unregister_tx.send(id);
    }

    /// Broadcast a payload to every currently registered client.
    ///
    /// Fire-and-forget: delivery failures to individual clients are
    /// handled inside the hub and never surface to the publisher.
    pub fn publish(&self, payload: String) {
        let _ = self.broadcast_tx.send(payload);
    }

    /// Serialize an envelope and broadcast it.
    ///
    /// A serialization failure drops the event with a warning; publishers
    /// never see an error.
    pub fn publish_event(&self, event: &Envelope) {
        match event.to_json() {
            Ok(payload) => self.publish(payload),
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize envelope, event dropped");
            }
        }
    }

    /// Number of currently registered clients.
    ///
    /// Read from a gauge the control loop maintains; the registry itself
    /// never leaves the loop.
    pub fn connection_count(&self) -> usize {
        self.connected.load(Ordering::Relaxed)
    }

    /// Whether the control loop is still accepting work
    pub fn is_running(&self) -> bool {
        !self.broadcast_tx.is_closed()
    }

    /// Configured per-client mailbox capacity
    pub fn mailbox_capacity(&self) -> usize {
        self.config.mailbox_capacity
    }
}

/// The control loop's state. Owned by exactly one task; the registry is
/// never touched from anywhere else.
struct ControlLoop {
    clients: HashMap<ClientId, mpsc::Sender<String>>,
    register_rx: mpsc::UnboundedReceiver<ClientHandle>,
    unregister_rx: mpsc::UnboundedReceiver<ClientId>,
    broadcast_rx: mpsc::UnboundedReceiver<String>,
    connected: Arc<AtomicUsize>,
}

impl ControlLoop {
    async fn run(mut self) {
        // select! picks randomly among ready branches; no fairness is
        // promised across the three ingress sources. The loop exits once
        // all hub handles are gone and the channels have drained.
        loop {
            tokio::select! {
                Some(client) = self.register_rx.recv() => self.register(client),
                Some(id) = self.unregister_rx.recv() => self.unregister(id),
                Some(payload) = self.broadcast_rx.recv() => self.broadcast(payload),
                else => break,
            }
        }
        tracing::debug!("hub control loop stopped");
    }

    fn register(&mut self, client: ClientHandle) {
        let (id, mailbox) = client.into_parts();
        self.clients.insert(id, mailbox);
        self.connected.store(self.clients.len(), Ordering::Relaxed);
        tracing::info!(client_id = %id, "client registered");
    }

    fn unregister(&mut self, id: ClientId) {
        // Absent is not an error: the client may already have been evicted.
        if self.clients.remove(&id).is_some() {
            self.connected.store(self.clients.len(), Ordering::Relaxed);
            tracing::info!(client_id = %id, "client unregistered");
        }
    }

    fn broadcast(&mut self, payload: String) {
        self.clients.retain(|id, mailbox| {
            match mailbox.try_send(payload.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(client_id = %id, "mailbox full, evicting slow client");
                    false
                }
                Err(TrySendError::Closed(_)) => {
                    // Delivery loop already died on a write error.
                    tracing::debug!(client_id = %id, "mailbox closed, evicting dead client");
                    false
                }
            }
        });
        self.connected.store(self.clients.len(), Ordering::Relaxed);
    }
}
