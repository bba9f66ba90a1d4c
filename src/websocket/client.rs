//! WebSocket Client
//!
//! A client bridges one bounded mailbox to one physical connection.
//! The hub holds the [`ClientHandle`] (the mailbox sender) and enqueues
//! payloads; the client's delivery loop drains the mailbox onto the wire.
//!
//! The mailbox is single-writer (the hub loop) and single-reader (the
//! delivery loop). Closing the mailbox is the only shutdown signal a
//! client ever receives.

use axum::extract::ws::Message;
use futures_util::{Sink, SinkExt};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Unique identifier for a connected client
pub type ClientId = Uuid;

/// The hub-side half of a client: its id and mailbox sender.
///
/// Handed to the hub at registration. The hub holds the only sender, so
/// removing a client from the registry closes its mailbox.
pub struct ClientHandle {
    id: ClientId,
    mailbox: mpsc::Sender<String>,
}

impl ClientHandle {
    /// This client's unique id
    pub fn id(&self) -> ClientId {
        self.id
    }

    pub(crate) fn into_parts(self) -> (ClientId, mpsc::Sender<String>) {
        (self.id, self.mailbox)
    }
}

/// The connection-side half of a client: its id and mailbox receiver.
///
/// Owns the delivery loop. Destroyed when the connection errors or the
/// mailbox is closed and drained.
pub struct Client {
    id: ClientId,
    mailbox: mpsc::Receiver<String>,
}

impl Client {
    /// Create a client pair with a bounded mailbox.
    ///
    /// Returns the hub-side handle and the connection-side client.
    pub fn new(mailbox_capacity: usize) -> (ClientHandle, Client) {
        // tokio channels require capacity >= 1
        let (tx, rx) = mpsc::channel(mailbox_capacity.max(1));
        let id = Uuid::new_v4();
        (
            ClientHandle { id, mailbox: tx },
            Client { id, mailbox: rx },
        )
    }

    /// This client's unique id
    pub fn id(&self) -> ClientId {
        self.id
    }

    pub(crate) async fn recv(&mut self) -> Option<String> {
        self.mailbox.recv().await
    }

    /// Delivery loop: drain the mailbox onto the connection.
    ///
    /// Each payload is written as one complete text frame, in mailbox
    /// order. A write error is terminal: the loop returns and the sink is
    /// dropped, releasing the connection. When the mailbox is closed and
    /// fully drained, a close frame is sent before the connection drops.
    pub async fn run<S>(mut self, mut sink: S)
    where
        S: Sink<Message> + Unpin,
        S::Error: std::fmt::Display,
    {
        while let Some(payload) = self.recv().await {
            if let Err(e) = sink.send(Message::Text(payload)).await {
                tracing::debug!(
                    client_id = %self.id,
                    error = %e,
                    "write failed, dropping connection"
                );
                return;
            }
        }

        // Mailbox closed and drained: the hub unregistered or evicted us.
        let _ = sink.send(Message::Close(None)).await;
        tracing::debug!(client_id = %self.id, "delivery loop finished");
    }
}

#[cfg(test)]
pub(crate) mod test_sink {
    //! A recording sink standing in for a WebSocket connection in tests.

    use axum::extract::ws::Message;
    use futures_util::Sink;
    use std::io;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};
    use std::task::{Context, Poll};

    pub(crate) struct RecordingSink {
        frames: Arc<Mutex<Vec<Message>>>,
        fail_writes: bool,
    }

    impl RecordingSink {
        /// Returns the sink and a shared view of the frames it has written.
        pub(crate) fn new() -> (Self, Arc<Mutex<Vec<Message>>>) {
            let frames = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    frames: Arc::clone(&frames),
                    fail_writes: false,
                },
                frames,
            )
        }

        /// A sink whose every write fails, like a torn connection.
        pub(crate) fn broken() -> Self {
            Self {
                frames: Arc::new(Mutex::new(Vec::new())),
                fail_writes: true,
            }
        }
    }

    impl Sink<Message> for RecordingSink {
        type Error = io::Error;

        fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn start_send(self: Pin<&mut Self>, item: Message) -> io::Result<()> {
            let this = self.get_mut();
            if this.fail_writes {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone"));
            }
            this.frames.lock().unwrap().push(item);
            Ok(())
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_sink::RecordingSink;
    use super::*;

    #[tokio::test]
    async fn test_delivers_in_order_then_closes() {
        let (handle, client) = Client::new(4);
        let (_, mailbox) = handle.into_parts();

        mailbox.send("first".to_string()).await.unwrap();
        mailbox.send("second".to_string()).await.unwrap();
        mailbox.send("third".to_string()).await.unwrap();
        drop(mailbox); // close the mailbox: loop should drain then say goodbye

        let (sink, frames) = RecordingSink::new();
        client.run(sink).await;

        let frames = frames.lock().unwrap();
        assert_eq!(
            *frames,
            vec![
                Message::Text("first".to_string()),
                Message::Text("second".to_string()),
                Message::Text("third".to_string()),
                Message::Close(None),
            ]
        );
    }

    #[tokio::test]
    async fn test_write_error_is_terminal() {
        let (handle, client) = Client::new(4);
        let (_, mailbox) = handle.into_parts();

        mailbox.send("doomed".to_string()).await.unwrap();
        mailbox.send("never written".to_string()).await.unwrap();
        drop(mailbox);

        // The loop must return on the first failed write; no retry, no
        // close frame on the dead connection.
        client.run(RecordingSink::broken()).await;
    }

    #[tokio::test]
    async fn test_close_without_payloads() {
        let (handle, client) = Client::new(1);
        drop(handle);

        let (sink, frames) = RecordingSink::new();
        client.run(sink).await;

        assert_eq!(*frames.lock().unwrap(), vec![Message::Close(None)]);
    }

    #[test]
    fn test_pair_shares_id() {
        let (handle, client) = Client::new(8);
        assert_eq!(handle.id(), client.id());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        // Must not panic even with a nonsense configuration.
        let (_handle, _client) = Client::new(0);
    }
}
