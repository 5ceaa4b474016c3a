//! Monitor stream server.
//!
//! Hosts the synthetic feed's fan-out: lifecycle events arrive through the
//! [`EventBroadcaster`] sink and every TCP subscriber gets its own copy of
//! the stream as length-prefixed CBOR frames. Connecting is subscribing;
//! there is no request payload and no replay of earlier events.
//!
//! ## Architecture
//!
//! ```text
//! patchbay-server
//!   ├─ EventBroadcaster        (MonitorSink → broadcast channel)
//!   ├─ MonitorServer           (TCP accept loop)
//!   └─ per-subscriber writer tasks
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod broadcast;
pub mod config;
mod error;

use std::net::SocketAddr;

use patchbay_proto::{CrossConnectEvent, codec};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

pub use broadcast::EventBroadcaster;
pub use error::ServerError;

/// TCP server streaming cross-connect events to every subscriber.
pub struct MonitorServer {
    listener: TcpListener,
    broadcaster: EventBroadcaster,
}

impl MonitorServer {
    /// Binds the monitor endpoint and attaches the event source.
    ///
    /// # Errors
    ///
    /// Returns an error if binding `addr` fails.
    pub async fn bind(addr: &str, broadcaster: EventBroadcaster) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, broadcaster })
    }

    /// Local address the listener is bound to.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket has no local address.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts subscribers until `shutdown` fires.
    ///
    /// Every accepted connection gets a fresh broadcast receiver and a
    /// writer task of its own; a failing subscriber never disturbs the
    /// accept loop or the feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener's address cannot be read for the
    /// startup log line. Accept failures are logged and retried.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), ServerError> {
        tracing::info!("Monitor server listening on {}", self.local_addr()?);

        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let receiver = self.broadcaster.subscribe();
                        let shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            serve_subscriber(stream, peer, receiver, shutdown).await;
                        });
                    },
                    Err(e) => {
                        tracing::error!("Accept error: {}", e);
                    },
                },
            }
        }

        tracing::info!("Monitor server stopped");
        Ok(())
    }
}

/// Streams broadcast events to one subscriber.
///
/// Ends when the subscriber disconnects, the event channel closes, or
/// shutdown is signalled. A lagging subscriber loses the skipped events and
/// continues from the oldest retained one.
async fn serve_subscriber(
    mut stream: TcpStream,
    peer: SocketAddr,
    mut receiver: Receiver<CrossConnectEvent>,
    shutdown: CancellationToken,
) {
    let subscriber = subscriber_id();
    tracing::info!("Subscriber {} connected from {}", subscriber, peer);

    loop {
        let event = tokio::select! {
            () = shutdown.cancelled() => break,
            received = receiver.recv() => match received {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Subscriber {} lagging, {} events skipped", subscriber, skipped);
                    continue;
                },
                Err(RecvError::Closed) => break,
            },
        };

        if let Err(e) = codec::write_event(&mut stream, &event).await {
            tracing::debug!("Subscriber {} gone: {}", subscriber, e);
            break;
        }
    }

    tracing::info!("Subscriber {} disconnected", subscriber);
}

/// Random id correlating one subscriber's log lines.
fn subscriber_id() -> String {
    let mut buf = [0u8; 8];
    getrandom::fill(&mut buf).unwrap_or_else(|e| {
        tracing::error!("getrandom failed: {}", e);
        buf.fill(0);
    });
    format!("{:016x}", u64::from_le_bytes(buf))
}
