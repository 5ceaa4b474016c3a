//! Test harness for the patchbay feed crates.
//!
//! Test-facing pieces shared by the integration suites:
//!
//! - [`RecordingSink`]: a monitor sink that captures every delivered event
//!   in order, for asserting on feed output without a transport
//! - [`drive`]: runs a bounded number of mutation steps against any sink,
//!   replacing the wall-clock tick loop in tests
//! - [`MonitorFixture`]: a real monitor server on an ephemeral loopback
//!   port, for end-to-end stream tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::net::SocketAddr;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use patchbay_proto::{CrossConnect, CrossConnectEvent, EventKind};
use patchbay_server::{EventBroadcaster, MonitorServer, ServerError};
use patchbay_sim::{MonitorSink, Simulator};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Sink that records every delivered event in delivery order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<CrossConnectEvent>>,
}

impl RecordingSink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<CrossConnectEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Count of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record(&self, event: CrossConnectEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }
}

impl MonitorSink for RecordingSink {
    fn update_cross_connect(&self, cross_connect: &CrossConnect) {
        self.record(CrossConnectEvent::update(cross_connect.clone()));
    }

    fn delete_cross_connect(&self, cross_connect: &CrossConnect) {
        self.record(CrossConnectEvent::delete(cross_connect.clone()));
    }
}

/// Runs `ticks` mutation steps, forwarding every event to `sink`.
pub fn drive<S: MonitorSink>(simulator: &mut Simulator, sink: &S, ticks: usize) {
    for _ in 0..ticks {
        for event in simulator.tick() {
            match event.kind {
                EventKind::Update => sink.update_cross_connect(&event.cross_connect),
                EventKind::Delete => sink.delete_cross_connect(&event.cross_connect),
            }
        }
    }
}

/// Monitor server running on an ephemeral loopback port.
///
/// Publishing through [`MonitorFixture::broadcaster`] reaches every
/// connected subscriber exactly as in production; only the address and the
/// task lifetime are test-managed.
pub struct MonitorFixture {
    /// Sink feeding the server's fan-out.
    pub broadcaster: EventBroadcaster,
    addr: SocketAddr,
    shutdown: CancellationToken,
    server: JoinHandle<Result<(), ServerError>>,
}

impl MonitorFixture {
    /// Binds and starts a server with a `capacity`-event lag window.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the ephemeral bind fails.
    pub async fn start(capacity: usize) -> Result<Self, ServerError> {
        let broadcaster = EventBroadcaster::new(capacity);
        let server = MonitorServer::bind("127.0.0.1:0", broadcaster.clone()).await?;
        let addr = server.local_addr()?;
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(server.run(shutdown.clone()));
        Ok(Self { broadcaster, addr, shutdown, server: handle })
    }

    /// Address subscribers connect to.
    #[must_use]
    pub fn addr(&self) -> String {
        self.addr.to_string()
    }

    /// Waits until at least `count` subscribers hold receivers.
    ///
    /// Returns `false` when they do not attach within the grace period.
    pub async fn wait_for_subscribers(&self, count: usize) -> bool {
        for _ in 0..200 {
            if self.broadcaster.receiver_count() >= count {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }

    /// Cancels the server and joins its task.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the server ended with one, or when its
    /// task panicked.
    pub async fn stop(self) -> Result<(), ServerError> {
        self.shutdown.cancel();
        match self.server.await {
            Ok(result) => result,
            Err(join) => Err(ServerError::Transport(std::io::Error::other(join))),
        }
    }
}
