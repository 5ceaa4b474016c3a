//! Subscriber connection to a monitor stream server.

use patchbay_proto::{CrossConnectEvent, codec};
use tokio::net::TcpStream;

use crate::error::ClientError;

/// One subscription to a monitor stream.
///
/// The stream carries events from the moment of connection onward; there is
/// no replay of earlier events.
#[derive(Debug)]
pub struct MonitorClient {
    stream: TcpStream,
}

impl MonitorClient {
    /// Connects to the monitor endpoint at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connect`] when the TCP connection fails.
    pub async fn connect(addr: &str) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self { stream })
    }

    /// Reads the next event from the stream.
    ///
    /// Returns `Ok(None)` when the server closes the stream cleanly.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Stream`] on a transport or decode failure.
    pub async fn next_event(&mut self) -> Result<Option<CrossConnectEvent>, ClientError> {
        Ok(codec::read_event(&mut self.stream).await?)
    }
}
