//! Client error types.

use patchbay_proto::CodecError;
use thiserror::Error;

/// Errors that can occur on the monitor client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Establishing the TCP connection failed.
    #[error("connect: {0}")]
    Connect(#[from] std::io::Error),

    /// The event stream broke or carried a malformed frame.
    #[error("stream: {0}")]
    Stream(#[from] CodecError),
}
