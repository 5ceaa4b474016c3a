//! Server error types.

use thiserror::Error;

/// Errors that can occur while serving the monitor stream.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Socket setup or accept failure.
    #[error("transport: {0}")]
    Transport(#[from] std::io::Error),
}
