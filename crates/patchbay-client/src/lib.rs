//! Monitor stream client library.
//!
//! [`MonitorClient`] subscribes to a patchbay monitor endpoint by
//! connecting to it (subscription carries no request payload) and decodes
//! the length-prefixed CBOR event stream one frame at a time.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
mod error;

pub use client::MonitorClient;
pub use error::ClientError;
