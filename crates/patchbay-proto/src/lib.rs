//! Cross-connect event model and wire codec.
//!
//! Shared vocabulary for the patchbay feed crates: the connection and
//! cross-connect entity types, the lifecycle event record streamed to
//! monitor subscribers, and the length-prefixed CBOR framing used on the
//! wire.
//!
//! # Components
//!
//! - [`Connection`] / [`RemoteConnection`]: endpoint records
//! - [`CrossConnect`]: a directed source/destination pairing
//! - [`CrossConnectEvent`]: the streamed UPDATE/DELETE record
//! - [`codec`]: frame encoding and the async read/write halves
//! - [`fixtures`]: placeholder map content and payload constants

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
mod connection;
mod cross_connect;
mod event;
pub mod fixtures;

pub use codec::CodecError;
pub use connection::{Connection, MechanismKind, RemoteConnection};
pub use cross_connect::{CrossConnect, Endpoint};
pub use event::{CrossConnectEvent, EventKind};
