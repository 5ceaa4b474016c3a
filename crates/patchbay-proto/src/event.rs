//! Lifecycle events emitted by the feed.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::cross_connect::CrossConnect;

/// Lifecycle transition carried by an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum EventKind {
    /// Cross-connect created or modified.
    Update = 0,
    /// Cross-connect removed.
    Delete = 1,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// One monitor-stream event: a transition applied to a full cross-connect
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossConnectEvent {
    /// Transition kind.
    pub kind: EventKind,
    /// Snapshot of the affected cross-connect.
    pub cross_connect: CrossConnect,
}

impl CrossConnectEvent {
    /// Event announcing `cross_connect` as created or modified.
    #[must_use]
    pub fn update(cross_connect: CrossConnect) -> Self {
        Self { kind: EventKind::Update, cross_connect }
    }

    /// Event announcing `cross_connect` as removed.
    #[must_use]
    pub fn delete(cross_connect: CrossConnect) -> Self {
        Self { kind: EventKind::Delete, cross_connect }
    }
}
