//! Cross-connect entities.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::connection::{Connection, RemoteConnection};

/// One side of a cross-connect.
///
/// A fully local cross-connect has two [`Endpoint::Local`] sides. A
/// cross-manager hop has exactly one [`Endpoint::Remote`] side, and that
/// remote record is shared between the sender and receiver cross-connects of
/// the pair. Decoding a streamed event reconstructs the record per event;
/// shared identity is an in-process property only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endpoint {
    /// Endpoint on the local mesh node.
    Local(Connection),
    /// Shared remote leg of a cross-manager pair.
    Remote(Arc<RemoteConnection>),
}

impl Endpoint {
    /// Identifier of the underlying record.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Local(connection) => &connection.id,
            Self::Remote(remote) => &remote.id,
        }
    }

    /// True for the remote leg of a cross-manager pair.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// A directed pairing of two connection endpoints, one hop of a data-plane
/// path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossConnect {
    /// Identifier, unique within the feed's id space.
    pub id: String,
    /// Transport-medium tag. Fixed to [`fixtures::PAYLOAD`] by the feed.
    ///
    /// [`fixtures::PAYLOAD`]: crate::fixtures::PAYLOAD
    pub payload: String,
    /// Where the hop originates.
    pub source: Endpoint,
    /// Where the hop terminates.
    pub destination: Endpoint,
}

impl CrossConnect {
    /// True when both endpoints are local records.
    #[must_use]
    pub fn is_local(&self) -> bool {
        !self.source.is_remote() && !self.destination.is_remote()
    }
}
