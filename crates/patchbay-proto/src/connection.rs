//! Connection endpoint records.
//!
//! A cross-connect joins two endpoints. Endpoints on the same mesh node are
//! plain [`Connection`] records; a hop that crosses two mesh managers is
//! carried by a [`RemoteConnection`] shared between the sender and receiver
//! sides of the pair.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Dataplane technology attached to a connection endpoint.
///
/// Encoded as a small integer on the wire. The set is fixed; feed generators
/// draw uniformly from [`MechanismKind::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum MechanismKind {
    /// Kernel network interface.
    Kernel = 0,
    /// Shared-memory packet interface.
    Memif = 1,
    /// Vhost-user interface.
    Vhost = 2,
    /// Tap device.
    Tap = 3,
    /// SR-IOV virtual function.
    Sriov = 4,
    /// VXLAN tunnel.
    Vxlan = 5,
}

impl MechanismKind {
    /// Every mechanism kind, in wire order.
    pub const ALL: [Self; 6] =
        [Self::Kernel, Self::Memif, Self::Vhost, Self::Tap, Self::Sriov, Self::Vxlan];

    /// Lower-case name used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kernel => "kernel",
            Self::Memif => "memif",
            Self::Vhost => "vhost",
            Self::Tap => "tap",
            Self::Sriov => "sriov",
            Self::Vxlan => "vxlan",
        }
    }
}

impl fmt::Display for MechanismKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One local endpoint of a cross-connect.
///
/// Immutable once fabricated; discarded when the owning holder leaves the
/// lifecycle buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Identifier, unique within the feed's id space.
    pub id: String,
    /// Opaque service name (hex-rendered random value in practice).
    pub service_name: String,
    /// Dataplane mechanism for this endpoint.
    pub mechanism: MechanismKind,
    /// Mechanism parameters.
    pub parameters: BTreeMap<String, String>,
    /// Connection context entries.
    pub context: BTreeMap<String, String>,
    /// Connection labels.
    pub labels: BTreeMap<String, String>,
}

/// The cross-manager leg shared by a remote sender/receiver pair.
///
/// Carries the same record content as [`Connection`] plus the manager tags
/// identifying the two sides of the hop. Both cross-connects of a pair hold
/// the same record by shared ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConnection {
    /// Identifier, derived from the sender side's counter stem.
    pub id: String,
    /// Opaque service name.
    pub service_name: String,
    /// Dataplane mechanism for the remote leg.
    pub mechanism: MechanismKind,
    /// Mechanism parameters.
    pub parameters: BTreeMap<String, String>,
    /// Connection context entries.
    pub context: BTreeMap<String, String>,
    /// Connection labels.
    pub labels: BTreeMap<String, String>,
    /// Manager originating the hop.
    pub source_manager: String,
    /// Manager terminating the hop.
    pub destination_manager: String,
}
