//! Endpoint and channel constants.

/// Default monitor stream endpoint.
pub const DEFAULT_MONITOR_ADDR: &str = "127.0.0.1:5007";

/// Control-plane model address of the deployment this feed stands in for.
///
/// Nothing is served there; it is logged at startup so the feed's output
/// lines up with a real deployment's address layout.
pub const CONTROL_PLANE_ADDR: &str = "127.0.0.1:5000";

/// Broadcast channel capacity; the lag window of each subscriber.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;
