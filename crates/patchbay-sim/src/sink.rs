//! Delivery seam between feeds and transports.

use patchbay_proto::{CrossConnect, CrossConnectEvent, EventKind};

/// Receives lifecycle transitions from a feed.
///
/// Calls are synchronous and fire-and-forget: implementations must not block
/// the tick loop, and delivery failures stay on the sink's side.
pub trait MonitorSink {
    /// Announces `cross_connect` as created or modified.
    fn update_cross_connect(&self, cross_connect: &CrossConnect);

    /// Announces `cross_connect` as removed.
    fn delete_cross_connect(&self, cross_connect: &CrossConnect);
}

/// Forwards one event to the matching sink operation.
pub(crate) fn dispatch<S: MonitorSink>(sink: &S, event: &CrossConnectEvent) {
    match event.kind {
        EventKind::Update => sink.update_cross_connect(&event.cross_connect),
        EventKind::Delete => sink.delete_cross_connect(&event.cross_connect),
    }
}
