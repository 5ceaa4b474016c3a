//! Broadcast fan-out sink.

use patchbay_proto::{CrossConnect, CrossConnectEvent};
use patchbay_sim::MonitorSink;
use tokio::sync::broadcast::{self, Receiver, Sender};
use tracing::trace;

use crate::config::EVENT_CHANNEL_CAPACITY;

/// Monitor sink that publishes every event on a broadcast channel.
///
/// Clones share the channel. Publishing never blocks: with no live
/// subscriber the event is discarded, and a subscriber that falls more than
/// the channel capacity behind sees a lag error on its own receiver instead
/// of slowing the feed.
#[derive(Debug, Clone)]
pub struct EventBroadcaster {
    sender: Sender<CrossConnectEvent>,
}

impl EventBroadcaster {
    /// Broadcaster whose subscribers tolerate a `capacity`-event lag.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Fresh receiver; its stream starts at the next published event.
    #[must_use]
    pub fn subscribe(&self) -> Receiver<CrossConnectEvent> {
        self.sender.subscribe()
    }

    /// Count of live receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn publish(&self, event: CrossConnectEvent) {
        if self.sender.send(event).is_err() {
            trace!("No subscribers, event dropped");
        }
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(EVENT_CHANNEL_CAPACITY)
    }
}

impl MonitorSink for EventBroadcaster {
    fn update_cross_connect(&self, cross_connect: &CrossConnect) {
        self.publish(CrossConnectEvent::update(cross_connect.clone()));
    }

    fn delete_cross_connect(&self, cross_connect: &CrossConnect) {
        self.publish(CrossConnectEvent::delete(cross_connect.clone()));
    }
}
