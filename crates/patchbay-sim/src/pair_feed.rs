//! Single-pair feed: one fixed cross-connect, alternating transitions.
//!
//! Unlike [`Simulator`], nothing here is population-driven: every tick
//! rebuilds the same cross-connect with fresh mechanism draws and flips
//! between UPDATE and DELETE. Useful for pointing a monitor client at two
//! known interface inodes.
//!
//! [`Simulator`]: crate::Simulator

use std::time::Duration;

use patchbay_proto::fixtures;
use patchbay_proto::{Connection, CrossConnect, CrossConnectEvent, Endpoint, EventKind};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::factory::random_mechanism;
use crate::simulator::FEED_SEED;
use crate::sink::{MonitorSink, dispatch};

const CROSS_CONNECT_ID: &str = "cc_id";
const SOURCE_CONNECTION_ID: &str = "c_src_id";
const DESTINATION_CONNECTION_ID: &str = "c_dst_id";
const SERVICE_NAME: &str = "ns_id";

/// Tuning for [`PairFeed`].
#[derive(Debug, Clone)]
pub struct PairFeedConfig {
    /// Inode tag stamped on the source endpoint's parameters.
    pub source_inode: String,
    /// Inode tag stamped on the destination endpoint's parameters.
    pub destination_inode: String,
    /// Delay between emissions.
    pub tick_interval: Duration,
    /// RNG seed for the mechanism draws.
    pub seed: u64,
}

impl PairFeedConfig {
    /// Config with the shared default seed.
    #[must_use]
    pub fn new(source_inode: String, destination_inode: String, tick_interval: Duration) -> Self {
        Self { source_inode, destination_inode, tick_interval, seed: FEED_SEED }
    }
}

/// Feed that toggles one fixed cross-connect between UPDATE and DELETE.
#[derive(Debug)]
pub struct PairFeed {
    config: PairFeedConfig,
    rng: ChaCha8Rng,
    next_kind: EventKind,
}

impl PairFeed {
    /// Builds a feed from `config`. Emission starts with UPDATE.
    #[must_use]
    pub fn new(config: PairFeedConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self { config, rng, next_kind: EventKind::Update }
    }

    /// Rebuilds the cross-connect and returns this tick's event.
    ///
    /// Identifiers and attribute maps are fixed; only the two mechanism
    /// draws vary, source before destination.
    pub fn tick(&mut self) -> CrossConnectEvent {
        let cross_connect = self.build_cross_connect();
        let event = match self.next_kind {
            EventKind::Update => CrossConnectEvent::update(cross_connect),
            EventKind::Delete => CrossConnectEvent::delete(cross_connect),
        };
        self.next_kind = match self.next_kind {
            EventKind::Update => EventKind::Delete,
            EventKind::Delete => EventKind::Update,
        };
        event
    }

    /// Drives the tick loop until `shutdown` fires, forwarding every event
    /// to `sink`.
    pub async fn run<S: MonitorSink>(mut self, sink: &S, shutdown: CancellationToken) {
        loop {
            let event = self.tick();
            info!("Sending {}", event.kind);
            dispatch(sink, &event);

            tokio::select! {
                () = shutdown.cancelled() => break,
                () = time::sleep(self.config.tick_interval) => {},
            }
        }
    }

    fn build_cross_connect(&mut self) -> CrossConnect {
        let source = Connection {
            id: SOURCE_CONNECTION_ID.to_owned(),
            service_name: SERVICE_NAME.to_owned(),
            mechanism: random_mechanism(&mut self.rng),
            parameters: fixtures::inode_parameters(&self.config.source_inode),
            context: fixtures::map_of(&fixtures::CONTEXT_ENTRIES[..1]),
            labels: fixtures::map_of(&fixtures::LABEL_ENTRIES[..1]),
        };
        let destination = Connection {
            id: DESTINATION_CONNECTION_ID.to_owned(),
            service_name: SERVICE_NAME.to_owned(),
            mechanism: random_mechanism(&mut self.rng),
            parameters: fixtures::inode_parameters(&self.config.destination_inode),
            context: fixtures::context(),
            labels: fixtures::labels(),
        };
        CrossConnect {
            id: CROSS_CONNECT_ID.to_owned(),
            payload: fixtures::PAYLOAD.to_owned(),
            source: Endpoint::Local(source),
            destination: Endpoint::Local(destination),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn feed() -> PairFeed {
        PairFeed::new(PairFeedConfig::new(
            "4026532529".to_owned(),
            "4026532602".to_owned(),
            Duration::from_millis(1),
        ))
    }

    #[test]
    fn emission_alternates_starting_with_update() {
        let mut feed = feed();
        let kinds: Vec<EventKind> = (0..6).map(|_| feed.tick().kind).collect();
        assert_eq!(
            kinds,
            [
                EventKind::Update,
                EventKind::Delete,
                EventKind::Update,
                EventKind::Delete,
                EventKind::Update,
                EventKind::Delete,
            ]
        );
    }

    #[test]
    fn identifiers_and_maps_stay_fixed() {
        let mut feed = feed();
        let event = feed.tick();
        let cross_connect = &event.cross_connect;

        assert_eq!(cross_connect.id, CROSS_CONNECT_ID);
        assert_eq!(cross_connect.payload, fixtures::PAYLOAD);
        assert!(cross_connect.is_local());

        let Endpoint::Local(source) = &cross_connect.source else {
            panic!("expected a local source");
        };
        assert_eq!(source.id, SOURCE_CONNECTION_ID);
        assert_eq!(source.service_name, SERVICE_NAME);
        assert_eq!(source.parameters.get("inode").map(String::as_str), Some("4026532529"));
        assert_eq!(source.context.len(), 1);
        assert_eq!(source.labels.len(), 1);

        let Endpoint::Local(destination) = &cross_connect.destination else {
            panic!("expected a local destination");
        };
        assert_eq!(destination.id, DESTINATION_CONNECTION_ID);
        assert_eq!(destination.parameters.get("inode").map(String::as_str), Some("4026532602"));
        assert_eq!(destination.context, fixtures::context());
        assert_eq!(destination.labels, fixtures::labels());
    }

    #[test]
    fn equal_seeds_draw_equal_mechanisms() {
        let mut first = feed();
        let mut second = feed();
        for _ in 0..10 {
            assert_eq!(first.tick(), second.tick());
        }
    }
}
