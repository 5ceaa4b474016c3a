//! Synthetic cross-connect lifecycle feeds.
//!
//! Two deterministic event generators share one emission seam:
//!
//! - [`Simulator`]: a bounded population of local and cross-manager
//!   cross-connects, mutated by one random ADD or REMOVE per tick
//! - [`PairFeed`]: one fixed cross-connect toggled between UPDATE and
//!   DELETE every tick
//!
//! Both forward their events through a [`MonitorSink`], the seam a transport
//! implements to fan the stream out to subscribers. Feeds own a seeded RNG,
//! so a given configuration replays the same event sequence on every run.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod buffer;
mod factory;
mod pair_feed;
mod simulator;
mod sink;

pub use pair_feed::{PairFeed, PairFeedConfig};
pub use simulator::{ConfigError, FEED_SEED, Simulator, SimulatorConfig};
pub use sink::MonitorSink;
