//! Stochastic bounded-population feed.

use std::time::Duration;

use patchbay_proto::CrossConnectEvent;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::buffer::{CrossConnectHolder, LifecycleBuffer};
use crate::factory::ConnectionFactory;
use crate::sink::{MonitorSink, dispatch};

/// Seed shared by every feed unless a config overrides it.
pub const FEED_SEED: u64 = 135_797_531;

/// Tuning for [`Simulator`].
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Delay between mutation steps.
    pub tick_interval: Duration,
    /// Population cap; a tick at the cap always removes.
    pub max_cross_connects: usize,
    /// Probability that an added cross-connect is a cross-manager pair.
    ///
    /// `0.0` keeps the population fully local, `1.0` fully remote.
    pub remote_probability: f32,
    /// RNG seed; equal seeds replay equal event sequences.
    pub seed: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(5000),
            max_cross_connects: 10,
            remote_probability: 0.5,
            seed: FEED_SEED,
        }
    }
}

impl SimulatorConfig {
    /// Checks the bounds every feed relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the population cap is zero or the remote
    /// probability is not a probability.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cross_connects == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !(0.0..=1.0).contains(&self.remote_probability) {
            return Err(ConfigError::ProbabilityOutOfRange(self.remote_probability));
        }
        Ok(())
    }
}

/// Rejected feed configuration.
#[derive(Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The population cap must admit at least one cross-connect.
    #[error("max cross-connects must be at least 1")]
    ZeroCapacity,

    /// The remote probability must lie within `0.0..=1.0`.
    #[error("remote probability {0} is outside 0.0..=1.0")]
    ProbabilityOutOfRange(f32),
}

/// Generator of a bounded, randomly mutating cross-connect population.
///
/// Each tick applies exactly one mutation: a forced ADD on an empty buffer,
/// a forced REMOVE at the population cap, otherwise a fair coin decides.
/// ADDs draw remote against local with the configured probability. All
/// randomness comes from one seeded RNG owned by the instance, so a given
/// config replays the same event sequence on every run.
#[derive(Debug)]
pub struct Simulator {
    config: SimulatorConfig,
    rng: ChaCha8Rng,
    factory: ConnectionFactory,
    buffer: LifecycleBuffer,
}

impl Simulator {
    /// Builds a feed from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` fails validation.
    pub fn new(config: SimulatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            rng,
            factory: ConnectionFactory::default(),
            buffer: LifecycleBuffer::default(),
        })
    }

    /// Applies one mutation step and returns its events in emission order.
    ///
    /// An ADD yields one UPDATE for a local cross-connect, or two for a
    /// remote pair with the receiver half first. A REMOVE yields the
    /// matching DELETEs, sender half first.
    pub fn tick(&mut self) -> Vec<CrossConnectEvent> {
        let add = if self.buffer.is_empty() {
            true
        } else if self.buffer.len() >= self.config.max_cross_connects {
            false
        } else {
            self.rng.gen_bool(0.5)
        };

        if add { self.add_cross_connect() } else { self.remove_cross_connect() }
    }

    /// Live holder count.
    #[must_use]
    pub fn population(&self) -> usize {
        self.buffer.len()
    }

    /// Live local holder count.
    #[must_use]
    pub fn local_count(&self) -> usize {
        self.buffer.local_count()
    }

    /// Live remote-pair holder count.
    #[must_use]
    pub fn remote_count(&self) -> usize {
        self.buffer.remote_count()
    }

    /// Drives the tick loop until `shutdown` fires, forwarding every event
    /// to `sink`.
    pub async fn run<S: MonitorSink>(mut self, sink: &S, shutdown: CancellationToken) {
        loop {
            for event in self.tick() {
                debug!("Emitting {} for cross-connect {}", event.kind, event.cross_connect.id);
                dispatch(sink, &event);
            }
            info!(
                "Buffer overview: {} local, {} remote",
                self.buffer.local_count(),
                self.buffer.remote_count()
            );

            tokio::select! {
                () = shutdown.cancelled() => break,
                () = time::sleep(self.config.tick_interval) => {},
            }
        }
    }

    fn add_cross_connect(&mut self) -> Vec<CrossConnectEvent> {
        let remote = self.rng.gen_bool(f64::from(self.config.remote_probability));
        let holder = if remote {
            self.factory.create_remote_pair(&mut self.rng)
        } else {
            self.factory.create_local(&mut self.rng)
        };

        let events = match &holder {
            CrossConnectHolder::Local(cross_connect) => {
                vec![CrossConnectEvent::update(cross_connect.clone())]
            },
            CrossConnectHolder::RemotePair { sender, receiver } => vec![
                CrossConnectEvent::update(receiver.clone()),
                CrossConnectEvent::update(sender.clone()),
            ],
        };
        self.buffer.insert(holder);
        events
    }

    fn remove_cross_connect(&mut self) -> Vec<CrossConnectEvent> {
        let Some(index) = self.buffer.pick_random_index(&mut self.rng) else {
            return Vec::new();
        };
        match self.buffer.remove_at(index) {
            CrossConnectHolder::Local(cross_connect) => {
                vec![CrossConnectEvent::delete(cross_connect)]
            },
            CrossConnectHolder::RemotePair { sender, receiver } => vec![
                CrossConnectEvent::delete(sender),
                CrossConnectEvent::delete(receiver),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Mutex;

    use patchbay_proto::{CrossConnect, EventKind};

    use super::*;

    fn simulator(max_cross_connects: usize, remote_probability: f32) -> Simulator {
        Simulator::new(SimulatorConfig {
            tick_interval: Duration::from_millis(1),
            max_cross_connects,
            remote_probability,
            ..SimulatorConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = SimulatorConfig { max_cross_connects: 0, ..SimulatorConfig::default() };
        assert_eq!(Simulator::new(config).err(), Some(ConfigError::ZeroCapacity));
    }

    #[test]
    fn probability_outside_unit_interval_is_rejected() {
        let config = SimulatorConfig { remote_probability: 1.5, ..SimulatorConfig::default() };
        assert!(matches!(
            Simulator::new(config).err(),
            Some(ConfigError::ProbabilityOutOfRange(_))
        ));
    }

    #[test]
    fn capacity_one_alternates_strictly() {
        let mut simulator = simulator(1, 0.0);
        for step in 0..20 {
            let events = simulator.tick();
            assert_eq!(events.len(), 1);
            let expected = if step % 2 == 0 { EventKind::Update } else { EventKind::Delete };
            assert_eq!(events[0].kind, expected);
        }
    }

    #[test]
    fn probability_zero_stays_local() {
        let mut simulator = simulator(5, 0.0);
        for _ in 0..50 {
            for event in simulator.tick() {
                assert!(event.cross_connect.is_local());
            }
            assert_eq!(simulator.remote_count(), 0);
        }
    }

    #[test]
    fn probability_one_emits_receiver_update_first() {
        let mut simulator = simulator(5, 1.0);
        let events = simulator.tick();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::Update);
        assert_eq!(events[0].cross_connect.id, "00000001");
        assert!(events[0].cross_connect.source.is_remote());
        assert_eq!(events[1].kind, EventKind::Update);
        assert_eq!(events[1].cross_connect.id, "00000000");
        assert!(events[1].cross_connect.destination.is_remote());
        assert_eq!(simulator.local_count(), 0);
        assert_eq!(simulator.remote_count(), 1);
    }

    #[test]
    fn remote_removal_deletes_sender_first() {
        let mut simulator = simulator(1, 1.0);
        simulator.tick();
        let events = simulator.tick();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::Delete);
        assert_eq!(events[0].cross_connect.id, "00000000");
        assert_eq!(events[1].kind, EventKind::Delete);
        assert_eq!(events[1].cross_connect.id, "00000001");
        assert_eq!(simulator.population(), 0);
    }

    #[test]
    fn population_respects_the_cap() {
        let mut simulator = simulator(3, 0.5);
        for _ in 0..200 {
            simulator.tick();
            assert!(simulator.population() <= 3);
            assert_eq!(
                simulator.local_count() + simulator.remote_count(),
                simulator.population()
            );
        }
    }

    #[test]
    fn equal_seeds_replay_equal_sequences() {
        let mut first = simulator(3, 0.5);
        let mut second = simulator(3, 0.5);
        for _ in 0..40 {
            assert_eq!(first.tick(), second.tick());
        }
    }

    struct CountingSink {
        updates: Mutex<usize>,
    }

    impl MonitorSink for CountingSink {
        fn update_cross_connect(&self, _cross_connect: &CrossConnect) {
            *self.updates.lock().unwrap() += 1;
        }

        fn delete_cross_connect(&self, _cross_connect: &CrossConnect) {}
    }

    #[tokio::test]
    async fn run_stops_on_cancellation() {
        let simulator = simulator(2, 0.0);
        let sink = std::sync::Arc::new(CountingSink { updates: Mutex::new(0) });
        let shutdown = CancellationToken::new();

        let task = tokio::spawn({
            let sink = std::sync::Arc::clone(&sink);
            let shutdown = shutdown.clone();
            async move { simulator.run(sink.as_ref(), shutdown).await }
        });

        time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();
        task.await.unwrap();
        assert!(*sink.updates.lock().unwrap() >= 1);
    }
}
