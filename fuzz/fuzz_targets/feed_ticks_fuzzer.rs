//! Fuzz target for the stochastic feed's tick loop
//!
//! # Strategy
//!
//! - Arbitrary seeds, capacities, and remote probabilities
//! - Long tick sequences to walk the population up and down repeatedly
//!
//! # Invariants
//!
//! - NEVER panic for any accepted configuration
//! - A tick emits one or two events, never zero, never mixed kinds
//! - The population respects the cap and the counters partition it
//! - Cross-connect ids are unique among the currently live entities

#![no_main]

use std::collections::HashSet;
use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use patchbay_proto::EventKind;
use patchbay_sim::{Simulator, SimulatorConfig};

#[derive(Debug, Arbitrary)]
struct FeedInput {
    seed: u64,
    max_cross_connects: u8,
    remote_permille: u16,
    ticks: u16,
}

fuzz_target!(|input: FeedInput| {
    let max_cross_connects = usize::from(input.max_cross_connects.clamp(1, 32));
    let remote_probability = f32::from(input.remote_permille % 1001) / 1000.0;

    let mut simulator = Simulator::new(SimulatorConfig {
        tick_interval: Duration::from_millis(1),
        max_cross_connects,
        remote_probability,
        seed: input.seed,
    })
    .expect("bounded input is a valid config");

    let mut live = HashSet::new();
    for _ in 0..input.ticks.min(512) {
        let events = simulator.tick();
        assert!(!events.is_empty() && events.len() <= 2);

        let kind = events[0].kind;
        assert!(events.iter().all(|event| event.kind == kind));

        for event in events {
            match event.kind {
                EventKind::Update => assert!(live.insert(event.cross_connect.id.clone())),
                EventKind::Delete => assert!(live.remove(&event.cross_connect.id)),
            }
        }

        assert!(simulator.population() <= max_cross_connects);
        assert_eq!(simulator.local_count() + simulator.remote_count(), simulator.population());
        assert_eq!(live.len(), simulator.local_count() + 2 * simulator.remote_count());
    }
});
