//! Fuzz target for monitor stream frame decoding
//!
//! # Strategy
//!
//! - Raw bytes: arbitrary prefixes, truncated frames, corrupt CBOR bodies
//! - Hostile prefixes: declared lengths far beyond the supplied bytes
//! - Round trips: re-encode whatever decodes to catch codec asymmetries
//!
//! # Invariants
//!
//! - NEVER panic on arbitrary input
//! - Oversized declared lengths are rejected before any body allocation
//! - A successfully decoded event re-encodes and decodes to itself

#![no_main]

use libfuzzer_sys::fuzz_target;
use patchbay_proto::codec::{MAX_FRAME_LEN, decode_event, encode_event};

fuzz_target!(|data: &[u8]| {
    if let Ok(event) = decode_event(data) {
        let frame = encode_event(&event).expect("decoded event must re-encode");
        assert!(frame.len() <= MAX_FRAME_LEN + 4);

        let round_tripped = decode_event(&frame).expect("re-encoded frame must decode");
        assert_eq!(round_tripped, event);
    }
});
