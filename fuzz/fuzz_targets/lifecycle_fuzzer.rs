//! Fuzz target for the message lifecycle state machine.
//!
//! Replays arbitrary operation sequences against the in-memory backend
//! with a manually advanced clock, and checks the lifecycle invariants
//! after every step:
//!
//! - view_count never exceeds max_views
//! - successful retrievals of a record never exceed its quota
//! - a deactivated record never serves again
//!
//! The fuzzer should NEVER panic on any operation sequence.

#![no_main]

use std::{collections::HashMap, time::Duration};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sealbox_crypto::Envelope;
use sealbox_store::{ManualClock, MemoryStorage, MessageStore, Storage};

#[derive(Arbitrary, Debug)]
enum Op {
    Create { expiry_millis: u16, max_views: u8 },
    Retrieve { target: u8 },
    Sweep,
    Advance { millis: u16 },
}

fuzz_target!(|ops: Vec<Op>| {
    let clock = ManualClock::new(0);
    let storage = MemoryStorage::new();
    let store = MessageStore::new(storage.clone(), clock.clone());

    let mut ids = Vec::new();
    let mut successes: HashMap<_, u64> = HashMap::new();

    for op in ops {
        match op {
            Op::Create { expiry_millis, max_views } => {
                let envelope = Envelope { nonce: [0; 12], tag: [0; 16], ciphertext: vec![0xAB] };
                if let Ok(id) = store.create(
                    &envelope,
                    Duration::from_millis(u64::from(expiry_millis)),
                    u32::from(max_views),
                ) {
                    ids.push(id);
                }
            },
            Op::Retrieve { target } => {
                if ids.is_empty() {
                    continue;
                }
                let id = ids[usize::from(target) % ids.len()];
                if store.retrieve(id).is_ok() {
                    *successes.entry(id).or_insert(0) += 1;
                }
            },
            Op::Sweep => {
                let _ = store.sweep_expired();
            },
            Op::Advance { millis } => clock.advance(u64::from(millis)),
        }

        // Invariants must hold after every operation.
        for id in &ids {
            let Ok(Some(versioned)) = storage.load(*id) else {
                panic!("created record vanished");
            };
            let record = versioned.record;

            assert!(record.view_count <= record.max_views, "view quota exceeded");

            let served = successes.get(id).copied().unwrap_or(0);
            assert!(served <= u64::from(record.max_views), "over-disclosure");
            if !record.is_active {
                assert!(
                    served <= u64::from(record.view_count),
                    "inactive record served more views than it counted"
                );
            }
        }
    }
});
