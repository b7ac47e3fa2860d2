//! Sealbox message lifecycle store.
//!
//! Owns stored envelopes and enforces "at most N views, or until time T,
//! whichever first" with no possibility of over-disclosure under
//! concurrent access.
//!
//! # Architecture
//!
//! The lifecycle state machine lives in [`lifecycle`] as pure functions
//! over record snapshots: no I/O, no clock reads, trivially unit-testable.
//! [`MessageStore`] drives it against a [`Storage`] backend through an
//! optimistic compare-and-swap loop: load a versioned snapshot, decide,
//! write back only if the version is unchanged, otherwise re-observe.
//! Every mutation of a record goes through that single CAS, which makes
//! the expiry check, the view-count increment, and the deactivation one
//! indivisible step per record. Operations on different records never
//! block each other beyond the backend's own write serialization.
//!
//! # Invariants
//!
//! For every record, at all times, under all interleavings:
//!
//! 1. `view_count` never exceeds `max_views`
//! 2. Once inactive, a record never serves its envelope again
//! 3. A record deactivates exactly once: at the first retrieval observing
//!    the expiry, at the retrieval that exhausts the quota, or during a
//!    sweep, whichever fires first
//! 4. Two concurrent retrievals of a `max_views = 1` record cannot both
//!    succeed
//!
//! Deactivation is logical (`is_active = false`), not physical removal;
//! garbage collection of dead records is a policy decision outside this
//! crate.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod clock;
mod error;
pub mod lifecycle;
mod record;
mod storage;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{StorageError, StoreError};
pub use record::{MessageId, MessageRecord, Versioned};
pub use storage::{MemoryStorage, RedbStorage, Storage};
pub use store::MessageStore;
