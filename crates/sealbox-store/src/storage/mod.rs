//! Storage abstraction for message records.
//!
//! Trait-based abstraction over the record table. The trait is synchronous
//! (no async) and deliberately small: insert, versioned load, conditional
//! update, active-id scan. All lifecycle semantics live above it in
//! [`MessageStore`](crate::MessageStore).

mod memory;
mod redb;

pub use memory::MemoryStorage;

pub use self::redb::RedbStorage;
use crate::{
    error::StorageError,
    record::{MessageId, MessageRecord, Versioned},
};

/// Storage abstraction for message records.
///
/// Must be Clone (shared across callers), Send + Sync (thread-safe), and
/// synchronous. Implementations share internal state via Arc, so clones
/// access the same underlying storage.
///
/// [`update`](Self::update) is a per-record compare-and-swap and is the
/// single primitive the lifecycle logic builds its atomicity on: the
/// version check and the write must be one indivisible step. Updates to
/// different ids must not serialize against each other beyond the
/// backend's own write path.
pub trait Storage: Clone + Send + Sync + 'static {
    /// Persist a new record under `id` with version 0.
    ///
    /// # Invariants
    ///
    /// - Pre: `id` does not exist
    /// - Post: `load(id)` returns the record at version 0
    fn insert(&self, id: MessageId, record: &MessageRecord) -> Result<(), StorageError>;

    /// Load a record snapshot with its current version.
    ///
    /// Returns `None` if the id was never inserted. Records are never
    /// physically removed by the store, so `None` means "never existed"
    /// rather than "deleted".
    fn load(&self, id: MessageId) -> Result<Option<Versioned>, StorageError>;

    /// Replace the record if and only if its version still equals
    /// `expected_version`; the stored version becomes
    /// `expected_version + 1`.
    ///
    /// Returns `false` when another writer got there first (or the id
    /// does not exist); callers reload and retry.
    fn update(
        &self,
        id: MessageId,
        expected_version: u64,
        record: &MessageRecord,
    ) -> Result<bool, StorageError>;

    /// Snapshot of ids whose records are currently active.
    ///
    /// Order is not guaranteed. The snapshot may be stale by the time the
    /// caller acts on it; the CAS on each record closes that window.
    fn active_ids(&self) -> Result<Vec<MessageId>, StorageError>;
}
