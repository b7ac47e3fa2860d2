use std::{
    collections::{HashMap, hash_map::Entry},
    sync::{Arc, Mutex},
};

use super::Storage;
use crate::{
    error::StorageError,
    record::{MessageId, MessageRecord, Versioned},
};

/// In-memory storage for tests, simulation, and single-process use.
///
/// A `HashMap` guarded by a Mutex; holding the lock makes every trait
/// method one atomic step, which trivially satisfies the CAS contract.
/// All state is wrapped in Arc<Mutex<>> to allow Clone and concurrent
/// access. Uses `lock().expect()` which will panic if the mutex is
/// poisoned - acceptable for test/simulation code.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<HashMap<MessageId, Versioned>>>,
}

impl MemoryStorage {
    /// Create a new empty `MemoryStorage`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records, active or not.
    ///
    /// Useful for debugging and testing.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned (a thread panicked while
    /// holding the lock). This is acceptable for test/simulation code.
    #[allow(clippy::expect_used)]
    pub fn record_count(&self) -> usize {
        self.inner.lock().expect("Mutex poisoned").len()
    }
}

impl Storage for MemoryStorage {
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for
    /// test code.
    #[allow(clippy::expect_used)]
    fn insert(&self, id: MessageId, record: &MessageRecord) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().expect("Mutex poisoned");

        match inner.entry(id) {
            Entry::Occupied(_) => Err(StorageError::Duplicate),
            Entry::Vacant(slot) => {
                slot.insert(Versioned { version: 0, record: record.clone() });
                Ok(())
            },
        }
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for
    /// test code.
    #[allow(clippy::expect_used)]
    fn load(&self, id: MessageId) -> Result<Option<Versioned>, StorageError> {
        let inner = self.inner.lock().expect("Mutex poisoned");

        Ok(inner.get(&id).cloned())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for
    /// test code.
    #[allow(clippy::expect_used)]
    fn update(
        &self,
        id: MessageId,
        expected_version: u64,
        record: &MessageRecord,
    ) -> Result<bool, StorageError> {
        let mut inner = self.inner.lock().expect("Mutex poisoned");

        match inner.get_mut(&id) {
            Some(slot) if slot.version == expected_version => {
                *slot = Versioned { version: expected_version + 1, record: record.clone() };
                Ok(true)
            },
            _ => Ok(false),
        }
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for
    /// test code.
    #[allow(clippy::expect_used)]
    fn active_ids(&self) -> Result<Vec<MessageId>, StorageError> {
        let inner = self.inner.lock().expect("Mutex poisoned");

        Ok(inner
            .iter()
            .filter(|(_, versioned)| versioned.record.is_active)
            .map(|(id, _)| *id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(is_active: bool) -> MessageRecord {
        MessageRecord {
            envelope: vec![0u8; 28],
            created_at_millis: 0,
            expires_at_millis: 1_000,
            view_count: 0,
            max_views: 1,
            is_active,
        }
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let storage = MemoryStorage::new();
        let id = MessageId::from_bytes([1; 16]);

        storage.insert(id, &record(true)).expect("first insert");

        assert_eq!(storage.insert(id, &record(true)), Err(StorageError::Duplicate));
    }

    #[test]
    fn update_succeeds_only_on_matching_version() {
        let storage = MemoryStorage::new();
        let id = MessageId::from_bytes([2; 16]);
        storage.insert(id, &record(true)).expect("insert");

        assert!(storage.update(id, 0, &record(true)).expect("cas"));
        assert!(!storage.update(id, 0, &record(true)).expect("cas"), "stale version must lose");
        assert!(storage.update(id, 1, &record(false)).expect("cas"));

        let versioned = storage.load(id).expect("load").expect("exists");
        assert_eq!(versioned.version, 2);
        assert!(!versioned.record.is_active);
    }

    #[test]
    fn update_on_unknown_id_returns_false() {
        let storage = MemoryStorage::new();

        assert!(!storage.update(MessageId::from_bytes([3; 16]), 0, &record(true)).expect("cas"));
    }

    #[test]
    fn active_ids_skips_inactive_records() {
        let storage = MemoryStorage::new();
        let live = MessageId::from_bytes([4; 16]);
        let dead = MessageId::from_bytes([5; 16]);

        storage.insert(live, &record(true)).expect("insert");
        storage.insert(dead, &record(false)).expect("insert");

        assert_eq!(storage.active_ids().expect("scan"), vec![live]);
        assert_eq!(storage.record_count(), 2);
    }
}
