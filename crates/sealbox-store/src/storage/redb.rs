//! Redb-backed durable storage implementation.
//!
//! Uses Redb's ACID transactions with Copy-on-Write for crash safety.
//! The version check and the write-back in [`Storage::update`] happen
//! inside a single write transaction, and Redb serializes writers, so
//! the compare-and-swap is atomic per record. All state survives
//! restarts.

use std::{path::Path, sync::Arc};

use redb::{Database, ReadableTable, TableDefinition};

use super::Storage;
use crate::{
    error::StorageError,
    record::{MessageId, MessageRecord, Versioned},
};

/// Table: messages
/// Key: message id bytes [16 bytes]
/// Value: CBOR-encoded Versioned record
const MESSAGES: TableDefinition<&[u8], &[u8]> = TableDefinition::new("messages");

/// Durable storage backed by Redb.
///
/// Thread-safe through Redb's internal locking. Clone is cheap (Arc).
#[derive(Clone)]
pub struct RedbStorage {
    db: Arc<Database>,
}

impl RedbStorage {
    /// Open or create a Redb database at the given path.
    ///
    /// Creates the MESSAGES table if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the database cannot be opened or
    /// created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = Database::create(path.as_ref()).map_err(|e| StorageError::Io(e.to_string()))?;

        let txn = db.begin_write().map_err(|e| StorageError::Io(e.to_string()))?;
        {
            let _ = txn.open_table(MESSAGES).map_err(|e| StorageError::Io(e.to_string()))?;
        }
        txn.commit().map_err(|e| StorageError::Io(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }
}

fn encode_value(value: &Versioned) -> Result<Vec<u8>, StorageError> {
    let mut bytes = Vec::new();
    ciborium::into_writer(value, &mut bytes)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    Ok(bytes)
}

fn decode_value(bytes: &[u8]) -> Result<Versioned, StorageError> {
    ciborium::from_reader(bytes).map_err(|e| StorageError::Serialization(e.to_string()))
}

impl Storage for RedbStorage {
    fn insert(&self, id: MessageId, record: &MessageRecord) -> Result<(), StorageError> {
        let txn = self.db.begin_write().map_err(|e| StorageError::Io(e.to_string()))?;

        {
            let mut table =
                txn.open_table(MESSAGES).map_err(|e| StorageError::Io(e.to_string()))?;

            let exists = table
                .get(id.as_bytes().as_slice())
                .map_err(|e| StorageError::Io(e.to_string()))?
                .is_some();
            if exists {
                // Dropping the transaction aborts it; nothing was written.
                return Err(StorageError::Duplicate);
            }

            let bytes = encode_value(&Versioned { version: 0, record: record.clone() })?;
            table
                .insert(id.as_bytes().as_slice(), bytes.as_slice())
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }

        txn.commit().map_err(|e| StorageError::Io(e.to_string()))?;

        Ok(())
    }

    fn load(&self, id: MessageId) -> Result<Option<Versioned>, StorageError> {
        let txn = self.db.begin_read().map_err(|e| StorageError::Io(e.to_string()))?;
        let table = txn.open_table(MESSAGES).map_err(|e| StorageError::Io(e.to_string()))?;

        let guard =
            table.get(id.as_bytes().as_slice()).map_err(|e| StorageError::Io(e.to_string()))?;

        match guard {
            Some(bytes) => Ok(Some(decode_value(bytes.value())?)),
            None => Ok(None),
        }
    }

    fn update(
        &self,
        id: MessageId,
        expected_version: u64,
        record: &MessageRecord,
    ) -> Result<bool, StorageError> {
        let txn = self.db.begin_write().map_err(|e| StorageError::Io(e.to_string()))?;

        {
            let mut table =
                txn.open_table(MESSAGES).map_err(|e| StorageError::Io(e.to_string()))?;

            let current = {
                let guard = table
                    .get(id.as_bytes().as_slice())
                    .map_err(|e| StorageError::Io(e.to_string()))?;
                match guard {
                    Some(bytes) => decode_value(bytes.value())?,
                    None => return Ok(false),
                }
            };

            if current.version != expected_version {
                return Ok(false);
            }

            let bytes =
                encode_value(&Versioned { version: expected_version + 1, record: record.clone() })?;
            table
                .insert(id.as_bytes().as_slice(), bytes.as_slice())
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }

        txn.commit().map_err(|e| StorageError::Io(e.to_string()))?;

        Ok(true)
    }

    fn active_ids(&self) -> Result<Vec<MessageId>, StorageError> {
        let txn = self.db.begin_read().map_err(|e| StorageError::Io(e.to_string()))?;
        let table = txn.open_table(MESSAGES).map_err(|e| StorageError::Io(e.to_string()))?;

        let mut ids = Vec::new();
        for entry in table.iter().map_err(|e| StorageError::Io(e.to_string()))? {
            let (key, value) = entry.map_err(|e| StorageError::Io(e.to_string()))?;

            let versioned = decode_value(value.value())?;
            if !versioned.record.is_active {
                continue;
            }

            let bytes: [u8; 16] = key
                .value()
                .try_into()
                .map_err(|_| StorageError::Serialization("message key is not 16 bytes".into()))?;
            ids.push(MessageId::from_bytes(bytes));
        }

        Ok(ids)
    }
}
