//! Message store: creation, view-consuming retrieval, expiry sweep.

use std::time::Duration;

use sealbox_crypto::Envelope;

use crate::{
    clock::Clock,
    error::{StorageError, StoreError},
    lifecycle::{self, RetrieveDecision},
    record::{MessageId, MessageRecord},
    storage::Storage,
};

/// Owns message lifecycle on top of a [`Storage`] backend and a [`Clock`].
///
/// Cheap to clone; clones share the backend. The store never decrypts:
/// envelopes pass through as opaque bytes, and keys never reach this
/// type.
#[derive(Clone)]
pub struct MessageStore<S: Storage, C: Clock> {
    storage: S,
    clock: C,
}

impl<S: Storage, C: Clock> MessageStore<S, C> {
    /// Create a store over the given backend and time source.
    pub fn new(storage: S, clock: C) -> Self {
        Self { storage, clock }
    }

    /// Store an envelope with a validity window and a view quota,
    /// returning the fresh message id.
    ///
    /// # Errors
    ///
    /// - `InvalidLifecycleParameter`: zero `expiry` or zero `max_views`
    /// - `EntropyUnavailable`: the OS random source failed while drawing
    ///   an id
    pub fn create(
        &self,
        envelope: &Envelope,
        expiry: Duration,
        max_views: u32,
    ) -> Result<MessageId, StoreError> {
        if expiry.is_zero() {
            return Err(StoreError::InvalidLifecycleParameter("expiry must be positive"));
        }
        if max_views == 0 {
            return Err(StoreError::InvalidLifecycleParameter("max_views must be at least 1"));
        }

        let now = self.clock.now_millis();
        let expiry_millis = u64::try_from(expiry.as_millis()).unwrap_or(u64::MAX);
        let record = MessageRecord {
            envelope: envelope.encode(),
            created_at_millis: now,
            expires_at_millis: now.saturating_add(expiry_millis),
            view_count: 0,
            max_views,
            is_active: true,
        };

        // A 128-bit random id collides with negligible probability; the
        // duplicate check in `insert` still closes the window.
        loop {
            let id = MessageId::generate()?;
            match self.storage.insert(id, &record) {
                Ok(()) => {
                    tracing::debug!(%id, max_views, "message created");
                    return Ok(id);
                },
                Err(StorageError::Duplicate) => {},
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Retrieve a message's envelope, consuming one view.
    ///
    /// The expiry re-check, the view-count increment, and any
    /// deactivation execute as one atomic step per record: the decision
    /// is computed on a versioned snapshot and written back with a
    /// compare-and-swap, retrying on interference. Two concurrent
    /// retrievals of a one-view message therefore cannot both succeed.
    ///
    /// # Errors
    ///
    /// `NotFound` when the id is unknown, the record was already
    /// inactive, or this call observed the expiry. The three causes are
    /// deliberately indistinguishable.
    pub fn retrieve(&self, id: MessageId) -> Result<Envelope, StoreError> {
        loop {
            let Some(versioned) = self.storage.load(id)? else {
                return Err(StoreError::NotFound);
            };

            match lifecycle::on_retrieve(&versioned.record, self.clock.now_millis()) {
                RetrieveDecision::Reject => return Err(StoreError::NotFound),
                RetrieveDecision::Expire(expired) => {
                    if self.storage.update(id, versioned.version, &expired)? {
                        tracing::debug!(%id, "message expired at read");
                        return Err(StoreError::NotFound);
                    }
                    // Lost the race; re-observe.
                },
                RetrieveDecision::Serve(viewed) => {
                    if self.storage.update(id, versioned.version, &viewed)? {
                        tracing::debug!(%id, view_count = viewed.view_count, "message retrieved");
                        return decode_envelope(&viewed.envelope);
                    }
                },
            }
        }
    }

    /// Deactivate every active record whose validity window has passed.
    ///
    /// Returns the number of records flipped by this call. Idempotent:
    /// a second sweep with no intervening activity flips nothing.
    /// Records deactivated by a concurrent retrieval lose the CAS here
    /// and are not re-counted.
    ///
    /// # Errors
    ///
    /// `Storage` on backend failure; partial sweeps are fine, the next
    /// sweep picks up where this one stopped.
    pub fn sweep_expired(&self) -> Result<u64, StoreError> {
        let mut swept = 0u64;

        for id in self.storage.active_ids()? {
            loop {
                let Some(versioned) = self.storage.load(id)? else {
                    break;
                };
                let Some(expired) = lifecycle::on_sweep(&versioned.record, self.clock.now_millis())
                else {
                    break;
                };
                if self.storage.update(id, versioned.version, &expired)? {
                    swept += 1;
                    break;
                }
                // CAS lost to a concurrent writer; re-observe this record.
            }
        }

        if swept > 0 {
            tracing::info!(swept, "expired messages deactivated");
        }

        Ok(swept)
    }
}

/// Decode stored envelope bytes.
///
/// Stored bytes were produced by `Envelope::encode` at creation, so a
/// decode failure here means the backend corrupted the value.
fn decode_envelope(bytes: &[u8]) -> Result<Envelope, StoreError> {
    Envelope::decode(bytes)
        .map_err(|e| StoreError::Storage(StorageError::Serialization(e.to_string())))
}
