//! Per-record lifecycle state machine.
//!
//! Pure functions over record snapshots: no I/O, no clock reads, no
//! shared state. Each function returns the record to write back (if any);
//! [`MessageStore`](crate::MessageStore) applies that write through an
//! atomic compare-and-swap so concurrent operations on the same record
//! serialize.
//!
//! State machine per record:
//!
//! ```text
//! Active(view_count, max_views, expires_at) ──► Expired (terminal)
//! ```
//!
//! The transition fires on whichever trigger comes first: a retrieval
//! observing `now >= expires_at`, a retrieval incrementing `view_count`
//! to `max_views`, or a sweep. There is no transition out of `Expired`.

use crate::record::MessageRecord;

/// Outcome of a retrieval attempt against one record snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrieveDecision {
    /// Record is already inactive. Reported as not-found, same as an id
    /// that never existed.
    Reject,

    /// Validity window has passed. Write back the deactivated record,
    /// then report not-found.
    Expire(MessageRecord),

    /// Serve the envelope after writing back the incremented view count.
    /// When the increment reaches the quota the record deactivates, but
    /// the caller that exhausted it still receives the content.
    Serve(MessageRecord),
}

/// Decide what a retrieval at `now_millis` does to `record`.
pub fn on_retrieve(record: &MessageRecord, now_millis: u64) -> RetrieveDecision {
    if !record.is_active {
        return RetrieveDecision::Reject;
    }

    if now_millis >= record.expires_at_millis {
        let mut expired = record.clone();
        expired.is_active = false;
        return RetrieveDecision::Expire(expired);
    }

    let mut viewed = record.clone();
    viewed.view_count += 1;
    if viewed.view_count >= viewed.max_views {
        viewed.is_active = false;
    }

    RetrieveDecision::Serve(viewed)
}

/// Decide whether a sweep at `now_millis` deactivates `record`.
///
/// Returns the deactivated record, or `None` when the record is still
/// inside its validity window or already inactive. Already-inactive
/// records return `None` so a concurrent retrieval that flipped the flag
/// first is not double-counted.
pub fn on_sweep(record: &MessageRecord, now_millis: u64) -> Option<MessageRecord> {
    if record.is_active && now_millis >= record.expires_at_millis {
        let mut expired = record.clone();
        expired.is_active = false;
        Some(expired)
    } else {
        None
    }
}
