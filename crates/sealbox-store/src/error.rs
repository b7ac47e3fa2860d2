//! Store and storage error types.
//!
//! Two layers: [`StorageError`] for backend failures (duplicate keys,
//! serialization, I/O) and [`StoreError`] for the lifecycle operations
//! built on top. Backend errors convert upward; nothing converts down.

use thiserror::Error;

/// Errors from storage backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Insert hit a message id that already exists.
    #[error("duplicate message id")]
    Duplicate,

    /// Encoding or decoding a stored record failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Underlying database or file system error.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors surfaced by [`MessageStore`](crate::MessageStore) operations.
///
/// `NotFound` covers "never existed", "expired by time", and "view quota
/// exhausted" as one undifferentiated outcome, so a probing caller learns
/// nothing about whether an id was ever valid or when it died. Do not
/// split it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Unknown id, or the record is no longer active.
    #[error("message not found")]
    NotFound,

    /// Rejected creation parameter.
    #[error("invalid lifecycle parameter: {0}")]
    InvalidLifecycleParameter(&'static str),

    /// Message id text is not 32 hex characters.
    #[error("invalid message id")]
    InvalidId,

    /// OS entropy source failed while drawing a message id.
    #[error("entropy source unavailable")]
    EntropyUnavailable,

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
