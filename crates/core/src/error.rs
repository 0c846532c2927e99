//! Error types for the lock protocol
//!
//! Lock operations fail in exactly two expected ways:
//!
//! | Kind | Meaning | Caller response |
//! |------|---------|-----------------|
//! | [`UsageError`] | Calling discipline violated | Fatal bug, never retry |
//! | [`AbortError`] | Contention with another transaction | Release all, back off, retry |
//!
//! [`Error::Internal`] covers invariant breaches inside the testbed itself,
//! such as a recorded writer missing from the worker registry.

use crate::types::TxnId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Protocol discipline violation by the calling transaction
///
/// Each variant names the rule that was broken. Lock state is never
/// changed by a call that returns a usage error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsageError {
    /// Peek issued while already holding a lock on the same resource
    #[error("transaction {0} peeked while holding a lock on the resource")]
    PeekWhileHolding(TxnId),

    /// Write open issued by the current writer
    #[error("transaction {0} is already the writer")]
    AlreadyWriter(TxnId),

    /// Read open issued by a current reader or writer
    #[error("transaction {0} already holds a lock on the resource")]
    AlreadyHolding(TxnId),

    /// Verify issued without reader membership
    #[error("transaction {0} verified without a read lock")]
    NotReader(TxnId),

    /// Update issued without the writer role
    #[error("transaction {0} updated without the write lock")]
    NotWriter(TxnId),

    /// Close issued while holding nothing
    #[error("transaction {0} closed without holding a lock")]
    NotHolding(TxnId),
}

impl UsageError {
    /// The transaction that broke the protocol
    pub fn txn(&self) -> TxnId {
        match *self {
            UsageError::PeekWhileHolding(t)
            | UsageError::AlreadyWriter(t)
            | UsageError::AlreadyHolding(t)
            | UsageError::NotReader(t)
            | UsageError::NotWriter(t)
            | UsageError::NotHolding(t) => t,
        }
    }
}

/// Shape of the conflict that caused an abort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictKind {
    /// Write requested while another writer holds the resource
    WriteWrite,
    /// Write requested while other readers hold the resource
    ReadWrite,
    /// Read requested while a writer holds the resource
    WriteRead,
    /// Value changed since the reader observed it
    StaleRead,
}

/// A legitimate concurrency conflict
///
/// Carries a backoff hint: the remaining time of the transaction holding
/// the conflicting write lock. The hint is zero when no writer was
/// involved (reader-only write conflicts) and for stale reads, where the
/// offending writer has already released and is not tracked. The
/// stale-read zero is a deliberately coarse estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("transaction aborted ({kind:?}), estimated wait {estimated_wait:?}")]
pub struct AbortError {
    /// Conflict shape
    pub kind: ConflictKind,
    /// Suggested backoff before retrying
    pub estimated_wait: Duration,
}

impl AbortError {
    /// Create an abort with the given conflict shape and wait hint
    pub fn new(kind: ConflictKind, estimated_wait: Duration) -> Self {
        Self {
            kind,
            estimated_wait,
        }
    }

    /// Stale read abort, always with a zero wait hint
    pub fn stale_read() -> Self {
        Self::new(ConflictKind::StaleRead, Duration::ZERO)
    }
}

/// All lock protocol errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Caller protocol bug
    #[error("usage error: {0}")]
    Usage(#[from] UsageError),

    /// Contention, retry the whole transaction
    #[error("abort: {0}")]
    Abort(#[from] AbortError),

    /// Internal error (bug or invariant violation)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for lock operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is retryable.
    ///
    /// Only aborts are retryable; usage errors and internal errors are bugs.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Abort(_))
    }

    /// Check if this is a usage error.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }

    /// Check if this is a serious/unrecoverable error.
    pub fn is_serious(&self) -> bool {
        matches!(self, Error::Internal(_))
    }

    /// Backoff hint carried by an abort
    pub fn estimated_wait(&self) -> Option<Duration> {
        match self {
            Error::Abort(abort) => Some(abort.estimated_wait),
            _ => None,
        }
    }
}
