//! Worker registry for abort-cost lookup
//!
//! When a lock request conflicts with a writer, the abort carries the
//! writer's estimated remaining time so the caller can size its backoff.
//! The lock does not own this information; it asks a [`WorkerRegistry`]
//! supplied at construction.
//!
//! # Design
//!
//! - DashMap: sharded, so lookups from many resources never serialize
//! - Lookups happen inside a resource's critical section, so a registry
//!   must never call back into a `ResourceLock`

use dashmap::DashMap;
use std::time::{Duration, Instant};
use txbed_core::TxnId;

/// Source of remaining-time estimates for in-flight transactions
pub trait WorkerRegistry: Send + Sync {
    /// Remaining execution time of `txn`, or `None` if it is not registered
    fn remaining_time(&self, txn: TxnId) -> Option<Duration>;
}

/// How a registered worker's remaining time is computed
#[derive(Debug, Clone, Copy)]
enum WorkerEntry {
    /// Estimate measured from registration time
    Deadline { started: Instant, estimate: Duration },
    /// Constant answer
    Fixed(Duration),
}

impl WorkerEntry {
    fn remaining(&self) -> Duration {
        match *self {
            WorkerEntry::Deadline { started, estimate } => {
                estimate.saturating_sub(started.elapsed())
            }
            WorkerEntry::Fixed(remaining) => remaining,
        }
    }
}

/// In-memory registry of running transactions
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use txbed_concurrency::{WorkerRegistry, Workers};
/// use txbed_core::TxnId;
///
/// let workers = Workers::new();
/// let txn = TxnId::from_u128(1);
/// workers.register_fixed(txn, Duration::from_millis(40));
/// assert_eq!(workers.remaining_time(txn), Some(Duration::from_millis(40)));
/// ```
#[derive(Debug, Default)]
pub struct Workers {
    entries: DashMap<TxnId, WorkerEntry>,
}

impl Workers {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Register `txn` with an estimated total run time starting now
    ///
    /// Remaining time counts down from `estimate` and saturates at zero.
    /// Re-registering replaces the previous entry.
    pub fn register(&self, txn: TxnId, estimate: Duration) {
        self.entries.insert(
            txn,
            WorkerEntry::Deadline {
                started: Instant::now(),
                estimate,
            },
        );
    }

    /// Register `txn` with a constant remaining time
    pub fn register_fixed(&self, txn: TxnId, remaining: Duration) {
        self.entries.insert(txn, WorkerEntry::Fixed(remaining));
    }

    /// Remove `txn`, returning whether it was registered
    pub fn deregister(&self, txn: TxnId) -> bool {
        self.entries.remove(&txn).is_some()
    }

    /// Number of registered transactions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no transaction is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl WorkerRegistry for Workers {
    fn remaining_time(&self, txn: TxnId) -> Option<Duration> {
        self.entries.get(&txn).map(|entry| entry.remaining())
    }
}
