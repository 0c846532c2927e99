//! # txbed
//!
//! Lock-based transactional memory testbed.
//!
//! Transactions share integer accounts guarded by [`ResourceLock`]s. A
//! transaction opens an account for reading or writing, peeks, verifies or
//! updates it, and closes it. Conflicts never block: they abort at once
//! with an estimated wait taken from a [`WorkerRegistry`], and the caller
//! releases its locks and retries.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use txbed::prelude::*;
//!
//! let workers = Arc::new(Workers::new());
//! let account = ResourceLock::builder(workers.clone())
//!     .initial_value(0)
//!     .no_latency()
//!     .build();
//!
//! let x = TxnId::from_u128(1);
//! let y = TxnId::from_u128(2);
//! workers.register_fixed(x, Duration::from_millis(50));
//!
//! account.open_write(x).unwrap();
//! let err = account.open_write(y).unwrap_err();
//! assert!(err.is_retryable());
//! assert_eq!(err.estimated_wait(), Some(Duration::from_millis(50)));
//!
//! account.close(x).unwrap();
//! account.open_write(y).unwrap();
//! ```
//!
//! ## Crates
//!
//! - `txbed-core` - [`TxnId`], [`Role`] and the [`Error`] taxonomy
//! - `txbed-concurrency` - [`ResourceLock`], [`Workers`], latency hooks, [`LockSet`]

#![warn(missing_docs)]

pub mod format;
pub mod prelude;

pub use txbed_concurrency::{
    default_delay, set_default_delay, FixedLatency, Latency, LockSet, LockSnapshot, NoLatency,
    ProcessLatency, ResourceLock, ResourceLockBuilder, WorkerRegistry, Workers,
    DEFAULT_DELAY_MS,
};
pub use txbed_core::{AbortError, ConflictKind, Error, Result, Role, TxnId, UsageError};
