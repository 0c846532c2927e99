//! Concurrency layer for txbed
//!
//! This crate implements the per-resource lock protocol with:
//! - ResourceLock: fail-fast read/write locking with upgrade
//! - Abort wait hints looked up in a WorkerRegistry
//! - Injectable per-operation latency to widen race windows
//! - LockSet: release-everything helper for aborted transactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod account;
pub mod latency;
pub mod lock_set;
pub mod registry;

pub use account::{LockSnapshot, ResourceLock, ResourceLockBuilder};
pub use latency::{
    default_delay, set_default_delay, FixedLatency, Latency, NoLatency, ProcessLatency,
    DEFAULT_DELAY_MS,
};
pub use lock_set::LockSet;
pub use registry::{WorkerRegistry, Workers};
