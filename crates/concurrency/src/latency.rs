//! Simulated per-operation latency
//!
//! Every [`ResourceLock`](crate::ResourceLock) operation pauses once before
//! entering its critical section. The pause widens the interleaving window
//! so that conflicts show up reliably under real threads. It has no effect
//! on protocol semantics; tests use [`NoLatency`] for determinism.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

/// Default process-wide delay per operation, in milliseconds
pub const DEFAULT_DELAY_MS: u64 = 100;

static DEFAULT_DELAY_NANOS: AtomicU64 = AtomicU64::new(DEFAULT_DELAY_MS * 1_000_000);

/// Set the process-wide delay used by [`ProcessLatency`]
///
/// Takes effect on the next operation of every lock built with
/// `ProcessLatency`, including locks created before the call.
pub fn set_default_delay(delay: Duration) {
    let nanos = u64::try_from(delay.as_nanos()).unwrap_or(u64::MAX);
    DEFAULT_DELAY_NANOS.store(nanos, Ordering::Relaxed);
}

/// Current process-wide delay
pub fn default_delay() -> Duration {
    Duration::from_nanos(DEFAULT_DELAY_NANOS.load(Ordering::Relaxed))
}

/// Injectable latency hook, called once at the start of each lock operation
pub trait Latency: Send + Sync {
    /// Suspend the calling context for the simulated latency
    fn pause(&self);
}

/// Sleeps for the process-wide delay, read at every pause
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLatency;

impl Latency for ProcessLatency {
    fn pause(&self) {
        let delay = default_delay();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

/// Sleeps for a per-instance fixed delay
#[derive(Debug, Clone, Copy)]
pub struct FixedLatency(pub Duration);

impl Latency for FixedLatency {
    fn pause(&self) {
        if !self.0.is_zero() {
            thread::sleep(self.0);
        }
    }
}

/// Never pauses
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLatency;

impl Latency for NoLatency {
    fn pause(&self) {}
}
