//! Account Protocol Test Suite
//!
//! End-to-end tests for the lock protocol through the `txbed` facade.
//!
//! ## Modules
//!
//! - `scenarios`: Reference scenarios, upgrade, stale reads
//! - `usage`: Calling-discipline violations
//! - `concurrency`: Multi-threaded contention and retry

use std::sync::Arc;
use std::sync::Once;
use txbed::prelude::*;

mod concurrency;
mod usage;

static TRACING: Once = Once::new();

/// Install a test subscriber once per binary; honours RUST_LOG
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Registry plus an account with no simulated latency
pub fn create_account(initial: i64) -> (Arc<Workers>, Arc<ResourceLock>) {
    init_tracing();
    let workers = Arc::new(Workers::new());
    let account = ResourceLock::builder(workers.clone())
        .initial_value(initial)
        .no_latency()
        .build();
    (workers, Arc::new(account))
}

/// Deterministic transaction identity
pub fn txn(n: u128) -> TxnId {
    TxnId::from_u128(n)
}
