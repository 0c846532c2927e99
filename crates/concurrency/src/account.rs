//! Per-resource lock protocol
//!
//! A [`ResourceLock`] guards one integer account and records which
//! transactions hold it. Requests never wait: a conflicting request is
//! turned into an [`AbortError`] immediately, carrying enough information
//! for the caller to decide how long to back off.
//!
//! ## Admission rules
//!
//! | Request | Granted when | Otherwise |
//! |---------|--------------|-----------|
//! | read | no writer | abort, wait = writer's remaining time |
//! | write | no writer and readers ⊆ {caller} | abort, wait = writer's remaining time or zero |
//!
//! A caller that is the sole reader may open for writing without closing
//! first (upgrade). It then holds both roles until `close`.
//!
//! ## State machine
//!
//! ```text
//! (none, {})  --open read T-->   (none, {T, ..})
//! (none, {})  --open write T-->  (T, {})
//! (none, {T}) --open write T-->  (T, {T})      upgrade
//! (T, R)      --update T-->      (T, R)        value changes only
//! any         --close T-->       T removed from writer and readers
//! ```
//!
//! Each operation pauses for the injected latency, then runs its check and
//! mutation under one critical section. Errors leave the state untouched.

use crate::latency::{Latency, ProcessLatency};
use crate::registry::WorkerRegistry;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};
use txbed_core::{AbortError, ConflictKind, Error, Result, Role, TxnId, UsageError};

/// Holder state, only touched under the resource mutex
#[derive(Debug, Default)]
struct LockState {
    value: i64,
    writer: Option<TxnId>,
    readers: FxHashSet<TxnId>,
}

impl LockState {
    fn role(&self, txn: TxnId) -> Role {
        match (self.writer == Some(txn), self.readers.contains(&txn)) {
            (true, true) => Role::Upgraded,
            (true, false) => Role::Writer,
            (false, true) => Role::Reader,
            (false, false) => Role::None,
        }
    }
}

/// Point-in-time view of who holds a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSnapshot {
    /// Exclusive holder, if any
    pub writer: Option<TxnId>,
    /// Shared holders, sorted
    pub readers: Vec<TxnId>,
}

impl LockSnapshot {
    /// Resting state: no writer and no readers
    pub fn is_idle(&self) -> bool {
        self.writer.is_none() && self.readers.is_empty()
    }
}

/// Lock-guarded account shared between transactions
///
/// # Thread Safety
///
/// `ResourceLock` is `Send + Sync`; share it with `Arc`. Operations on the
/// same instance are serialized by an internal mutex. Operations on
/// different instances never contend.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use txbed_concurrency::{NoLatency, ResourceLock, Workers};
/// use txbed_core::TxnId;
///
/// let account = ResourceLock::builder(Arc::new(Workers::new()))
///     .initial_value(10)
///     .latency(NoLatency)
///     .build();
///
/// let x = TxnId::from_u128(1);
/// account.open_write(x).unwrap();
/// account.update(x, 20).unwrap();
/// account.close(x).unwrap();
/// assert_eq!(account.snapshot_value(), 20);
/// ```
pub struct ResourceLock {
    state: Mutex<LockState>,
    registry: Arc<dyn WorkerRegistry>,
    latency: Arc<dyn Latency>,
}

impl ResourceLock {
    /// Create a lock with the process-wide latency
    pub fn new(initial_value: i64, registry: Arc<dyn WorkerRegistry>) -> Self {
        Self::builder(registry).initial_value(initial_value).build()
    }

    /// Create a builder for lock configuration
    pub fn builder(registry: Arc<dyn WorkerRegistry>) -> ResourceLockBuilder {
        ResourceLockBuilder::new(registry)
    }

    /// Read the value without taking a lock
    ///
    /// Peeks belong before opening this resource; a caller already holding
    /// a role here gets a usage error. Peeking while another transaction
    /// holds the resource is allowed and gives no isolation.
    pub fn peek(&self, txn: TxnId) -> Result<i64> {
        self.latency.pause();
        let state = self.state.lock();
        if state.role(txn).holds_any() {
            return Err(self.usage(UsageError::PeekWhileHolding(txn)));
        }
        Ok(state.value)
    }

    /// Open the resource for reading or writing
    ///
    /// # Errors
    ///
    /// - `Error::Usage` if the caller already holds an incompatible role
    /// - `Error::Abort` on conflict with another holder
    /// - `Error::Internal` if a conflicting writer is unknown to the registry
    pub fn open(&self, txn: TxnId, for_writing: bool) -> Result<()> {
        self.latency.pause();
        let mut state = self.state.lock();
        if for_writing {
            self.open_write_locked(&mut state, txn)
        } else {
            self.open_read_locked(&mut state, txn)
        }
    }

    /// Shorthand for `open(txn, false)`
    pub fn open_read(&self, txn: TxnId) -> Result<()> {
        self.open(txn, false)
    }

    /// Shorthand for `open(txn, true)`
    pub fn open_write(&self, txn: TxnId) -> Result<()> {
        self.open(txn, true)
    }

    fn open_write_locked(&self, state: &mut LockState, txn: TxnId) -> Result<()> {
        if state.writer == Some(txn) {
            return Err(self.usage(UsageError::AlreadyWriter(txn)));
        }
        let readers = state.readers.len();
        if let Some(writer) = state.writer {
            let wait = self.writer_wait(writer)?;
            return Err(self.conflict(txn, ConflictKind::WriteWrite, wait));
        }
        if readers > 1 || (readers == 1 && !state.readers.contains(&txn)) {
            return Err(self.conflict(txn, ConflictKind::ReadWrite, Duration::ZERO));
        }
        state.writer = Some(txn);
        debug!(txn = %txn, upgrade = readers == 1, "write lock granted");
        Ok(())
    }

    fn open_read_locked(&self, state: &mut LockState, txn: TxnId) -> Result<()> {
        if state.role(txn).holds_any() {
            return Err(self.usage(UsageError::AlreadyHolding(txn)));
        }
        if let Some(writer) = state.writer {
            let wait = self.writer_wait(writer)?;
            return Err(self.conflict(txn, ConflictKind::WriteRead, wait));
        }
        state.readers.insert(txn);
        debug!(txn = %txn, readers = state.readers.len(), "read lock granted");
        Ok(())
    }

    /// Check that the value still equals what the reader observed
    ///
    /// Aborts with a zero wait hint if another transaction committed a
    /// write in between; no holder is tracked once that writer released.
    pub fn verify(&self, txn: TxnId, expected: i64) -> Result<()> {
        self.latency.pause();
        let state = self.state.lock();
        if !state.readers.contains(&txn) {
            return Err(self.usage(UsageError::NotReader(txn)));
        }
        if state.value != expected {
            debug!(txn = %txn, expected, actual = state.value, "stale read");
            return Err(AbortError::stale_read().into());
        }
        Ok(())
    }

    /// Overwrite the value; caller must be the writer
    pub fn update(&self, txn: TxnId, new_value: i64) -> Result<()> {
        self.latency.pause();
        let mut state = self.state.lock();
        if state.writer != Some(txn) {
            return Err(self.usage(UsageError::NotWriter(txn)));
        }
        state.value = new_value;
        Ok(())
    }

    /// Release every role the caller holds on this resource
    pub fn close(&self, txn: TxnId) -> Result<()> {
        self.latency.pause();
        let mut state = self.state.lock();
        let role = state.role(txn);
        if !role.holds_any() {
            return Err(self.usage(UsageError::NotHolding(txn)));
        }
        if role.is_writer() {
            state.writer = None;
        }
        if role.is_reader() {
            state.readers.remove(&txn);
        }
        debug!(txn = %txn, role = ?role, "lock released");
        Ok(())
    }

    /// Roles `txn` currently holds
    pub fn role(&self, txn: TxnId) -> Role {
        self.state.lock().role(txn)
    }

    /// Current holders, without pausing
    pub fn holders(&self) -> LockSnapshot {
        let state = self.state.lock();
        let mut readers: Vec<TxnId> = state.readers.iter().copied().collect();
        readers.sort();
        LockSnapshot {
            writer: state.writer,
            readers,
        }
    }

    /// Current value, without pausing or protocol checks
    ///
    /// Debug and presentation access only; not part of any transaction.
    pub fn snapshot_value(&self) -> i64 {
        self.state.lock().value
    }

    fn writer_wait(&self, writer: TxnId) -> Result<Duration> {
        self.registry.remaining_time(writer).ok_or_else(|| {
            error!(writer = %writer, "lock writer missing from worker registry");
            Error::Internal(format!("writer {} missing from worker registry", writer))
        })
    }

    fn conflict(&self, txn: TxnId, kind: ConflictKind, wait: Duration) -> Error {
        debug!(
            txn = %txn,
            kind = ?kind,
            wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
            "lock conflict"
        );
        AbortError::new(kind, wait).into()
    }

    fn usage(&self, err: UsageError) -> Error {
        warn!(error = %err, "lock protocol misuse");
        err.into()
    }
}

impl fmt::Debug for ResourceLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ResourceLock")
            .field("value", &state.value)
            .field("writer", &state.writer)
            .field("readers", &state.readers.len())
            .finish()
    }
}

/// Builder for [`ResourceLock`]
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use txbed_concurrency::{FixedLatency, ResourceLock, Workers};
///
/// let account = ResourceLock::builder(Arc::new(Workers::new()))
///     .initial_value(5)
///     .latency(FixedLatency(Duration::from_millis(1)))
///     .build();
/// assert_eq!(account.snapshot_value(), 5);
/// ```
pub struct ResourceLockBuilder {
    initial_value: i64,
    registry: Arc<dyn WorkerRegistry>,
    latency: Arc<dyn Latency>,
}

impl ResourceLockBuilder {
    /// Start from value zero and the process-wide latency
    pub fn new(registry: Arc<dyn WorkerRegistry>) -> Self {
        Self {
            initial_value: 0,
            registry,
            latency: Arc::new(ProcessLatency),
        }
    }

    /// Initial guarded value
    pub fn initial_value(mut self, value: i64) -> Self {
        self.initial_value = value;
        self
    }

    /// Registry consulted for abort wait hints
    pub fn registry(mut self, registry: Arc<dyn WorkerRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Per-instance latency hook
    pub fn latency(mut self, latency: impl Latency + 'static) -> Self {
        self.latency = Arc::new(latency);
        self
    }

    /// Disable simulated latency
    pub fn no_latency(self) -> Self {
        self.latency(crate::latency::NoLatency)
    }

    /// Build the lock in its resting state
    pub fn build(self) -> ResourceLock {
        ResourceLock {
            state: Mutex::new(LockState {
                value: self.initial_value,
                ..LockState::default()
            }),
            registry: self.registry,
            latency: self.latency,
        }
    }
}
