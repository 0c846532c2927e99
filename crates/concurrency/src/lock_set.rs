//! Locks held by one transaction
//!
//! The conventional response to an abort is to release everything the
//! transaction holds and start over. [`LockSet`] records each resource a
//! transaction opens so that `release_all` can close them in one call.
//! It does not retry or sleep; that policy belongs to the caller.

use crate::account::ResourceLock;
use std::sync::Arc;
use tracing::debug;
use txbed_core::{Result, TxnId};

/// Resources opened by a single transaction
#[derive(Debug)]
pub struct LockSet {
    txn: TxnId,
    held: Vec<Arc<ResourceLock>>,
}

impl LockSet {
    /// Create an empty set for `txn`
    pub fn new(txn: TxnId) -> Self {
        Self {
            txn,
            held: Vec::new(),
        }
    }

    /// Transaction owning this set
    pub fn txn(&self) -> TxnId {
        self.txn
    }

    /// Open `lock` and record it
    ///
    /// An upgrade of an already recorded lock keeps a single entry. On
    /// error nothing is recorded.
    pub fn open(&mut self, lock: &Arc<ResourceLock>, for_writing: bool) -> Result<()> {
        lock.open(self.txn, for_writing)?;
        if !self.contains(lock) {
            self.held.push(Arc::clone(lock));
        }
        Ok(())
    }

    /// Close `lock` and forget it
    pub fn close(&mut self, lock: &Arc<ResourceLock>) -> Result<()> {
        lock.close(self.txn)?;
        self.held.retain(|held| !Arc::ptr_eq(held, lock));
        Ok(())
    }

    /// Close every recorded lock, most recently opened first
    ///
    /// Stops at the first failure; locks not yet closed stay recorded.
    pub fn release_all(&mut self) -> Result<()> {
        let count = self.held.len();
        while let Some(lock) = self.held.last() {
            lock.close(self.txn)?;
            self.held.pop();
        }
        debug!(txn = %self.txn, count, "released all locks");
        Ok(())
    }

    /// Whether `lock` is recorded
    pub fn contains(&self, lock: &Arc<ResourceLock>) -> bool {
        self.held.iter().any(|held| Arc::ptr_eq(held, lock))
    }

    /// Number of recorded locks
    pub fn len(&self) -> usize {
        self.held.len()
    }

    /// Check if no lock is recorded
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}
