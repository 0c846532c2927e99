//! Core types for the testbed
//!
//! This module defines the identity types shared by every crate:
//! - [`TxnId`]: Identity of the transaction calling into a lock
//! - [`Role`]: Which lock roles a transaction holds on one resource

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a transaction (execution context)
///
/// Every lock operation names its caller explicitly with a TxnId rather
/// than deriving it from the current thread. This keeps the lock protocol
/// independent of the concurrency primitive driving the transaction and
/// lets a single thread play several transactions in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxnId(Uuid);

impl TxnId {
    /// Create a new random TxnId using UUID v4
    ///
    /// # Examples
    ///
    /// ```
    /// use txbed_core::TxnId;
    ///
    /// let a = TxnId::new();
    /// let b = TxnId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        TxnId(Uuid::new_v4())
    }

    /// Create a TxnId from a fixed number
    ///
    /// Deterministic, so tests and simulations can name transactions.
    ///
    /// # Examples
    ///
    /// ```
    /// use txbed_core::TxnId;
    ///
    /// assert_eq!(TxnId::from_u128(7), TxnId::from_u128(7));
    /// assert_ne!(TxnId::from_u128(7), TxnId::from_u128(8));
    /// ```
    pub const fn from_u128(n: u128) -> Self {
        TxnId(Uuid::from_u128(n))
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TxnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TxnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Roles a transaction holds on a single resource
///
/// `Upgraded` is the only state in which one transaction is both writer
/// and reader: it opened for reading while alone, then opened for writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// No lock held
    None,
    /// Shared holder
    Reader,
    /// Exclusive holder
    Writer,
    /// Writer promoted from sole reader
    Upgraded,
}

impl Role {
    /// Whether this role includes reader membership
    pub fn is_reader(&self) -> bool {
        matches!(self, Role::Reader | Role::Upgraded)
    }

    /// Whether this role includes the writer role
    pub fn is_writer(&self) -> bool {
        matches!(self, Role::Writer | Role::Upgraded)
    }

    /// Whether any lock is held
    pub fn holds_any(&self) -> bool {
        !matches!(self, Role::None)
    }
}
