//! Convenient imports for transaction code.
//!
//! ```
//! use txbed::prelude::*;
//! ```

pub use crate::{
    AbortError, Error, LockSet, NoLatency, ResourceLock, Result, Role, TxnId, UsageError,
    WorkerRegistry, Workers,
};
