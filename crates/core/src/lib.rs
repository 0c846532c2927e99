//! Core types for txbed
//!
//! This crate defines the vocabulary shared by the lock protocol:
//! - [`TxnId`]: explicit transaction identity passed into every operation
//! - [`Role`]: roles held on a resource
//! - [`Error`]: usage errors, aborts and internal failures

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;

pub use error::{AbortError, ConflictKind, Error, Result, UsageError};
pub use types::{Role, TxnId};
