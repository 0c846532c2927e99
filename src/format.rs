//! Presentation helpers for account values
//!
//! Read-only formatting for result tables. Values are read with
//! [`ResourceLock::snapshot_value`], outside any transaction.

use std::fmt;
use txbed_concurrency::ResourceLock;

/// Default number of letters in the indirection alphabet
pub const NUM_LETTERS: i64 = 26;

/// Width of the wide value column
pub const WIDE_COLUMN: usize = 11;

/// Value right-aligned in an 11-character column
///
/// ```
/// use txbed::format::Wide;
///
/// assert_eq!(Wide(42).to_string(), "         42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wide(pub i64);

impl fmt::Display for Wide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>width$}", self.0, width = WIDE_COLUMN)
    }
}

/// Value reduced modulo the letter count, as two zero-padded digits
///
/// Reduction is Euclidean, so negative values land in `0..letters`.
///
/// ```
/// use txbed::format::Indirection;
///
/// assert_eq!(Indirection::new(29).to_string(), "03");
/// assert_eq!(Indirection::new(-1).to_string(), "25");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indirection {
    value: i64,
    letters: i64,
}

impl Indirection {
    /// Reduce by [`NUM_LETTERS`]
    pub fn new(value: i64) -> Self {
        Self::with_letters(value, NUM_LETTERS)
    }

    /// Reduce by a custom letter count
    ///
    /// # Panics
    ///
    /// Panics if `letters` is zero or negative.
    pub fn with_letters(value: i64, letters: i64) -> Self {
        assert!(letters > 0, "letter count must be positive");
        Self { value, letters }
    }

    /// Index into the alphabet
    pub fn index(&self) -> i64 {
        self.value.rem_euclid(self.letters)
    }
}

impl fmt::Display for Indirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.index())
    }
}

/// Wide column for the account's current value
pub fn wide(account: &ResourceLock) -> Wide {
    Wide(account.snapshot_value())
}

/// Indirection column for the account's current value
pub fn indirection(account: &ResourceLock) -> Indirection {
    Indirection::new(account.snapshot_value())
}

/// One row of wide columns, one per account
pub fn wide_row<'a>(accounts: impl IntoIterator<Item = &'a ResourceLock>) -> String {
    accounts
        .into_iter()
        .map(|account| wide(account).to_string())
        .collect()
}
