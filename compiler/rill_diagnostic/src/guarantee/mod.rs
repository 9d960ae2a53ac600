//! Type-level proof that at least one error diagnostic was emitted.
//!
//! A phase that fails must have told the user why. Returning
//! `Result<T, ErrorGuaranteed>` makes "failed silently" unrepresentable:
//! the only ways to obtain an [`ErrorGuaranteed`] are to emit an error
//! through a queue or to prove a nonzero error count.

use std::fmt;

/// Proof that at least one error diagnostic was emitted.
///
/// Cannot be constructed outside this crate except through
/// [`ErrorGuaranteed::from_error_count`], which requires a nonzero count.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    /// Mint a guarantee. Only callable from queue internals that have
    /// just recorded an error.
    pub(crate) fn new() -> Self {
        ErrorGuaranteed(())
    }

    /// Obtain a guarantee from an observed error count.
    ///
    /// Returns `None` when the count is zero.
    pub fn from_error_count(count: usize) -> Option<Self> {
        (count > 0).then(ErrorGuaranteed::new)
    }
}

impl fmt::Display for ErrorGuaranteed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error(s) emitted")
    }
}

impl std::error::Error for ErrorGuaranteed {}
