//! Buffer error type.
//!
//! The buffer API has exactly one recoverable failure: a byte offset or line
//! number outside the current document bounds. Allocation failure is not
//! modeled — there is no strategy for editing without memory, so it aborts.

use std::fmt;

/// A requested offset or line number exceeded the current document bounds.
///
/// Carries the rejected value and the bound it violated, so callers (and
/// test assertions) can see both sides. For byte-offset operations `bound`
/// is the document length; for line queries it is the number of newlines
/// found before the walk ran out of document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfRange {
    /// The offset or line number that was asked for.
    pub index: usize,
    /// The bound it exceeded.
    pub bound: usize,
}

impl fmt::Display for IndexOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index {} out of range (bound {})", self.index, self.bound)
    }
}

impl std::error::Error for IndexOutOfRange {}

/// Result alias for buffer operations.
pub type Result<T> = std::result::Result<T, IndexOutOfRange>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_both_sides() {
        let err = IndexOutOfRange { index: 7, bound: 3 };
        assert_eq!(err.to_string(), "index 7 out of range (bound 3)");
    }

    #[test]
    fn is_comparable() {
        let a = IndexOutOfRange { index: 1, bound: 0 };
        let b = IndexOutOfRange { index: 1, bound: 0 };
        assert_eq!(a, b);
    }

    #[test]
    fn implements_error() {
        let err = IndexOutOfRange { index: 0, bound: 0 };
        let _: &dyn std::error::Error = &err;
    }
}
