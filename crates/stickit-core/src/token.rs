#![forbid(unsafe_code)]

//! Per-binding write tokens.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for unique write tokens.
static WRITE_TOKEN_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Marker attached to every model write that originates from one binding.
///
/// A binding compares the token carried by a change event with its own and
/// skips the element update when they match, which breaks the
/// element → model → element echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WriteToken(u64);

impl WriteToken {
    /// Allocate a fresh, process-unique token.
    #[must_use]
    pub fn next() -> Self {
        Self(WRITE_TOKEN_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw token value.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for WriteToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bind#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_and_increasing() {
        let a = WriteToken::next();
        let b = WriteToken::next();
        assert_ne!(a, b);
        assert!(b.id() > a.id());
    }
}
