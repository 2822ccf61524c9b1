//! Errors raised when configuring a semi-splay tree

use core::fmt;

use crate::config::MIN_SPLAY_SIZE;

/// A splay size smaller than [`MIN_SPLAY_SIZE`] was requested.
///
/// A window must hold at least three nodes so that its median has a node on either side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplaySizeError {
    splay_size: usize,
}

impl SplaySizeError {
    pub(crate) fn new(splay_size: usize) -> SplaySizeError {
        SplaySizeError { splay_size }
    }

    /// The rejected splay size
    pub fn splay_size(&self) -> usize {
        self.splay_size
    }
}

impl fmt::Display for SplaySizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "splay size {} is too small, it must be at least {MIN_SPLAY_SIZE}",
            self.splay_size
        )
    }
}

impl core::error::Error for SplaySizeError {}

#[test]
fn test_error_display() {
    use alloc::string::ToString;

    let err = SplaySizeError::new(2);
    debug_assert_eq!(err.splay_size(), 2);
    debug_assert_eq!(
        err.to_string(),
        "splay size 2 is too small, it must be at least 3"
    );
}
