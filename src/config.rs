//! Construction parameters for semi-splay sets

use crate::error::SplaySizeError;

/// The smallest window a semi-splay step can regroup
pub const MIN_SPLAY_SIZE: usize = 3;

/// The window size used by `Default` and `FromIterator`
pub const DEFAULT_SPLAY_SIZE: usize = 3;

/// Parameters controlling how a semi-splay set is built and how eagerly it restructures.
///
/// ```
/// use semisplay::{Config, Set};
///
/// let set: Set<u32> = Set::with_config(Config::new(7).splay_on_lookup(false).capacity(64));
/// assert_eq!(set.splay_size(), 7);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    splay_size: usize,
    splay_on_lookup: bool,
    capacity: usize,
}

impl Config {
    /// Configuration with the given window size, lookup splaying on and no pre-allocation
    pub const fn new(splay_size: usize) -> Config {
        Config {
            splay_size,
            splay_on_lookup: true,
            capacity: 0,
        }
    }

    /// Whether successful lookups (`contains`, `first`, `last`) restructure the access path.
    ///
    /// Insertions and removals always restructure.
    pub const fn splay_on_lookup(mut self, splay_on_lookup: bool) -> Config {
        self.splay_on_lookup = splay_on_lookup;
        self
    }

    /// Number of keys to allocate room for up front
    pub const fn capacity(mut self, capacity: usize) -> Config {
        self.capacity = capacity;
        self
    }

    /// The number of nodes regrouped by one restructuring step
    #[inline]
    pub const fn get_splay_size(&self) -> usize {
        self.splay_size
    }

    /// Whether lookups restructure
    #[inline]
    pub const fn get_splay_on_lookup(&self) -> bool {
        self.splay_on_lookup
    }

    /// The initial capacity
    #[inline]
    pub const fn get_capacity(&self) -> usize {
        self.capacity
    }

    /// Check the configuration can drive a semi-splay tree
    pub fn validate(&self) -> Result<(), SplaySizeError> {
        if self.splay_size < MIN_SPLAY_SIZE {
            return Err(SplaySizeError::new(self.splay_size));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(DEFAULT_SPLAY_SIZE)
    }
}

#[test]
fn test_config_defaults() {
    let config = Config::default();
    debug_assert_eq!(config.get_splay_size(), 3);
    debug_assert!(config.get_splay_on_lookup());
    debug_assert_eq!(config.get_capacity(), 0);
    debug_assert_eq!(config.validate(), Ok(()));
}

#[test]
fn test_config_rejects_small_windows() {
    for splay_size in 0..MIN_SPLAY_SIZE {
        let err = Config::new(splay_size).validate().unwrap_err();
        debug_assert_eq!(err.splay_size(), splay_size);
    }
    debug_assert!(Config::new(15).validate().is_ok());
}
