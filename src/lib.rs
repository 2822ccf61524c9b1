//! ## Introduction
//!
//! This crate implements ordered sets based on semi-splay trees. Like splay trees, semi-splay
//! trees are self-organising binary search trees: keys that are accessed often drift towards the
//! top of the tree, so that later lookups of the same keys are cheaper. A classic splay tree
//! rotates every accessed key all the way to the root. A semi-splay tree instead walks up the
//! access path in windows of a fixed number of nodes, the `splay_size`, and rebuilds each window
//! as a perfectly balanced subtree around its median key. The root of each rebuilt window is
//! carried into the next one, and a final window with fewer than `splay_size` nodes is left as
//! it is. This does less restructuring per access than a full splay while keeping amortised
//! logarithmic access times.
//!
//! ```
//! use semisplay::Set;
//!
//! let mut set = Set::with_root(0, 7);
//! for key in 1..7 {
//!     assert!(set.add(key));
//! }
//!
//! // The seven node path has been rebuilt around its median
//! assert_eq!(set.depth(), 2);
//! assert!(set.contains(&3));
//! assert!(set.remove(&3));
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [0, 1, 2, 4, 5, 6]);
//! ```
//!
//! ## Contents
//!
//! <center>
//!
//! | Type          | Stores       | Sorts By  | Iterator              |
//! |:--------------|:-------------|:----------|-----------------------|
//! | `Set`         | Key          | Ord       | `SetIterator`         |
//! | `StringSet`   | String       | Ord       | `StringSetIterator`   |
//!
//! </center>
//!
//! Both are built from a [`Config`], or directly from a splay size, which must be at least three.
//! By default successful lookups restructure the tree as well as insertions and removals, which
//! is what gives frequently accessed keys their short paths. This can be switched off with
//! [`Config::splay_on_lookup`].
//!
//! The crate exposes an additional type `util::Tree` that provides the foundation of the other
//! types. It manages a set of `usize` indices into an external vector of keys, without storing
//! the vector itself.
//!
//! The crate emits `log` records (construction at `debug`, every restructured window at `trace`)
//! but never installs a logger.

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

mod config;
mod error;
mod set;
pub mod util;

pub use config::*;
pub use error::*;
pub use set::*;
