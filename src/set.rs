//! Implementation of sets, backed by a semi-splay tree
#![warn(missing_docs)]

use alloc::vec::Vec;
use compact_str::CompactString;
use core::{cell::RefCell, fmt, iter::FusedIterator};

use crate::{
    config::{Config, DEFAULT_SPLAY_SIZE},
    error::SplaySizeError,
    util::Tree,
};

//-----------------------------------------------------------------------------------------------//

/// A set of keys, implemented using a semi-splay tree.
///
/// Every insertion and removal restructures the access path in windows of `splay_size` nodes.
/// Successful lookups do the same unless disabled through [`Config::splay_on_lookup`], which is
/// why lookups only need `&self`.
///
/// Removed keys are not dropped straight away. Their storage is recycled, and the key is
/// overwritten by the next insertion that reuses it.
#[derive(Clone)]
pub struct Set<K>
where
    K: Ord,
{
    tree: RefCell<Tree>,
    key_slice: Vec<K>,
    splay_on_lookup: bool,
}

impl<K> Set<K>
where
    K: Ord,
{
    /// Constructor
    ///
    /// # Panics
    ///
    /// Panics if `splay_size` is less than three.
    pub fn new(splay_size: usize) -> Set<K> {
        Set::with_config(Config::new(splay_size))
    }

    /// Constructor, seeding the set with a first key
    ///
    /// # Panics
    ///
    /// Panics if `splay_size` is less than three.
    pub fn with_root(key: K, splay_size: usize) -> Set<K> {
        let mut set = Set::new(splay_size);
        set.add(key);
        set
    }

    /// Constructor
    ///
    /// # Panics
    ///
    /// Panics if `splay_size` is less than three.
    pub fn with_capacity(capacity: usize, splay_size: usize) -> Set<K> {
        Set::with_config(Config::new(splay_size).capacity(capacity))
    }

    /// Constructor
    ///
    /// # Panics
    ///
    /// Panics if the configured splay size is less than three.
    pub fn with_config(config: Config) -> Set<K> {
        match Set::try_with_config(config) {
            Ok(set) => set,
            Err(err) => panic!("{err}"),
        }
    }

    /// Constructor, rejecting configurations that cannot drive a semi-splay tree
    pub fn try_with_config(config: Config) -> Result<Set<K>, SplaySizeError> {
        config.validate()?;
        log::debug!("creating semi-splay set with {config:?}");

        Ok(Set {
            tree: RefCell::new(Tree::with_capacity(
                config.get_capacity(),
                config.get_splay_size(),
            )),
            key_slice: Vec::with_capacity(config.get_capacity()),
            splay_on_lookup: config.get_splay_on_lookup(),
        })
    }

    /// Get the number of keys in the `Set`
    #[inline]
    pub fn size(&self) -> usize {
        self.tree.borrow().count()
    }

    /// Check if there are any keys in the `Set`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.borrow().is_empty()
    }

    /// Get the number of nodes regrouped by one restructuring step
    #[inline]
    pub fn splay_size(&self) -> usize {
        self.tree.borrow().splay_size()
    }

    /// Remove all keys from the `Set`
    pub fn clear(&mut self) {
        self.tree.get_mut().clear();
        self.key_slice.truncate(0);
    }

    /// Reserves capacity for at least `additional` more keys
    pub fn reserve(&mut self, additional: usize) {
        let tree = self.tree.get_mut();

        debug_assert_eq!(self.key_slice.len(), tree.allocated_count());

        let required = tree.reserve(additional);
        if required > 0 {
            self.key_slice.reserve(required);
        }
    }

    /// Add a key.
    ///
    /// Returns `false`, leaving the set untouched, if the key is already present. Otherwise the
    /// path to the new key is restructured.
    pub fn add(&mut self, key: K) -> bool {
        let tree = self.tree.get_mut();

        let leaf = tree.insert_k(&key, &self.key_slice);
        if !leaf == 0 {
            return false;
        }

        if leaf == self.key_slice.len() {
            self.key_slice.push(key);
        } else {
            self.key_slice[leaf] = key;
        }

        tree.splay_k(leaf, &self.key_slice);
        true
    }

    /// Get a key.
    ///
    /// If the key is not in the set then `None` is returned. A key that is found has its path
    /// restructured, unless lookup splaying is disabled.
    pub fn get(&self, key: &K) -> Option<&K> {
        let tree = &mut self.tree.borrow_mut();

        let leaf = tree.get_k(key, &self.key_slice);
        if !leaf == 0 {
            return None;
        }

        if self.splay_on_lookup {
            tree.splay_k(leaf, &self.key_slice);
        }
        Some(&self.key_slice[leaf])
    }

    /// Check if the set contains a key.
    ///
    /// Restructures like [`Set::get`].
    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Remove a key.
    ///
    /// Returns `false`, leaving the set untouched, if the key is not present. Otherwise the tree is
    /// restructured from the node that took the key's place, or from its parent if none did.
    pub fn remove(&mut self, key: &K) -> bool {
        let tree = self.tree.get_mut();

        let leaf = tree.get_k(key, &self.key_slice);
        if !leaf == 0 {
            return false;
        }

        let restart = tree.unset(leaf);
        if !restart != 0 {
            tree.splay_k(restart, &self.key_slice);
        }
        true
    }

    /// Get the number of edges on the longest path from the root, `-1` if the set is empty
    pub fn depth(&self) -> isize {
        self.tree.borrow().depth()
    }

    /// Get the first key in the set
    pub fn first(&self) -> Option<&K> {
        let tree = &mut self.tree.borrow_mut();
        let leaf = tree.first();
        if !leaf == 0 {
            None
        } else {
            if self.splay_on_lookup {
                tree.splay_k(leaf, &self.key_slice);
            }
            Some(&self.key_slice[leaf])
        }
    }

    /// Get the last key in the set
    pub fn last(&self) -> Option<&K> {
        let tree = &mut self.tree.borrow_mut();
        let leaf = tree.last();
        if !leaf == 0 {
            None
        } else {
            if self.splay_on_lookup {
                tree.splay_k(leaf, &self.key_slice);
            }
            Some(&self.key_slice[leaf])
        }
    }

    /// Iterate over the keys in the `Set` in ascending order
    pub fn iter(&self) -> SetIterator<'_, K> {
        let tree = &self.tree.borrow();
        SetIterator {
            set: self,
            leaf: tree.first(),
            count: tree.count(),
        }
    }

    /// Check the structure of the underlying tree, panicking if it is broken
    pub fn assert_invariants(&self) {
        let key_slice = &self.key_slice;
        self.tree
            .borrow()
            .assert_invariants_by(|a, b| key_slice[a].cmp(&key_slice[b]));
    }
}

impl<K> Default for Set<K>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new(DEFAULT_SPLAY_SIZE)
    }
}

impl<K> fmt::Debug for Set<K>
where
    K: Ord + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, K> IntoIterator for &'a Set<K>
where
    K: Ord,
{
    type Item = &'a K;
    type IntoIter = SetIterator<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K> FromIterator<K> for Set<K>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = Self::with_capacity(iter.size_hint().0, DEFAULT_SPLAY_SIZE);
        set.extend(iter);
        set
    }
}

impl<K> Extend<K> for Set<K>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.add(key);
        }
    }
}

//-----------------------------------------------------------------------------------------------//

/// Iterator over a `Set`
///
/// Each step follows parent links from the previous key, so lookups that restructure the set
/// while it is being iterated do not disturb the sequence.
pub struct SetIterator<'a, K>
where
    K: Ord,
{
    set: &'a Set<K>,
    leaf: usize,
    count: usize,
}

impl<'a, K> Iterator for SetIterator<'a, K>
where
    K: Ord,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        if !self.leaf == 0 {
            return None;
        }

        let leaf = self.leaf;
        self.leaf = self.set.tree.borrow().next(self.leaf);
        self.count -= 1;

        Some(&self.set.key_slice[leaf])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.count, Some(self.count))
    }
}

impl<K> ExactSizeIterator for SetIterator<'_, K> where K: Ord {}

impl<K> FusedIterator for SetIterator<'_, K> where K: Ord {}

//-----------------------------------------------------------------------------------------------//

/// A set of strings, implemented using a semi-splay tree.
///
/// This is specialised version of `Set` that stores keys as a string.
#[derive(Clone)]
pub struct StringSet {
    tree: RefCell<Tree>,
    key_slice: Vec<CompactString>,
    splay_on_lookup: bool,
}

impl StringSet {
    /// Constructor
    ///
    /// # Panics
    ///
    /// Panics if `splay_size` is less than three.
    pub fn new(splay_size: usize) -> StringSet {
        StringSet::with_config(Config::new(splay_size))
    }

    /// Constructor, seeding the set with a first string
    ///
    /// # Panics
    ///
    /// Panics if `splay_size` is less than three.
    pub fn with_root(key: &str, splay_size: usize) -> StringSet {
        let mut set = StringSet::new(splay_size);
        set.add(key);
        set
    }

    /// Constructor
    ///
    /// # Panics
    ///
    /// Panics if `splay_size` is less than three.
    pub fn with_capacity(capacity: usize, splay_size: usize) -> StringSet {
        StringSet::with_config(Config::new(splay_size).capacity(capacity))
    }

    /// Constructor
    ///
    /// # Panics
    ///
    /// Panics if the configured splay size is less than three.
    pub fn with_config(config: Config) -> StringSet {
        match StringSet::try_with_config(config) {
            Ok(set) => set,
            Err(err) => panic!("{err}"),
        }
    }

    /// Constructor, rejecting configurations that cannot drive a semi-splay tree
    pub fn try_with_config(config: Config) -> Result<StringSet, SplaySizeError> {
        config.validate()?;
        log::debug!("creating semi-splay string set with {config:?}");

        Ok(StringSet {
            tree: RefCell::new(Tree::with_capacity(
                config.get_capacity(),
                config.get_splay_size(),
            )),
            key_slice: Vec::with_capacity(config.get_capacity()),
            splay_on_lookup: config.get_splay_on_lookup(),
        })
    }

    /// Get the number of strings in the `StringSet`
    #[inline]
    pub fn size(&self) -> usize {
        self.tree.borrow().count()
    }

    /// Check if there are any strings in the `StringSet`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.borrow().is_empty()
    }

    /// Get the number of nodes regrouped by one restructuring step
    #[inline]
    pub fn splay_size(&self) -> usize {
        self.tree.borrow().splay_size()
    }

    /// Remove all strings from the `StringSet`
    pub fn clear(&mut self) {
        self.tree.get_mut().clear();
        self.key_slice.truncate(0);
    }

    /// Reserves capacity for at least `additional` more strings
    pub fn reserve(&mut self, additional: usize) {
        let tree = self.tree.get_mut();
        debug_assert_eq!(self.key_slice.len(), tree.allocated_count());

        let required = tree.reserve(additional);
        if required > 0 {
            self.key_slice.reserve(required);
        }
    }

    /// Add a string.
    ///
    /// Returns `false`, leaving the set untouched, if the string is already present.
    pub fn add(&mut self, key: &str) -> bool {
        let tree = self.tree.get_mut();

        let leaf = tree.insert_s(key, &self.key_slice);
        if !leaf == 0 {
            return false;
        }

        if leaf == self.key_slice.len() {
            self.key_slice.push(CompactString::new(key));
        } else {
            self.key_slice[leaf] = CompactString::new(key);
        }

        tree.splay_s(leaf, &self.key_slice);
        true
    }

    /// Get a string.
    ///
    /// If the string is not in the set then `None` is returned.
    pub fn get(&self, key: &str) -> Option<&str> {
        let tree = &mut self.tree.borrow_mut();

        let leaf = tree.get_s(key, &self.key_slice);
        if !leaf == 0 {
            return None;
        }

        if self.splay_on_lookup {
            tree.splay_s(leaf, &self.key_slice);
        }
        Some(&self.key_slice[leaf])
    }

    /// Check if the set contains a string
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove a string.
    ///
    /// Returns `false`, leaving the set untouched, if the string is not present.
    pub fn remove(&mut self, key: &str) -> bool {
        let tree = self.tree.get_mut();

        let leaf = tree.get_s(key, &self.key_slice);
        if !leaf == 0 {
            return false;
        }

        let restart = tree.unset(leaf);
        if !restart != 0 {
            tree.splay_s(restart, &self.key_slice);
        }
        true
    }

    /// Get the number of edges on the longest path from the root, `-1` if the set is empty
    pub fn depth(&self) -> isize {
        self.tree.borrow().depth()
    }

    /// Get the first string in the set
    pub fn first(&self) -> Option<&str> {
        let tree = &mut self.tree.borrow_mut();
        let leaf = tree.first();
        if !leaf == 0 {
            None
        } else {
            if self.splay_on_lookup {
                tree.splay_s(leaf, &self.key_slice);
            }
            Some(&self.key_slice[leaf])
        }
    }

    /// Get the last string in the set
    pub fn last(&self) -> Option<&str> {
        let tree = &mut self.tree.borrow_mut();
        let leaf = tree.last();
        if !leaf == 0 {
            None
        } else {
            if self.splay_on_lookup {
                tree.splay_s(leaf, &self.key_slice);
            }
            Some(&self.key_slice[leaf])
        }
    }

    /// Iterate over the strings in the `StringSet` in ascending order
    pub fn iter(&self) -> StringSetIterator<'_> {
        let tree = &self.tree.borrow();
        StringSetIterator {
            set: self,
            leaf: tree.first(),
            count: tree.count(),
        }
    }

    /// Check the structure of the underlying tree, panicking if it is broken
    pub fn assert_invariants(&self) {
        let key_slice = &self.key_slice;
        self.tree
            .borrow()
            .assert_invariants_by(|a, b| key_slice[a].cmp(&key_slice[b]));
    }
}

impl Default for StringSet {
    fn default() -> Self {
        Self::new(DEFAULT_SPLAY_SIZE)
    }
}

impl fmt::Debug for StringSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a StringSet {
    type Item = &'a str;
    type IntoIter = StringSetIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> FromIterator<&'a str> for StringSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = Self::with_capacity(iter.size_hint().0, DEFAULT_SPLAY_SIZE);
        set.extend(iter);
        set
    }
}

impl<'a> Extend<&'a str> for StringSet {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        for key in iter {
            self.add(key);
        }
    }
}

//-----------------------------------------------------------------------------------------------//

/// Iterator over a `StringSet`
pub struct StringSetIterator<'a> {
    set: &'a StringSet,
    leaf: usize,
    count: usize,
}

impl<'a> Iterator for StringSetIterator<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if !self.leaf == 0 {
            return None;
        }

        let leaf = self.leaf;
        self.leaf = self.set.tree.borrow().next(self.leaf);
        self.count -= 1;

        Some(&self.set.key_slice[leaf])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.count, Some(self.count))
    }
}

impl ExactSizeIterator for StringSetIterator<'_> {}

impl FusedIterator for StringSetIterator<'_> {}

//-----------------------------------------------------------------------------------------------//

#[cfg(test)]
// Follow a path of 'L' and 'R' steps from the root, returning the key found there
fn key_at<K: Ord + Clone>(set: &Set<K>, path: &str) -> Option<K> {
    let tree = set.tree.borrow();
    let mut leaf = tree.root();
    for step in path.chars() {
        if !leaf == 0 {
            return None;
        }
        leaf = if step == 'L' {
            tree.left(leaf)
        } else {
            tree.right(leaf)
        };
    }

    if !leaf == 0 {
        None
    } else {
        Some(set.key_slice[leaf].clone())
    }
}

#[cfg(test)]
// List every key in order along with the keys of its children
fn shape<K: Ord + Clone>(set: &Set<K>) -> Vec<(K, Option<K>, Option<K>)> {
    let tree = set.tree.borrow();
    let key = |leaf: usize| {
        if !leaf == 0 {
            None
        } else {
            Some(set.key_slice[leaf].clone())
        }
    };

    let mut v = Vec::new();
    let mut leaf = tree.first();
    while !leaf != 0 {
        v.push((set.key_slice[leaf].clone(), key(tree.left(leaf)), key(tree.right(leaf))));
        leaf = tree.next(leaf);
    }
    v
}

#[cfg(test)]
// Build a set without restructuring, so the shape follows the insertion order
fn unsplayed(keys: &[i32]) -> Set<i32> {
    let mut set = Set::new(3);
    let tree = set.tree.get_mut();
    for &key in keys {
        let leaf = tree.insert_k(&key, &set.key_slice);
        assert_eq!(leaf, set.key_slice.len());
        set.key_slice.push(key);
    }
    set.assert_invariants();
    set
}

#[test]
// A very simple test of adding to a set
fn test_set_0() {
    use alloc::vec;

    let mut set = Set::default();

    debug_assert!(set.add(5));
    debug_assert!(set.add(1));
    debug_assert!(set.add(9));

    debug_assert_eq!(set.get(&5), Some(&5));
    debug_assert_eq!(set.get(&4), None);

    let v: Vec<i32> = set.iter().cloned().collect();
    debug_assert_eq!(v, vec![1, 5, 9]);
}

#[test]
// Duplicate keys are refused without changing the size
fn test_set_duplicates() {
    let mut set = Set::with_root(0, 3);

    debug_assert!(set.add(5));
    debug_assert!(set.contains(&5));
    debug_assert!(!set.add(5));
    debug_assert_eq!(set.size(), 2);
    set.assert_invariants();
}

#[test]
// A set built without a root starts empty
fn test_set_without_root() {
    let mut set = Set::new(3);

    debug_assert!(set.is_empty());
    debug_assert!(!set.contains(&4));
    debug_assert!(!set.remove(&4));
    debug_assert_eq!(set.depth(), -1);
    debug_assert_eq!(set.first(), None);
    debug_assert_eq!(set.iter().next(), None);

    debug_assert!(set.add(4));
    debug_assert!(set.contains(&4));
    debug_assert_eq!(set.depth(), 0);
}

#[test]
// Removing leaves, nodes with one child and nodes with two children
fn test_set_remove() {
    let mut set = Set::with_root(0, 3);

    debug_assert!(set.add(5));
    debug_assert!(set.remove(&5));
    debug_assert!(!set.contains(&5));
    debug_assert!(!set.remove(&5));

    debug_assert!(set.add(-1));
    debug_assert!(set.add(-2));
    debug_assert!(set.remove(&-1));
    debug_assert!(!set.contains(&-1));
    debug_assert!(set.contains(&-2));
    set.assert_invariants();

    debug_assert!(set.remove(&0));
    debug_assert!(!set.contains(&0));
    debug_assert_eq!(set.size(), 1);
    debug_assert!(set.remove(&-2));
    debug_assert!(set.is_empty());
    debug_assert_eq!(set.depth(), -1);
}

#[test]
// Removing a root with two children
fn test_set_remove_root_two_children() {
    let mut set = Set::with_root(0, 3);

    debug_assert!(set.add(1));
    debug_assert!(set.add(-1));
    debug_assert!(set.remove(&0));
    debug_assert!(!set.contains(&0));
    debug_assert!(set.contains(&1));
    debug_assert!(set.contains(&-1));
    set.assert_invariants();
}

#[test]
// Removing a node whose successor is its right child
fn test_set_remove_successor_child() {
    let mut set = Set::with_root(0, 3);

    debug_assert!(set.add(-2));
    debug_assert!(set.add(-3));
    debug_assert_eq!(key_at(&set, ""), Some(-2));
    debug_assert!(set.add(-1));
    debug_assert_eq!(key_at(&set, ""), Some(-1));
    debug_assert_eq!(key_at(&set, "R"), Some(0));
    debug_assert_eq!(key_at(&set, "L"), Some(-2));
    debug_assert_eq!(key_at(&set, "LL"), Some(-3));

    debug_assert!(set.contains(&0));
    debug_assert!(set.contains(&-2));
    debug_assert!(set.contains(&-3));
    debug_assert!(set.contains(&-1));
    debug_assert_eq!(key_at(&set, ""), Some(-2));

    debug_assert!(set.remove(&-2));
    debug_assert_eq!(key_at(&set, ""), Some(-1));
    debug_assert_eq!(key_at(&set, "L"), Some(-3));
    debug_assert_eq!(key_at(&set, "R"), Some(0));
    debug_assert!(!set.contains(&-2));
    set.assert_invariants();
}

#[test]
// Removing a node whose successor sits deeper in its right subtree
fn test_set_remove_deep_successor() {
    let mut set = Set::with_root(0, 3);

    for key in [6, 10, 8, -1, 7, -5] {
        debug_assert!(set.add(key));
    }

    // 6 is the root, its successor 7 is the left child of 8
    debug_assert!(set.remove(&6));
    debug_assert_eq!(key_at(&set, ""), Some(7));
    debug_assert_eq!(key_at(&set, "R"), Some(8));
    debug_assert_eq!(key_at(&set, "RL"), None);
    debug_assert_eq!(key_at(&set, "RR"), Some(10));
    debug_assert_eq!(key_at(&set, "L"), Some(-1));
    set.assert_invariants();

    let v: Vec<i32> = set.iter().cloned().collect();
    debug_assert_eq!(v, [-5, -1, 0, 7, 8, 10]);
}

#[test]
// Removing a leaf restructures the window above its former parent
fn test_set_remove_leaf_restructures() {
    let mut set = unsplayed(&[10, 5, 7, 6, 4, 12]);
    debug_assert_eq!(key_at(&set, ""), Some(10));
    debug_assert_eq!(key_at(&set, "LRL"), Some(6));

    debug_assert!(set.remove(&6));
    debug_assert_eq!(key_at(&set, ""), Some(7));
    debug_assert_eq!(key_at(&set, "L"), Some(5));
    debug_assert_eq!(key_at(&set, "LL"), Some(4));
    debug_assert_eq!(key_at(&set, "LR"), None);
    debug_assert_eq!(key_at(&set, "R"), Some(10));
    debug_assert_eq!(key_at(&set, "RL"), None);
    debug_assert_eq!(key_at(&set, "RR"), Some(12));
    set.assert_invariants();
}

#[test]
// Removing a node with one child restructures the window above that child
fn test_set_remove_one_child_restructures() {
    let mut set = unsplayed(&[10, 5, 7, 6, 4, 12]);

    debug_assert!(set.remove(&7));
    debug_assert_eq!(key_at(&set, ""), Some(6));
    debug_assert_eq!(key_at(&set, "L"), Some(5));
    debug_assert_eq!(key_at(&set, "LL"), Some(4));
    debug_assert_eq!(key_at(&set, "LR"), None);
    debug_assert_eq!(key_at(&set, "R"), Some(10));
    debug_assert_eq!(key_at(&set, "RL"), None);
    debug_assert_eq!(key_at(&set, "RR"), Some(12));
    set.assert_invariants();
}

#[test]
// Removing a node with a deep successor restructures above the successor's former parent
fn test_set_remove_deep_successor_restructures() {
    let mut set = unsplayed(&[20, 10, 5, 18, 15, 16, 30]);

    debug_assert!(set.remove(&10));
    debug_assert_eq!(key_at(&set, ""), Some(18));
    debug_assert_eq!(key_at(&set, "L"), Some(15));
    debug_assert_eq!(key_at(&set, "LL"), Some(5));
    debug_assert_eq!(key_at(&set, "LR"), Some(16));
    debug_assert_eq!(key_at(&set, "R"), Some(20));
    debug_assert_eq!(key_at(&set, "RL"), None);
    debug_assert_eq!(key_at(&set, "RR"), Some(30));
    debug_assert_eq!(set.depth(), 2);
    set.assert_invariants();
}

#[test]
// Size follows successful additions and removals
fn test_set_size() {
    let mut set = Set::with_root(0, 3);

    debug_assert_eq!(set.size(), 1);
    set.add(5);
    debug_assert_eq!(set.size(), 2);
    debug_assert!(set.contains(&0));
    set.remove(&5);
    debug_assert_eq!(set.size(), 1);
    set.remove(&7);
    debug_assert_eq!(set.size(), 1);
    set.remove(&0);
    debug_assert_eq!(set.size(), 0);
}

#[test]
// Depth after each of a short sequence of additions
fn test_set_depth() {
    let mut set = Set::with_root(0, 3);

    debug_assert_eq!(set.depth(), 0);
    set.add(2);
    debug_assert_eq!(set.depth(), 1);
    set.add(3);
    debug_assert_eq!(set.depth(), 1);
    set.add(4);
    debug_assert_eq!(set.depth(), 2);
    set.add(1);
    debug_assert_eq!(set.depth(), 2);
}

#[test]
// A window larger than the set never restructures, so sorted input builds a list
fn test_set_depth_unbalanced() {
    const COUNT: i32 = 2000;

    let mut set = Set::with_root(0, COUNT as usize + 1);
    for i in 1..COUNT {
        set.add(i);
    }

    debug_assert_eq!(set.depth(), COUNT as isize - 1);
}

#[test]
// The iterator visits every key once, in order, then stays exhausted
fn test_set_iterator() {
    let mut set = Set::with_root(0, 3);
    for key in [2, 3, 4, 1] {
        set.add(key);
    }

    let mut it = set.iter();
    debug_assert_eq!(it.len(), 5);
    debug_assert_eq!(it.next(), Some(&0));
    debug_assert_eq!(it.next(), Some(&1));
    debug_assert_eq!(it.next(), Some(&2));
    debug_assert_eq!(it.next(), Some(&3));
    debug_assert_eq!(it.next(), Some(&4));
    debug_assert_eq!(it.len(), 0);
    debug_assert_eq!(it.next(), None);
    debug_assert_eq!(it.next(), None);
}

#[test]
// Lookups that restructure the set during iteration do not disturb it
fn test_set_iterator_with_lookups() {
    let set: Set<i32> = (0..100).collect();

    let mut v = Vec::new();
    for &key in &set {
        v.push(key);
        debug_assert!(set.contains(&(99 - key)));
        debug_assert!(set.contains(&(key / 2)));
    }

    debug_assert_eq!(v, (0..100).collect::<Vec<_>>());
    set.assert_invariants();
}

#[test]
// Windows of three regroup around the median
fn test_set_splay_3() {
    let cases = [
        ([-3, -5], [-3, -5, 0]),
        ([-6, -2], [-2, -6, 0]),
        ([6, 2], [2, 0, 6]),
        ([6, 10], [6, 0, 10]),
    ];

    for (keys, [root, left, right]) in cases {
        let mut set = Set::with_root(0, 3);
        for key in keys {
            set.add(key);
        }

        debug_assert_eq!(key_at(&set, ""), Some(root));
        debug_assert_eq!(key_at(&set, "L"), Some(left));
        debug_assert_eq!(key_at(&set, "R"), Some(right));
    }
}

#[test]
// Successive windows of three carry the rebuilt root upwards
fn test_set_splay_3_carry() {
    let mut set = Set::with_root(0, 3);

    set.add(6);
    set.add(10);
    debug_assert_eq!(key_at(&set, ""), Some(6));
    debug_assert_eq!(key_at(&set, "L"), Some(0));
    debug_assert_eq!(key_at(&set, "R"), Some(10));

    set.add(8);
    debug_assert_eq!(key_at(&set, ""), Some(8));
    debug_assert_eq!(key_at(&set, "L"), Some(6));
    debug_assert_eq!(key_at(&set, "LL"), Some(0));
    debug_assert_eq!(key_at(&set, "R"), Some(10));

    set.add(-1);
    set.add(7);
    set.add(-5);
    debug_assert_eq!(key_at(&set, ""), Some(6));
    debug_assert_eq!(key_at(&set, "L"), Some(-1));
    debug_assert_eq!(key_at(&set, "LL"), Some(-5));
    debug_assert_eq!(key_at(&set, "LR"), Some(0));
    debug_assert_eq!(key_at(&set, "R"), Some(8));
    debug_assert_eq!(key_at(&set, "RL"), Some(7));
    debug_assert_eq!(key_at(&set, "RR"), Some(10));
    set.assert_invariants();
}

#[test]
// Windows of four take the upper median as root
fn test_set_splay_4() {
    let cases = [
        ([-1, -2, -3], [-1, 0, -2, -3]),
        ([-4, -2, -3], [-2, 0, -3, -4]),
        ([10, 8, 4], [8, 10, 4, 0]),
        ([6, 10, 8], [8, 10, 6, 0]),
        ([-4, -8, -6], [-4, 0, -6, -8]),
        ([-10, -8, -6], [-6, 0, -8, -10]),
        ([10, 6, 8], [8, 10, 6, 0]),
        ([10, 15, 20], [15, 20, 10, 0]),
    ];

    for (keys, [root, right, left, left_left]) in cases {
        let mut set = Set::with_root(0, 4);
        for key in keys {
            set.add(key);
        }

        debug_assert_eq!(key_at(&set, ""), Some(root));
        debug_assert_eq!(key_at(&set, "R"), Some(right));
        debug_assert_eq!(key_at(&set, "L"), Some(left));
        debug_assert_eq!(key_at(&set, "LL"), Some(left_left));
        set.assert_invariants();
    }
}

#[test]
// A full window of seven becomes a perfectly balanced tree
fn test_set_splay_7() {
    let mut set = Set::with_root(0, 7);
    for key in 1..7 {
        set.add(key);
    }

    debug_assert_eq!(key_at(&set, ""), Some(3));
    debug_assert_eq!(key_at(&set, "L"), Some(1));
    debug_assert_eq!(key_at(&set, "LL"), Some(0));
    debug_assert_eq!(key_at(&set, "LR"), Some(2));
    debug_assert_eq!(key_at(&set, "R"), Some(5));
    debug_assert_eq!(key_at(&set, "RL"), Some(4));
    debug_assert_eq!(key_at(&set, "RR"), Some(6));
    debug_assert_eq!(set.depth(), 2);
}

#[test]
// Looking the same key up twice leaves the shape of the first lookup
fn test_set_repeated_lookup() {
    let mut set = Set::with_root(0, 3);
    for key in [6, 10, 8] {
        set.add(key);
    }

    debug_assert!(set.contains(&0));
    let shape = ["", "L", "R", "RR", "LL", "LR", "RL"].map(|path| key_at(&set, path));
    debug_assert_eq!(
        shape,
        [Some(6), Some(0), Some(8), Some(10), None, None, None]
    );

    debug_assert!(set.contains(&0));
    debug_assert_eq!(shape, ["", "L", "R", "RR", "LL", "LR", "RL"].map(|path| key_at(&set, path)));
}

#[test]
// Lookups leave the shape alone when lookup splaying is disabled
fn test_set_no_lookup_splay() {
    let mut set = Set::with_config(Config::new(3).splay_on_lookup(false));
    for key in [0, 6, 10, 8] {
        set.add(key);
    }

    debug_assert_eq!(key_at(&set, ""), Some(8));
    debug_assert!(set.contains(&0));
    debug_assert_eq!(set.first(), Some(&0));
    debug_assert_eq!(key_at(&set, ""), Some(8));
    debug_assert_eq!(key_at(&set, "LL"), Some(0));
}

#[test]
// First and last keys are found and restructured towards the root
fn test_set_first_last() {
    let set: Set<u32> = (0..64).collect();

    debug_assert_eq!(set.first(), Some(&0));
    debug_assert_eq!(set.last(), Some(&63));
    debug_assert_eq!(set.size(), 64);
    set.assert_invariants();
}

#[test]
#[should_panic(expected = "splay size 2 is too small")]
fn test_set_rejects_small_windows() {
    let _ = Set::<i32>::new(2);
}

#[test]
fn test_set_try_with_config() {
    let err = Set::<i32>::try_with_config(Config::new(1)).unwrap_err();
    debug_assert_eq!(err.splay_size(), 1);

    let set = Set::<i32>::try_with_config(Config::new(15).capacity(8)).unwrap();
    debug_assert_eq!(set.splay_size(), 15);
}

#[test]
// Sequential keys, looked up after every addition
fn test_set_sequential() {
    const COUNT: i32 = 10000;

    let mut set = Set::with_root(0, 3);
    for i in 1..COUNT {
        debug_assert!(set.add(i));
        debug_assert!(set.contains(&i));
    }
    for i in 1..COUNT {
        debug_assert!(!set.add(i));
        debug_assert!(set.contains(&i));
    }
    debug_assert_eq!(set.size(), COUNT as usize);

    for i in (1..=COUNT).rev() {
        set.remove(&i);
    }
    debug_assert_eq!(set.size(), 1);
    set.assert_invariants();
}

#[test]
// A stress test with adding and getting
fn test_set_2() {
    use rand::prelude::*;

    const COUNT: usize = 100000;

    let mut rng = SmallRng::seed_from_u64(1234567890);

    let mut set = Set::new(3);
    for _ in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        set.add(key);
    }

    debug_assert_eq!(set.size(), COUNT);

    let mut rng = SmallRng::seed_from_u64(1234567890);

    for _ in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        debug_assert_eq!(set.get(&key), Some(&key));
    }

    debug_assert_eq!(set.size(), COUNT);
    set.assert_invariants();
}

#[test]
// A stress test with adding and removing, for several window sizes
fn test_set_3() {
    use rand::prelude::*;

    const COUNT: usize = 20000;

    for splay_size in [3, 4, 7, 15] {
        let mut rng = SmallRng::seed_from_u64(5678901234);

        let mut set = Set::new(splay_size);
        for _ in 0..COUNT {
            let key = rng.random_range(0..usize::MAX);
            set.add(key);
        }

        debug_assert_eq!(set.size(), COUNT);
        set.assert_invariants();

        let mut rng = SmallRng::seed_from_u64(5678901234);

        for i in 0..COUNT {
            let key = rng.random_range(0..usize::MAX);
            debug_assert!(set.remove(&key));
            debug_assert!(!set.contains(&key));
            if i % 1000 == 0 {
                set.assert_invariants();
            }
        }

        debug_assert_eq!(set.size(), 0);
        debug_assert_eq!(set.depth(), -1);
    }
}

#[test]
// A very simple test of adding strings
fn test_string_set_0() {
    use alloc::{string::String, vec};

    let mut set = StringSet::default();

    debug_assert!(set.add("Five"));
    debug_assert!(set.add("One"));
    debug_assert!(set.add("Nine"));
    debug_assert!(!set.add("Nine"));

    debug_assert_eq!(set.get("Five"), Some("Five"));
    debug_assert_eq!(set.get("Seven"), None);

    let v: Vec<String> = set.iter().map(String::from).collect();
    debug_assert_eq!(
        v,
        vec![String::from("Five"), String::from("Nine"), String::from("One")]
    );
}

#[test]
// Removing strings recycles their storage
fn test_string_set_1() {
    let mut set = StringSet::with_root("m", 4);
    set.extend(["c", "x", "a", "e", "q", "z"]);

    debug_assert_eq!(set.size(), 7);
    debug_assert!(set.remove("m"));
    debug_assert!(!set.remove("m"));
    debug_assert!(set.add("n"));
    debug_assert!(set.contains("n"));
    debug_assert_eq!(set.first(), Some("a"));
    debug_assert_eq!(set.last(), Some("z"));
    debug_assert_eq!(set.size(), 7);
    set.assert_invariants();

    set.clear();
    debug_assert!(set.is_empty());
    debug_assert_eq!(set.depth(), -1);
}

#[test]
// Removing a string restructures above the successor's former parent
fn test_string_set_remove_restructures() {
    let mut set = StringSet::new(3);
    let tree = set.tree.get_mut();
    for key in ["20", "10", "05", "18", "15", "16", "30"] {
        let leaf = tree.insert_s(key, &set.key_slice);
        debug_assert_eq!(leaf, set.key_slice.len());
        set.key_slice.push(CompactString::from(key));
    }

    debug_assert!(set.remove("10"));

    let tree = set.tree.borrow();
    let root = tree.root();
    debug_assert_eq!(set.key_slice[root], "18");
    debug_assert_eq!(set.key_slice[tree.left(root)], "15");
    debug_assert_eq!(set.key_slice[tree.right(root)], "20");
    debug_assert_eq!(set.key_slice[tree.right(tree.left(root))], "16");
    drop(tree);
    set.assert_invariants();
}

#[test]
// Repeated lookups lift a key until its path is shorter than a window, then the shape holds
fn test_set_hot_key() {
    let mut set = Set::new(3);
    for key in 0..1024u32 {
        set.add(key * 7 % 1024);
    }

    // Every lookup at least halves the depth of the hot key
    for _ in 0..32 {
        debug_assert!(set.contains(&500));
    }

    let before = shape(&set);
    debug_assert!(set.contains(&500));
    debug_assert_eq!(shape(&set), before);
    set.assert_invariants();
}
