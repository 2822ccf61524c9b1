//! Utility types to support semi-splay binary trees

#![warn(missing_docs)]

use alloc::vec::Vec;

use core::{cmp::Ordering, fmt::Display, ops::Deref};

use crate::config::MIN_SPLAY_SIZE;

//-----------------------------------------------------------------------------------------------//

/// The slot a leaf occupies relative to its parent
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// The leaf has no parent
    Root,
    /// The leaf is the left child of its parent
    Left,
    /// The leaf is the right child of its parent
    Right,
}

// A leaf in a semi-splay tree
#[derive(Clone)]
struct Leaf {
    parent: usize,
    left: usize,
    right: usize,
    role: Role,
}

// Buffers reused by every restructuring pass
#[derive(Clone, Default)]
struct Scratch {
    path: Vec<usize>,
    window: Vec<(usize, usize)>,
    sorted: Vec<usize>,
    slot: Vec<usize>,
}

//-----------------------------------------------------------------------------------------------//

/// A tree of integer leaves, kept in shape by semi-splaying
///
/// Like the other collections in this crate, the tree does not store keys itself. Leaves are
/// `usize` indices into an external slice of keys, which is passed to every method that needs to
/// order leaves. Missing leaves are reported as `usize::MAX`.
#[derive(Clone)]
pub struct Tree {
    leaf: Vec<Leaf>,
    root: usize,
    recycle: usize,
    count: usize,
    splay_size: usize,
    scratch: Scratch,
}

impl Tree {
    /// Construct an empty tree that regroups `splay_size` leaves per restructuring step
    ///
    /// # Panics
    ///
    /// Panics if `splay_size` is less than three.
    pub fn new(splay_size: usize) -> Tree {
        Tree::with_capacity(0, splay_size)
    }

    /// Construct an empty tree, pre-allocating a given capacity
    ///
    /// # Panics
    ///
    /// Panics if `splay_size` is less than three.
    pub fn with_capacity(capacity: usize, splay_size: usize) -> Tree {
        assert!(
            splay_size >= MIN_SPLAY_SIZE,
            "splay size {splay_size} is too small, it must be at least {MIN_SPLAY_SIZE}"
        );

        Tree {
            leaf: Vec::with_capacity(capacity),
            root: !0,
            recycle: !0,
            count: 0,
            splay_size,
            scratch: Scratch::default(),
        }
    }

    /// Get the number of leaves regrouped by one restructuring step
    #[inline]
    pub fn splay_size(&self) -> usize {
        self.splay_size
    }

    /// Get the number of leaves in the tree
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Get the number of recycled leaves in the tree
    #[inline]
    pub fn recycle_count(&self) -> usize {
        self.leaf.len() - self.count
    }

    /// Get the current allocated size of the tree. This is the current `count` plus the
    /// `recycle_count`. Note that this is not necessarily the same as the allocated capacity.
    #[inline]
    pub fn allocated_count(&self) -> usize {
        self.leaf.len()
    }

    /// Remove all leaves from the tree
    pub fn clear(&mut self) {
        self.leaf.truncate(0);
        self.root = !0;
        self.recycle = !0;
        self.count = 0;
    }

    /// Check if there are any leaves in the tree
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Reserves capacity for at least `additional` more leaves
    ///
    /// Recycled leaves count towards the `additional` requested. The return value is the amount
    /// of additional storage that had to be reserved, so that callers can grow their key slices
    /// by the same amount.
    pub fn reserve(&mut self, additional: usize) -> usize {
        let recycle_count = self.recycle_count();
        if additional > recycle_count {
            let required = additional - recycle_count;
            self.leaf.reserve(required);
            required
        } else {
            0
        }
    }

    /// Get the root leaf
    #[inline]
    pub fn root(&self) -> usize {
        self.root
    }

    /// Get the parent of a leaf
    #[inline]
    pub fn parent(&self, leaf: usize) -> usize {
        self.leaf[leaf].parent
    }

    /// Get the left child of a leaf
    #[inline]
    pub fn left(&self, leaf: usize) -> usize {
        self.leaf[leaf].left
    }

    /// Get the right child of a leaf
    #[inline]
    pub fn right(&self, leaf: usize) -> usize {
        self.leaf[leaf].right
    }

    /// Get the slot a leaf occupies in its parent
    #[inline]
    pub fn role(&self, leaf: usize) -> Role {
        self.leaf[leaf].role
    }

    /// Get a leaf using a comparison function
    ///
    /// `compare(leaf)` orders the key being searched for against the key stored for `leaf`. If
    /// no leaf compares equal then `usize::MAX` is returned.
    pub fn get_by<F>(&self, compare: F) -> usize
    where
        F: FnMut(usize) -> Ordering,
    {
        match locate_by(&self.leaf, self.root, compare) {
            Location::Found(leaf) => leaf,
            _ => !0,
        }
    }

    /// Insert a leaf using a comparison function
    ///
    /// The new leaf is returned, or `usize::MAX` if a leaf already compares equal, in which case
    /// the tree is left untouched. The new leaf may be a recycled index or the next index in the
    /// ascending sequence that has not been used before. The tree is not restructured, that is
    /// left to the caller once the key for the new leaf has been stored.
    pub fn insert_by<F>(&mut self, compare: F) -> usize
    where
        F: FnMut(usize) -> Ordering,
    {
        match locate_by(&self.leaf, self.root, compare) {
            Location::Found(_) => !0,
            Location::Root => {
                let leaf = self.alloc(!0, Role::Root);
                self.root = leaf;
                leaf
            }
            Location::Left(parent) => {
                let leaf = self.alloc(parent, Role::Left);
                self.leaf[parent].left = leaf;
                leaf
            }
            Location::Right(parent) => {
                let leaf = self.alloc(parent, Role::Right);
                self.leaf[parent].right = leaf;
                leaf
            }
        }
    }

    /// Get a leaf by key
    ///
    /// If the key is not found, then `usize::MAX` is returned. If the slice of keys is not sorted
    /// properly according to the binary tree, then the results are undefined.
    pub fn get_k<K: Ord>(&self, key: &K, key_slice: &[K]) -> usize {
        self.get_by(|x| key.cmp(&key_slice[x]))
    }

    /// Insert a leaf by key
    ///
    /// Returns the new leaf, or `usize::MAX` if the key is already present.
    pub fn insert_k<K: Ord>(&mut self, key: &K, key_slice: &[K]) -> usize {
        self.insert_by(|x| key.cmp(&key_slice[x]))
    }

    /// Get a leaf by string
    ///
    /// If the string is not found, then `usize::MAX` is returned. If the slice of strings is not
    /// sorted properly according to the binary tree, then the results are undefined.
    pub fn get_s<S: Deref<Target = str>>(&self, key: &str, key_slice: &[S]) -> usize {
        self.get_by(|x| key.cmp(&*key_slice[x]))
    }

    /// Insert a leaf by string
    ///
    /// Returns the new leaf, or `usize::MAX` if the string is already present.
    pub fn insert_s<S: Deref<Target = str>>(&mut self, key: &str, key_slice: &[S]) -> usize {
        self.insert_by(|x| key.cmp(&*key_slice[x]))
    }

    /// Unset a leaf
    ///
    /// The leaf is unlinked and added to the 'recycle bin' for possible future reallocation. The
    /// return value is the leaf at which the caller should restructure, which is the leaf that
    /// took over the removed slot, or the former parent if nothing did. `usize::MAX` is returned
    /// when there is nowhere to restructure from.
    pub fn unset(&mut self, leaf: usize) -> usize {
        let (root, restart) = prune(&mut self.leaf, leaf);
        if let Some(root) = root {
            self.root = root;
        }
        self.free(leaf);
        restart
    }

    /// Restructure the path from a leaf to the root using a comparison function
    ///
    /// `compare(a, b)` orders the keys stored for leaves `a` and `b`. The path is regrouped in
    /// windows of `splay_size` leaves, each rebuilt as a balanced subtree around its median key.
    pub fn splay_by<F>(&mut self, leaf: usize, compare: F)
    where
        F: FnMut(usize, usize) -> Ordering,
    {
        debug_assert!(!leaf != 0);

        let root = semi_splay(
            &mut self.leaf,
            leaf,
            self.splay_size,
            &mut self.scratch,
            compare,
        );
        if let Some(root) = root {
            self.root = root;
        }
    }

    /// Restructure the path from a leaf to the root, ordering leaves by key
    pub fn splay_k<K: Ord>(&mut self, leaf: usize, key_slice: &[K]) {
        self.splay_by(leaf, |a, b| key_slice[a].cmp(&key_slice[b]));
    }

    /// Restructure the path from a leaf to the root, ordering leaves by string
    pub fn splay_s<S: Deref<Target = str>>(&mut self, leaf: usize, key_slice: &[S]) {
        self.splay_by(leaf, |a, b| (*key_slice[a]).cmp(&*key_slice[b]));
    }

    /// Get the first leaf in the tree
    #[inline]
    pub fn first(&self) -> usize {
        first(&self.leaf, self.root)
    }

    /// Get the last leaf in the tree
    #[inline]
    pub fn last(&self) -> usize {
        last(&self.leaf, self.root)
    }

    /// Get the previous leaf in the tree
    #[inline]
    pub fn prev(&self, leaf: usize) -> usize {
        prev(&self.leaf, leaf)
    }

    /// Get the next leaf in the tree
    #[inline]
    pub fn next(&self, leaf: usize) -> usize {
        next(&self.leaf, leaf)
    }

    /// Get the number of edges on the longest path from the root to a leaf
    ///
    /// An empty tree has depth `-1` and a tree holding only a root has depth `0`.
    pub fn depth(&self) -> isize {
        depth(&self.leaf, self.root)
    }

    /// Check the structure of the tree, panicking if it is broken
    ///
    /// `compare(a, b)` orders the keys stored for leaves `a` and `b`. Parent links, roles, the
    /// leaf count and strict key order are all verified. This walks the whole tree, so it is
    /// intended for tests and debugging.
    pub fn assert_invariants_by<F>(&self, mut compare: F)
    where
        F: FnMut(usize, usize) -> Ordering,
    {
        check_tree(&self.leaf, self.root);
        assert_eq!(check_count(&self.leaf, self.root), self.count);

        let mut x = first(&self.leaf, self.root);
        if !x == 0 {
            return;
        }

        let mut y = next(&self.leaf, x);
        while !y != 0 {
            assert_eq!(compare(x, y), Ordering::Less);
            x = y;
            y = next(&self.leaf, y);
        }
    }

    // Allocate and initialise a new leaf
    fn alloc(&mut self, parent: usize, role: Role) -> usize {
        // Increase the leaf count
        self.count += 1;

        // Recycle an old leaf
        let leaf = self.recycle;
        if !leaf != 0 {
            let l = &mut self.leaf[leaf];
            self.recycle = l.parent;
            l.parent = parent;
            l.left = !0;
            l.right = !0;
            l.role = role;

            return leaf;
        }

        // Inititialise a new one
        let leaf = self.leaf.len();
        self.leaf.push(Leaf {
            parent,
            left: !0,
            right: !0,
            role,
        });

        leaf
    }

    // Free a leaf and add it to the recycle queue
    fn free(&mut self, leaf: usize) {
        // Decrease the leaf count
        self.count -= 1;

        // Recycle the leaf
        let l = &mut self.leaf[leaf];
        l.parent = self.recycle;
        l.left = !0;
        l.right = !0;
        l.role = Role::Root;
        self.recycle = leaf;
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[ ")?;
        let mut leaf = self.first();
        while !leaf != 0 {
            write!(f, "{leaf} ")?;
            leaf = self.next(leaf);
        }
        write!(f, "]")?;
        Ok(())
    }
}

//-----------------------------------------------------------------------------------------------//

// IMPLEMENTATION NOTE
//
// The functions below are low level. They are not 'unsafe' in the Rust sense, but they implement
// very low level operations. Use with caution.

enum Location {
    Found(usize),
    Root,
    Left(usize),
    Right(usize),
}

// Locate a leaf in a tree, or if not found identify where to insert it
fn locate_by<F>(leaf: &[Leaf], mut x: usize, mut compare: F) -> Location
where
    F: FnMut(usize) -> Ordering,
{
    if !x == 0 {
        return Location::Root;
    }

    loop {
        match compare(x) {
            Ordering::Less => {
                let y = leaf[x].left;
                if !y == 0 {
                    return Location::Left(x);
                }
                x = y;
            }
            Ordering::Greater => {
                let y = leaf[x].right;
                if !y == 0 {
                    return Location::Right(x);
                }
                x = y;
            }
            Ordering::Equal => return Location::Found(x),
        }
    }
}

// Semi-splay the path from a leaf up to the root
//
// The path is consumed bottom-up in windows of exactly `splay_size` leaves. Each window is sorted
// by key, rebuilt as a perfectly balanced subtree around its median, and the subtrees that hung
// off the window are put back into the gaps of the rebuilt subtree in key order. The root of the
// rebuilt subtree is carried into the next window. A partial window is left alone.
//
// If the root is changed by this operation then Some(root) is returned, otherwise the root is
// unchanged.
fn semi_splay<F>(
    leaf: &mut [Leaf],
    x: usize,
    splay_size: usize,
    scratch: &mut Scratch,
    mut compare: F,
) -> Option<usize>
where
    F: FnMut(usize, usize) -> Ordering,
{
    debug_assert!(splay_size >= MIN_SPLAY_SIZE);

    let Scratch {
        path,
        window,
        sorted,
        slot,
    } = scratch;

    path.clear();
    window.clear();

    let mut y = x;
    while !y != 0 {
        path.push(y);
        y = leaf[y].parent;
    }

    let mut root = None;
    let mut next = 0;

    while window.len() + (path.len() - next) >= splay_size {
        // Fill the window. Each entry records the window leaf directly below it, which is the
        // only one of its children that belongs to the window.
        while window.len() < splay_size {
            let below = window.last().map_or(!0, |&(w, _)| w);
            window.push((path[next], below));
            next += 1;
        }

        let top = window[splay_size - 1].0;
        let outer = leaf[top].parent;
        let role = leaf[top].role;

        window.sort_unstable_by(|&(a, _), &(b, _)| compare(a, b));

        // Gather the slots leaving the window in key order, empty ones included, so that there is
        // exactly one per gap between window keys
        sorted.clear();
        slot.clear();
        for &(w, below) in window.iter() {
            sorted.push(w);
            for c in [leaf[w].left, leaf[w].right] {
                if !c == 0 || c != below {
                    slot.push(c);
                }
            }
        }
        debug_assert_eq!(slot.len(), splay_size + 1);

        let z = build(leaf, sorted, outer, role);
        match role {
            Role::Root => root = Some(z),
            Role::Left => leaf[outer].left = z,
            Role::Right => leaf[outer].right = z,
        }

        // Hang the gathered slots back off the rebuilt subtree, again in key order
        let mut i = 0;
        for &w in sorted.iter() {
            if !leaf[w].left == 0 {
                attach(leaf, w, Role::Left, slot[i]);
                i += 1;
            }
            if !leaf[w].right == 0 {
                attach(leaf, w, Role::Right, slot[i]);
                i += 1;
            }
        }
        debug_assert_eq!(i, slot.len());

        log::trace!(
            "semi-splay regrouped {splay_size} leaves under leaf {z} (root changed: {})",
            role == Role::Root
        );

        window.clear();
        window.push((z, !0));
    }

    root
}

// Link a sorted run of leaves into a perfectly balanced subtree
//
// The median (the upper one for runs of even length) becomes the subtree root and both halves are
// built the same way. Returns the subtree root, or `usize::MAX` for an empty run.
fn build(leaf: &mut [Leaf], sorted: &[usize], parent: usize, role: Role) -> usize {
    if sorted.is_empty() {
        return !0;
    }

    let mid = sorted.len() / 2;
    let x = sorted[mid];

    leaf[x].parent = parent;
    leaf[x].role = role;
    leaf[x].left = build(leaf, &sorted[..mid], x, Role::Left);
    leaf[x].right = build(leaf, &sorted[mid + 1..], x, Role::Right);

    x
}

// Make `c` (possibly no leaf) the child of `x` in the given slot
fn attach(leaf: &mut [Leaf], x: usize, role: Role, c: usize) {
    match role {
        Role::Left => leaf[x].left = c,
        Role::Right => leaf[x].right = c,
        Role::Root => unreachable!("a child cannot take the root slot"),
    }

    if !c != 0 {
        leaf[c].parent = x;
        leaf[c].role = role;
    }
}

// Put `c` (possibly no leaf) in the slot currently occupied by `x`
//
// If `x` was the root then Some(c) is returned, otherwise the root is unchanged.
fn replace(leaf: &mut [Leaf], x: usize, c: usize) -> Option<usize> {
    let y = leaf[x].parent;
    let role = leaf[x].role;

    if !c != 0 {
        leaf[c].parent = y;
        leaf[c].role = role;
    }

    match role {
        Role::Root => Some(c),
        Role::Left => {
            debug_assert_eq!(leaf[y].left, x);
            leaf[y].left = c;
            None
        }
        Role::Right => {
            debug_assert_eq!(leaf[y].right, x);
            leaf[y].right = c;
            None
        }
    }
}

// Unlink a leaf from a tree
//
// A leaf with at most one child is replaced by that child. A leaf with two children is replaced
// by its successor, the left-most leaf of its right subtree, which never has a left child of its
// own. Note that this function does not free any memory associated with the pruned leaf, it just
// modifies the surrounding leaves.
//
// Returns Some(root) if the root changed, along with the leaf at which restructuring should
// start: the leaf that moved into the pruned slot, the successor's former parent if that was not
// the pruned leaf, or the pruned leaf's parent if nothing moved.
fn prune(leaf: &mut [Leaf], x: usize) -> (Option<usize>, usize) {
    debug_assert!(!x != 0);

    let y = leaf[x].parent;
    let a = leaf[x].left;
    let b = leaf[x].right;

    if !a == 0 || !b == 0 {
        let c = if !a == 0 { b } else { a };
        let root = replace(leaf, x, c);
        return (root, if !c != 0 { c } else { y });
    }

    let mut s = b;
    loop {
        let z = leaf[s].left;
        if !z == 0 {
            break;
        }
        s = z;
    }

    let restart = if s == b {
        s
    } else {
        let p = leaf[s].parent;
        let c = leaf[s].right;

        leaf[p].left = c;
        if !c != 0 {
            leaf[c].parent = p;
            leaf[c].role = Role::Left;
        }

        leaf[s].right = b;
        leaf[b].parent = s;
        p
    };

    leaf[s].left = a;
    leaf[a].parent = s;

    (replace(leaf, x, s), restart)
}

// Get the first leaf (the left-most)
fn first(leaf: &[Leaf], mut x: usize) -> usize {
    // `x` should be a root
    debug_assert!(!x == 0 || leaf[x].parent == !0);

    if !x == 0 {
        return !0;
    }

    loop {
        let y = leaf[x].left;
        if !y == 0 {
            return x;
        }
        x = y;
    }
}

// Get the last leaf (the right-most)
fn last(leaf: &[Leaf], mut x: usize) -> usize {
    // `x` should be a root
    debug_assert!(!x == 0 || leaf[x].parent == !0);

    if !x == 0 {
        return !0;
    }

    loop {
        let y = leaf[x].right;
        if !y == 0 {
            return x;
        }
        x = y;
    }
}

// Get the logical predecessor to a leaf
fn prev(leaf: &[Leaf], mut x: usize) -> usize {
    let mut y = leaf[x].left;
    if !y != 0 {
        loop {
            let z = leaf[y].right;
            if !z == 0 {
                return y;
            }
            y = z;
        }
    }

    loop {
        if leaf[x].role == Role::Root {
            return !0;
        }
        let y = leaf[x].parent;
        if leaf[x].role == Role::Right {
            return y;
        }
        x = y;
    }
}

// Get the logical successor to a leaf
fn next(leaf: &[Leaf], mut x: usize) -> usize {
    let mut y = leaf[x].right;
    if !y != 0 {
        loop {
            let z = leaf[y].left;
            if !z == 0 {
                return y;
            }
            y = z;
        }
    }

    loop {
        if leaf[x].role == Role::Root {
            return !0;
        }
        let y = leaf[x].parent;
        if leaf[x].role == Role::Left {
            return y;
        }
        x = y;
    }
}

// Get the longest root-to-leaf edge count
fn depth(leaf: &[Leaf], root: usize) -> isize {
    if !root == 0 {
        return -1;
    }

    let mut deepest = 0;
    let mut stack = Vec::new();
    stack.push((root, 0usize));

    while let Some((x, d)) = stack.pop() {
        deepest = deepest.max(d);
        for y in [leaf[x].left, leaf[x].right] {
            if !y != 0 {
                stack.push((y, d + 1));
            }
        }
    }

    deepest as isize
}

//-----------------------------------------------------------------------------------------------//

// Check the links and roles of every leaf
fn check_tree(leaf: &[Leaf], root: usize) {
    // Check we are starting at the root
    assert!(!root == 0 || (leaf[root].parent == !0 && leaf[root].role == Role::Root));

    // Iterate over leaves and check each one
    let mut x = first(leaf, root);

    while !x != 0 {
        let y = leaf[x].left;
        let z = leaf[x].right;

        if !y != 0 {
            assert_eq!(x, leaf[y].parent);
            assert_eq!(leaf[y].role, Role::Left);
        }

        if !z != 0 {
            assert_eq!(x, leaf[z].parent);
            assert_eq!(leaf[z].role, Role::Right);
        }

        x = next(leaf, x);
    }
}

// Count leaves in both directions
fn check_count(leaf: &[Leaf], root: usize) -> usize {
    // Count leaves (forwards)
    let mut x = first(leaf, root);
    let mut count_f = 0;

    while !x != 0 {
        count_f += 1;
        x = next(leaf, x);
    }

    // Count leaves (backwards)
    x = last(leaf, root);
    let mut count_b = 0;

    while !x != 0 {
        count_b += 1;
        x = prev(leaf, x);
    }

    assert_eq!(count_f, count_b);

    count_f
}

//-----------------------------------------------------------------------------------------------//

#[cfg(test)]
// Insert keys into a tree the way a set does, returning the key slice
fn build_tree(tree: &mut Tree, keys: &[i32]) -> Vec<i32> {
    let mut key_slice = Vec::new();
    for &key in keys {
        let leaf = tree.insert_k(&key, &key_slice);
        assert!(!leaf != 0);
        assert_eq!(leaf, key_slice.len());
        key_slice.push(key);
        tree.splay_k(leaf, &key_slice);
        tree.assert_invariants_by(|a, b| key_slice[a].cmp(&key_slice[b]));
    }
    key_slice
}

#[cfg(test)]
// Insert keys into a tree without restructuring, so the shape follows the insertion order
fn plant_tree(tree: &mut Tree, keys: &[i32]) -> Vec<i32> {
    let mut key_slice = Vec::new();
    for &key in keys {
        let leaf = tree.insert_k(&key, &key_slice);
        assert_eq!(leaf, key_slice.len());
        key_slice.push(key);
    }
    tree.assert_invariants_by(|a, b| key_slice[a].cmp(&key_slice[b]));
    key_slice
}

#[test]
// A window of three regroups a short left-leaning path around its median
fn test_tree_splay_3() {
    let mut tree = Tree::new(3);
    let key_slice = build_tree(&mut tree, &[0, -3, -5]);

    let root = tree.root();
    debug_assert_eq!(key_slice[root], -3);
    debug_assert_eq!(key_slice[tree.left(root)], -5);
    debug_assert_eq!(key_slice[tree.right(root)], 0);
    debug_assert_eq!(tree.role(tree.left(root)), Role::Left);
    debug_assert_eq!(tree.parent(tree.right(root)), root);
    debug_assert_eq!(tree.depth(), 1);
}

#[test]
// Paths shorter than a window are left alone
fn test_tree_partial_window() {
    let mut tree = Tree::new(4);
    let key_slice = build_tree(&mut tree, &[0, -1, -2]);

    let root = tree.root();
    debug_assert_eq!(key_slice[root], 0);
    debug_assert_eq!(tree.depth(), 2);
    debug_assert_eq!(tree.role(root), Role::Root);
}

#[test]
// Even windows take the upper median as their root
fn test_tree_splay_4() {
    let mut tree = Tree::new(4);
    let key_slice = build_tree(&mut tree, &[0, 10, 8, 4]);

    let root = tree.root();
    debug_assert_eq!(key_slice[root], 8);
    debug_assert_eq!(key_slice[tree.right(root)], 10);
    let left = tree.left(root);
    debug_assert_eq!(key_slice[left], 4);
    debug_assert_eq!(key_slice[tree.left(left)], 0);
    debug_assert_eq!(tree.right(left), !0);
}

#[test]
// Outer subtrees are carried into the gaps of consecutive windows
fn test_tree_splay_carry() {
    let mut tree = Tree::new(3);
    let key_slice = build_tree(&mut tree, &[0, 6, 10, 8, -1, 7, -5]);

    let key = |leaf: usize| key_slice[leaf];
    let root = tree.root();
    let left = tree.left(root);
    let right = tree.right(root);

    debug_assert_eq!(key(root), 6);
    debug_assert_eq!(key(left), -1);
    debug_assert_eq!(key(tree.left(left)), -5);
    debug_assert_eq!(key(tree.right(left)), 0);
    debug_assert_eq!(key(right), 8);
    debug_assert_eq!(key(tree.left(right)), 7);
    debug_assert_eq!(key(tree.right(right)), 10);
}

#[test]
// Removing a leaf with two children hands its slot to the successor
fn test_tree_unset_two_children() {
    let mut tree = Tree::new(3);
    let key_slice = build_tree(&mut tree, &[0, 6, 10, 8, -1, 7, -5]);

    // 6 is the root, its successor 7 sits below 8
    let six = tree.get_k(&6, &key_slice);
    let eight = tree.get_k(&8, &key_slice);
    let seven = tree.get_k(&7, &key_slice);

    let restart = tree.unset(six);
    debug_assert_eq!(restart, eight);
    debug_assert_eq!(tree.root(), seven);
    debug_assert_eq!(tree.left(eight), !0);
    debug_assert_eq!(tree.count(), 6);
    tree.assert_invariants_by(|a, b| key_slice[a].cmp(&key_slice[b]));

    tree.splay_k(restart, &key_slice);
    tree.assert_invariants_by(|a, b| key_slice[a].cmp(&key_slice[b]));
    debug_assert_eq!(tree.get_k(&6, &key_slice), !0);
}

#[test]
// Unsetting a childless leaf restarts at its former parent
fn test_tree_unset_leaf() {
    let mut tree = Tree::new(3);
    let key_slice = plant_tree(&mut tree, &[10, 5, 7, 6, 4, 12]);
    let [ten, five, seven, six, four, twelve] = [0, 1, 2, 3, 4, 5];
    debug_assert_eq!(tree.root(), ten);

    let restart = tree.unset(six);
    debug_assert_eq!(restart, seven);
    debug_assert_eq!(tree.left(seven), !0);

    // The window 7, 5, 10 is rebuilt around 7 and the outer subtrees keep their order
    tree.splay_k(restart, &key_slice);
    debug_assert_eq!(tree.root(), seven);
    debug_assert_eq!(tree.left(seven), five);
    debug_assert_eq!(tree.right(seven), ten);
    debug_assert_eq!(tree.left(five), four);
    debug_assert_eq!(tree.right(five), !0);
    debug_assert_eq!(tree.left(ten), !0);
    debug_assert_eq!(tree.right(ten), twelve);
    debug_assert_eq!(tree.parent(twelve), ten);
    debug_assert_eq!(tree.role(four), Role::Left);
    tree.assert_invariants_by(|a, b| key_slice[a].cmp(&key_slice[b]));

    // Nothing is left to restructure once the last leaf goes
    let mut tree = Tree::new(3);
    plant_tree(&mut tree, &[1]);
    debug_assert_eq!(tree.unset(0), !0);
    debug_assert_eq!(tree.root(), !0);
}

#[test]
// Unsetting a leaf with one child restarts at the child that took its slot
fn test_tree_unset_one_child() {
    let mut tree = Tree::new(3);
    let key_slice = plant_tree(&mut tree, &[10, 5, 7, 6, 4, 12]);
    let [ten, five, seven, six, four, twelve] = [0, 1, 2, 3, 4, 5];

    let restart = tree.unset(seven);
    debug_assert_eq!(restart, six);
    debug_assert_eq!(tree.right(five), six);
    debug_assert_eq!(tree.role(six), Role::Right);

    tree.splay_k(restart, &key_slice);
    debug_assert_eq!(tree.root(), six);
    debug_assert_eq!(tree.left(six), five);
    debug_assert_eq!(tree.right(six), ten);
    debug_assert_eq!(tree.left(five), four);
    debug_assert_eq!(tree.right(five), !0);
    debug_assert_eq!(tree.left(ten), !0);
    debug_assert_eq!(tree.right(ten), twelve);
    tree.assert_invariants_by(|a, b| key_slice[a].cmp(&key_slice[b]));
}

#[test]
// Unsetting a leaf whose successor sits deep restarts at the successor's former parent
fn test_tree_unset_deep_successor() {
    let mut tree = Tree::new(3);
    let key_slice = plant_tree(&mut tree, &[20, 10, 5, 18, 15, 16, 30]);
    let [twenty, ten, five, eighteen, fifteen, sixteen, thirty] = [0, 1, 2, 3, 4, 5, 6];

    let restart = tree.unset(ten);
    debug_assert_eq!(restart, eighteen);
    debug_assert_eq!(tree.left(twenty), fifteen);
    debug_assert_eq!(tree.left(fifteen), five);
    debug_assert_eq!(tree.right(fifteen), eighteen);
    debug_assert_eq!(tree.left(eighteen), sixteen);

    // The window 18, 15, 20 is rebuilt around 18
    tree.splay_k(restart, &key_slice);
    debug_assert_eq!(tree.root(), eighteen);
    debug_assert_eq!(tree.left(eighteen), fifteen);
    debug_assert_eq!(tree.right(eighteen), twenty);
    debug_assert_eq!(tree.left(fifteen), five);
    debug_assert_eq!(tree.right(fifteen), sixteen);
    debug_assert_eq!(tree.left(twenty), !0);
    debug_assert_eq!(tree.right(twenty), thirty);
    debug_assert_eq!(tree.depth(), 2);
    tree.assert_invariants_by(|a, b| key_slice[a].cmp(&key_slice[b]));
}

#[test]
// Leaves are listed in key order
fn test_tree_display() {
    let mut tree = Tree::new(3);
    debug_assert_eq!(alloc::format!("{tree}"), "[ ]");

    plant_tree(&mut tree, &[10, 5, 7]);
    debug_assert_eq!(alloc::format!("{tree}"), "[ 1 2 0 ]");
}

#[test]
// Unset leaves are recycled by later insertions
fn test_tree_recycle() {
    let mut tree = Tree::new(3);
    let mut key_slice = build_tree(&mut tree, &[1, 2, 3]);

    let two = tree.get_k(&2, &key_slice);
    let restart = tree.unset(two);
    if !restart != 0 {
        tree.splay_k(restart, &key_slice);
    }
    debug_assert_eq!(tree.recycle_count(), 1);
    debug_assert_eq!(tree.reserve(1), 0);

    let leaf = tree.insert_k(&5, &key_slice);
    debug_assert_eq!(leaf, two);
    key_slice[leaf] = 5;
    tree.splay_k(leaf, &key_slice);
    tree.assert_invariants_by(|a, b| key_slice[a].cmp(&key_slice[b]));
    debug_assert_eq!(tree.recycle_count(), 0);
    debug_assert_eq!(tree.count(), 3);
}

#[test]
// Strings are ordered through their `str` representation
fn test_tree_strings() {
    use alloc::string::{String, ToString};

    let mut tree = Tree::new(3);
    let mut key_slice: Vec<String> = Vec::new();

    for key in ["pear", "apple", "fig", "kiwi"] {
        let leaf = tree.insert_s(key, &key_slice);
        key_slice.push(key.to_string());
        tree.splay_s(leaf, &key_slice);
    }

    debug_assert_eq!(tree.insert_s("fig", &key_slice), !0);
    debug_assert_eq!(key_slice[tree.first()], "apple");
    debug_assert_eq!(key_slice[tree.last()], "pear");
    debug_assert_eq!(key_slice[tree.get_s("kiwi", &key_slice)], "kiwi");
    debug_assert_eq!(tree.get_s("plum", &key_slice), !0);
}

#[test]
// Depth of empty and single leaf trees
fn test_tree_depth() {
    let mut tree = Tree::new(3);
    debug_assert_eq!(tree.depth(), -1);

    build_tree(&mut tree, &[42]);
    debug_assert_eq!(tree.depth(), 0);

    tree.clear();
    debug_assert_eq!(tree.depth(), -1);
    debug_assert!(tree.is_empty());
}

#[test]
#[should_panic(expected = "splay size 2 is too small")]
fn test_tree_rejects_small_windows() {
    let _ = Tree::new(2);
}
