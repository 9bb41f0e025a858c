use core::{borrow::Borrow, cmp::Ordering};

use crate::{
    arena::Arena,
    node::{Color, Node, NodeId, Side},
};

/// An arena-backed Red-Black tree over totally ordered keys.
///
/// Nodes are stored in an internal arena and referenced through [`NodeId`]
/// handles, so parent back-links never alias ownership. The low-level
/// protocol mirrors a classic intrusive tree:
///
/// 1. [`alloc`](Self::alloc) a detached node holding a key,
/// 2. [`insert`](Self::insert) it (rejected on a duplicate key),
/// 3. [`erase`](Self::erase) it again, which only unlinks it,
/// 4. [`release`](Self::release) the detached node to get the key back.
///
/// The key-level helpers ([`insert_key`](Self::insert_key),
/// [`remove_key`](Self::remove_key), ...) wrap these steps.
///
/// Every operation is O(log n); the tree is single-writer and holds no locks.
///
/// # Example
/// ```
/// use arena_rbtree::RbTree;
///
/// let mut tree = RbTree::new();
/// let node = tree.alloc(5).unwrap();
/// assert!(tree.insert(node));
/// assert!(tree.insert_key(8).is_some());
/// // duplicate keys are rejected
/// assert!(tree.insert_key(5).is_none());
///
/// assert_eq!(tree.find(&5), Some(node));
/// assert!(tree.contains(&8));
///
/// assert!(tree.erase(node));
/// assert_eq!(tree.release(node), Some(5));
/// assert!(!tree.contains(&5));
/// ```
#[derive(Debug, Clone)]
pub struct RbTree<K> {
    /// Node storage, including detached nodes not yet inserted
    pub(crate) arena: Arena<K>,

    /// Handle of the root node (None when the tree is empty)
    pub(crate) root: Option<NodeId>,

    /// Number of nodes currently linked into the tree
    pub(crate) len: usize,
}

impl<K> Default for RbTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> RbTree<K> {
    /// Creates an empty tree whose arena grows on demand.
    pub const fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates an empty tree that can hold at most `capacity` allocated nodes.
    ///
    /// Memory for all nodes is reserved up front; once `capacity` nodes are
    /// allocated, [`alloc`](Self::alloc) returns `None` until one is released.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::bounded(capacity),
            root: None,
            len: 0,
        }
    }

    /// Number of nodes linked into the tree
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no node is linked into the tree
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated nodes, linked or detached
    #[inline]
    pub const fn allocated(&self) -> usize {
        self.arena.live()
    }

    /// Maximum number of allocated nodes, or `None` for a growable tree
    #[inline]
    pub const fn capacity(&self) -> Option<usize> {
        self.arena.limit()
    }

    /// Number of nodes that can still be allocated, or `None` for a growable tree
    #[inline]
    pub fn remaining_capacity(&self) -> Option<usize> {
        self.arena
            .limit()
            .map(|limit| limit.saturating_sub(self.arena.live()))
    }

    /// Allocates a detached red node holding `key`.
    ///
    /// Returns `None` when a bounded tree is out of capacity.
    pub fn alloc(&mut self, key: K) -> Option<NodeId> {
        self.arena.allocate(Node::detached(key))
    }

    /// Frees a detached node and hands its key back.
    ///
    /// Returns `None` if the handle is stale or the node is still linked;
    /// [`erase`](Self::erase) it first.
    pub fn release(&mut self, node: NodeId) -> Option<K> {
        if self.arena.get(node)?.linked {
            return None;
        }
        self.arena.deallocate(node).map(|node| node.key)
    }

    /// Handle of the root node
    #[inline]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Key stored in `node`, or `None` for a stale handle
    #[inline]
    pub fn key(&self, node: NodeId) -> Option<&K> {
        self.arena.get(node).map(|node| &node.key)
    }

    /// Color of `node`, or `None` for a stale handle
    #[inline]
    pub fn color(&self, node: NodeId) -> Option<Color> {
        self.arena.get(node).map(|node| node.color)
    }

    /// Parent of `node`
    #[inline]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.parent
    }

    /// Left child of `node`
    #[inline]
    pub fn left(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.left
    }

    /// Right child of `node`
    #[inline]
    pub fn right(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.right
    }

    /// Returns `true` if `node` is allocated and currently linked into the tree
    #[inline]
    pub fn is_linked(&self, node: NodeId) -> bool {
        self.arena.get(node).is_some_and(|node| node.linked)
    }

    /// Smallest key in the tree
    pub fn min(&self) -> Option<&K> {
        self.first().map(|node| &self.node_at(node).key)
    }

    /// Largest key in the tree
    pub fn max(&self) -> Option<&K> {
        self.last().map(|node| &self.node_at(node).key)
    }

    #[inline]
    pub(crate) fn node_at(&self, id: NodeId) -> &Node<K> {
        self.arena.node_at(id)
    }

    #[inline]
    pub(crate) fn node_at_mut(&mut self, id: NodeId) -> &mut Node<K> {
        self.arena.node_at_mut(id)
    }

    /// Absent children count as black.
    #[inline]
    pub(crate) fn get_color(&self, id: Option<NodeId>) -> Color {
        match id {
            Some(id) => self.node_at(id).color,
            None => Color::Black,
        }
    }

    #[inline]
    pub(crate) fn is_red(&self, id: Option<NodeId>) -> bool {
        self.get_color(id) == Color::Red
    }

    #[inline]
    pub(crate) fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_at_mut(id).color = color;
    }

    /// Side of `parent` that `child` hangs from.
    #[inline]
    pub(crate) fn child_side(&self, parent: NodeId, child: NodeId) -> Side {
        if self.node_at(parent).left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Points `parent`'s link to `old` (or the root link) at `new` and
    /// gives `new` the parent back-reference.
    pub(crate) fn replace_child(
        &mut self,
        parent: Option<NodeId>,
        old: NodeId,
        new: Option<NodeId>,
    ) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.child_side(parent, old);
                *self.node_at_mut(parent).child_mut(side) = new;
            }
        }

        if let Some(new) = new {
            self.node_at_mut(new).parent = parent;
        }
    }

    /// Debug-build self-check run after every structural mutation.
    #[cfg(debug_assertions)]
    pub(crate) fn debug_check(&self, operation: &str)
    where
        K: Ord,
    {
        if let Err(violation) = self.validate() {
            panic!("RB tree invariants violated after {operation}: {violation}");
        }
    }
}

impl<K: Ord> RbTree<K> {
    /// Finds the node holding `key`.
    ///
    /// Descends by comparison in O(height).
    pub fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;

        while let Some(id) = current {
            let node = self.node_at(id);
            match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(id),
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
            }
        }
        None
    }

    /// Returns `true` if `key` is present
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns the stored key equal to `key`
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| &self.node_at(id).key)
    }

    /// Allocates a node for `key` and links it into the tree.
    ///
    /// Returns `None`, dropping `key`, when the key is already present or a
    /// bounded tree is out of capacity.
    pub fn insert_key(&mut self, key: K) -> Option<NodeId> {
        if self.contains(&key) {
            return None;
        }

        let node = self.alloc(key)?;
        if self.insert(node) {
            Some(node)
        } else {
            self.release(node);
            None
        }
    }

    /// Unlinks and frees the node holding `key`, returning the stored key.
    pub fn remove_key<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find(key)?;
        self.erase(node);
        self.release(node)
    }
}

impl<K: Ord> Extend<K> for RbTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert_key(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for RbTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rbtree_creation() {
        let tree = RbTree::<i32>::new();
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert!(tree.root().is_none());
        assert!(tree.capacity().is_none());
        assert!(tree.remaining_capacity().is_none());
        assert!(tree.min().is_none());
        assert!(tree.max().is_none());
        assert!(tree.find(&1).is_none());
    }

    #[test]
    #[should_panic(expected = "Capacity must be greater than 0")]
    fn test_rbtree_zero_capacity() {
        RbTree::<i32>::with_capacity(0);
    }

    #[test]
    fn test_rbtree_single_element() {
        let mut tree = RbTree::new();

        let node = tree.alloc(42).unwrap();
        assert_eq!(tree.color(node), Some(Color::Red));
        assert!(!tree.is_linked(node));
        assert!(tree.insert(node));

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), Some(node));
        assert_eq!(tree.color(node), Some(Color::Black));
        assert!(tree.parent(node).is_none());
        assert_eq!(tree.min(), Some(&42));
        assert_eq!(tree.max(), Some(&42));

        assert!(tree.erase(node));
        assert!(tree.is_empty());
        assert!(tree.root().is_none());
        assert_eq!(tree.release(node), Some(42));
        assert_eq!(tree.allocated(), 0);
    }

    #[test]
    fn test_rbtree_duplicates_rejected() {
        let mut tree = RbTree::new();

        let first = tree.alloc(5).unwrap();
        let second = tree.alloc(5).unwrap();
        assert!(tree.insert(first));
        assert!(!tree.insert(second));

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.find(&5), Some(first));
        assert!(!tree.is_linked(second));
        assert_eq!(tree.release(second), Some(5));

        assert!(tree.insert_key(5).is_none());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.allocated(), 1);
    }

    #[test]
    fn test_rbtree_insert_linked_node_again() {
        let mut tree = RbTree::new();
        let node = tree.insert_key(1).unwrap();

        assert!(!tree.insert(node));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_rbtree_release_linked_node_refused() {
        let mut tree = RbTree::new();
        let node = tree.insert_key(1).unwrap();

        assert!(tree.release(node).is_none());
        assert!(tree.contains(&1));

        assert!(tree.erase(node));
        assert_eq!(tree.release(node), Some(1));
        assert!(tree.release(node).is_none());
    }

    #[test]
    fn test_rbtree_capacity_limits() {
        let mut tree = RbTree::with_capacity(3);

        assert!(tree.insert_key(1).is_some());
        assert!(tree.insert_key(2).is_some());
        assert!(tree.insert_key(3).is_some());
        assert_eq!(tree.remaining_capacity(), Some(0));

        assert!(tree.insert_key(4).is_none());
        assert!(tree.alloc(4).is_none());
        assert_eq!(tree.len(), 3);

        assert_eq!(tree.remove_key(&2), Some(2));
        assert_eq!(tree.remaining_capacity(), Some(1));
        assert!(tree.insert_key(4).is_some());
        assert_eq!(tree.capacity(), Some(3));
    }

    #[test]
    fn test_rbtree_three_ascending_keys_rotate() {
        let mut tree = RbTree::new();
        let a = tree.insert_key(10).unwrap();
        let b = tree.insert_key(20).unwrap();
        let c = tree.insert_key(30).unwrap();

        assert_eq!(tree.root(), Some(b));
        assert_eq!(tree.color(b), Some(Color::Black));
        assert_eq!(tree.left(b), Some(a));
        assert_eq!(tree.right(b), Some(c));
        assert_eq!(tree.color(a), Some(Color::Red));
        assert_eq!(tree.color(c), Some(Color::Red));
        assert_eq!(tree.parent(a), Some(b));
        assert_eq!(tree.parent(c), Some(b));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_rbtree_erase_two_children() {
        let mut tree: RbTree<i32> = [50, 30, 70, 20, 40, 60, 80].into_iter().collect();
        assert!(tree.validate().is_ok());

        let node = tree.find(&30).unwrap();
        assert!(tree.erase(node));
        assert!(tree.validate().is_ok());

        assert!(tree.find(&30).is_none());
        for key in [50, 70, 20, 40, 60, 80] {
            assert!(tree.find(&key).is_some(), "missing {key}");
        }
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn test_rbtree_remove_key() {
        let mut tree: RbTree<i32> = (1..=7).collect();

        assert_eq!(tree.remove_key(&4), Some(4));
        assert_eq!(tree.remove_key(&4), None);
        assert_eq!(tree.remove_key(&100), None);
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.allocated(), 6);
        assert_eq!(tree.min(), Some(&1));
        assert_eq!(tree.max(), Some(&7));
    }

    #[test]
    fn test_rbtree_borrowed_lookup() {
        let mut tree = RbTree::new();
        tree.insert_key(alloc::string::String::from("beta"));
        tree.insert_key(alloc::string::String::from("alpha"));

        assert!(tree.contains("alpha"));
        assert_eq!(tree.get("beta").map(|s| s.as_str()), Some("beta"));
        assert!(!tree.contains("gamma"));
        assert_eq!(tree.remove_key("alpha").as_deref(), Some("alpha"));
    }

    #[test]
    fn test_rbtree_stale_handle_accessors() {
        let mut tree = RbTree::new();
        let node = tree.alloc(3).unwrap();
        tree.release(node);

        assert!(tree.key(node).is_none());
        assert!(tree.color(node).is_none());
        assert!(tree.parent(node).is_none());
        assert!(!tree.is_linked(node));
        assert!(!tree.insert(node));
        assert!(!tree.erase(node));
    }

    #[test]
    fn test_rbtree_large_dataset() {
        let mut tree = RbTree::new();

        for i in 0..500 {
            tree.insert_key(i).unwrap();
        }

        assert_eq!(tree.len(), 500);
        assert_eq!(tree.min(), Some(&0));
        assert_eq!(tree.max(), Some(&499));

        for i in (0..500).step_by(2) {
            assert_eq!(tree.remove_key(&i), Some(i));
        }

        assert_eq!(tree.len(), 250);
        for i in 0..500 {
            assert_eq!(tree.contains(&i), i % 2 == 1);
        }
    }

    #[test]
    fn test_rbtree_reverse_order_insertion() {
        let mut tree = RbTree::new();

        for i in (1..=5).rev() {
            tree.insert_key(i).unwrap();
        }

        assert_eq!(tree.len(), 5);
        assert_eq!(tree.min(), Some(&1));
        assert_eq!(tree.max(), Some(&5));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_rbtree_alternating_insert_remove() {
        let mut tree = RbTree::new();

        tree.insert_key(5).unwrap();
        tree.insert_key(3).unwrap();
        tree.remove_key(&5).unwrap();
        tree.insert_key(7).unwrap();
        tree.remove_key(&3).unwrap();
        tree.insert_key(1).unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.min(), Some(&1));
        assert_eq!(tree.max(), Some(&7));
    }

    #[test]
    fn test_rbtree_memory_reuse() {
        let mut tree = RbTree::with_capacity(3);

        let a = tree.insert_key(1).unwrap();
        tree.insert_key(2).unwrap();
        tree.insert_key(3).unwrap();

        tree.remove_key(&1).unwrap();
        let d = tree.insert_key(4).unwrap();
        assert_eq!(d, a);
        assert_eq!(tree.key(d), Some(&4));
    }
}
