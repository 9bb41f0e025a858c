use core::iter::FusedIterator;

use crate::{node::NodeId, tree::RbTree};

impl<K> RbTree<K> {
    /// Node holding the smallest key
    pub fn first(&self) -> Option<NodeId> {
        self.root.map(|root| self.leftmost(root))
    }

    /// Node holding the largest key
    pub fn last(&self) -> Option<NodeId> {
        self.root.map(|root| self.rightmost(root))
    }

    /// In-order successor of a linked node.
    ///
    /// Returns `None` at the last node, or for a stale or detached handle.
    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        if !self.is_linked(node) {
            return None;
        }
        self.successor(node)
    }

    /// In-order predecessor of a linked node.
    ///
    /// Returns `None` at the first node, or for a stale or detached handle.
    pub fn previous(&self, node: NodeId) -> Option<NodeId> {
        if !self.is_linked(node) {
            return None;
        }
        self.predecessor(node)
    }

    /// First node of the destruction order: the left-deepest leaf.
    ///
    /// Visiting nodes through [`first_to_erase`](Self::first_to_erase) and
    /// [`next_to_erase`](Self::next_to_erase) reaches every node exactly once
    /// and always after all of its descendants, so a node may be freed as soon
    /// as the next one has been looked up.
    pub fn first_to_erase(&self) -> Option<NodeId> {
        self.root.map(|root| self.left_deepest(root))
    }

    /// Next node of the destruction order after `node`.
    pub fn next_to_erase(&self, node: NodeId) -> Option<NodeId> {
        if !self.is_linked(node) {
            return None;
        }
        self.erase_order_successor(node)
    }

    /// In-order iterator over the keys.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            tree: self,
            front: self.first(),
            back: self.last(),
            remaining: self.len,
        }
    }

    /// Unlinks every node and yields the owned keys in destruction order.
    ///
    /// Detached nodes that were allocated but never inserted stay allocated.
    /// Dropping the iterator early still frees the remaining tree nodes. If
    /// the iterator is leaked instead, the nodes it did not reach stay
    /// allocated as detached nodes and can be [`release`](Self::release)d
    /// by handle.
    pub fn drain(&mut self) -> Drain<'_, K> {
        let next = self.first_to_erase();

        let mut cursor = next;
        while let Some(node) = cursor {
            cursor = self.erase_order_successor(node);
            self.node_at_mut(node).linked = false;
        }

        self.root = None;
        self.len = 0;
        Drain { tree: self, next }
    }

    /// Frees every linked node, children before parents.
    pub fn clear(&mut self) {
        self.drain().for_each(drop);
    }

    pub(crate) fn leftmost(&self, mut node: NodeId) -> NodeId {
        while let Some(left) = self.node_at(node).left {
            node = left;
        }
        node
    }

    pub(crate) fn rightmost(&self, mut node: NodeId) -> NodeId {
        while let Some(right) = self.node_at(node).right {
            node = right;
        }
        node
    }

    pub(crate) fn successor(&self, node: NodeId) -> Option<NodeId> {
        if let Some(right) = self.node_at(node).right {
            return Some(self.leftmost(right));
        }

        let mut current = node;
        while let Some(parent) = self.node_at(current).parent {
            if self.node_at(parent).right != Some(current) {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    pub(crate) fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        if let Some(left) = self.node_at(node).left {
            return Some(self.rightmost(left));
        }

        let mut current = node;
        while let Some(parent) = self.node_at(current).parent {
            if self.node_at(parent).left != Some(current) {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    /// Descends preferring left, then right, until reaching a node with no children.
    fn left_deepest(&self, mut node: NodeId) -> NodeId {
        loop {
            let current = self.node_at(node);
            match (current.left, current.right) {
                (Some(left), _) => node = left,
                (None, Some(right)) => node = right,
                (None, None) => return node,
            }
        }
    }

    /// Dereferences only `node` and nodes the destruction order has not
    /// visited yet, so everything before `node` may already be freed.
    fn erase_order_successor(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.node_at(node).parent?;
        let siblings = self.node_at(parent);

        match siblings.right {
            Some(right) if siblings.left == Some(node) => Some(self.left_deepest(right)),
            _ => Some(parent),
        }
    }
}

impl<'a, K> IntoIterator for &'a RbTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Double-ended in-order iterator over the keys of an [`RbTree`].
#[derive(Debug)]
pub struct Iter<'a, K> {
    tree: &'a RbTree<K>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.front?;
        self.front = self.tree.successor(node);
        self.remaining -= 1;
        Some(&self.tree.node_at(node).key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> DoubleEndedIterator for Iter<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.back?;
        self.back = self.tree.predecessor(node);
        self.remaining -= 1;
        Some(&self.tree.node_at(node).key)
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}

/// Draining iterator returned by [`RbTree::drain`].
#[derive(Debug)]
pub struct Drain<'a, K> {
    tree: &'a mut RbTree<K>,
    next: Option<NodeId>,
}

impl<K> Iterator for Drain<'_, K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = self.tree.erase_order_successor(node);
        self.tree.arena.deallocate(node).map(|node| node.key)
    }
}

impl<K> FusedIterator for Drain<'_, K> {}

impl<K> Drop for Drain<'_, K> {
    fn drop(&mut self) {
        self.by_ref().for_each(drop);
    }
}
