use core::cmp::Ordering;

use crate::{
    node::{Color, NodeId, Side},
    tree::RbTree,
};

impl<K: Ord> RbTree<K> {
    /// Links a detached node into the tree and rebalances.
    ///
    /// Returns `false`, leaving the tree unchanged, if the handle is stale,
    /// the node is already linked, or a node with an equal key is present.
    ///
    /// # Example
    /// ```
    /// use arena_rbtree::{Color, RbTree};
    ///
    /// let mut tree = RbTree::new();
    /// let nodes: Vec<_> = [10, 20, 30].map(|key| tree.alloc(key).unwrap()).into();
    /// for &node in &nodes {
    ///     assert!(tree.insert(node));
    /// }
    ///
    /// // the third insert rotates 20 up to the root
    /// assert_eq!(tree.root(), Some(nodes[1]));
    /// assert_eq!(tree.color(nodes[0]), Some(Color::Red));
    /// assert_eq!(tree.color(nodes[2]), Some(Color::Red));
    /// ```
    pub fn insert(&mut self, node: NodeId) -> bool {
        match self.arena.get(node) {
            Some(candidate) if !candidate.linked => {}
            _ => return false,
        }

        let Some((parent, side)) = self.find_insertion_point(node) else {
            return false;
        };

        {
            let new = self.node_at_mut(node);
            new.parent = parent;
            new.left = None;
            new.right = None;
            new.color = Color::Red;
            new.linked = true;
        }

        match parent {
            None => self.root = Some(node),
            Some(parent) => *self.node_at_mut(parent).child_mut(side) = Some(node),
        }
        self.len += 1;

        self.fix_insertion_violations(node);

        #[cfg(debug_assertions)]
        self.debug_check("insertion");

        true
    }

    /// Leaf position for `node`'s key, or `None` when the key is taken.
    fn find_insertion_point(&self, node: NodeId) -> Option<(Option<NodeId>, Side)> {
        let key = &self.node_at(node).key;
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.root;

        while let Some(id) = current {
            side = match key.cmp(&self.node_at(id).key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return None,
            };
            parent = Some(id);
            current = self.node_at(id).child(side);
        }

        Some((parent, side))
    }
}

impl<K> RbTree<K> {
    /// Restores the invariants after `node` was linked in as a red leaf.
    ///
    /// A red uncle pushes the red-red conflict two levels up; a black uncle
    /// ends the loop with at most two rotations.
    pub(crate) fn fix_insertion_violations(&mut self, mut node: NodeId) {
        loop {
            let Some(parent) = self.node_at(node).parent else {
                self.set_color(node, Color::Black);
                return;
            };

            if self.node_at(parent).color == Color::Black {
                return;
            }

            // a red parent is never the root
            let Some(grandparent) = self.node_at(parent).parent else {
                self.set_color(parent, Color::Black);
                return;
            };

            let parent_side = self.child_side(grandparent, parent);
            let uncle = self.node_at(grandparent).child(parent_side.opposite());

            if let Some(uncle) = uncle.filter(|&uncle| self.is_red(Some(uncle))) {
                log::trace!("insert {node}: red uncle {uncle}, recolor {grandparent}");
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            if self.child_side(parent, node) != parent_side {
                log::trace!("insert {node}: inner child, rotate {parent}");
                // both red, no recoloring needed
                self.rotate(parent, parent_side);
            }

            log::trace!("insert {node}: black uncle, rotate {grandparent}");
            self.rotate_swapping_colors(grandparent, parent_side.opposite());
            return;
        }
    }
}
