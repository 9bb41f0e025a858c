use crate::{
    node::{Color, NodeId, Side},
    tree::RbTree,
};

impl<K: Ord> RbTree<K> {
    /// Unlinks `node` from the tree and rebalances.
    ///
    /// The node is identified by handle, not by key; locate it with
    /// [`find`](Self::find) first. On success the node is left detached (red,
    /// no links) and still allocated, ready to be re-inserted or
    /// [`release`](Self::release)d.
    ///
    /// Returns `false` if the handle is stale or the node is not linked.
    /// Passing a handle that belongs to a different tree is a caller error.
    pub fn erase(&mut self, node: NodeId) -> bool {
        if !self.is_linked(node) {
            return false;
        }

        let (parent, left, right, color) = {
            let target = self.node_at(node);
            (target.parent, target.left, target.right, target.color)
        };

        match (left, right) {
            (None, None) => self.erase_leaf(node, parent, color),
            (Some(child), None) | (None, Some(child)) => {
                // an only child is red; painting it black keeps the black height
                self.replace_child(parent, node, Some(child));
                self.set_color(child, Color::Black);
            }
            (Some(left), Some(right)) => self.erase_with_successor(node, parent, left, right, color),
        }

        self.node_at_mut(node).detach();
        self.len -= 1;

        #[cfg(debug_assertions)]
        self.debug_check("removal");

        true
    }
}

impl<K> RbTree<K> {
    fn erase_leaf(&mut self, node: NodeId, parent: Option<NodeId>, color: Color) {
        let Some(parent) = parent else {
            self.root = None;
            return;
        };

        let side = self.child_side(parent, node);
        *self.node_at_mut(parent).child_mut(side) = None;

        if color == Color::Black {
            self.fix_deletion_violations(parent, side);
        }
    }

    /// Replaces a node that has two children with its in-order successor.
    ///
    /// The successor is spliced out of its own position first (its only
    /// possible child is a red right child, which takes its place painted
    /// black), then takes over the removed node's parent, children and color.
    fn erase_with_successor(
        &mut self,
        node: NodeId,
        parent: Option<NodeId>,
        left: NodeId,
        right: NodeId,
        color: Color,
    ) {
        let mut successor_parent = node;
        let mut successor = right;
        while let Some(next) = self.node_at(successor).left {
            successor_parent = successor;
            successor = next;
        }
        let successor_color = self.node_at(successor).color;
        let successor_right = self.node_at(successor).right;

        // the successor's old parent, unless it is the removed node itself
        let deficit_parent = if successor_parent == node {
            successor
        } else {
            self.node_at_mut(successor_parent).left = successor_right;
            if let Some(child) = successor_right {
                self.node_at_mut(child).parent = Some(successor_parent);
            }

            self.node_at_mut(successor).right = Some(right);
            self.node_at_mut(right).parent = Some(successor);
            successor_parent
        };

        self.replace_child(parent, node, Some(successor));
        self.node_at_mut(successor).left = Some(left);
        self.node_at_mut(left).parent = Some(successor);
        self.set_color(successor, color);

        match successor_right {
            Some(child) => self.set_color(child, Color::Black),
            None if successor_color == Color::Black => {
                let side = if deficit_parent == successor {
                    Side::Right
                } else {
                    Side::Left
                };
                self.fix_deletion_violations(deficit_parent, side);
            }
            None => {}
        }
    }

    /// Resolves a one-black deficit on `side` of `parent`.
    ///
    /// The sibling on the other side is present because its subtree still
    /// carries the black node the deficit side lost.
    pub(crate) fn fix_deletion_violations(&mut self, mut parent: NodeId, mut side: Side) {
        loop {
            let far_side = side.opposite();

            let mut sibling = self.sibling(parent, far_side);

            if self.is_red(Some(sibling)) {
                log::trace!("erase: red sibling {sibling}, rotate {parent}");
                self.rotate_swapping_colors(parent, side);
                sibling = self.sibling(parent, far_side);
            }

            let far_nephew = self.node_at(sibling).child(far_side);
            let near_nephew = self.node_at(sibling).child(side);

            if let Some(far) = far_nephew.filter(|&far| self.is_red(Some(far))) {
                log::trace!("erase: red far nephew {far}, rotate {parent}");
                self.set_color(far, Color::Black);
                self.rotate_swapping_colors(parent, side);
                return;
            }

            if self.is_red(near_nephew) {
                log::trace!("erase: red near nephew under {sibling}, rotate twice");
                self.rotate_swapping_colors(sibling, far_side);
                self.rotate_swapping_colors(parent, side);
                self.set_color(sibling, Color::Black);
                return;
            }

            self.set_color(sibling, Color::Red);

            match self.node_at(parent).parent {
                Some(grandparent) if self.node_at(parent).color == Color::Black => {
                    log::trace!("erase: deficit moves up from {parent} to {grandparent}");
                    side = self.child_side(grandparent, parent);
                    parent = grandparent;
                }
                _ => {
                    self.set_color(parent, Color::Black);
                    return;
                }
            }
        }
    }

    /// Panics when the far side is empty, which only a corrupted tree allows.
    fn sibling(&self, parent: NodeId, far_side: Side) -> NodeId {
        match self.node_at(parent).child(far_side) {
            Some(sibling) => sibling,
            None => unreachable!("black deficit below {parent} without a {far_side} sibling"),
        }
    }
}
