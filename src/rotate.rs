use crate::{
    node::{NodeId, Side},
    tree::RbTree,
};

impl<K> RbTree<K> {
    /// Rotates `node` down toward `side`.
    ///
    /// The child on the opposite side is promoted into `node`'s position,
    /// `node` becomes that child's `side` child, and the promoted child's
    /// former inner subtree moves across to `node`. Parent back-references
    /// of every moved node and the parent's link (or the root) are rewritten.
    ///
    /// ```text
    ///   rotate(A, Left)
    ///
    ///     A                B
    ///    / \              / \
    ///   x   B     =>     A   z
    ///      / \          / \
    ///     y   z        x   y
    /// ```
    pub(crate) fn rotate(&mut self, node: NodeId, side: Side) {
        let Some(promoted) = self.node_at(node).child(side.opposite()) else {
            return;
        };

        let parent = self.node_at(node).parent;
        self.replace_child(parent, node, Some(promoted));

        let inner = self.node_at(promoted).child(side);
        *self.node_at_mut(promoted).child_mut(side) = Some(node);
        self.node_at_mut(node).parent = Some(promoted);

        *self.node_at_mut(node).child_mut(side.opposite()) = inner;
        if let Some(inner) = inner {
            self.node_at_mut(inner).parent = Some(node);
        }
    }

    /// Exchanges the colors of `node` and the child about to be promoted,
    /// then performs [`rotate`](Self::rotate).
    ///
    /// The black count seen from above the rotated pair is unchanged, which
    /// is what both fixups rely on.
    pub(crate) fn rotate_swapping_colors(&mut self, node: NodeId, side: Side) {
        if let Some(promoted) = self.node_at(node).child(side.opposite()) {
            let node_color = self.node_at(node).color;
            let promoted_color = self.node_at(promoted).color;
            self.set_color(node, promoted_color);
            self.set_color(promoted, node_color);
        }
        self.rotate(node, side);
    }
}

#[cfg(test)]
mod tests {
    use crate::node::{Color, Side};
    use crate::tree::RbTree;

    /// Builds `A(x, B(y, z))` by hand, bypassing rebalancing.
    fn right_leaning() -> (RbTree<char>, [crate::NodeId; 5]) {
        let mut tree = RbTree::new();
        let [a, b, x, y, z] = ['a', 'b', 'x', 'y', 'z'].map(|key| tree.alloc(key).unwrap());

        tree.root = Some(a);
        tree.node_at_mut(a).left = Some(x);
        tree.node_at_mut(a).right = Some(b);
        tree.node_at_mut(b).left = Some(y);
        tree.node_at_mut(b).right = Some(z);
        tree.node_at_mut(x).parent = Some(a);
        tree.node_at_mut(b).parent = Some(a);
        tree.node_at_mut(y).parent = Some(b);
        tree.node_at_mut(z).parent = Some(b);
        tree.set_color(a, Color::Black);

        (tree, [a, b, x, y, z])
    }

    #[test]
    fn test_rotate_left_rewires_links() {
        let (mut tree, [a, b, x, y, z]) = right_leaning();

        tree.rotate(a, Side::Left);

        assert_eq!(tree.root(), Some(b));
        assert!(tree.parent(b).is_none());
        assert_eq!(tree.left(b), Some(a));
        assert_eq!(tree.right(b), Some(z));
        assert_eq!(tree.parent(a), Some(b));
        assert_eq!(tree.left(a), Some(x));
        assert_eq!(tree.right(a), Some(y));
        assert_eq!(tree.parent(y), Some(a));
        assert_eq!(tree.parent(x), Some(a));
        assert_eq!(tree.parent(z), Some(b));

        // plain rotation keeps colors where they were
        assert_eq!(tree.color(a), Some(Color::Black));
        assert_eq!(tree.color(b), Some(Color::Red));
    }

    #[test]
    fn test_rotate_right_undoes_rotate_left() {
        let (mut tree, [a, b, x, y, z]) = right_leaning();

        tree.rotate(a, Side::Left);
        tree.rotate(b, Side::Right);

        assert_eq!(tree.root(), Some(a));
        assert_eq!(tree.left(a), Some(x));
        assert_eq!(tree.right(a), Some(b));
        assert_eq!(tree.left(b), Some(y));
        assert_eq!(tree.right(b), Some(z));
        assert_eq!(tree.parent(b), Some(a));
        assert_eq!(tree.parent(y), Some(b));
    }

    #[test]
    fn test_rotate_swapping_colors() {
        let (mut tree, [a, b, ..]) = right_leaning();

        tree.rotate_swapping_colors(a, Side::Left);

        assert_eq!(tree.root(), Some(b));
        assert_eq!(tree.color(b), Some(Color::Black));
        assert_eq!(tree.color(a), Some(Color::Red));
    }

    #[test]
    fn test_rotate_below_root_updates_parent_link() {
        let (mut tree, [a, b, _, y, z]) = right_leaning();

        tree.rotate(b, Side::Right);

        assert_eq!(tree.right(a), Some(y));
        assert_eq!(tree.parent(y), Some(a));
        assert_eq!(tree.right(y), Some(b));
        assert_eq!(tree.parent(b), Some(y));
        assert!(tree.left(b).is_none());
        assert_eq!(tree.right(b), Some(z));
    }
}
