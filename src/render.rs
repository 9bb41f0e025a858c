use alloc::vec::Vec;
use core::fmt;

use crate::{
    node::{NodeId, Side},
    tree::RbTree,
};

/// Indented pre-order dump of a tree, one node per line.
///
/// Each line shows the side the node hangs from (`L`/`R`, nothing for the
/// root), its key, color and handle:
///
/// ```text
/// 50 black #0
///   L 30 black #1
///     L 20 red #3
///   R 70 black #2
/// ```
///
/// Created by [`RbTree::outline`].
#[derive(Debug)]
pub struct Outline<'a, K> {
    tree: &'a RbTree<K>,
}

impl<K> Clone for Outline<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Outline<'_, K> {}

impl<K> RbTree<K> {
    /// Returns a [`Display`](fmt::Display) adapter printing the tree shape.
    pub fn outline(&self) -> Outline<'_, K> {
        Outline { tree: self }
    }
}

impl<K: fmt::Debug> fmt::Display for Outline<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.tree.root else {
            return f.write_str("(empty)");
        };

        let mut stack: Vec<(NodeId, usize, Option<Side>)> = Vec::new();
        stack.push((root, 0, None));
        let mut first = true;

        while let Some((id, depth, side)) = stack.pop() {
            if !first {
                f.write_str("\n")?;
            }
            first = false;

            for _ in 0..depth {
                f.write_str("  ")?;
            }
            match side {
                Some(Side::Left) => f.write_str("L ")?,
                Some(Side::Right) => f.write_str("R ")?,
                None => {}
            }

            // a broken tree may link released slots
            let Some(node) = self.tree.arena.get(id) else {
                write!(f, "<released {id}>")?;
                continue;
            };
            write!(f, "{:?} {} {id}", node.key, node.color)?;

            // cut off cycles instead of looping forever
            if depth >= self.tree.arena.slot_count() {
                continue;
            }
            stack.extend(node.right.map(|right| (right, depth + 1, Some(Side::Right))));
            stack.extend(node.left.map(|left| (left, depth + 1, Some(Side::Left))));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::RbTree;

    #[test]
    fn test_outline_empty() {
        let tree = RbTree::<i32>::new();
        assert_eq!(tree.outline().to_string(), "(empty)");
    }

    #[test]
    fn test_outline_shape() {
        let mut tree = RbTree::new();
        let root = tree.insert_key(2).unwrap();
        let left = tree.insert_key(1).unwrap();
        let right = tree.insert_key(3).unwrap();

        let expected = alloc::format!(
            "2 black {root}\n  L 1 red {left}\n  R 3 red {right}"
        );
        assert_eq!(tree.outline().to_string(), expected);
    }

    #[test]
    fn test_outline_nested_depth() {
        let tree: RbTree<i32> = (1..=4).collect();
        let rendered = tree.outline().to_string();
        let lines: alloc::vec::Vec<_> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("2 black"));
        assert!(lines[1].starts_with("  L 1 black"));
        assert!(lines[2].starts_with("  R 3 black"));
        assert!(lines[3].starts_with("    R 4 red"));
    }

    #[test]
    fn test_outline_survives_cycle() {
        let mut tree: RbTree<i32> = (1..=3).collect();
        let root = tree.root().unwrap();
        let leaf = tree.find(&3).unwrap();
        tree.node_at_mut(leaf).left = Some(root);

        let rendered = tree.outline().to_string();
        assert!(rendered.lines().count() > 3);
    }
}
