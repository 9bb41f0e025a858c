use alloc::{vec, vec::Vec};
use core::fmt::Debug;

use crate::{
    node::{Color, NodeId, Side},
    tree::RbTree,
};

/// A broken tree invariant, as reported by [`RbTree::validate`].
///
/// Any of these signals a defect in the rebalancing code or a caller breaking
/// a handle precondition, never a recoverable condition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    /// The root is colored red.
    #[error("root {root} is red")]
    RedRoot {
        /// The root node
        root: NodeId,
    },

    /// A red node has a red child.
    #[error("red node {node} has a red child {child}")]
    RedChild {
        /// The red parent
        node: NodeId,
        /// Its red child
        child: NodeId,
    },

    /// A node with exactly one child has a black child.
    #[error("node {node} has a single {side} child {child} that is not red")]
    LoneBlackChild {
        /// The node with one child
        node: NodeId,
        /// The black only child
        child: NodeId,
        /// Side the child hangs from
        side: Side,
    },

    /// Two paths from the root to an absent child pass through a different
    /// number of black nodes.
    #[error("absent {side} child of {node} has black height {found}, expected {expected}")]
    BlackHeightMismatch {
        /// Node whose child position was checked
        node: NodeId,
        /// Side of the absent child
        side: Side,
        /// Black height of the first absent child position seen
        expected: usize,
        /// Black height at this position
        found: usize,
    },

    /// A child's parent back-reference does not point at the node linking it.
    #[error("node {child} does not point back to its parent {parent:?}")]
    BrokenParentLink {
        /// The linking node, `None` for the root link
        parent: Option<NodeId>,
        /// The child with the wrong back-reference
        child: NodeId,
    },

    /// A key is not strictly between the keys of the ancestors bounding it.
    #[error("node {node} is out of order with respect to its ancestor {ancestor}")]
    OutOfOrder {
        /// The misplaced node
        node: NodeId,
        /// The ancestor whose key it violates
        ancestor: NodeId,
    },

    /// A link refers to a released arena slot.
    #[error("link to {node} refers to a released slot")]
    Dangling {
        /// The released handle
        node: NodeId,
    },

    /// A reachable node is not marked as linked.
    #[error("node {node} is reachable but marked detached")]
    Detached {
        /// The reachable node
        node: NodeId,
    },

    /// A node is reachable along more than one path.
    #[error("node {node} is reachable more than once")]
    Cycle {
        /// The node reached twice
        node: NodeId,
    },

    /// The stored length disagrees with the number of reachable nodes.
    #[error("tree records {expected} nodes but {found} are reachable")]
    LengthMismatch {
        /// The recorded length
        expected: usize,
        /// The number of reachable nodes
        found: usize,
    },
}

/// Receives invariant violations found by [`RbTree::validate_with`].
///
/// Test harnesses plug in their own reporter to dump or record the broken
/// tree; the tree itself never prints anything.
pub trait Report<K> {
    /// Called once with the first violation found.
    fn report(&mut self, tree: &RbTree<K>, violation: &InvariantViolation);
}

impl<K, F> Report<K> for F
where
    F: FnMut(&RbTree<K>, &InvariantViolation),
{
    fn report(&mut self, tree: &RbTree<K>, violation: &InvariantViolation) {
        self(tree, violation)
    }
}

/// Reporter that logs the violation and an outline of the tree at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReport;

impl<K: Debug> Report<K> for LogReport {
    fn report(&mut self, tree: &RbTree<K>, violation: &InvariantViolation) {
        log::error!("red-black tree invariant violated: {violation}\n{}", tree.outline());
    }
}

/// Pending node of the validation walk.
struct Frame {
    node: NodeId,
    /// Black nodes above `node` on the path from the root
    blacks_above: usize,
    /// Nearest ancestor the node must be greater than
    lower: Option<NodeId>,
    /// Nearest ancestor the node must be less than
    upper: Option<NodeId>,
}

impl<K: Ord> RbTree<K> {
    /// Checks every structural and coloring invariant in O(n).
    ///
    /// Verifies that the root is black, no red node has a red child, a lone
    /// child is red, every absent-child position has the same black height,
    /// parent back-references match, keys are in order, every reachable node
    /// is live and reached once, and `len()` matches.
    ///
    /// Walks with an explicit stack, so a corrupted tree cannot overflow the
    /// call stack.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.root else {
            return match self.len {
                0 => Ok(()),
                expected => Err(InvariantViolation::LengthMismatch { expected, found: 0 }),
            };
        };

        let Some(root_node) = self.arena.get(root) else {
            return Err(InvariantViolation::Dangling { node: root });
        };
        if root_node.parent.is_some() {
            return Err(InvariantViolation::BrokenParentLink {
                parent: None,
                child: root,
            });
        }
        if root_node.color == Color::Red {
            return Err(InvariantViolation::RedRoot { root });
        }

        let mut visited = vec![false; self.arena.slot_count()];
        let mut black_height = None;
        let mut found = 0;
        let mut stack = Vec::new();
        stack.push(Frame {
            node: root,
            blacks_above: 0,
            lower: None,
            upper: None,
        });

        while let Some(frame) = stack.pop() {
            let id = frame.node;
            let Some(node) = self.arena.get(id) else {
                return Err(InvariantViolation::Dangling { node: id });
            };

            if core::mem::replace(&mut visited[id.index()], true) {
                return Err(InvariantViolation::Cycle { node: id });
            }
            found += 1;

            if !node.linked {
                return Err(InvariantViolation::Detached { node: id });
            }

            let below_lower = frame
                .lower
                .filter(|&ancestor| node.key <= self.node_at(ancestor).key);
            let above_upper = frame
                .upper
                .filter(|&ancestor| node.key >= self.node_at(ancestor).key);
            if let Some(ancestor) = below_lower.or(above_upper) {
                return Err(InvariantViolation::OutOfOrder { node: id, ancestor });
            }

            match (node.left, node.right) {
                (Some(child), None) if self.is_live_black(child) => {
                    return Err(InvariantViolation::LoneBlackChild {
                        node: id,
                        child,
                        side: Side::Left,
                    });
                }
                (None, Some(child)) if self.is_live_black(child) => {
                    return Err(InvariantViolation::LoneBlackChild {
                        node: id,
                        child,
                        side: Side::Right,
                    });
                }
                _ => {}
            }

            let blacks = frame.blacks_above + usize::from(node.color == Color::Black);

            for side in [Side::Left, Side::Right] {
                let Some(child) = node.child(side) else {
                    match black_height {
                        None => black_height = Some(blacks),
                        Some(expected) if expected != blacks => {
                            return Err(InvariantViolation::BlackHeightMismatch {
                                node: id,
                                side,
                                expected,
                                found: blacks,
                            });
                        }
                        Some(_) => {}
                    }
                    continue;
                };

                let Some(child_node) = self.arena.get(child) else {
                    return Err(InvariantViolation::Dangling { node: child });
                };
                if child_node.parent != Some(id) {
                    return Err(InvariantViolation::BrokenParentLink {
                        parent: Some(id),
                        child,
                    });
                }
                if node.color == Color::Red && child_node.color == Color::Red {
                    return Err(InvariantViolation::RedChild { node: id, child });
                }

                let (lower, upper) = match side {
                    Side::Left => (frame.lower, Some(id)),
                    Side::Right => (Some(id), frame.upper),
                };
                stack.push(Frame {
                    node: child,
                    blacks_above: blacks,
                    lower,
                    upper,
                });
            }
        }

        if found != self.len {
            return Err(InvariantViolation::LengthMismatch {
                expected: self.len,
                found,
            });
        }

        Ok(())
    }

    /// Dangling children are reported by the link check instead.
    fn is_live_black(&self, id: NodeId) -> bool {
        self.arena
            .get(id)
            .is_some_and(|node| node.color == Color::Black)
    }

    /// Runs [`validate`](Self::validate) and hands the first violation to `reporter`.
    pub fn validate_with<R>(&self, reporter: &mut R) -> Result<(), InvariantViolation>
    where
        R: Report<K> + ?Sized,
    {
        self.validate().inspect_err(|violation| reporter.report(self, violation))
    }
}

impl<K> RbTree<K> {
    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = Vec::new();
        stack.extend(self.root.map(|root| (root, 1)));

        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.node_at(id);
            stack.extend(node.left.map(|left| (left, depth + 1)));
            stack.extend(node.right.map(|right| (right, depth + 1)));
        }
        height
    }
}
