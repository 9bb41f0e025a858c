use core::fmt;

/// Red-Black tree node colors used to maintain tree balance properties.
///
/// Red-Black trees maintain balance by ensuring:
/// - Red nodes have black children
/// - All paths from a node to its absent children have equal black node counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Red node - cannot be adjacent to other red nodes
    Red,
    /// Black node - can have children of any color, contributes to black height
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => f.write_str("red"),
            Color::Black => f.write_str("black"),
        }
    }
}

/// Which child slot of a node a link occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The left child, holding smaller keys
    Left,
    /// The right child, holding larger keys
    Right,
}

impl Side {
    /// Returns the mirrored side.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Stable handle to a node slot in a tree's arena.
///
/// Handles are plain indices: they stay valid across rotations and
/// rebalancing, and become stale once the node is released. A released slot
/// may be handed out again by a later allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena slot index behind this handle.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the Red-Black tree containing its key and structural information.
///
/// Child links own the subtree below them; `parent` is a back-reference used
/// for navigation only and is rewritten on every structural change.
#[derive(Debug, Clone)]
pub(crate) struct Node<K> {
    /// The ordered key
    pub(crate) key: K,

    /// Color of this node (Red or Black) used for Red-Black tree balancing
    pub(crate) color: Color,

    /// Handle of the parent node (None for the root or a detached node)
    pub(crate) parent: Option<NodeId>,

    /// Handle of the left child (None if no left child)
    pub(crate) left: Option<NodeId>,

    /// Handle of the right child (None if no right child)
    pub(crate) right: Option<NodeId>,

    /// Whether the node is currently linked into the tree
    pub(crate) linked: bool,
}

impl<K> Node<K> {
    /// A fresh node is red, unlinked and has no children.
    pub(crate) const fn detached(key: K) -> Self {
        Self {
            key,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
            linked: false,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) const fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Drops every link and returns the node to its freshly allocated state.
    pub(crate) const fn detach(&mut self) {
        self.color = Color::Red;
        self.parent = None;
        self.left = None;
        self.right = None;
        self.linked = false;
    }
}
