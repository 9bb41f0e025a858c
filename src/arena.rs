use alloc::vec::Vec;

use crate::node::{Node, NodeId};

/// Slot storage for tree nodes, addressed by [`NodeId`].
///
/// Released slots are kept on a LIFO free list and handed out again before
/// the slot vector grows. A bounded arena refuses allocation once `limit`
/// nodes are live.
#[derive(Debug, Clone)]
pub(crate) struct Arena<K> {
    /// Node slots; `None` marks a released slot
    slots: Vec<Option<Node<K>>>,

    /// Stack of released slot indices available for reuse
    free_list: Vec<usize>,

    /// Maximum number of live nodes, if bounded
    limit: Option<usize>,

    /// Number of occupied slots
    live: usize,
}

impl<K> Arena<K> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            limit: None,
            live: 0,
        }
    }

    pub(crate) fn bounded(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        assert!(
            capacity <= usize::MAX / 2,
            "Capacity too large - risk of index overflow"
        );

        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::with_capacity(capacity),
            limit: Some(capacity),
            live: 0,
        }
    }

    #[inline]
    pub(crate) const fn live(&self) -> usize {
        self.live
    }

    #[inline]
    pub(crate) const fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Number of slots ever handed out, occupied or not.
    #[inline]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn allocate(&mut self, node: Node<K>) -> Option<NodeId> {
        if self.limit.is_some_and(|limit| self.live >= limit) {
            return None;
        }

        let index = match self.free_list.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                index
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        self.live += 1;
        Some(NodeId::new(index))
    }

    pub(crate) fn deallocate(&mut self, id: NodeId) -> Option<Node<K>> {
        let node = self.slots.get_mut(id.index())?.take()?;
        self.free_list.push(id.index());
        self.live -= 1;
        Some(node)
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<K>> {
        self.slots.get(id.index())?.as_ref()
    }

    /// Panics on a released slot: every handle reachable from the tree is live.
    #[inline]
    pub(crate) fn node_at(&self, id: NodeId) -> &Node<K> {
        match self.slots.get(id.index()) {
            Some(Some(node)) => node,
            _ => panic!("node handle {id} refers to a released slot"),
        }
    }

    #[inline]
    pub(crate) fn node_at_mut(&mut self, id: NodeId) -> &mut Node<K> {
        match self.slots.get_mut(id.index()) {
            Some(Some(node)) => node,
            _ => panic!("node handle {id} refers to a released slot"),
        }
    }
}
