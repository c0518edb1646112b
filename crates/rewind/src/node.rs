#![forbid(unsafe_code)]

//! Timeline nodes and the arena that owns them.
//!
//! A history is a simple path of [`HistoryNode`]s. Each node knows how to
//! step the owned value one position back (`backward`) and one position
//! forward (`forward`). Links between nodes are [`NodeId`] handles into a
//! [`NodeArena`], so the arena is the single owner of every node and the
//! `prev`/`next` links carry no ownership.
//!
//! ```text
//!   root            n1              n2 (tail)
//! ┌────────┐  fwd ┌────────┐  fwd ┌────────┐
//! │ back:∅ │ ───► │ back   │ ───► │ back   │
//! │ fwd    │ ◄─── │ fwd    │ ◄─── │ fwd:∅  │
//! └────────┘ back └────────┘ back └────────┘
//! ```
//!
//! `forward` on a node moves the value into `next`; `backward` moves it into
//! `prev`. The root has no `backward` and the tail has no `forward`.

use std::fmt;
use std::ops::{Index, IndexMut};

/// A reversible mutation of the owned value.
pub type Action<T> = Box<dyn FnMut(&mut T) + Send>;

/// Run `first`, then `second`.
pub(crate) fn chain<T: 'static>(mut first: Action<T>, mut second: Action<T>) -> Action<T> {
    Box::new(move |value: &mut T| {
        first(value);
        second(value);
    })
}

/// Handle to a node stored in a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Get the raw slot index.
    #[must_use]
    pub const fn raw(self) -> usize {
        self.0
    }

    fn index(self) -> usize {
        self.0
    }
}

/// One position in the timeline.
pub struct HistoryNode<T> {
    pub(crate) backward: Option<Action<T>>,
    pub(crate) forward: Option<Action<T>>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) label: Option<String>,
}

impl<T> fmt::Debug for HistoryNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryNode")
            .field("has_backward", &self.backward.is_some())
            .field("has_forward", &self.forward.is_some())
            .field("prev", &self.prev)
            .field("next", &self.next)
            .field("label", &self.label)
            .finish()
    }
}

impl<T> HistoryNode<T> {
    /// A node with no actions and no links.
    #[must_use]
    pub fn root() -> Self {
        Self {
            backward: None,
            forward: None,
            prev: None,
            next: None,
            label: None,
        }
    }

    /// Previous node, if any.
    #[must_use]
    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    /// Next node, if any.
    #[must_use]
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    /// Label of the step that arrives at this node.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Step `value` back to the previous position.
    ///
    /// Returns the previous node, or `this` when already at the root.
    pub fn apply_backward(&mut self, this: NodeId, value: &mut T) -> NodeId {
        let Some(prev) = self.prev else {
            return this;
        };
        if let Some(backward) = self.backward.as_mut() {
            backward(value);
        }
        prev
    }

    /// Step `value` forward to the next position.
    ///
    /// Returns the next node, or `this` when already at the tail.
    pub fn apply_forward(&mut self, this: NodeId, value: &mut T) -> NodeId {
        let Some(next) = self.next else {
            return this;
        };
        if let Some(forward) = self.forward.as_mut() {
            forward(value);
        }
        next
    }
}

/// Slot storage for nodes, with a free list for reuse.
pub(crate) struct NodeArena<T> {
    slots: Vec<Option<HistoryNode<T>>>,
    free: Vec<NodeId>,
}

impl<T> NodeArena<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn alloc(&mut self, node: HistoryNode<T>) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = Some(node);
            return id;
        }
        let id = NodeId(self.slots.len());
        self.slots.push(Some(node));
        id
    }

    pub(crate) fn free(&mut self, id: NodeId) -> Option<HistoryNode<T>> {
        let node = self.slots.get_mut(id.index())?.take()?;
        self.free.push(id);
        Some(node)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&HistoryNode<T>> {
        self.slots.get(id.index())?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut HistoryNode<T>> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    /// Free `id` and every node reachable from it through `next`.
    ///
    /// Returns the number of nodes freed.
    pub(crate) fn free_from(&mut self, id: Option<NodeId>) -> usize {
        let mut cursor = id;
        let mut freed = 0;
        while let Some(id) = cursor {
            let Some(node) = self.free(id) else {
                break;
            };
            cursor = node.next;
            freed += 1;
        }
        freed
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    /// Number of live nodes.
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

impl<T> Index<NodeId> for NodeArena<T> {
    type Output = HistoryNode<T>;

    fn index(&self, id: NodeId) -> &HistoryNode<T> {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale node id {id:?}"),
        }
    }
}

impl<T> IndexMut<NodeId> for NodeArena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut HistoryNode<T> {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("stale node id {id:?}"),
        }
    }
}
