#![forbid(unsafe_code)]

//! The history engine.
//!
//! [`History`] owns a value and a chain of [`HistoryNode`]s. Every recorded
//! step applies a forward action to the value right away and stores the
//! matching backward action, so undo and redo are a single pointer move plus
//! one stored action.
//!
//! # Strategies
//!
//! ```text
//! chain: root ── a ── b ── c        pointer at b, c is the redo suffix
//!
//! Default  root ── a ── b ── x          c discarded, pointer at x
//! Insert   root ── a ── b ── x ── c     c kept, pointer at x
//! Amend    root ── a ── b' ── c         b rewritten in place, pointer at b'
//! Inject   root ── a ── b ── c          b's backward and a's forward now
//!                                       also carry the injected change
//! ```
//!
//! # Invariants
//!
//! 1. The chain from `root` through `next` is a simple path ending at `tail`.
//! 2. `position` is the distance from `root` to `current`; `len` is the
//!    distance from `root` to `tail`.
//! 3. Only the root lacks a backward action; only the tail lacks a forward
//!    action.
//! 4. `len <= config.max_depth` after every recording.
//!
//! # Failure Modes
//!
//! - **External mutation**: changing the value outside the engine means
//!   later undo may reach states that were never recorded.
//! - **Shared parts**: snapshot undo of a part that is a shared handle does
//!   not revert changes made through the handle. Use the explicit form.

use std::fmt;

use tracing::{debug, trace};

use crate::accessor::{Accessor, Identity};
use crate::config::{ConfigError, HistoryConfig};
use crate::node::{Action, HistoryNode, NodeArena, NodeId, chain};

const TARGET: &str = "rewind.history";

/// How a recording changes the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Append a step after the current position, discarding any redo suffix.
    #[default]
    Default,
    /// Rewrite the current step in place.
    Amend,
    /// Splice a step after the current position, keeping the redo suffix.
    Insert,
    /// Thread a change into the current position without adding a step.
    Inject,
}

impl Strategy {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Amend => "amend",
            Self::Insert => "insert",
            Self::Inject => "inject",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A forward/backward action pair ready to be recorded.
pub struct Step<T> {
    forward: Action<T>,
    backward: Action<T>,
    label: Option<String>,
}

impl<T> fmt::Debug for Step<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step").field("label", &self.label).finish()
    }
}

impl<T: 'static> Step<T> {
    /// Create a step from two closures over the whole value.
    #[must_use]
    pub fn new(
        forward: impl FnMut(&mut T) + Send + 'static,
        backward: impl FnMut(&mut T) + Send + 'static,
    ) -> Self {
        Self::from_actions(Box::new(forward), Box::new(backward))
    }

    /// Create a step from boxed actions.
    #[must_use]
    pub fn from_actions(forward: Action<T>, backward: Action<T>) -> Self {
        Self {
            forward,
            backward,
            label: None,
        }
    }

    /// Mutate a part of `whole`, undoing by restoring a snapshot of the part.
    ///
    /// The snapshot is `accessor.get(whole)`, taken now. Undo writes a clone
    /// of it back. Changes made through shared handles inside the part are
    /// not reverted.
    #[must_use]
    pub fn snapshot<A>(
        accessor: A,
        whole: &T,
        mut mutate: impl FnMut(&mut A::Part) + Send + 'static,
    ) -> Self
    where
        A: Accessor<T>,
        A::Part: Clone + Send + 'static,
    {
        let snapshot = accessor.get(whole);
        let restore = accessor.clone();
        Self::new(
            move |value: &mut T| {
                let mut part = accessor.get(value);
                mutate(&mut part);
                accessor.set(value, part);
            },
            move |value: &mut T| restore.set(value, snapshot.clone()),
        )
    }

    /// Mutate a part with caller-supplied forward and backward mutations.
    #[must_use]
    pub fn explicit<A>(
        accessor: A,
        mut forward: impl FnMut(&mut A::Part) + Send + 'static,
        mut backward: impl FnMut(&mut A::Part) + Send + 'static,
    ) -> Self
    where
        A: Accessor<T>,
    {
        let back = accessor.clone();
        Self::new(
            move |value: &mut T| {
                let mut part = accessor.get(value);
                forward(&mut part);
                accessor.set(value, part);
            },
            move |value: &mut T| {
                let mut part = back.get(value);
                backward(&mut part);
                back.set(value, part);
            },
        )
    }

    /// Attach a human-readable label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// One position reported by [`History::walk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position<'a> {
    /// Distance from the root.
    pub index: usize,
    /// Whether this is where the history pointer sits.
    pub is_current: bool,
    /// Label of the step that arrives here. `None` at the root.
    pub label: Option<&'a str>,
}

/// Undo/redo history over an owned value.
pub struct History<T> {
    value: T,
    nodes: NodeArena<T>,
    root: NodeId,
    current: NodeId,
    tail: NodeId,
    position: usize,
    len: usize,
    config: HistoryConfig,
}

impl<T: fmt::Debug> fmt::Debug for History<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("value", &self.value)
            .field("undo_depth", &self.position)
            .field("redo_depth", &(self.len - self.position))
            .field("live_nodes", &self.nodes.live())
            .field("config", &self.config)
            .finish()
    }
}

impl<T: Default + 'static> Default for History<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: 'static> History<T> {
    /// Create a history over `value` with the default configuration.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::with_config(value, HistoryConfig::default())
    }

    /// Create a history over `value` with the given configuration.
    ///
    /// The configuration is taken as is. A `max_depth` of zero keeps no
    /// steps: every recording folds straight into the root state. Use
    /// [`try_with_config`](Self::try_with_config) to reject such settings.
    #[must_use]
    pub fn with_config(value: T, config: HistoryConfig) -> Self {
        let mut nodes = NodeArena::new();
        let root = nodes.alloc(HistoryNode::root());
        Self {
            value,
            nodes,
            root,
            current: root,
            tail: root,
            position: 0,
            len: 0,
            config,
        }
    }

    /// Create a history over `value`, rejecting a configuration that fails
    /// [`HistoryConfig::validate`].
    pub fn try_with_config(value: T, config: HistoryConfig) -> Result<Self, ConfigError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        Ok(Self::with_config(value, config))
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Step back one position. Returns `false` at the root.
    pub fn undo(&mut self) -> bool {
        let from = self.current;
        let to = self.nodes[from].apply_backward(from, &mut self.value);
        if to == from {
            return false;
        }
        self.current = to;
        self.position -= 1;
        trace!(
            target: TARGET,
            from = self.position + 1,
            to = self.position,
            "undo"
        );
        true
    }

    /// Step forward one position. Returns `false` at the tail.
    pub fn redo(&mut self) -> bool {
        let from = self.current;
        let to = self.nodes[from].apply_forward(from, &mut self.value);
        if to == from {
            return false;
        }
        self.current = to;
        self.position += 1;
        trace!(
            target: TARGET,
            from = self.position - 1,
            to = self.position,
            "redo"
        );
        true
    }

    /// Undo up to `n` steps. Returns how many were taken.
    pub fn undo_n(&mut self, n: usize) -> usize {
        let mut taken = 0;
        while taken < n && self.undo() {
            taken += 1;
        }
        taken
    }

    /// Redo up to `n` steps. Returns how many were taken.
    pub fn redo_n(&mut self, n: usize) -> usize {
        let mut taken = 0;
        while taken < n && self.redo() {
            taken += 1;
        }
        taken
    }

    /// Undo back to the root.
    pub fn undo_all(&mut self) -> usize {
        self.undo_n(usize::MAX)
    }

    /// Redo up to the tail.
    pub fn redo_all(&mut self) -> usize {
        self.redo_n(usize::MAX)
    }

    // ========================================================================
    // Recording
    // ========================================================================

    /// Record a whole-value step.
    pub fn record(
        &mut self,
        forward: impl FnMut(&mut T) + Send + 'static,
        backward: impl FnMut(&mut T) + Send + 'static,
        strategy: Strategy,
    ) {
        self.record_step(Step::new(forward, backward), strategy);
    }

    /// Record a prepared [`Step`].
    pub fn record_step(&mut self, step: Step<T>, strategy: Strategy) {
        self.record_with(strategy, move |_| step);
    }

    /// Record a step built from the value at the step's base state.
    ///
    /// `build` runs after any rollback the strategy performs, so snapshots
    /// taken inside it describe the state the step starts from.
    pub fn record_with(&mut self, strategy: Strategy, build: impl FnOnce(&T) -> Step<T>) {
        match strategy {
            Strategy::Default => {
                let step = build(&self.value);
                self.push_step(step, false);
            }
            Strategy::Insert => {
                let step = build(&self.value);
                self.push_step(step, true);
            }
            Strategy::Amend => self.amend(build),
            Strategy::Inject => {
                let step = build(&self.value);
                self.inject(step);
            }
        }
        debug!(
            target: TARGET,
            strategy = %strategy,
            position = self.position,
            len = self.len,
            label = self.nodes[self.current].label().unwrap_or(""),
            "step recorded"
        );
    }

    /// Mutate a part of the value, undoing by snapshot.
    ///
    /// See [`Step::snapshot`] for the limits of snapshot undo.
    pub fn modify<A>(
        &mut self,
        accessor: A,
        strategy: Strategy,
        mutate: impl FnMut(&mut A::Part) + Send + 'static,
    ) where
        A: Accessor<T>,
        A::Part: Clone + Send + 'static,
    {
        self.record_with(strategy, move |value| {
            Step::snapshot(accessor, value, mutate)
        });
    }

    /// Mutate a part of the value with an explicit inverse.
    pub fn modify_explicit<A>(
        &mut self,
        accessor: A,
        strategy: Strategy,
        forward: impl FnMut(&mut A::Part) + Send + 'static,
        backward: impl FnMut(&mut A::Part) + Send + 'static,
    ) where
        A: Accessor<T>,
    {
        self.record_step(Step::explicit(accessor, forward, backward), strategy);
    }

    /// Mutate the whole value, undoing by snapshot.
    pub fn apply(&mut self, strategy: Strategy, mutate: impl FnMut(&mut T) + Send + 'static)
    where
        T: Clone + Send,
    {
        self.modify(Identity::new(), strategy, mutate);
    }

    /// Mutate the whole value with an explicit inverse.
    ///
    /// Same as [`record`](Self::record) with the strategy first, matching
    /// [`apply`](Self::apply).
    pub fn apply_explicit(
        &mut self,
        strategy: Strategy,
        forward: impl FnMut(&mut T) + Send + 'static,
        backward: impl FnMut(&mut T) + Send + 'static,
    ) {
        self.record(forward, backward, strategy);
    }

    fn push_step(&mut self, step: Step<T>, keep_suffix: bool) {
        let Step {
            mut forward,
            backward,
            label,
        } = step;
        forward(&mut self.value);

        let current = self.current;
        let old_next = self.nodes[current].next.take();
        let old_forward = self.nodes[current].forward.take();

        let mut node = HistoryNode::root();
        node.backward = Some(backward);
        node.prev = Some(current);
        node.label = label;
        if keep_suffix {
            node.next = old_next;
            node.forward = old_forward;
        }
        let id = self.nodes.alloc(node);

        let parent = &mut self.nodes[current];
        parent.next = Some(id);
        parent.forward = Some(forward);

        if keep_suffix {
            match old_next {
                Some(next) => self.nodes[next].prev = Some(id),
                None => self.tail = id,
            }
            self.len += 1;
        } else {
            let discarded = self.nodes.free_from(old_next);
            if discarded > 0 {
                debug!(target: TARGET, discarded, "redo suffix discarded");
            }
            self.tail = id;
            self.len = self.position + 1;
        }

        self.current = id;
        self.position += 1;
        self.enforce_depth();
    }

    fn amend(&mut self, build: impl FnOnce(&T) -> Step<T>) {
        let current = self.current;
        let Some(prev) = self.nodes[current].prev else {
            // Nothing to amend at the root: the change joins the baseline.
            let Step { mut forward, .. } = build(&self.value);
            forward(&mut self.value);
            return;
        };

        if let Some(rollback) = self.nodes[current].backward.as_mut() {
            rollback(&mut self.value);
        }

        let Step {
            forward,
            backward,
            label,
        } = build(&self.value);

        let mut forward = match self.nodes[prev].forward.take() {
            Some(old) => chain(old, forward),
            None => forward,
        };
        forward(&mut self.value);
        self.nodes[prev].forward = Some(forward);

        let node = &mut self.nodes[current];
        node.backward = Some(match node.backward.take() {
            Some(old) => chain(backward, old),
            None => backward,
        });
        if label.is_some() {
            node.label = label;
        }
    }

    fn inject(&mut self, step: Step<T>) {
        let Step {
            mut forward,
            backward,
            ..
        } = step;
        forward(&mut self.value);

        let current = self.current;
        let Some(prev) = self.nodes[current].prev else {
            return;
        };

        let node = &mut self.nodes[current];
        node.backward = Some(match node.backward.take() {
            Some(old) => chain(backward, old),
            None => backward,
        });

        let parent = &mut self.nodes[prev];
        parent.forward = Some(match parent.forward.take() {
            Some(old) => chain(old, forward),
            None => forward,
        });
    }

    /// Evict steps until `len <= max_depth`.
    ///
    /// Redo steps go first, newest first. Once the pointer is at the tail the
    /// oldest steps are folded into the root state.
    fn enforce_depth(&mut self) {
        let mut oldest = 0;
        let mut newest = 0;
        while self.len > self.config.max_depth {
            if self.position < self.len {
                if !self.evict_newest() {
                    break;
                }
                newest += 1;
            } else {
                if !self.evict_oldest() {
                    break;
                }
                oldest += 1;
            }
        }
        if oldest > 0 {
            debug!(target: TARGET, evicted = oldest, side = "oldest", "history evicted");
        }
        if newest > 0 {
            debug!(target: TARGET, evicted = newest, side = "newest", "history evicted");
        }
    }

    fn evict_oldest(&mut self) -> bool {
        let Some(next) = self.nodes[self.root].next else {
            return false;
        };
        self.nodes.free(self.root);
        let node = &mut self.nodes[next];
        node.prev = None;
        node.backward = None;
        node.label = None;
        self.root = next;
        self.len -= 1;
        self.position -= 1;
        true
    }

    fn evict_newest(&mut self) -> bool {
        let Some(prev) = self.nodes[self.tail].prev else {
            return false;
        };
        self.nodes.free(self.tail);
        let node = &mut self.nodes[prev];
        node.next = None;
        node.forward = None;
        self.tail = prev;
        self.len -= 1;
        true
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// The owned value.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consume the history, returning the value in its current state.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }

    /// Distance of the pointer from the root.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of recorded steps (positions after the root).
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no steps are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.position < self.len
    }

    /// Number of steps that can be undone.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.position
    }

    /// Number of steps that can be redone.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.len - self.position
    }

    /// Label of the step the next undo reverts.
    #[must_use]
    pub fn next_undo_label(&self) -> Option<&str> {
        self.nodes[self.current].label()
    }

    /// Label of the step the next redo re-applies.
    #[must_use]
    pub fn next_redo_label(&self) -> Option<&str> {
        let next = self.nodes[self.current].next?;
        self.nodes[next].label()
    }

    /// Labels of every step from oldest to newest.
    #[must_use]
    pub fn labels(&self) -> Vec<Option<&str>> {
        let mut labels = Vec::with_capacity(self.len);
        let mut cursor = self.nodes[self.root].next;
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            labels.push(node.label());
            cursor = node.next;
        }
        labels
    }

    /// Get the current configuration.
    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Visit every position from root to tail.
    ///
    /// The history rewinds to the root, replays to the tail, and finally
    /// returns to where it started. `visit` sees the value at each position.
    pub fn walk(&mut self, mut visit: impl FnMut(Position<'_>, &T)) {
        let origin = self.position;
        self.undo_all();
        loop {
            let node = &self.nodes[self.current];
            let position = Position {
                index: self.position,
                is_current: self.position == origin,
                label: node.label(),
            };
            visit(position, &self.value);
            if !self.redo() {
                break;
            }
        }
        let back = self.position - origin;
        self.undo_n(back);
    }

    /// Run `f` against the value as it was at the root, then return to the
    /// current position.
    pub fn with_rewound<R>(&mut self, f: impl FnOnce(&T) -> R) -> R {
        let origin = self.position;
        self.undo_all();
        let out = f(&self.value);
        self.redo_n(origin);
        out
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Replace the configuration, evicting steps if the new limit is lower.
    pub fn set_config(&mut self, config: HistoryConfig) {
        self.config = config;
        self.enforce_depth();
    }

    /// Drop every step. The current value becomes the new root state.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.alloc(HistoryNode::root());
        self.current = self.root;
        self.tail = self.root;
        self.position = 0;
        self.len = 0;
    }
}
