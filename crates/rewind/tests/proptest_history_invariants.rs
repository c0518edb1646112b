#![forbid(unsafe_code)]

//! Property tests for [`History`] invariants.
//!
//! Validates:
//! - Random record/undo/redo sequences match a delta-list model exactly.
//! - Depth limits are never exceeded and evict like the model says.
//! - Undo then redo of default steps restores the exact value.
//! - A default step after undo makes the old branch unreachable.
//! - Amend and inject never change the number of positions; inject never
//!   moves the pointer.

use proptest::prelude::*;
use proptest::strategy::Strategy as _;

use rewind::{History, HistoryConfig, Identity, Strategy};

// ============================================================================
// Strategy helpers
// ============================================================================

/// Operations that can be performed on a History.
#[derive(Debug, Clone)]
enum Op {
    Record(Strategy, i64),
    Undo,
    Redo,
    UndoAll,
    RedoAll,
}

fn strategy_strategy() -> impl proptest::strategy::Strategy<Value = Strategy> {
    prop_oneof![
        3 => Just(Strategy::Default),
        1 => Just(Strategy::Amend),
        1 => Just(Strategy::Insert),
        1 => Just(Strategy::Inject),
    ]
}

fn op_strategy() -> impl proptest::strategy::Strategy<Value = Op> {
    prop_oneof![
        4 => (strategy_strategy(), -1000i64..1000).prop_map(|(s, d)| Op::Record(s, d)),
        3 => Just(Op::Undo),
        3 => Just(Op::Redo),
        1 => Just(Op::UndoAll),
        1 => Just(Op::RedoAll),
    ]
}

fn ops_strategy(max_len: usize) -> impl proptest::strategy::Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 1..=max_len)
}

// ============================================================================
// Reference model
// ============================================================================

/// Value at position `k` is `base + deltas[..k].sum()`.
#[derive(Debug, Default)]
struct Model {
    base: i64,
    deltas: Vec<i64>,
    pos: usize,
    max_depth: usize,
}

impl Model {
    fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    fn value(&self) -> i64 {
        self.base + self.deltas[..self.pos].iter().sum::<i64>()
    }

    fn apply(&mut self, op: &Op) {
        match *op {
            Op::Record(Strategy::Default, d) => {
                self.deltas.truncate(self.pos);
                self.deltas.push(d);
                self.pos += 1;
                self.enforce_depth();
            }
            Op::Record(Strategy::Insert, d) => {
                self.deltas.insert(self.pos, d);
                self.pos += 1;
                self.enforce_depth();
            }
            Op::Record(Strategy::Amend | Strategy::Inject, d) => {
                if self.pos == 0 {
                    self.base += d;
                } else {
                    self.deltas[self.pos - 1] += d;
                }
            }
            Op::Undo => self.pos = self.pos.saturating_sub(1),
            Op::Redo => self.pos = (self.pos + 1).min(self.deltas.len()),
            Op::UndoAll => self.pos = 0,
            Op::RedoAll => self.pos = self.deltas.len(),
        }
    }

    /// Redo steps go first, then the oldest steps fold into `base`.
    fn enforce_depth(&mut self) {
        while self.deltas.len() > self.max_depth {
            if self.pos < self.deltas.len() {
                self.deltas.pop();
            } else {
                self.base += self.deltas.remove(0);
                self.pos -= 1;
            }
        }
    }
}

fn run(history: &mut History<i64>, op: &Op) {
    match *op {
        Op::Record(strategy, d) => {
            history.record(move |v| *v += d, move |v| *v -= d, strategy);
        }
        Op::Undo => {
            history.undo();
        }
        Op::Redo => {
            history.redo();
        }
        Op::UndoAll => {
            history.undo_all();
        }
        Op::RedoAll => {
            history.redo_all();
        }
    }
}

// ============================================================================
// Invariant 1: History matches the model for every strategy
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn history_matches_delta_model(ops in ops_strategy(80)) {
        let mut history = History::new(0i64);
        let mut model = Model::new(usize::MAX);

        for op in &ops {
            run(&mut history, op);
            model.apply(op);
            prop_assert_eq!(*history.value(), model.value(), "value mismatch after {:?}", op);
            prop_assert_eq!(history.position(), model.pos, "position mismatch after {:?}", op);
            prop_assert_eq!(history.len(), model.deltas.len(), "len mismatch after {:?}", op);
        }

        // Every reachable position replays to the model's value.
        history.undo_all();
        model.pos = 0;
        loop {
            prop_assert_eq!(*history.value(), model.value());
            if !history.redo() {
                break;
            }
            model.pos += 1;
        }
    }
}

// ============================================================================
// Invariant 2: Depth limit is never exceeded
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn depth_limit_always_enforced(
        max_depth in 1usize..12,
        ops in ops_strategy(100)
    ) {
        let mut history = History::with_config(0i64, HistoryConfig::new(max_depth));
        let mut model = Model::new(max_depth);

        for op in &ops {
            run(&mut history, op);
            model.apply(op);
            prop_assert!(
                history.len() <= max_depth,
                "len {} exceeds max_depth {} after {:?}",
                history.len(), max_depth, op
            );
            prop_assert_eq!(*history.value(), model.value());
            prop_assert_eq!(history.position(), model.pos);
        }
    }
}

// ============================================================================
// Invariant 3: Undo/redo round trip over default steps
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn undo_then_redo_restores_exact_value(
        values in prop::collection::vec(any::<i32>(), 1..40),
        undo_count in 0usize..40
    ) {
        let mut history = History::new(Vec::<i32>::new());
        for v in &values {
            let v = *v;
            history.apply(Strategy::Default, move |list| list.push(v));
        }
        let before = history.value().clone();

        let undone = history.undo_n(undo_count);
        prop_assert_eq!(undone, undo_count.min(values.len()));
        prop_assert_eq!(history.value().as_slice(), &values[..values.len() - undone]);

        prop_assert_eq!(history.redo_n(undone), undone);
        prop_assert_eq!(history.value(), &before);
    }
}

// ============================================================================
// Invariant 4: Default after undo discards the old branch
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn default_after_undo_discards_branch(
        count in 2usize..20,
        undo_count in 1usize..20
    ) {
        let mut history = History::new(0u32);
        for i in 1..=count {
            let i = i as u32;
            history.modify(Identity::new(), Strategy::Default, move |v| *v = i);
        }
        let undone = history.undo_n(undo_count);
        history.modify(Identity::new(), Strategy::Default, |v| *v = 9999);

        let mut seen = Vec::new();
        history.walk(|_, v| seen.push(*v));
        for discarded in (count - undone + 1)..=count {
            prop_assert!(!seen.contains(&(discarded as u32)));
        }
        prop_assert_eq!(history.redo_all(), 0);
        prop_assert_eq!(*history.value(), 9999);
    }
}

// ============================================================================
// Invariant 5: Amend and inject keep the position count
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn amend_and_inject_keep_shape(
        ops in ops_strategy(60),
        d in -100i64..100,
        inject in any::<bool>()
    ) {
        let mut history = History::new(0i64);
        for op in &ops {
            run(&mut history, op);
        }
        let len = history.len();
        let position = history.position();

        let strategy = if inject { Strategy::Inject } else { Strategy::Amend };
        history.record(move |v| *v += d, move |v| *v -= d, strategy);

        prop_assert_eq!(history.len(), len);
        prop_assert_eq!(history.position(), position);
    }
}

// ============================================================================
// Invariant 6: undo_all/redo_all pairs are idempotent
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn undo_all_redo_all_is_idempotent(ops in ops_strategy(60)) {
        let mut history = History::new(0i64);
        for op in &ops {
            run(&mut history, op);
        }

        history.undo_all();
        let root = *history.value();
        history.redo_all();
        let tail = *history.value();

        prop_assert_eq!(history.redo_all(), 0);
        prop_assert_eq!(*history.value(), tail);
        history.undo_all();
        prop_assert_eq!(*history.value(), root);
        prop_assert_eq!(history.undo_all(), 0);
        history.redo_all();
        prop_assert_eq!(*history.value(), tail);
    }
}
