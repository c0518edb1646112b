#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rewind::{History, HistoryConfig, Strategy};

#[derive(Debug, Arbitrary)]
enum Kind {
    Default,
    Amend,
    Insert,
    Inject,
}

impl Kind {
    fn strategy(&self) -> Strategy {
        match self {
            Self::Default => Strategy::Default,
            Self::Amend => Strategy::Amend,
            Self::Insert => Strategy::Insert,
            Self::Inject => Strategy::Inject,
        }
    }
}

#[derive(Debug, Arbitrary)]
enum Op {
    Record(Kind, i16),
    Undo,
    Redo,
    UndoN(u8),
    RedoN(u8),
    Walk,
    SetDepth(u8),
    Clear,
}

#[derive(Debug, Arbitrary)]
struct Input {
    depth: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let depth = usize::from(input.depth.max(1));
    let mut history = History::with_config(0i64, HistoryConfig::new(depth));
    let mut limit = depth;

    for op in input.ops.iter().take(512) {
        match op {
            Op::Record(kind, d) => {
                let d = i64::from(*d);
                history.record(move |v| *v += d, move |v| *v -= d, kind.strategy());
            }
            Op::Undo => {
                history.undo();
            }
            Op::Redo => {
                history.redo();
            }
            Op::UndoN(n) => {
                history.undo_n(usize::from(*n));
            }
            Op::RedoN(n) => {
                history.redo_n(usize::from(*n));
            }
            Op::Walk => {
                let before = *history.value();
                let position = history.position();
                let mut seen = 0usize;
                history.walk(|_, _| seen += 1);
                assert_eq!(seen, history.len() + 1, "walk skipped positions");
                assert_eq!(*history.value(), before, "walk changed the value");
                assert_eq!(history.position(), position, "walk moved the pointer");
            }
            Op::SetDepth(n) => {
                limit = usize::from((*n).max(1));
                history.set_config(HistoryConfig::new(limit));
            }
            Op::Clear => history.clear(),
        }

        // Post-conditions that must always hold:
        assert!(history.position() <= history.len(), "pointer past tail");
        assert!(history.len() <= limit, "depth limit exceeded");
        assert_eq!(history.can_undo(), history.position() > 0);
        assert_eq!(history.can_redo(), history.position() < history.len());
    }

    // Undo then redo everything must land on the same value.
    let tail_position = history.position();
    let value = *history.value();
    history.undo_all();
    history.redo_n(tail_position);
    assert_eq!(*history.value(), value, "round trip changed the value");
});
