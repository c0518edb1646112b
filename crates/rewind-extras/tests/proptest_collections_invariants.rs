#![forbid(unsafe_code)]
#![cfg(feature = "collections")]

//! Property tests for undoable vector edits.
//!
//! Validates:
//! - Random edit sequences match the same edits applied to a plain `Vec`.
//! - Undoing every edit restores the starting vector.
//! - Rejected edits never add a step.

use proptest::prelude::*;
use proptest::strategy::Strategy as _;

use rewind::{History, Identity, Strategy};
use rewind_extras::collections::VecHistoryExt;

#[derive(Debug, Clone)]
enum Edit {
    Push(u8),
    Pop,
    Insert(usize, u8),
    Remove(usize),
    Swap(usize, usize),
    Set(usize, u8),
}

fn edit_strategy() -> impl proptest::strategy::Strategy<Value = Edit> {
    prop_oneof![
        any::<u8>().prop_map(Edit::Push),
        Just(Edit::Pop),
        (0usize..12, any::<u8>()).prop_map(|(i, v)| Edit::Insert(i, v)),
        (0usize..12).prop_map(Edit::Remove),
        (0usize..12, 0usize..12).prop_map(|(a, b)| Edit::Swap(a, b)),
        (0usize..12, any::<u8>()).prop_map(|(i, v)| Edit::Set(i, v)),
    ]
}

/// Apply `edit` to the plain vector. Returns whether it was valid.
fn apply_plain(items: &mut Vec<u8>, edit: &Edit) -> bool {
    let len = items.len();
    match *edit {
        Edit::Push(v) => items.push(v),
        Edit::Pop => return items.pop().is_some(),
        Edit::Insert(i, v) if i <= len => items.insert(i, v),
        Edit::Remove(i) if i < len => {
            items.remove(i);
        }
        Edit::Swap(a, b) if a < len && b < len => items.swap(a, b),
        Edit::Set(i, v) if i < len => items[i] = v,
        _ => return false,
    }
    true
}

/// Apply `edit` through the history. Returns whether it was accepted.
fn apply_history(history: &mut History<Vec<u8>>, edit: &Edit) -> bool {
    let id = Identity::<Vec<u8>>::new();
    let s = Strategy::Default;
    match *edit {
        Edit::Push(v) => {
            history.push_item(id, v, s);
            true
        }
        Edit::Pop => history.pop_item(id, s).is_ok(),
        Edit::Insert(i, v) => history.insert_item(id, i, v, s).is_ok(),
        Edit::Remove(i) => history.remove_item(id, i, s).is_ok(),
        Edit::Swap(a, b) => history.swap_items(id, a, b, s).is_ok(),
        Edit::Set(i, v) => history.set_item(id, i, v, s).is_ok(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn edits_match_plain_vec_and_undo_fully(
        start in prop::collection::vec(any::<u8>(), 0..6),
        edits in prop::collection::vec(edit_strategy(), 1..40)
    ) {
        let mut plain = start.clone();
        let mut history = History::new(start.clone());
        let mut accepted = 0usize;

        for edit in &edits {
            let ok_plain = apply_plain(&mut plain, edit);
            let ok_history = apply_history(&mut history, edit);
            prop_assert_eq!(ok_plain, ok_history, "acceptance differs for {:?}", edit);
            if ok_history {
                accepted += 1;
            }
            prop_assert_eq!(history.value(), &plain);
            prop_assert_eq!(history.len(), accepted);
        }

        prop_assert_eq!(history.undo_all(), accepted);
        prop_assert_eq!(history.value(), &start);
        history.redo_all();
        prop_assert_eq!(history.value(), &plain);
    }
}
