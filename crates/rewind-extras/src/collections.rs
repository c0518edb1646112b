#![forbid(unsafe_code)]

//! Undoable edits on vectors held inside a history.
//!
//! Each edit is recorded as one explicit step whose backward is the inverse
//! index operation, so no snapshot of the vector is kept.
//!
//! ```
//! use rewind::{History, Identity, Strategy};
//! use rewind_extras::collections::VecHistoryExt;
//!
//! let mut history = History::new(vec!['a', 'c']);
//! history.insert_item(Identity::new(), 1, 'b', Strategy::Default).unwrap();
//! assert_eq!(history.value(), &vec!['a', 'b', 'c']);
//! history.undo();
//! assert_eq!(history.value(), &vec!['a', 'c']);
//! ```

use std::fmt;

use rewind::{Accessor, History, Strategy};

/// Errors from collection edits. Nothing is recorded when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionError {
    /// The index is not valid for the vector's current length.
    IndexOutOfBounds { index: usize, len: usize },
    /// The vector has no items to pop.
    Empty,
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::Empty => write!(f, "vector is empty"),
        }
    }
}

impl std::error::Error for CollectionError {}

/// Vector edits on a [`History`] whose accessor yields a `Vec<E>`.
pub trait VecHistoryExt<T> {
    /// Append `item`.
    fn push_item<A, E>(&mut self, accessor: A, item: E, strategy: Strategy)
    where
        A: Accessor<T, Part = Vec<E>>,
        E: Clone + Send + 'static;

    /// Remove and return the last item.
    fn pop_item<A, E>(&mut self, accessor: A, strategy: Strategy) -> Result<E, CollectionError>
    where
        A: Accessor<T, Part = Vec<E>>,
        E: Clone + Send + 'static;

    /// Insert `item` at `index`, shifting later items right.
    fn insert_item<A, E>(
        &mut self,
        accessor: A,
        index: usize,
        item: E,
        strategy: Strategy,
    ) -> Result<(), CollectionError>
    where
        A: Accessor<T, Part = Vec<E>>,
        E: Clone + Send + 'static;

    /// Remove and return the item at `index`.
    fn remove_item<A, E>(
        &mut self,
        accessor: A,
        index: usize,
        strategy: Strategy,
    ) -> Result<E, CollectionError>
    where
        A: Accessor<T, Part = Vec<E>>,
        E: Clone + Send + 'static;

    /// Swap the items at `a` and `b`.
    fn swap_items<A, E>(
        &mut self,
        accessor: A,
        a: usize,
        b: usize,
        strategy: Strategy,
    ) -> Result<(), CollectionError>
    where
        A: Accessor<T, Part = Vec<E>>,
        E: Clone + Send + 'static;

    /// Replace the item at `index`, returning the old one.
    fn set_item<A, E>(
        &mut self,
        accessor: A,
        index: usize,
        item: E,
        strategy: Strategy,
    ) -> Result<E, CollectionError>
    where
        A: Accessor<T, Part = Vec<E>>,
        E: Clone + Send + 'static;
}

fn check(index: usize, len: usize) -> Result<(), CollectionError> {
    if index < len {
        Ok(())
    } else {
        Err(CollectionError::IndexOutOfBounds { index, len })
    }
}

#[cfg(feature = "collections-logging")]
fn log_edit(op: &'static str, index: usize, strategy: Strategy) {
    tracing::debug!(target: "rewind.collections", op, index, strategy = %strategy, "vec edit");
}

#[cfg(not(feature = "collections-logging"))]
fn log_edit(_op: &'static str, _index: usize, _strategy: Strategy) {}

impl<T: 'static> VecHistoryExt<T> for History<T> {
    fn push_item<A, E>(&mut self, accessor: A, item: E, strategy: Strategy)
    where
        A: Accessor<T, Part = Vec<E>>,
        E: Clone + Send + 'static,
    {
        let index = accessor.get(self.value()).len();
        log_edit("push", index, strategy);
        self.modify_explicit(
            accessor,
            strategy,
            move |items| items.push(item.clone()),
            |items| {
                items.pop();
            },
        );
    }

    fn pop_item<A, E>(&mut self, accessor: A, strategy: Strategy) -> Result<E, CollectionError>
    where
        A: Accessor<T, Part = Vec<E>>,
        E: Clone + Send + 'static,
    {
        let items = accessor.get(self.value());
        let Some(last) = items.last().cloned() else {
            return Err(CollectionError::Empty);
        };
        log_edit("pop", items.len() - 1, strategy);
        let restore = last.clone();
        self.modify_explicit(
            accessor,
            strategy,
            |items| {
                items.pop();
            },
            move |items| items.push(restore.clone()),
        );
        Ok(last)
    }

    fn insert_item<A, E>(
        &mut self,
        accessor: A,
        index: usize,
        item: E,
        strategy: Strategy,
    ) -> Result<(), CollectionError>
    where
        A: Accessor<T, Part = Vec<E>>,
        E: Clone + Send + 'static,
    {
        let len = accessor.get(self.value()).len();
        // Inserting at `len` appends.
        if index > len {
            return Err(CollectionError::IndexOutOfBounds { index, len });
        }
        log_edit("insert", index, strategy);
        self.modify_explicit(
            accessor,
            strategy,
            move |items| {
                if index <= items.len() {
                    items.insert(index, item.clone());
                }
            },
            move |items| {
                if index < items.len() {
                    items.remove(index);
                }
            },
        );
        Ok(())
    }

    fn remove_item<A, E>(
        &mut self,
        accessor: A,
        index: usize,
        strategy: Strategy,
    ) -> Result<E, CollectionError>
    where
        A: Accessor<T, Part = Vec<E>>,
        E: Clone + Send + 'static,
    {
        let items = accessor.get(self.value());
        check(index, items.len())?;
        let removed = items[index].clone();
        log_edit("remove", index, strategy);
        let restore = removed.clone();
        self.modify_explicit(
            accessor,
            strategy,
            move |items| {
                if index < items.len() {
                    items.remove(index);
                }
            },
            move |items| {
                if index <= items.len() {
                    items.insert(index, restore.clone());
                }
            },
        );
        Ok(removed)
    }

    fn swap_items<A, E>(
        &mut self,
        accessor: A,
        a: usize,
        b: usize,
        strategy: Strategy,
    ) -> Result<(), CollectionError>
    where
        A: Accessor<T, Part = Vec<E>>,
        E: Clone + Send + 'static,
    {
        let len = accessor.get(self.value()).len();
        check(a, len)?;
        check(b, len)?;
        log_edit("swap", a, strategy);
        let swap = move |items: &mut Vec<E>| {
            if a < items.len() && b < items.len() {
                items.swap(a, b);
            }
        };
        self.modify_explicit(accessor, strategy, swap, swap);
        Ok(())
    }

    fn set_item<A, E>(
        &mut self,
        accessor: A,
        index: usize,
        item: E,
        strategy: Strategy,
    ) -> Result<E, CollectionError>
    where
        A: Accessor<T, Part = Vec<E>>,
        E: Clone + Send + 'static,
    {
        let items = accessor.get(self.value());
        check(index, items.len())?;
        let old = items[index].clone();
        log_edit("set", index, strategy);
        let restore = old.clone();
        self.modify_explicit(
            accessor,
            strategy,
            move |items| {
                if let Some(slot) = items.get_mut(index) {
                    *slot = item.clone();
                }
            },
            move |items| {
                if let Some(slot) = items.get_mut(index) {
                    *slot = restore.clone();
                }
            },
        );
        Ok(old)
    }
}
