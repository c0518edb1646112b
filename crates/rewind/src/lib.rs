#![forbid(unsafe_code)]

//! Undo/redo history over a single owned value.
//!
//! A [`History`] owns a value and records every mutation as a reversible
//! step. Steps are recorded with one of four [`Strategy`] variants:
//!
//! - **Default**: append a step; a pending redo branch is discarded.
//! - **Amend**: rewrite the current step in place (coalesce a drag).
//! - **Insert**: splice a step in, keeping the redo branch reachable.
//! - **Inject**: thread a change into the current position so undo and redo
//!   through it carry the change, without adding a step.
//!
//! Mutations can target a part of the value through an [`Accessor`]. The
//! implicit form undoes by restoring a snapshot of the part; the explicit
//! form takes a caller-written inverse.
//!
//! # Quick Start
//!
//! ```
//! use rewind::{History, Lens, Strategy};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Doc { v: i32 }
//!
//! let v = Lens::new(|d: &Doc| d.v, |d: &mut Doc, v| d.v = v);
//! let mut history = History::new(Doc::default());
//!
//! history.modify(v.clone(), Strategy::Default, |v| *v = 1);
//! history.modify(v.clone(), Strategy::Default, |v| *v *= 10);
//! assert_eq!(history.value().v, 10);
//!
//! history.undo();
//! history.modify(v, Strategy::Default, |v| *v += 1);
//! assert_eq!(history.value().v, 2);
//! assert!(!history.redo());
//! ```
//!
//! # Logging
//!
//! Recording, eviction and suffix discards emit `debug` events, and undo
//! and redo emit `trace` events, all under the `rewind.history` target.

pub mod accessor;
pub mod config;
pub mod history;
pub mod node;

pub use accessor::{Accessor, Identity, Lens};
pub use config::{ConfigError, HistoryConfig};
pub use history::{History, Position, Step, Strategy};
pub use node::{Action, HistoryNode, NodeId};
