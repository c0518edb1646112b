#![forbid(unsafe_code)]

//! Helpers layered on top of [`rewind`].
//!
//! - [`lens`]: field, vector slot and map entry lenses.
//! - [`collections`]: undoable vector edits (`collections` feature).
//! - [`dump`]: text dumps of every history position (`dump` feature).

#[doc(hidden)]
pub use rewind as __rewind;

pub mod lens;

#[cfg(feature = "collections")]
pub mod collections;

#[cfg(feature = "dump")]
pub mod dump;
