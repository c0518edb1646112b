#![forbid(unsafe_code)]

//! Ready-made lenses for struct fields, vector slots and map entries.
//!
//! ```
//! use std::collections::BTreeMap;
//! use rewind::{History, Strategy};
//! use rewind_extras::{field_lens, lens::key_lens};
//!
//! #[derive(Debug, Clone, Default)]
//! struct Settings { limits: BTreeMap<String, u32> }
//!
//! let limit = field_lens!(Settings, limits).then(key_lens("fps".to_string()));
//! let mut history = History::new(Settings::default());
//! history.modify(limit, Strategy::Default, |v| *v = Some(60));
//! assert_eq!(history.value().limits.get("fps"), Some(&60));
//!
//! history.undo();
//! assert!(history.value().limits.is_empty());
//! ```

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use rewind::Lens;

/// Build a [`Lens`](rewind::Lens) onto a (possibly nested) field.
///
/// The getter clones the field; the setter assigns it.
///
/// ```
/// use rewind_extras::field_lens;
/// use rewind::Accessor;
///
/// #[derive(Clone, Default)]
/// struct Inner { x: i32 }
/// #[derive(Clone, Default)]
/// struct Outer { inner: Inner }
///
/// let x = field_lens!(Outer, inner.x);
/// let mut outer = Outer::default();
/// x.set(&mut outer, 4);
/// assert_eq!(x.get(&outer), 4);
/// ```
#[macro_export]
macro_rules! field_lens {
    ($ty:ty, $($field:tt).+) => {
        $crate::__rewind::Lens::new(
            |whole: &$ty| whole.$($field).+.clone(),
            |whole: &mut $ty, part| whole.$($field).+ = part,
        )
    };
}

/// Lens onto slot `index` of a vector.
///
/// The part is `None` when the slot does not exist. Setting `Some` writes the
/// slot if it exists; setting `None` or writing past the end does nothing.
#[must_use]
pub fn index_lens<E>(index: usize) -> Lens<Vec<E>, Option<E>>
where
    E: Clone + 'static,
{
    Lens::new(
        move |items: &Vec<E>| items.get(index).cloned(),
        move |items: &mut Vec<E>, part: Option<E>| {
            if let (Some(slot), Some(item)) = (items.get_mut(index), part) {
                *slot = item;
            }
        },
    )
}

/// Maps that [`key_lens`] can address.
pub trait KeyedMap {
    /// Key type.
    type Key;
    /// Stored value type.
    type Value;

    /// Value stored under `key`, if any.
    fn lookup(&self, key: &Self::Key) -> Option<&Self::Value>;
    /// Insert or overwrite the entry for `key`.
    fn store(&mut self, key: Self::Key, value: Self::Value);
    /// Remove the entry for `key`. Absent keys are ignored.
    fn evict(&mut self, key: &Self::Key);
}

impl<K: Ord, V> KeyedMap for BTreeMap<K, V> {
    type Key = K;
    type Value = V;

    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn store(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn evict(&mut self, key: &K) {
        self.remove(key);
    }
}

impl<K: Eq + Hash, V> KeyedMap for HashMap<K, V> {
    type Key = K;
    type Value = V;

    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn store(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn evict(&mut self, key: &K) {
        self.remove(key);
    }
}

/// Lens onto the entry for `key`.
///
/// The part is `None` when the key is absent. Setting `None` removes the key,
/// so snapshot undo of an insertion removes the entry again.
#[must_use]
pub fn key_lens<M>(key: M::Key) -> Lens<M, Option<M::Value>>
where
    M: KeyedMap + 'static,
    M::Key: Clone + Send + Sync + 'static,
    M::Value: Clone + 'static,
{
    let set_key = key.clone();
    Lens::new(
        move |map: &M| map.lookup(&key).cloned(),
        move |map: &mut M, part: Option<M::Value>| match part {
            Some(value) => map.store(set_key.clone(), value),
            None => map.evict(&set_key),
        },
    )
}
