#![forbid(unsafe_code)]

//! Read/write access to a part of the owned value.
//!
//! An [`Accessor`] isolates one sub-part of a whole value as a `get`/`set`
//! pair. The history engine uses it to turn a mutation of the part into a
//! whole-value step: `get` a copy, mutate the copy, `set` it back.
//!
//! Accessors are plain values with no ownership of the whole. They are cloned
//! into every recorded action, so they must be `Clone + Send + 'static`.
//!
//! # Value semantics
//!
//! Snapshot-based undo stores the result of `get` and writes it back with
//! `set`. That only reverses the change if the part behaves like a value.
//! When the part is a shared handle (an `Arc<Mutex<_>>`, say), mutating
//! *through* the handle is invisible to the snapshot.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A get/set pair over a part of `T`.
pub trait Accessor<T>: Clone + Send + 'static {
    /// The part being accessed.
    type Part;

    /// Read the part out of `whole`.
    fn get(&self, whole: &T) -> Self::Part;

    /// Write `part` into `whole`.
    fn set(&self, whole: &mut T, part: Self::Part);
}

/// The whole value as its own part.
pub struct Identity<T>(PhantomData<fn() -> T>);

impl<T> Identity<T> {
    /// Create the whole-value accessor.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Identity<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Identity<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Identity<T> {}

impl<T> fmt::Debug for Identity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Identity")
    }
}

impl<T: Clone + 'static> Accessor<T> for Identity<T> {
    type Part = T;

    fn get(&self, whole: &T) -> T {
        whole.clone()
    }

    fn set(&self, whole: &mut T, part: T) {
        *whole = part;
    }
}

type Getter<T, P> = Arc<dyn Fn(&T) -> P + Send + Sync>;
type Setter<T, P> = Arc<dyn Fn(&mut T, P) + Send + Sync>;

/// A closure-backed accessor.
///
/// ```
/// use rewind::{Accessor, Lens};
///
/// #[derive(Clone)]
/// struct Point { x: i32, y: i32 }
///
/// let x = Lens::new(|p: &Point| p.x, |p: &mut Point, x| p.x = x);
/// let mut p = Point { x: 1, y: 2 };
/// x.set(&mut p, 5);
/// assert_eq!(x.get(&p), 5);
/// assert_eq!(p.y, 2);
/// ```
pub struct Lens<T, P> {
    get: Getter<T, P>,
    set: Setter<T, P>,
}

impl<T, P> Clone for Lens<T, P> {
    fn clone(&self) -> Self {
        Self {
            get: Arc::clone(&self.get),
            set: Arc::clone(&self.set),
        }
    }
}

impl<T, P> fmt::Debug for Lens<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lens<{}, {}>",
            std::any::type_name::<T>(),
            std::any::type_name::<P>()
        )
    }
}

impl<T: 'static, P: 'static> Lens<T, P> {
    /// Build a lens from a getter and a setter.
    #[must_use]
    pub fn new(
        get: impl Fn(&T) -> P + Send + Sync + 'static,
        set: impl Fn(&mut T, P) + Send + Sync + 'static,
    ) -> Self {
        Self {
            get: Arc::new(get),
            set: Arc::new(set),
        }
    }

    /// Focus further into the part with `inner`.
    ///
    /// Setting through the composed lens reads the outer part, writes the
    /// inner part into it, and writes the outer part back.
    #[must_use]
    pub fn then<Q: 'static>(self, inner: Lens<P, Q>) -> Lens<T, Q> {
        let outer_get = Arc::clone(&self.get);
        let inner_get = Arc::clone(&inner.get);
        let outer = self;
        Lens::new(
            move |whole: &T| inner_get(&outer_get(whole)),
            move |whole: &mut T, part: Q| {
                let mut mid = (outer.get)(whole);
                (inner.set)(&mut mid, part);
                (outer.set)(whole, mid);
            },
        )
    }
}

impl<T: 'static, P: 'static> Accessor<T> for Lens<T, P> {
    type Part = P;

    fn get(&self, whole: &T) -> P {
        (self.get)(whole)
    }

    fn set(&self, whole: &mut T, part: P) {
        (self.set)(whole, part)
    }
}
