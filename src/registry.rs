//! Field registries: the mapping from field identifier to equality test.
//!
//! An [`EqualityTests`] value is built once per compared type and then shared
//! (read-only) by every [`FieldComparison`](crate::FieldComparison) created
//! from it. Registries are usually produced by `#[derive(FieldComparator)]`,
//! but they can also be assembled by hand:
//!
//! ```rust
//! use fieldler::{EqualityTests, FieldComparison};
//!
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let tests = EqualityTests::new()
//!     .with("x", |a: &Point, b: &Point| a.x == b.x)
//!     .with_key("y", |point: &Point| point.y);
//!
//! let first = Point { x: 1, y: 2 };
//! let second = Point { x: 1, y: 3 };
//! let comparison = FieldComparison::new(&first, &second, tests);
//!
//! assert_eq!(comparison.is_equal("x"), Ok(true));
//! assert_eq!(comparison.is_different("y"), Ok(true));
//! ```

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Equality test for a single field of `T`.
pub type EqualityTest<T> = dyn Fn(&T, &T) -> bool + Send + Sync;

/// An ordered, immutable-once-shared mapping from field identifier to
/// [`EqualityTest`].
///
/// Iteration follows registration order. Registering an identifier twice
/// replaces the earlier test but keeps its original position.
pub struct EqualityTests<T, F> {
    entries: Vec<(F, Box<EqualityTest<T>>)>,
    index: FxHashMap<F, usize>,
}

impl<T, F> EqualityTests<T, F>
where
    F: Copy + Eq + Hash,
{
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Creates an empty registry with room for `capacity` fields.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher),
        }
    }

    /// Registers `predicate` as the equality test for `field`.
    pub fn insert<P>(&mut self, field: F, predicate: P) -> &mut Self
    where
        P: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let predicate: Box<EqualityTest<T>> = Box::new(predicate);
        match self.index.get(&field) {
            Some(&position) => self.entries[position].1 = predicate,
            None => {
                self.index.insert(field, self.entries.len());
                self.entries.push((field, predicate));
            }
        }
        self
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with<P>(mut self, field: F, predicate: P) -> Self
    where
        P: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        self.insert(field, predicate);
        self
    }

    /// Registers a test comparing the values `key` extracts from both
    /// instances with `PartialEq`.
    #[must_use]
    pub fn with_key<K, G>(self, field: F, key: G) -> Self
    where
        K: PartialEq,
        G: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.with(field, move |object_a, object_b| key(object_a) == key(object_b))
    }

    /// Returns the equality test registered for `field`.
    pub fn get(&self, field: F) -> Option<&EqualityTest<T>> {
        self.index
            .get(&field)
            .map(|&position| self.entries[position].1.as_ref())
    }

    /// Returns `true` if `field` has a registered test.
    pub fn contains(&self, field: F) -> bool {
        self.index.contains_key(&field)
    }

    /// Runs the test for `field` against the two instances.
    ///
    /// Returns `None` when `field` is not registered.
    pub fn test(&self, field: F, object_a: &T, object_b: &T) -> Option<bool> {
        self.get(field)
            .map(|predicate| predicate(object_a, object_b))
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no field is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered field identifiers in registration order.
    pub fn fields(&self) -> impl Iterator<Item = F> + '_ {
        self.entries.iter().map(|(field, _)| *field)
    }

    /// Registered `(field, test)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (F, &EqualityTest<T>)> + '_ {
        self.entries
            .iter()
            .map(|(field, predicate)| (*field, predicate.as_ref()))
    }
}

impl<T, F> Default for EqualityTests<T, F>
where
    F: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, F: fmt::Debug> fmt::Debug for EqualityTests<T, F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("EqualityTests")
            .field(
                "fields",
                &self.entries.iter().map(|(field, _)| field).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<T, F, P> FromIterator<(F, P)> for EqualityTests<T, F>
where
    F: Copy + Eq + Hash,
    P: Fn(&T, &T) -> bool + Send + Sync + 'static,
{
    fn from_iter<I: IntoIterator<Item = (F, P)>>(iterator: I) -> Self {
        let mut tests = Self::new();
        for (field, predicate) in iterator {
            tests.insert(field, predicate);
        }
        tests
    }
}
