//! The field comparison engine.
//!
//! [`FieldComparison`] compares two instances of the same type field by
//! field. Each field's equality is computed the first time it is needed and
//! cached until [`reset_cache`](FieldComparison::reset_cache) is called.
//!
//! # Examples
//!
//! ```rust
//! use fieldler::{EqualityTests, FieldComparison};
//!
//! #[derive(Debug)]
//! struct Person {
//!     name: &'static str,
//!     age: u32,
//! }
//!
//! let tests = EqualityTests::new()
//!     .with_key("name", |person: &Person| person.name)
//!     .with_key("age", |person: &Person| person.age);
//!
//! let john = Person { name: "John", age: 12 };
//! let older_john = Person { name: "John", age: 13 };
//! let comparison = FieldComparison::new(&john, &older_john, tests);
//!
//! assert_eq!(comparison.is_equal("name"), Ok(true));
//! assert_eq!(comparison.are_all_equal(&["name", "age"]), Ok(false));
//! assert_eq!(comparison.number_of_differences(), 1);
//!
//! let mut changed = Vec::new();
//! comparison
//!     .do_when_different("age", || changed.push("age"))
//!     .unwrap()
//!     .do_when_different("name", || changed.push("name"))
//!     .unwrap();
//! assert_eq!(changed, vec!["age"]);
//! ```
//!
//! # Empty selections
//!
//! The selection-based combinators treat an empty selection as "the whole
//! field set", not as "no fields":
//!
//! | Call                      | Result with `&[]`       |
//! |---------------------------|-------------------------|
//! | `is_any_equal(&[])`       | `has_equalities()`      |
//! | `is_any_different(&[])`   | `has_differences()`     |
//! | `are_all_equal(&[])`      | `!has_differences()`    |
//! | `are_all_different(&[])`  | `!has_equalities()`     |
//!
//! # Threading
//!
//! The cache lives in a [`RefCell`], so a comparison is `!Sync` and must be
//! driven from one thread. The registry behind it is shared through an
//! [`Arc`] and can back comparisons on any number of threads.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::ComparisonError;
use crate::registry::{EqualityTest, EqualityTests};

/// Lazily evaluated, memoized field-by-field comparison of two values.
///
/// See the [module documentation](crate::comparison) for an overview.
pub struct FieldComparison<'a, T, F> {
    object_a: &'a T,
    object_b: &'a T,
    equality_tests: Arc<EqualityTests<T, F>>,
    equality_results: RefCell<FxHashMap<F, bool>>,
}

impl<'a, T, F> FieldComparison<'a, T, F>
where
    F: Copy + Eq + Hash + fmt::Debug,
{
    /// Creates a comparison of `object_a` and `object_b`.
    ///
    /// Nothing is evaluated until the first query.
    pub fn new(
        object_a: &'a T,
        object_b: &'a T,
        equality_tests: impl Into<Arc<EqualityTests<T, F>>>,
    ) -> Self {
        Self {
            object_a,
            object_b,
            equality_tests: equality_tests.into(),
            equality_results: RefCell::new(FxHashMap::default()),
        }
    }

    /// Creates a comparison from optional parts.
    ///
    /// # Errors
    ///
    /// Returns [`ComparisonError::NullArgument`] naming the first missing
    /// argument.
    pub fn build(
        object_a: Option<&'a T>,
        object_b: Option<&'a T>,
        equality_tests: Option<Arc<EqualityTests<T, F>>>,
    ) -> Result<Self, ComparisonError<F>> {
        let object_a = object_a.ok_or(ComparisonError::NullArgument {
            argument: "object_a",
        })?;
        let object_b = object_b.ok_or(ComparisonError::NullArgument {
            argument: "object_b",
        })?;
        let equality_tests = equality_tests.ok_or(ComparisonError::NullArgument {
            argument: "equality_tests",
        })?;
        Ok(Self::new(object_a, object_b, equality_tests))
    }

    /// The first compared instance.
    pub const fn object_a(&self) -> &'a T {
        self.object_a
    }

    /// The second compared instance.
    pub const fn object_b(&self) -> &'a T {
        self.object_b
    }

    /// The registry this comparison evaluates.
    pub const fn equality_tests(&self) -> &Arc<EqualityTests<T, F>> {
        &self.equality_tests
    }

    /// Every compared field, in registry order.
    pub fn fields(&self) -> impl Iterator<Item = F> + '_ {
        self.equality_tests.fields()
    }

    /// Number of fields whose result is currently cached.
    pub fn cached_fields(&self) -> usize {
        self.equality_results.borrow().len()
    }

    // =========================================================================
    // Per-field queries
    // =========================================================================

    /// Returns whether `field` is equal on both instances.
    ///
    /// # Errors
    ///
    /// Returns [`ComparisonError::UndefinedField`] if `field` is not registered.
    pub fn is_equal(&self, field: F) -> Result<bool, ComparisonError<F>> {
        let predicate = self
            .equality_tests
            .get(field)
            .ok_or(ComparisonError::UndefinedField(field))?;
        Ok(self.resolve(field, predicate))
    }

    /// Returns whether `field` differs between the two instances.
    ///
    /// Shares the cache entry used by [`is_equal`](Self::is_equal).
    ///
    /// # Errors
    ///
    /// Returns [`ComparisonError::UndefinedField`] if `field` is not registered.
    pub fn is_different(&self, field: F) -> Result<bool, ComparisonError<F>> {
        self.is_equal(field).map(|equal| !equal)
    }

    // =========================================================================
    // Whole-set queries
    // =========================================================================

    /// Returns `true` if at least one field is equal.
    ///
    /// Already cached results are consulted first; remaining fields are then
    /// evaluated in registry order until an equal one is found.
    pub fn has_equalities(&self) -> bool {
        self.has_cached(true) || self.any_registered(true)
    }

    /// Returns `true` if at least one field differs.
    pub fn has_differences(&self) -> bool {
        self.has_cached(false) || self.any_registered(false)
    }

    /// Every equal field. Evaluates all fields.
    pub fn equal_fields(&self) -> HashSet<F> {
        self.fields_matching(true)
    }

    /// Every differing field. Evaluates all fields.
    pub fn different_fields(&self) -> HashSet<F> {
        self.fields_matching(false)
    }

    /// Number of equal fields.
    pub fn number_of_equalities(&self) -> usize {
        self.equal_fields().len()
    }

    /// Number of differing fields.
    pub fn number_of_differences(&self) -> usize {
        self.different_fields().len()
    }

    // =========================================================================
    // Selection queries
    // =========================================================================

    /// Returns `true` if any selected field is equal.
    ///
    /// An empty selection falls back to [`has_equalities`](Self::has_equalities).
    ///
    /// # Errors
    ///
    /// Returns [`ComparisonError::UndefinedField`] if an unregistered field is
    /// reached before the answer is known.
    pub fn is_any_equal(&self, fields: &[F]) -> Result<bool, ComparisonError<F>> {
        if fields.is_empty() {
            return Ok(self.has_equalities());
        }
        self.any_selected(fields, true)
    }

    /// Returns `true` if any selected field differs.
    ///
    /// An empty selection falls back to [`has_differences`](Self::has_differences).
    ///
    /// # Errors
    ///
    /// Returns [`ComparisonError::UndefinedField`] if an unregistered field is
    /// reached before the answer is known.
    pub fn is_any_different(&self, fields: &[F]) -> Result<bool, ComparisonError<F>> {
        if fields.is_empty() {
            return Ok(self.has_differences());
        }
        self.any_selected(fields, false)
    }

    /// Returns `true` if every selected field is equal.
    ///
    /// An empty selection means "no differences anywhere", i.e.
    /// `!has_differences()`.
    ///
    /// # Errors
    ///
    /// Returns [`ComparisonError::UndefinedField`] if an unregistered field is
    /// reached before the answer is known.
    pub fn are_all_equal(&self, fields: &[F]) -> Result<bool, ComparisonError<F>> {
        if fields.is_empty() {
            return Ok(!self.has_differences());
        }
        self.all_selected(fields, true)
    }

    /// Returns `true` if every selected field differs.
    ///
    /// An empty selection means `!has_equalities()`.
    ///
    /// # Errors
    ///
    /// Returns [`ComparisonError::UndefinedField`] if an unregistered field is
    /// reached before the answer is known.
    pub fn are_all_different(&self, fields: &[F]) -> Result<bool, ComparisonError<F>> {
        if fields.is_empty() {
            return Ok(!self.has_equalities());
        }
        self.all_selected(fields, false)
    }

    // =========================================================================
    // Conditional actions
    // =========================================================================

    /// Runs `action` if `field` is equal.
    ///
    /// # Errors
    ///
    /// Returns [`ComparisonError::UndefinedField`] if `field` is not registered;
    /// the action is not run.
    pub fn do_when_equal(
        &self,
        field: F,
        action: impl FnOnce(),
    ) -> Result<&Self, ComparisonError<F>> {
        Ok(self.run_when(self.is_equal(field)?, action))
    }

    /// Runs `action` with both instances if `field` is equal.
    ///
    /// # Errors
    ///
    /// See [`do_when_equal`](Self::do_when_equal).
    pub fn do_when_equal_with(
        &self,
        field: F,
        action: impl FnOnce(&T, &T),
    ) -> Result<&Self, ComparisonError<F>> {
        Ok(self.inspect_when(self.is_equal(field)?, action))
    }

    /// Runs `action` if `field` differs.
    ///
    /// # Errors
    ///
    /// See [`do_when_equal`](Self::do_when_equal).
    pub fn do_when_different(
        &self,
        field: F,
        action: impl FnOnce(),
    ) -> Result<&Self, ComparisonError<F>> {
        Ok(self.run_when(self.is_different(field)?, action))
    }

    /// Runs `action` with both instances if `field` differs.
    ///
    /// # Errors
    ///
    /// See [`do_when_equal`](Self::do_when_equal).
    pub fn do_when_different_with(
        &self,
        field: F,
        action: impl FnOnce(&T, &T),
    ) -> Result<&Self, ComparisonError<F>> {
        Ok(self.inspect_when(self.is_different(field)?, action))
    }

    /// Runs `action` if [`is_any_equal`](Self::is_any_equal) holds.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`is_any_equal`](Self::is_any_equal).
    pub fn do_when_any_equal(
        &self,
        fields: &[F],
        action: impl FnOnce(),
    ) -> Result<&Self, ComparisonError<F>> {
        Ok(self.run_when(self.is_any_equal(fields)?, action))
    }

    /// Runs `action` with both instances if [`is_any_equal`](Self::is_any_equal) holds.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`is_any_equal`](Self::is_any_equal).
    pub fn do_when_any_equal_with(
        &self,
        fields: &[F],
        action: impl FnOnce(&T, &T),
    ) -> Result<&Self, ComparisonError<F>> {
        Ok(self.inspect_when(self.is_any_equal(fields)?, action))
    }

    /// Runs `action` if [`is_any_different`](Self::is_any_different) holds.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`is_any_different`](Self::is_any_different).
    pub fn do_when_any_different(
        &self,
        fields: &[F],
        action: impl FnOnce(),
    ) -> Result<&Self, ComparisonError<F>> {
        Ok(self.run_when(self.is_any_different(fields)?, action))
    }

    /// Runs `action` with both instances if
    /// [`is_any_different`](Self::is_any_different) holds.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`is_any_different`](Self::is_any_different).
    pub fn do_when_any_different_with(
        &self,
        fields: &[F],
        action: impl FnOnce(&T, &T),
    ) -> Result<&Self, ComparisonError<F>> {
        Ok(self.inspect_when(self.is_any_different(fields)?, action))
    }

    /// Runs `action` if [`are_all_equal`](Self::are_all_equal) holds.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`are_all_equal`](Self::are_all_equal).
    pub fn do_when_all_equal(
        &self,
        fields: &[F],
        action: impl FnOnce(),
    ) -> Result<&Self, ComparisonError<F>> {
        Ok(self.run_when(self.are_all_equal(fields)?, action))
    }

    /// Runs `action` with both instances if [`are_all_equal`](Self::are_all_equal) holds.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`are_all_equal`](Self::are_all_equal).
    pub fn do_when_all_equal_with(
        &self,
        fields: &[F],
        action: impl FnOnce(&T, &T),
    ) -> Result<&Self, ComparisonError<F>> {
        Ok(self.inspect_when(self.are_all_equal(fields)?, action))
    }

    /// Runs `action` if [`are_all_different`](Self::are_all_different) holds.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`are_all_different`](Self::are_all_different).
    pub fn do_when_all_different(
        &self,
        fields: &[F],
        action: impl FnOnce(),
    ) -> Result<&Self, ComparisonError<F>> {
        Ok(self.run_when(self.are_all_different(fields)?, action))
    }

    /// Runs `action` with both instances if
    /// [`are_all_different`](Self::are_all_different) holds.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`are_all_different`](Self::are_all_different).
    pub fn do_when_all_different_with(
        &self,
        fields: &[F],
        action: impl FnOnce(&T, &T),
    ) -> Result<&Self, ComparisonError<F>> {
        Ok(self.inspect_when(self.are_all_different(fields)?, action))
    }

    // =========================================================================
    // Conditional errors
    // =========================================================================

    /// Fails with the error built by `supplier` if `field` is equal.
    ///
    /// The supplier is only called when the condition holds. Comparison
    /// errors are converted into `X` through its `From` implementation, so
    /// the whole chain shares one error type:
    ///
    /// ```rust
    /// use fieldler::{ComparisonError, EqualityTests, FieldComparison};
    ///
    /// #[derive(Debug, PartialEq)]
    /// enum CheckError {
    ///     Unchanged(&'static str),
    ///     Comparison(ComparisonError<&'static str>),
    /// }
    ///
    /// impl From<ComparisonError<&'static str>> for CheckError {
    ///     fn from(error: ComparisonError<&'static str>) -> Self {
    ///         Self::Comparison(error)
    ///     }
    /// }
    ///
    /// let tests = EqualityTests::new().with_key("value", |value: &i32| *value);
    /// let comparison = FieldComparison::new(&1, &1, tests);
    ///
    /// let result = comparison.throw_when_equal("value", || CheckError::Unchanged("value"));
    /// assert_eq!(result.err(), Some(CheckError::Unchanged("value")));
    ///
    /// let result = comparison.throw_when_equal("other", || CheckError::Unchanged("other"));
    /// assert_eq!(
    ///     result.err(),
    ///     Some(CheckError::Comparison(ComparisonError::UndefinedField("other")))
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the supplied error when the condition holds, or the converted
    /// [`ComparisonError`] when `field` is not registered.
    pub fn throw_when_equal<X>(&self, field: F, supplier: impl FnOnce() -> X) -> Result<&Self, X>
    where
        X: From<ComparisonError<F>>,
    {
        self.raise_when(self.is_equal(field)?, supplier)
    }

    /// Fails with the error built by `supplier` if `field` differs.
    ///
    /// # Errors
    ///
    /// See [`throw_when_equal`](Self::throw_when_equal).
    pub fn throw_when_different<X>(
        &self,
        field: F,
        supplier: impl FnOnce() -> X,
    ) -> Result<&Self, X>
    where
        X: From<ComparisonError<F>>,
    {
        self.raise_when(self.is_different(field)?, supplier)
    }

    /// Fails with the error built by `supplier` if
    /// [`is_any_equal`](Self::is_any_equal) holds.
    ///
    /// # Errors
    ///
    /// See [`throw_when_equal`](Self::throw_when_equal).
    pub fn throw_when_any_equal<X>(
        &self,
        fields: &[F],
        supplier: impl FnOnce() -> X,
    ) -> Result<&Self, X>
    where
        X: From<ComparisonError<F>>,
    {
        self.raise_when(self.is_any_equal(fields)?, supplier)
    }

    /// Fails with the error built by `supplier` if
    /// [`is_any_different`](Self::is_any_different) holds.
    ///
    /// # Errors
    ///
    /// See [`throw_when_equal`](Self::throw_when_equal).
    pub fn throw_when_any_different<X>(
        &self,
        fields: &[F],
        supplier: impl FnOnce() -> X,
    ) -> Result<&Self, X>
    where
        X: From<ComparisonError<F>>,
    {
        self.raise_when(self.is_any_different(fields)?, supplier)
    }

    /// Fails with the error built by `supplier` if
    /// [`are_all_equal`](Self::are_all_equal) holds.
    ///
    /// # Errors
    ///
    /// See [`throw_when_equal`](Self::throw_when_equal).
    pub fn throw_when_all_equal<X>(
        &self,
        fields: &[F],
        supplier: impl FnOnce() -> X,
    ) -> Result<&Self, X>
    where
        X: From<ComparisonError<F>>,
    {
        self.raise_when(self.are_all_equal(fields)?, supplier)
    }

    /// Fails with the error built by `supplier` if
    /// [`are_all_different`](Self::are_all_different) holds.
    ///
    /// # Errors
    ///
    /// See [`throw_when_equal`](Self::throw_when_equal).
    pub fn throw_when_all_different<X>(
        &self,
        fields: &[F],
        supplier: impl FnOnce() -> X,
    ) -> Result<&Self, X>
    where
        X: From<ComparisonError<F>>,
    {
        self.raise_when(self.are_all_different(fields)?, supplier)
    }

    // =========================================================================
    // Cache lifecycle
    // =========================================================================

    /// Discards every cached result.
    ///
    /// Use after mutating a compared instance through interior mutability;
    /// later queries recompute from the current state.
    pub fn reset_cache(&self) -> &Self {
        let discarded = {
            let mut equality_results = self.equality_results.borrow_mut();
            let discarded = equality_results.len();
            equality_results.clear();
            discarded
        };
        tracing::debug!(discarded, "field comparison cache reset");
        self
    }

    /// Evaluates every field that is not cached yet.
    pub fn evaluate_all(&self) -> &Self {
        if self.no_pending_tests() {
            return self;
        }
        for (field, predicate) in self.equality_tests.iter() {
            self.resolve(field, predicate);
        }
        tracing::debug!(fields = self.equality_tests.len(), "evaluated all fields");
        self
    }

    /// Evaluates the selected fields that are not cached yet.
    ///
    /// Does nothing for an empty selection or when every registered field is
    /// already cached.
    ///
    /// # Errors
    ///
    /// Returns [`ComparisonError::UndefinedField`] at the first unregistered
    /// field; fields before it stay cached.
    pub fn evaluate_fields(&self, fields: &[F]) -> Result<&Self, ComparisonError<F>> {
        if fields.is_empty() || self.no_pending_tests() {
            return Ok(self);
        }
        for &field in fields {
            self.is_equal(field)?;
        }
        tracing::debug!(fields = fields.len(), "evaluated selected fields");
        Ok(self)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Cached result for `field`, evaluating and caching it if absent.
    ///
    /// The cache is not borrowed while `predicate` runs.
    fn resolve(&self, field: F, predicate: &EqualityTest<T>) -> bool {
        let cached = self.equality_results.borrow().get(&field).copied();
        cached.unwrap_or_else(|| {
            let equal = predicate(self.object_a, self.object_b);
            tracing::trace!(?field, equal, "evaluated field equality");
            self.equality_results.borrow_mut().insert(field, equal);
            equal
        })
    }

    fn has_cached(&self, expected: bool) -> bool {
        self.equality_results
            .borrow()
            .values()
            .any(|&equal| equal == expected)
    }

    fn any_registered(&self, expected: bool) -> bool {
        self.equality_tests
            .iter()
            .any(|(field, predicate)| self.resolve(field, predicate) == expected)
    }

    fn fields_matching(&self, expected: bool) -> HashSet<F> {
        self.equality_tests
            .iter()
            .filter(|&(field, predicate)| self.resolve(field, predicate) == expected)
            .map(|(field, _)| field)
            .collect()
    }

    fn any_selected(&self, fields: &[F], expected: bool) -> Result<bool, ComparisonError<F>> {
        for &field in fields {
            if self.is_equal(field)? == expected {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn all_selected(&self, fields: &[F], expected: bool) -> Result<bool, ComparisonError<F>> {
        for &field in fields {
            if self.is_equal(field)? != expected {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn no_pending_tests(&self) -> bool {
        self.equality_results.borrow().len() == self.equality_tests.len()
    }

    fn run_when(&self, condition: bool, action: impl FnOnce()) -> &Self {
        if condition {
            action();
        }
        self
    }

    fn inspect_when(&self, condition: bool, action: impl FnOnce(&T, &T)) -> &Self {
        if condition {
            action(self.object_a, self.object_b);
        }
        self
    }

    fn raise_when<X>(&self, condition: bool, supplier: impl FnOnce() -> X) -> Result<&Self, X> {
        if condition {
            tracing::debug!("comparison condition met, raising caller error");
            return Err(supplier());
        }
        Ok(self)
    }
}

impl<T: fmt::Debug, F: fmt::Debug> fmt::Debug for FieldComparison<'_, T, F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FieldComparison")
            .field("object_a", self.object_a)
            .field("object_b", self.object_b)
            .field("equality_tests", &self.equality_tests)
            .field("equality_results", &self.equality_results.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;

    #[derive(Debug)]
    struct Sample {
        first: i32,
        second: i32,
    }

    fn tests() -> EqualityTests<Sample, u8> {
        EqualityTests::new()
            .with_key(1, |sample: &Sample| sample.first)
            .with_key(2, |sample: &Sample| sample.second)
    }

    #[rstest]
    fn construction_does_not_evaluate() {
        let sample = Sample { first: 1, second: 2 };
        let comparison = FieldComparison::new(&sample, &sample, tests());
        assert_eq!(comparison.cached_fields(), 0);
    }

    #[rstest]
    #[case(None, Some(()), Some(()), "object_a")]
    #[case(Some(()), None, Some(()), "object_b")]
    #[case(Some(()), Some(()), None, "equality_tests")]
    fn build_reports_missing_argument(
        #[case] object_a: Option<()>,
        #[case] object_b: Option<()>,
        #[case] registry: Option<()>,
        #[case] expected: &'static str,
    ) {
        let sample = Sample { first: 1, second: 1 };
        let result = FieldComparison::build(
            object_a.map(|()| &sample),
            object_b.map(|()| &sample),
            registry.map(|()| Arc::new(tests())),
        );
        assert_eq!(
            result.err(),
            Some(ComparisonError::NullArgument { argument: expected })
        );
    }

    #[rstest]
    fn build_with_all_parts_succeeds() {
        let sample = Sample { first: 1, second: 1 };
        let comparison =
            FieldComparison::build(Some(&sample), Some(&sample), Some(Arc::new(tests())));
        assert!(comparison.is_ok_and(|comparison| comparison.are_all_equal(&[]) == Ok(true)));
    }

    #[rstest]
    fn is_different_shares_cache_slot() {
        let first = Sample { first: 1, second: 2 };
        let second = Sample { first: 1, second: 3 };
        let comparison = FieldComparison::new(&first, &second, tests());

        assert_eq!(comparison.is_different(2), Ok(true));
        assert_eq!(comparison.cached_fields(), 1);
        assert_eq!(comparison.is_equal(2), Ok(false));
        assert_eq!(comparison.cached_fields(), 1);
    }

    #[rstest]
    fn undefined_field_is_reported_and_not_cached() {
        let sample = Sample { first: 1, second: 2 };
        let comparison = FieldComparison::new(&sample, &sample, tests());
        assert_eq!(comparison.is_equal(9), Err(ComparisonError::UndefinedField(9)));
        assert_eq!(comparison.cached_fields(), 0);
    }

    #[rstest]
    fn has_equalities_uses_cached_results_first() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let registry = EqualityTests::new()
            .with(1_u8, move |_: &Sample, _: &Sample| {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                false
            })
            .with_key(2, |sample: &Sample| sample.second);
        let sample = Sample { first: 1, second: 2 };
        let comparison = FieldComparison::new(&sample, &sample, registry);

        assert_eq!(comparison.is_equal(2), Ok(true));
        assert!(comparison.has_equalities());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[rstest]
    fn reentrant_query_from_action_is_allowed() {
        let first = Sample { first: 1, second: 2 };
        let second = Sample { first: 1, second: 3 };
        let comparison = FieldComparison::new(&first, &second, tests());
        let observed = Cell::new(None);

        let result =
            comparison.do_when_equal(1, || observed.set(Some(comparison.number_of_differences())));
        assert!(result.is_ok());
        assert_eq!(observed.get(), Some(1));
    }

    #[rstest]
    fn debug_shows_cached_results() {
        let sample = Sample { first: 1, second: 2 };
        let comparison = FieldComparison::new(&sample, &sample, tests());
        comparison.evaluate_fields(&[1]).unwrap();
        let rendered = format!("{comparison:?}");
        assert!(rendered.contains("equality_results: {1: true}"));
    }
}
