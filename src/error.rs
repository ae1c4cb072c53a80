//! Error types for field comparisons.
//!
//! Only the engine's own failures live here. Errors raised through the
//! `throw_when_*` family are chosen by the caller; see
//! [`FieldComparison::throw_when_equal`](crate::FieldComparison::throw_when_equal).

use std::fmt::Debug;

use thiserror::Error;

/// Errors produced by [`FieldComparison`](crate::FieldComparison).
///
/// # Examples
///
/// ```rust
/// use fieldler::ComparisonError;
///
/// let error: ComparisonError<&str> = ComparisonError::UndefinedField("nickname");
/// assert_eq!(format!("{error}"), "undefined field: \"nickname\"");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComparisonError<F: Debug> {
    /// A required construction argument was missing.
    #[error("missing required argument `{argument}`")]
    NullArgument {
        /// Name of the missing argument.
        argument: &'static str,
    },

    /// The field has no equality test registered.
    #[error("undefined field: {0:?}")]
    UndefinedField(F),
}

impl<F: Debug> ComparisonError<F> {
    /// Returns `true` if this is an [`UndefinedField`](Self::UndefinedField) error.
    pub const fn is_undefined_field(&self) -> bool {
        matches!(self, Self::UndefinedField(_))
    }
}
