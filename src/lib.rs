//! # fieldler
//!
//! Field-by-field comparison of two values without hand-written equality
//! code.
//!
//! ## Overview
//!
//! - **Registry**: [`EqualityTests`] maps each field identifier to an
//!   equality test. Derive it with `#[derive(FieldComparator)]` or build it
//!   by hand.
//! - **Engine**: [`FieldComparison`] evaluates field equality lazily, caches
//!   every result and offers aggregate queries, "any"/"all" combinators,
//!   conditional actions and conditional errors.
//!
//! ## Feature Flags
//!
//! - `derive` (default): re-exports the `FieldData` and `FieldComparator`
//!   derive macros.
//!
//! ## Example
//!
//! ```rust
//! use fieldler::FieldComparator;
//!
//! #[derive(FieldComparator)]
//! struct Person {
//!     age: u32,
//!     name: String,
//!     last_name: String,
//! }
//!
//! let john = Person { age: 12, name: "John".into(), last_name: "Williams".into() };
//! let other = Person { age: 12, name: "John".into(), last_name: "Johnson".into() };
//!
//! let comparison = Person::compare(&john, &other);
//! assert_eq!(comparison.is_any_equal(&[PersonField::LastName, PersonField::Age]), Ok(true));
//! assert_eq!(comparison.are_all_equal(&[PersonField::Name, PersonField::Age]), Ok(true));
//! assert!(comparison.different_fields().contains(&PersonField::LastName));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod comparison;
pub mod error;
pub mod field;
pub mod registry;

pub use comparison::FieldComparison;
pub use error::ComparisonError;
pub use field::{FieldComparator, FieldIdentifier};
pub use registry::{EqualityTest, EqualityTests};

#[cfg(feature = "derive")]
pub use fieldler_derive::{FieldComparator, FieldData};
