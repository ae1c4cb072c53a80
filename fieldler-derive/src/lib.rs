//! Derive macros for fieldler field registries.
//!
//! This crate generates, for a struct with named fields, the closed set of
//! field identifiers and the registry of per-field equality tests consumed by
//! `fieldler::FieldComparison`.
//!
//! # Available Derive Macros
//!
//! - [`FieldData`]: Generates the `<Struct>Field` identifier enum
//! - [`FieldComparator`]: Generates the identifier enum and a
//!   `fieldler::FieldComparator` implementation
//!
//! # Field Attributes
//!
//! - `#[fieldler(skip)]`: leave the field out
//! - `#[fieldler(accessor = "method")]`: compare through a zero-argument method
//! - `#[fieldler(with = "path::to::function")]`: compare with a custom
//!   `fn(&FieldType, &FieldType) -> bool`
//!
//! # Example
//!
//! ```rust,ignore
//! use fieldler::FieldComparator;
//!
//! #[derive(FieldComparator)]
//! struct Person {
//!     age: u32,
//!     last_name: String,
//!     #[fieldler(skip)]
//!     nationality: String,
//! }
//!
//! // Generated:
//! // - enum PersonField { Age, LastName }
//! // - impl FieldComparator for Person
//!
//! let comparison = Person::compare(&first, &second);
//! comparison.is_equal(PersonField::LastName)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod case;
mod field_comparator;
mod field_data;
mod model;

use proc_macro::TokenStream;

/// Derive macro generating the field identifier enum of a struct.
///
/// For a struct `Name`, generates `enum NameField` with one variant per
/// compared field, with the visibility of the struct. Variant names are the
/// PascalCase form of the field's constant name:
///
/// | Field           | Constant name     | Variant         |
/// |-----------------|-------------------|-----------------|
/// | `age`           | `AGE`             | `Age`           |
/// | `last_name`     | `LAST_NAME`       | `LastName`      |
/// | `requiresOxygen`| `REQUIRES_OXYGEN` | `RequiresOxygen`|
/// | `someDTOCrazy`  | `SOME_DTO_CRAZY`  | `SomeDtoCrazy`  |
///
/// The enum implements `Copy`, `Eq`, `Hash`, `Ord`, `Debug`, `Display` (the
/// source field name) and `fieldler::FieldIdentifier`.
///
/// # Requirements
///
/// - The struct must have named fields
/// - No two compared fields may map to the same constant name
///
/// Do not combine with [`FieldComparator`], which already generates the enum.
#[proc_macro_derive(FieldData, attributes(fieldler))]
pub fn derive_field_data(input: TokenStream) -> TokenStream {
    field_data::derive_field_data_impl(input)
}

/// Derive macro generating the field identifier enum and the equality
/// registry of a struct.
///
/// Generates everything [`FieldData`] does, plus:
///
/// ```rust,ignore
/// impl fieldler::FieldComparator for Name {
///     type Field = NameField;
///     fn equality_tests() -> fieldler::EqualityTests<Self, NameField> { ... }
/// }
/// ```
///
/// Each compared field is tested with `PartialEq` unless its attributes
/// choose an accessor method or a custom function.
///
/// # Generics
///
/// Generic structs are supported. Type and lifetime parameters must be
/// `'static`, and the type of every directly compared field must implement
/// `PartialEq`; the generated impl carries these bounds.
#[proc_macro_derive(FieldComparator, attributes(fieldler))]
pub fn derive_field_comparator(input: TokenStream) -> TokenStream {
    field_comparator::derive_field_comparator_impl(input)
}
