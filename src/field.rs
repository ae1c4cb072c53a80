//! Traits implemented by the `FieldData` and `FieldComparator` derives.
//!
//! # Examples
//!
//! ```rust
//! use fieldler::{FieldComparator, FieldIdentifier};
//!
//! #[allow(non_snake_case)]
//! #[derive(FieldComparator)]
//! struct Account {
//!     owner: String,
//!     accountNumber: u64,
//! }
//!
//! assert_eq!(AccountField::ALL, &[AccountField::Owner, AccountField::AccountNumber]);
//! assert_eq!(AccountField::AccountNumber.name(), "accountNumber");
//! assert_eq!(AccountField::AccountNumber.constant_name(), "ACCOUNT_NUMBER");
//!
//! let first = Account { owner: "ada".into(), accountNumber: 1 };
//! let second = Account { owner: "ada".into(), accountNumber: 2 };
//! let comparison = Account::compare(&first, &second);
//! assert_eq!(comparison.is_equal(AccountField::Owner), Ok(true));
//! ```

use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::comparison::FieldComparison;
use crate::registry::EqualityTests;

/// A closed set of field identifiers for one compared type.
pub trait FieldIdentifier: Copy + Eq + Hash + Debug + Display + 'static {
    /// Every identifier, in field declaration order.
    const ALL: &'static [Self];

    /// The field's name as written in the source type.
    fn name(self) -> &'static str;

    /// Upper-case, underscore-separated form of [`name`](Self::name).
    fn constant_name(self) -> &'static str;

    /// Looks up an identifier by its source field name.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.name() == name)
    }

    /// Looks up an identifier by its constant name.
    fn from_constant_name(constant_name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.constant_name() == constant_name)
    }
}

/// Types that know how to build their own field registry.
pub trait FieldComparator: Sized {
    /// Identifier type naming this type's compared fields.
    type Field: FieldIdentifier;

    /// Builds the field registry for this type.
    fn equality_tests() -> EqualityTests<Self, Self::Field>;

    /// Starts a comparison between two instances.
    fn compare<'a>(object_a: &'a Self, object_b: &'a Self) -> FieldComparison<'a, Self, Self::Field> {
        FieldComparison::new(object_a, object_b, Self::equality_tests())
    }
}
