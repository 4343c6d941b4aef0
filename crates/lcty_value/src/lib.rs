#![allow(
    clippy::result_large_err,
    reason = "Error carries its Path inline; boxing would complicate every factory"
)]
//! Structural type and value system.
//!
//! This crate provides:
//! - Structural types (`Type`) and immutable values (`Value`, `Heap`)
//! - Generic conversion between structural types (`convert`, `unify`)
//! - Typed arithmetic, comparison and collection primitives (`ops`)
//! - Typed functions with argument marshaling (`Function`, `Parameter`, `stdlib`)
//! - Path-qualified errors (`Error`, `ErrorKind`, `Path`)
//!
//! # Values
//!
//! Values are never mutated after construction. Heap-backed variants go
//! through `Value::` factory methods so every collection is `Arc`-shared and
//! cheap to clone.
//!
//! # Null, unknown and dynamic
//!
//! Every type has a null value and an unknown value. `Type::Dynamic` is only
//! meaningful as a conversion target or as the element type of an empty or
//! all-null collection; it means "whatever the input turns out to be".

mod convert;
mod errors;
mod function;
pub mod ops;
mod path;
mod stack;
pub mod stdlib;
mod types;
mod value;

pub use convert::{convert, parse_number, unify};
pub use errors::{Error, ErrorCategory, ErrorKind, Result};
pub use function::{Function, Parameter};
pub use path::{Path, PathStep};
pub use stack::ensure_sufficient_stack;
pub use types::Type;
pub use value::{Heap, Value};

// Re-export error constructors for use by other crates
pub use errors::{
    attribute_required, cannot_get_length, division_by_zero, inconsistent_element_types,
    index_out_of_range, keys_must_be_strings, missing_element, modulo_by_zero, non_finite_number,
    not_allowed, not_enough_arguments, null_argument, too_many_arguments, type_required,
    unexpected_key, wrong_length,
};

pub use bigdecimal::BigDecimal;
