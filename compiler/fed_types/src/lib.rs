//! Structural types for federated computations.
//!
//! The IR in `fed_ir` consumes this crate as its type capability:
//! - [`to_type`] normalizes permissive [`TypeSpec`] input into a [`Type`]
//! - kind predicates and named-tuple lookups ([`Type::element_type`], ...)
//! - [`Type::is_assignable_from`] for structural compatibility
//! - `Display` for the short form (`<a=int32, bool>`), [`Type::repr`] for
//!   the constructor-shaped form, quoting names with [`push_quoted`]
//! - [`serialize_type`] / [`deserialize_type`] for binary descriptors
//!
//! [`FieldTuple`] is the ordered-field container shared by tuple values and
//! named tuple types.

mod assign;
mod descriptor;
mod dtype;
mod error;
mod field_tuple;
mod spec;
mod ty;

pub use descriptor::{deserialize_type, serialize_type};
pub use dtype::{DType, Dim, PlacementLiteral};
pub use error::TypeError;
pub use field_tuple::FieldTuple;
pub use spec::{to_type, TypeSpec};
pub use ty::{push_quoted, Type};
