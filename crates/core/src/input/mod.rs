//! Script input contracts.
//!
//! A script declares an [`InputSchema`]; [`build`] checks an untyped JSON
//! argument map against it and produces an immutable [`TypedInput`], or a
//! [`ValidationError`] listing every offending field. Pure logic, no I/O.

pub mod error;
pub mod schema;
pub mod typed;
pub mod validate;

pub use error::{FieldViolation, ValidationError, ViolationKind};
pub use schema::{FieldSpec, FieldType, InputSchema};
pub use typed::TypedInput;
pub use validate::{build, build_from_value};
