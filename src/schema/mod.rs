//! Schema Validator
//!
//! A schema is plain data: an ordered list of [`FieldSpec`]s, each with a
//! type, an optional default and constraints. [`validate`] interprets a
//! schema against an untyped `serde_json::Value` and returns either a
//! [`ValidatedRecord`] or every [`ValidationError`] found.
//!
//! # Design Principles
//!
//! - Validation is pure and deterministic
//! - Failures are data, never panics
//! - All fields are checked; one error per value at most
//! - Coercion only between text and numbers (and text to bool)
//! - A record exists only after successful validation

mod coerce;
mod errors;
mod loader;
mod record;
mod types;
mod validator;

pub use errors::{
    json_type_name, ErrorKind, LocItem, Location, SchemaError, SchemaResult, ValidationError,
    ValidationErrors,
};
pub use loader::{parse_schema, read_schema_file, SchemaLoader};
pub use record::{ValidatedRecord, Value};
pub use types::{Constraints, ExtraPolicy, FieldSpec, FieldType, Pattern, Schema, SchemaConfig};
pub use validator::{validate, SchemaValidator};
