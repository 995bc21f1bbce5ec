//! recordcheck - declarative record validation
//!
//! Schemas are data; one validator interprets them. See [`schema`] for the
//! validator, [`settings`] for environment-derived configuration.

pub mod cli;
pub mod schema;
pub mod settings;

pub use schema::{validate, Schema, ValidatedRecord, ValidationErrors};
