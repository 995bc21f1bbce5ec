//! Schema and validation error types
//!
//! Validation failures are data: a [`ValidationErrors`] list of
//! field-level [`ValidationError`]s, each carrying a location, a kind and
//! a message. Schema definition and registry failures are [`SchemaError`]s.
//!
//! Error codes:
//! - RECORDCHECK_SCHEMA_MALFORMED
//! - RECORDCHECK_UNKNOWN_SCHEMA
//! - RECORDCHECK_SCHEMA_IMMUTABLE
//! - RECORDCHECK_SCHEMA_IO
//! - RECORDCHECK_VALIDATION_FAILED

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// One step of a path into nested input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LocItem {
    Field(String),
    Index(usize),
}

/// Path from the root record to the offending value.
///
/// Renders as `extracted_people[1].confidence`; the empty path renders
/// as `$root`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Location(Vec<LocItem>);

impl Location {
    /// The root record
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns a new location one field deeper
    pub fn field(&self, name: &str) -> Self {
        let mut items = self.0.clone();
        items.push(LocItem::Field(name.to_string()));
        Self(items)
    }

    /// Returns a new location one list element deeper
    pub fn index(&self, index: usize) -> Self {
        let mut items = self.0.clone();
        items.push(LocItem::Index(index));
        Self(items)
    }

    pub fn items(&self) -> &[LocItem] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "$root");
        }
        for (i, item) in self.0.iter().enumerate() {
            match item {
                LocItem::Field(name) if i == 0 => write!(f, "{}", name)?,
                LocItem::Field(name) => write!(f, ".{}", name)?,
                LocItem::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

/// Validation error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Required field absent, no default
    Missing,
    /// Value cannot be coerced to the declared type
    WrongType,
    /// Numeric bound violated
    Range,
    /// Length below `min_length`
    TooShort,
    /// Length above `max_length`
    TooLong,
    /// String does not match `pattern`
    PatternMismatch,
    /// Undeclared key under `extra = forbid`
    ExtraForbidden,
}

impl ErrorKind {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Missing => "missing",
            ErrorKind::WrongType => "wrong_type",
            ErrorKind::Range => "range",
            ErrorKind::TooShort => "too_short",
            ErrorKind::TooLong => "too_long",
            ErrorKind::PatternMismatch => "pattern_mismatch",
            ErrorKind::ExtraForbidden => "extra_forbidden",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    loc: Location,
    kind: ErrorKind,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<JsonValue>,
}

impl ValidationError {
    pub fn new(
        loc: Location,
        kind: ErrorKind,
        message: impl Into<String>,
        input: Option<JsonValue>,
    ) -> Self {
        Self {
            loc,
            kind,
            message: message.into(),
            input,
        }
    }

    /// Required field absent
    pub fn missing(loc: Location) -> Self {
        Self::new(loc, ErrorKind::Missing, "Field required", None)
    }

    /// Value of the wrong kind for `expected`
    pub fn wrong_type(loc: Location, expected: &str, input: &JsonValue) -> Self {
        Self::new(
            loc,
            ErrorKind::WrongType,
            format!(
                "Input should be a valid {}, got {}",
                expected,
                json_type_name(input)
            ),
            Some(input.clone()),
        )
    }

    /// Numeric bound violated; `relation` reads like "greater than or equal to"
    pub fn range(loc: Location, relation: &str, bound: f64, input: &JsonValue) -> Self {
        Self::new(
            loc,
            ErrorKind::Range,
            format!("Input should be {} {}", relation, bound),
            Some(input.clone()),
        )
    }

    /// Length below minimum; `subject` is "String" or "List"
    pub fn too_short(loc: Location, subject: &str, min: usize, input: &JsonValue) -> Self {
        Self::new(
            loc,
            ErrorKind::TooShort,
            format!("{} should have at least {}", subject, count_noun(subject, min)),
            Some(input.clone()),
        )
    }

    /// Length above maximum
    pub fn too_long(loc: Location, subject: &str, max: usize, input: &JsonValue) -> Self {
        Self::new(
            loc,
            ErrorKind::TooLong,
            format!("{} should have at most {}", subject, count_noun(subject, max)),
            Some(input.clone()),
        )
    }

    pub fn pattern_mismatch(loc: Location, pattern: &str, input: &JsonValue) -> Self {
        Self::new(
            loc,
            ErrorKind::PatternMismatch,
            format!("String should match pattern '{}'", pattern),
            Some(input.clone()),
        )
    }

    pub fn extra_forbidden(loc: Location, input: &JsonValue) -> Self {
        Self::new(
            loc,
            ErrorKind::ExtraForbidden,
            "Extra inputs are not permitted",
            Some(input.clone()),
        )
    }

    pub fn loc(&self) -> &Location {
        &self.loc
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The offending input, absent for `missing`
    pub fn input(&self) -> Option<&JsonValue> {
        self.input.as_ref()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [type={}]", self.loc, self.message, self.kind)
    }
}

fn count_noun(subject: &str, n: usize) -> String {
    let noun = if subject == "List" { "item" } else { "character" };
    if n == 1 {
        format!("{} {}", n, noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

/// Every violation found in one validation pass, in discovery order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationErrors {
    #[serde(rename = "schema")]
    title: String,
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new(title: impl Into<String>, errors: Vec<ValidationError>) -> Self {
        Self {
            title: title.into(),
            errors,
        }
    }

    /// Name of the schema that rejected the input
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.errors.len();
        write!(
            f,
            "{} validation error{} for {}",
            n,
            if n == 1 { "" } else { "s" },
            self.title
        )?;
        for err in &self.errors {
            write!(f, "\n{}\n  {} [type={}]", err.loc, err.message, err.kind)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "object",
    }
}

/// Schema definition and registry errors
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema text is not valid JSON or fails structural checks
    #[error("Malformed schema '{source_name}': {reason}")]
    Malformed { source_name: String, reason: String },

    #[error("Schema '{0}' not found")]
    Unknown(String),

    /// Attempt to replace a registered schema
    #[error("Schema '{0}' is already registered and immutable")]
    Immutable(String),

    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    ValidationFailed(#[from] ValidationErrors),
}

impl SchemaError {
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Malformed {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Malformed { .. } => "RECORDCHECK_SCHEMA_MALFORMED",
            SchemaError::Unknown(_) => "RECORDCHECK_UNKNOWN_SCHEMA",
            SchemaError::Immutable(_) => "RECORDCHECK_SCHEMA_IMMUTABLE",
            SchemaError::Io { .. } => "RECORDCHECK_SCHEMA_IO",
            SchemaError::ValidationFailed(_) => "RECORDCHECK_VALIDATION_FAILED",
        }
    }

    /// Returns the field errors when this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            SchemaError::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
