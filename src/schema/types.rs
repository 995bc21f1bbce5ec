//! Schema type definitions
//!
//! Supported field types:
//! - string: UTF-8 string
//! - float: 64-bit floating point
//! - int: 64-bit signed integer
//! - bool: Boolean
//! - list: Homogeneous list with element type
//! - record: Nested record with its own schema
//!
//! Nested schemas are held by value, so a schema is always a finite tree.

use std::collections::HashSet;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use super::validator;

/// A compiled regular expression, compared and serialized by its source.
///
/// Construction compiles the pattern, so a schema never holds an invalid one.
#[derive(Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Pattern)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Unanchored search
    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source)
            .map_err(|e| serde::de::Error::custom(format!("invalid pattern: {}", e)))
    }
}

/// Supported field types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit floating point
    Float,
    /// 64-bit signed integer
    Int,
    /// Boolean
    Bool,
    /// Homogeneous list with single element type
    List {
        /// Element type (boxed to allow recursive types)
        items: Box<FieldType>,
    },
    /// Nested record validated against its own schema
    Record {
        /// Nested schema
        schema: Box<Schema>,
    },
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Float => "float",
            FieldType::Int => "int",
            FieldType::Bool => "bool",
            FieldType::List { .. } => "list",
            FieldType::Record { .. } => "record",
        }
    }

    /// Noun used in "Input should be a valid ..." messages
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Float => "number",
            FieldType::Int => "integer",
            FieldType::Bool => "boolean",
            FieldType::List { .. } => "list",
            FieldType::Record { .. } => "dictionary",
        }
    }

    /// List of `items`
    pub fn list_of(items: FieldType) -> Self {
        FieldType::List {
            items: Box::new(items),
        }
    }

    /// Nested record of `schema`
    pub fn record_of(schema: Schema) -> Self {
        FieldType::Record {
            schema: Box::new(schema),
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Float | FieldType::Int)
    }

    fn has_length(&self) -> bool {
        matches!(self, FieldType::String | FieldType::List { .. })
    }
}

/// Value constraints applied after coercion.
///
/// Numeric bounds apply to `int` and `float` fields, length bounds to
/// `string` (characters) and `list` (elements), `pattern` to strings only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Inclusive lower bound (`ge`)
    #[serde(default, alias = "ge", skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Exclusive lower bound (`gt`)
    #[serde(default, alias = "gt", skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<f64>,
    /// Inclusive upper bound (`le`)
    #[serde(default, alias = "le", skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Exclusive upper bound (`lt`)
    #[serde(default, alias = "lt", skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Regular expression a string must match (unanchored search)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
    /// Whether an explicit `null` is accepted
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
}

impl Constraints {
    fn has_numeric_bounds(&self) -> bool {
        self.minimum.is_some()
            || self.exclusive_minimum.is_some()
            || self.maximum.is_some()
            || self.exclusive_maximum.is_some()
    }

    fn has_length_bounds(&self) -> bool {
        self.min_length.is_some() || self.max_length.is_some()
    }
}

fn default_required() -> bool {
    true
}

fn is_true(b: &bool) -> bool {
    *b
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name, also the input key
    pub name: String,
    /// Field data type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether field must be present when no default exists
    #[serde(default = "default_required", skip_serializing_if = "is_true")]
    pub required: bool,
    /// Value used when the field is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<JsonValue>,
    #[serde(flatten)]
    pub constraints: Constraints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldSpec {
    /// Create a required field of the given type
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            default: None,
            constraints: Constraints::default(),
            description: None,
        }
    }

    /// Create a required string field
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    /// Create a required float field
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float)
    }

    /// Create a required int field
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Int)
    }

    /// Create a required bool field
    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Bool)
    }

    /// Create a required list field
    pub fn list(name: impl Into<String>, items: FieldType) -> Self {
        Self::new(name, FieldType::list_of(items))
    }

    /// Create a required nested record field
    pub fn record(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, FieldType::record_of(schema))
    }

    /// Create a required list-of-records field
    pub fn list_of_records(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, FieldType::list_of(FieldType::record_of(schema)))
    }

    /// Absent values become `null` instead of a `missing` error
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Absent values take `value`; implies optional
    pub fn with_default(mut self, value: impl Into<JsonValue>) -> Self {
        self.default = Some(value.into());
        self.required = false;
        self
    }

    pub fn ge(mut self, bound: f64) -> Self {
        self.constraints.minimum = Some(bound);
        self
    }

    pub fn gt(mut self, bound: f64) -> Self {
        self.constraints.exclusive_minimum = Some(bound);
        self
    }

    pub fn le(mut self, bound: f64) -> Self {
        self.constraints.maximum = Some(bound);
        self
    }

    pub fn lt(mut self, bound: f64) -> Self {
        self.constraints.exclusive_maximum = Some(bound);
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.constraints.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.constraints.max_length = Some(len);
        self
    }

    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.constraints.pattern = Some(pattern);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.constraints.nullable = true;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks that the constraints make sense for the declared type.
    ///
    /// `strict` is the owning schema's mode, which the default must pass under.
    fn check_structure(&self, strict: bool) -> Result<(), String> {
        let c = &self.constraints;

        if self.name.is_empty() {
            return Err("field name must not be empty".into());
        }
        if c.has_numeric_bounds() && !self.field_type.is_numeric() {
            return Err(format!(
                "numeric bounds are not allowed on {} field",
                self.field_type.type_name()
            ));
        }
        if c.has_length_bounds() && !self.field_type.has_length() {
            return Err(format!(
                "length bounds are not allowed on {} field",
                self.field_type.type_name()
            ));
        }
        if let (Some(lo), Some(hi)) = (c.minimum, c.maximum) {
            if lo > hi {
                return Err(format!("minimum {} exceeds maximum {}", lo, hi));
            }
        }
        if let (Some(lo), Some(hi)) = (c.min_length, c.max_length) {
            if lo > hi {
                return Err(format!("min_length {} exceeds max_length {}", lo, hi));
            }
        }
        if c.pattern.is_some() && self.field_type != FieldType::String {
            return Err("pattern is only allowed on string fields".into());
        }
        if let Some(default) = &self.default {
            if let Err(errors) = validator::validate_default(self, default, strict) {
                return Err(format!("default does not validate: {}", errors));
            }
        }
        Ok(())
    }
}

/// What to do with input keys the schema does not declare
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraPolicy {
    /// Drop undeclared keys
    #[default]
    Ignore,
    /// Report each undeclared key as an error
    Forbid,
}

/// Per-schema validation behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub extra: ExtraPolicy,
    /// Disable text/number coercion
    #[serde(default)]
    pub strict: bool,
}

/// Complete schema definition: an ordered list of fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name, used in error reports and as the registry key
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub config: SchemaConfig,
    /// Field definitions in declaration order
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    /// Create an empty schema
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            config: SchemaConfig::default(),
            fields: Vec::new(),
        }
    }

    /// Append a field
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Reject undeclared input keys
    pub fn forbid_extra(mut self) -> Self {
        self.config.extra = ExtraPolicy::Forbid;
        self
    }

    /// Disable coercion
    pub fn strict(mut self) -> Self {
        self.config.strict = true;
        self
    }

    /// Looks up a field by name
    pub fn get_field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validates the schema structure itself (not a record).
    ///
    /// Nested schemas are checked recursively; the error names the dotted
    /// path of the offending field.
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("schema name must not be empty".into());
        }
        self.check_fields("")
    }

    fn check_fields(&self, prefix: &str) -> Result<(), String> {
        let mut seen = HashSet::new();

        for field in &self.fields {
            let path = if prefix.is_empty() {
                field.name.clone()
            } else {
                format!("{}.{}", prefix, field.name)
            };

            if !seen.insert(field.name.as_str()) {
                return Err(format!("duplicate field '{}'", path));
            }

            field
                .check_structure(self.config.strict)
                .map_err(|e| format!("field '{}': {}", path, e))?;

            let mut ty = &field.field_type;
            while let FieldType::List { items } = ty {
                ty = items;
            }
            if let FieldType::Record { schema } = ty {
                schema.check_fields(&path)?;
            }
        }

        Ok(())
    }
}
