//! Record validator
//!
//! Validation semantics:
//! - Fields are checked in declaration order
//! - Absent fields take their default, become null when optional, or are
//!   reported as `missing`
//! - Present values are coerced per the coercion table, then constrained
//! - Lists are validated element by element, records recursively
//! - Every field is checked; at most one error is reported per value
//!
//! Validation is pure and deterministic. A [`ValidatedRecord`] is only
//! returned when no error was found.

use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, trace};

use super::coerce::coerce_scalar;
use super::errors::{SchemaError, SchemaResult, ValidationError, ValidationErrors, Location};
use super::loader::SchemaLoader;
use super::record::{ValidatedRecord, Value};
use super::types::{Constraints, ExtraPolicy, FieldSpec, FieldType, Schema};

/// Validates `input` against `schema`.
///
/// Returns the validated record, or every violation found in this pass.
pub fn validate(schema: &Schema, input: &JsonValue) -> Result<ValidatedRecord, ValidationErrors> {
    let mut errors = Vec::new();

    let record = match input.as_object() {
        Some(obj) => validate_object(schema, obj, &Location::root(), &mut errors),
        None => {
            errors.push(ValidationError::wrong_type(Location::root(), "dictionary", input));
            None
        }
    };

    match record {
        Some(record) if errors.is_empty() => {
            debug!(schema = %schema.name, fields = record.len(), "validation succeeded");
            Ok(record)
        }
        _ => {
            debug!(schema = %schema.name, errors = errors.len(), "validation failed");
            Err(ValidationErrors::new(schema.name.clone(), errors))
        }
    }
}

/// Checks a field's default against the field itself, under the owning
/// schema's strict mode.
pub(crate) fn validate_default(
    field: &FieldSpec,
    default: &JsonValue,
    strict: bool,
) -> Result<Value, ValidationErrors> {
    let mut errors = Vec::new();
    let loc = Location::root().field(&field.name);
    match validate_value(&field.field_type, &field.constraints, default, &loc, strict, &mut errors) {
        Some(value) if errors.is_empty() => Ok(value),
        _ => Err(ValidationErrors::new(field.name.clone(), errors)),
    }
}

/// Schema validator backed by a loader's registry.
pub struct SchemaValidator<'a> {
    loader: &'a SchemaLoader,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a new validator backed by the given schema loader.
    pub fn new(loader: &'a SchemaLoader) -> Self {
        Self { loader }
    }

    /// Validates a document against a registered schema.
    ///
    /// # Errors
    ///
    /// - `RECORDCHECK_UNKNOWN_SCHEMA` if no schema has that name
    /// - `RECORDCHECK_VALIDATION_FAILED` carrying every field error
    pub fn validate_document(
        &self,
        schema_name: &str,
        document: &JsonValue,
    ) -> SchemaResult<ValidatedRecord> {
        let schema = self
            .loader
            .get(schema_name)
            .ok_or_else(|| SchemaError::Unknown(schema_name.to_string()))?;

        Ok(validate(schema, document)?)
    }
}

/// Validates an object's fields; `None` if any error was pushed.
fn validate_object(
    schema: &Schema,
    obj: &Map<String, JsonValue>,
    loc: &Location,
    errors: &mut Vec<ValidationError>,
) -> Option<ValidatedRecord> {
    let before = errors.len();
    let strict = schema.config.strict;
    let mut fields = IndexMap::with_capacity(schema.fields.len());

    for field in &schema.fields {
        let field_loc = loc.field(&field.name);

        let value = match obj.get(&field.name) {
            // An optional field without a default exports as null, so null
            // must read back as absent.
            Some(JsonValue::Null) if !field.required && field.default.is_none() => {
                Some(Value::Null)
            }
            Some(raw) => validate_value(
                &field.field_type,
                &field.constraints,
                raw,
                &field_loc,
                strict,
                errors,
            ),
            None => match &field.default {
                Some(default) => validate_value(
                    &field.field_type,
                    &field.constraints,
                    default,
                    &field_loc,
                    strict,
                    errors,
                ),
                None if field.required => {
                    errors.push(ValidationError::missing(field_loc));
                    None
                }
                None => Some(Value::Null),
            },
        };

        trace!(field = %field.name, ok = value.is_some(), "field checked");

        if let Some(value) = value {
            fields.insert(field.name.clone(), value);
        }
    }

    if schema.config.extra == ExtraPolicy::Forbid {
        for (key, raw) in obj {
            if schema.get_field(key).is_none() {
                errors.push(ValidationError::extra_forbidden(loc.field(key), raw));
            }
        }
    }

    (errors.len() == before).then(|| ValidatedRecord::new(schema.name.clone(), fields))
}

/// Coerces and constrains one value; `None` if an error was pushed.
fn validate_value(
    ty: &FieldType,
    constraints: &Constraints,
    input: &JsonValue,
    loc: &Location,
    strict: bool,
    errors: &mut Vec<ValidationError>,
) -> Option<Value> {
    if input.is_null() {
        if constraints.nullable {
            return Some(Value::Null);
        }
        errors.push(ValidationError::wrong_type(loc.clone(), ty.describe(), input));
        return None;
    }

    let value = match ty {
        FieldType::List { items } => {
            let Some(elements) = input.as_array() else {
                errors.push(ValidationError::wrong_type(loc.clone(), ty.describe(), input));
                return None;
            };

            let before = errors.len();
            let element_constraints = Constraints::default();
            let mut values = Vec::with_capacity(elements.len());
            for (i, element) in elements.iter().enumerate() {
                let element_loc = loc.index(i);
                if let Some(value) =
                    validate_value(items, &element_constraints, element, &element_loc, strict, errors)
                {
                    values.push(value);
                }
            }

            if errors.len() != before {
                return None;
            }
            Value::List(values)
        }
        FieldType::Record { schema } => {
            let Some(obj) = input.as_object() else {
                errors.push(ValidationError::wrong_type(loc.clone(), ty.describe(), input));
                return None;
            };
            Value::Record(validate_object(schema, obj, loc, errors)?)
        }
        _ => match coerce_scalar(ty, input, strict) {
            Some(value) => value,
            None => {
                errors.push(ValidationError::wrong_type(loc.clone(), ty.describe(), input));
                return None;
            }
        },
    };

    match check_constraints(&value, constraints, input, loc) {
        Some(err) => {
            errors.push(err);
            None
        }
        None => Some(value),
    }
}

/// Returns the first violated constraint, checked in the order minimum,
/// exclusive minimum, maximum, exclusive maximum, min_length, max_length,
/// pattern.
fn check_constraints(
    value: &Value,
    c: &Constraints,
    input: &JsonValue,
    loc: &Location,
) -> Option<ValidationError> {
    let number = match value {
        Value::Int(n) => Some(*n as f64),
        Value::Float(n) => Some(*n),
        _ => None,
    };

    if let Some(n) = number {
        if let Some(min) = c.minimum.filter(|min| n < *min) {
            return Some(ValidationError::range(loc.clone(), "greater than or equal to", min, input));
        }
        if let Some(gt) = c.exclusive_minimum.filter(|gt| n <= *gt) {
            return Some(ValidationError::range(loc.clone(), "greater than", gt, input));
        }
        if let Some(max) = c.maximum.filter(|max| n > *max) {
            return Some(ValidationError::range(loc.clone(), "less than or equal to", max, input));
        }
        if let Some(lt) = c.exclusive_maximum.filter(|lt| n >= *lt) {
            return Some(ValidationError::range(loc.clone(), "less than", lt, input));
        }
    }

    let (subject, len) = match value {
        Value::Str(s) => ("String", s.chars().count()),
        Value::List(items) => ("List", items.len()),
        _ => return None,
    };

    if let Some(min) = c.min_length.filter(|min| len < *min) {
        return Some(ValidationError::too_short(loc.clone(), subject, min, input));
    }
    if let Some(max) = c.max_length.filter(|max| len > *max) {
        return Some(ValidationError::too_long(loc.clone(), subject, max, input));
    }

    if let (Value::Str(s), Some(pattern)) = (value, &c.pattern) {
        if !pattern.is_match(s) {
            return Some(ValidationError::pattern_mismatch(loc.clone(), pattern.as_str(), input));
        }
    }

    None
}
