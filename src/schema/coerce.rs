//! Scalar coercion table
//!
//! | declared | accepted                                    |
//! |----------|---------------------------------------------|
//! | string   | string; int/float as decimal text           |
//! | float    | float, int; numeric text                    |
//! | int      | int fitting i64; integer text               |
//! | bool     | bool; `true/false/yes/no/on/off/1/0` text   |
//!
//! Text conversions are disabled in strict mode. Nothing else converts:
//! bool and numbers never mix, a float with a fraction is never an int,
//! and non-finite floats are rejected.

use serde_json::Value as JsonValue;

use super::record::Value;
use super::types::FieldType;

/// Coerces a scalar input to `ty`, or `None` when the input is the wrong kind.
///
/// Only scalar types are handled here; lists and records are structural
/// and are dealt with by the validator.
pub(crate) fn coerce_scalar(ty: &FieldType, input: &JsonValue, strict: bool) -> Option<Value> {
    match ty {
        FieldType::String => coerce_string(input, strict),
        FieldType::Float => coerce_float(input, strict),
        FieldType::Int => coerce_int(input, strict),
        FieldType::Bool => coerce_bool(input, strict),
        FieldType::List { .. } | FieldType::Record { .. } => None,
    }
}

fn coerce_string(input: &JsonValue, strict: bool) -> Option<Value> {
    match input {
        JsonValue::String(s) => Some(Value::Str(s.clone())),
        JsonValue::Number(n) if !strict => Some(Value::Str(n.to_string())),
        _ => None,
    }
}

fn coerce_float(input: &JsonValue, strict: bool) -> Option<Value> {
    let n = match input {
        JsonValue::Number(n) => n.as_f64()?,
        JsonValue::String(s) if !strict => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(Value::Float(n))
}

fn coerce_int(input: &JsonValue, strict: bool) -> Option<Value> {
    match input {
        JsonValue::Number(n) => n.as_i64().map(Value::Int),
        JsonValue::String(s) if !strict => s.trim().parse::<i64>().ok().map(Value::Int),
        _ => None,
    }
}

fn coerce_bool(input: &JsonValue, strict: bool) -> Option<Value> {
    match input {
        JsonValue::Bool(b) => Some(Value::Bool(*b)),
        JsonValue::String(s) if !strict => parse_bool_text(s).map(Value::Bool),
        _ => None,
    }
}

fn parse_bool_text(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
