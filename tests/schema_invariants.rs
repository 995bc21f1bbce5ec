//! Schema Invariant Tests
//!
//! Tests for validation invariants:
//! - Valid input passes unchanged
//! - Missing required fields are reported once, at the field
//! - Text is coerced to numbers, never across kinds
//! - Range and length constraints are enforced
//! - Errors inside lists of records are located precisely
//! - Validation is deterministic

use recordcheck::schema::{validate, ErrorKind, FieldSpec, FieldType, Schema, Value};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn ai_model_schema() -> Schema {
    Schema::new("AIModelData")
        .field(FieldSpec::string("name"))
        .field(FieldSpec::float("version"))
        .field(FieldSpec::list("models", FieldType::String))
}

fn classification_schema() -> Schema {
    Schema::new("ClassificationResult")
        .field(FieldSpec::float("probability").ge(0.0).le(1.0))
        .field(FieldSpec::string("result_name").min_length(3))
        .field(FieldSpec::int("category_id").optional().nullable().ge(1.0))
}

fn extraction_schema() -> Schema {
    let person = Schema::new("ExtractedPerson")
        .field(FieldSpec::string("name").min_length(1))
        .field(FieldSpec::float("confidence").ge(0.0).le(1.0));
    Schema::new("ExtractionResult").field(FieldSpec::list_of_records("extracted_people", person))
}

// =============================================================================
// Exact Input Tests
// =============================================================================

/// Input matching the schema exactly comes back unchanged.
#[test]
fn test_exact_input_passes_unchanged() {
    let input = json!({
        "name": "QueryBot 5000",
        "version": 1.2,
        "models": ["gpt-4", "claude-3"]
    });

    let record = validate(&ai_model_schema(), &input).unwrap();
    assert_eq!(record.to_value(), input);
}

/// Nested input matching the schema exactly comes back unchanged.
#[test]
fn test_exact_nested_input_passes_unchanged() {
    let input = json!({
        "extracted_people": [
            { "name": "Alan Turing", "confidence": 0.99 },
            { "name": "Grace Hopper", "confidence": 0.90 }
        ]
    });

    let record = validate(&extraction_schema(), &input).unwrap();
    assert_eq!(record.to_value(), input);

    let first = record.get_list("extracted_people").unwrap()[0].as_record().unwrap();
    assert_eq!(first.get_f64("confidence"), Some(0.99));
}

// =============================================================================
// Required Field Tests
// =============================================================================

/// Each missing required field yields exactly one `missing` error at its name.
#[test]
fn test_missing_required_field() {
    let full = json!({ "name": "QueryBot 5000", "version": 1.2, "models": ["gpt-4"] });

    for field in ["name", "version", "models"] {
        let mut input = full.clone();
        input.as_object_mut().unwrap().remove(field);

        let errors = validate(&ai_model_schema(), &input).unwrap_err();
        assert_eq!(errors.len(), 1, "field {}", field);
        assert_eq!(errors.errors()[0].kind(), ErrorKind::Missing);
        assert_eq!(errors.errors()[0].loc().to_string(), field);
    }
}

/// Optional absent fields appear as explicit nulls.
#[test]
fn test_optional_field_is_null() {
    let record = validate(
        &classification_schema(),
        &json!({ "probability": 0.8, "result_name": "cat" }),
    )
    .unwrap();
    assert_eq!(record.get("category_id"), Some(&Value::Null));
    assert_eq!(record.len(), 3);
}

/// Defaults fill absent fields.
#[test]
fn test_default_applied() {
    let schema = Schema::new("AIServiceConfig")
        .field(FieldSpec::int("max_tokens").with_default(2048));

    let record = validate(&schema, &json!({})).unwrap();
    assert_eq!(record.get_i64("max_tokens"), Some(2048));
}

// =============================================================================
// Coercion Tests
// =============================================================================

/// "1.2" becomes the float 1.2, not a string.
#[test]
fn test_text_version_becomes_float() {
    let schema = Schema::new("Versioned").field(FieldSpec::float("version"));

    let record = validate(&schema, &json!({ "version": "1.2" })).unwrap();
    assert_eq!(record.get("version"), Some(&Value::Float(1.2)));
    assert_eq!(record.get_str("version"), None);
}

/// A string is never turned into a list.
#[test]
fn test_scalar_not_coerced_to_list() {
    let errors = validate(
        &ai_model_schema(),
        &json!({ "name": "QueryBot 5000", "version": 1.5, "models": "gpt-4, claude-3" }),
    )
    .unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors()[0].kind(), ErrorKind::WrongType);
    assert_eq!(errors.errors()[0].loc().to_string(), "models");
}

/// An integer is never turned into a bool.
#[test]
fn test_int_not_coerced_to_bool() {
    let schema = Schema::new("Flags").field(FieldSpec::bool("debug"));
    let errors = validate(&schema, &json!({ "debug": 1 })).unwrap_err();
    assert_eq!(errors.errors()[0].kind(), ErrorKind::WrongType);
}

// =============================================================================
// Constraint Tests
// =============================================================================

/// Probability above 1.0 is a range error at `probability`.
#[test]
fn test_probability_range() {
    let errors = validate(
        &classification_schema(),
        &json!({ "probability": 1.2, "result_name": "OK!" }),
    )
    .unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors()[0].kind(), ErrorKind::Range);
    assert_eq!(errors.errors()[0].loc().to_string(), "probability");
}

/// Names shorter than min_length are too short.
#[test]
fn test_name_too_short() {
    let errors = validate(
        &classification_schema(),
        &json!({ "probability": 0.8, "result_name": "A" }),
    )
    .unwrap_err();

    assert_eq!(errors.errors()[0].kind(), ErrorKind::TooShort);
    assert_eq!(errors.errors()[0].message(), "String should have at least 3 characters");
}

/// Bounds are inclusive.
#[test]
fn test_bounds_inclusive() {
    for p in [0.0, 1.0] {
        let input = json!({ "probability": p, "result_name": "edge" });
        assert!(validate(&classification_schema(), &input).is_ok());
    }
}

// =============================================================================
// Nested Error Locality Tests
// =============================================================================

/// One bad element produces exactly one error, located by index.
#[test]
fn test_nested_list_error_locality() {
    let errors = validate(
        &extraction_schema(),
        &json!({
            "extracted_people": [
                { "name": "A", "confidence": 0.9 },
                { "name": "B", "confidence": 1.2 }
            ]
        }),
    )
    .unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors()[0].kind(), ErrorKind::Range);
    assert_eq!(errors.errors()[0].loc().to_string(), "extracted_people[1].confidence");
}

/// Errors in different elements are all reported, in order.
#[test]
fn test_nested_errors_collected() {
    let errors = validate(
        &extraction_schema(),
        &json!({
            "extracted_people": [
                { "name": "", "confidence": 0.9 },
                { "name": "B" },
                { "name": "C", "confidence": -0.1 }
            ]
        }),
    )
    .unwrap_err();

    let locs: Vec<String> = errors.iter().map(|e| e.loc().to_string()).collect();
    assert_eq!(
        locs,
        vec![
            "extracted_people[0].name",
            "extracted_people[1].confidence",
            "extracted_people[2].confidence",
        ]
    );
    let kinds: Vec<ErrorKind> = errors.iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec![ErrorKind::TooShort, ErrorKind::Missing, ErrorKind::Range]);
}

// =============================================================================
// Determinism Tests
// =============================================================================

/// Same input validates the same way every time.
#[test]
fn test_validation_is_deterministic() {
    let schema = classification_schema();
    let input = json!({ "probability": 1.5, "result_name": "x", "category_id": 0 });

    let first = validate(&schema, &input).unwrap_err();
    for _ in 0..100 {
        assert_eq!(validate(&schema, &input).unwrap_err(), first);
    }
}

/// The report reads like a validation summary.
#[test]
fn test_error_report_format() {
    let errors = validate(
        &ai_model_schema(),
        &json!({ "name": "QueryBot 5000", "models": ["gpt-4"] }),
    )
    .unwrap_err();

    assert_eq!(
        errors.to_string(),
        "1 validation error for AIModelData\nversion\n  Field required [type=missing]"
    );
}
