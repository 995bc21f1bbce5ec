//! JSON I/O handling for CLI
//!
//! - Input: a JSON object from a file, or one line of stdin
//! - Output: a single JSON object on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};
use crate::schema::{ValidatedRecord, ValidationErrors};

/// Read the input document from `path`, or from stdin when `None`
pub fn read_input(path: Option<&Path>) -> CliResult<Value> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| CliError::Io(format!("Failed to read '{}': {}", path.display(), e)))?,
        None => {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line
        }
    };

    if text.trim().is_empty() {
        return Err(CliError::Input("Empty input".into()));
    }

    Ok(serde_json::from_str(&text)?)
}

/// Success envelope around a validated record
pub fn ok_response(record: &ValidatedRecord) -> Value {
    json!({
        "status": "ok",
        "schema": record.schema_name(),
        "data": record.to_value(),
    })
}

/// Error envelope around every validation error
pub fn error_response(errors: &ValidationErrors) -> Value {
    json!({
        "status": "error",
        "code": "RECORDCHECK_VALIDATION_FAILED",
        "schema": errors.title(),
        "errors": errors.errors(),
    })
}

/// Write a response to stdout
pub fn write_response(response: &Value, pretty: bool) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, response)?;
    } else {
        serde_json::to_writer(&mut stdout, response)?;
    }
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{validate, FieldSpec, Schema};
    use tempfile::TempDir;

    fn schema() -> Schema {
        Schema::new("Status").field(FieldSpec::int("code").ge(100.0))
    }

    #[test]
    fn test_ok_response_shape() {
        let record = validate(&schema(), &json!({ "code": "200" })).unwrap();
        assert_eq!(
            ok_response(&record),
            json!({ "status": "ok", "schema": "Status", "data": { "code": 200 } })
        );
    }

    #[test]
    fn test_error_response_shape() {
        let errors = validate(&schema(), &json!({ "code": 5 })).unwrap_err();
        let response = error_response(&errors);
        assert_eq!(response["status"], "error");
        assert_eq!(response["errors"][0]["loc"], json!(["code"]));
        assert_eq!(response["errors"][0]["kind"], "range");
        assert_eq!(response["errors"][0]["input"], json!(5));
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.json");
        fs::write(&path, "{\"code\": 200}\n").unwrap();
        assert_eq!(read_input(Some(&path)).unwrap(), json!({ "code": 200 }));

        fs::write(&path, "   ").unwrap();
        assert!(matches!(read_input(Some(&path)), Err(CliError::Input(_))));

        fs::write(&path, "{ nope").unwrap();
        assert!(matches!(read_input(Some(&path)), Err(CliError::Input(_))));
    }
}
