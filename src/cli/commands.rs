//! CLI command implementations
//!
//! Each command returns `Ok(true)` when the input validated, `Ok(false)`
//! when a validation error response was written, and `Err` for anything
//! that prevented validation from running.

use std::path::Path;

use serde_json::json;
use tracing::info;

use super::args::Command;
use super::errors::CliResult;
use super::io::{error_response, ok_response, read_input, write_response};
use crate::schema::{read_schema_file, validate, ValidatedRecord, ValidationErrors};
use crate::settings::{ProcessEnv, SettingsLoader};

/// Dispatch a parsed command
pub fn run_command(command: Command) -> CliResult<bool> {
    match command {
        Command::Validate { schema, input, pretty } => {
            validate_input(&schema, input.as_deref(), pretty)
        }
        Command::Settings {
            schema,
            prefix,
            case_sensitive,
            pretty,
        } => settings(&schema, &prefix, case_sensitive, pretty),
        Command::Check { schema } => check(&schema),
    }
}

/// Validate one JSON document against a schema file
pub fn validate_input(schema_path: &Path, input: Option<&Path>, pretty: bool) -> CliResult<bool> {
    let schema = read_schema_file(schema_path)?;
    let document = read_input(input)?;

    report(validate(&schema, &document), pretty)
}

/// Build a settings record from the process environment
pub fn settings(
    schema_path: &Path,
    prefix: &str,
    case_sensitive: bool,
    pretty: bool,
) -> CliResult<bool> {
    let schema = read_schema_file(schema_path)?;
    let loader = SettingsLoader::new(&schema)
        .with_prefix(prefix)
        .case_sensitive(case_sensitive);

    report(loader.load(&ProcessEnv), pretty)
}

/// Check a schema file's structure
pub fn check(schema_path: &Path) -> CliResult<bool> {
    let schema = read_schema_file(schema_path)?;
    info!(schema = %schema.name, fields = schema.fields.len(), "schema is well-formed");

    write_response(
        &json!({
            "status": "ok",
            "schema": schema.name,
            "fields": schema.fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
        }),
        false,
    )?;
    Ok(true)
}

fn report(result: Result<ValidatedRecord, ValidationErrors>, pretty: bool) -> CliResult<bool> {
    match result {
        Ok(record) => {
            write_response(&ok_response(&record), pretty)?;
            Ok(true)
        }
        Err(errors) => {
            info!(schema = %errors.title(), errors = errors.len(), "input rejected");
            write_response(&error_response(&errors), pretty)?;
            Ok(false)
        }
    }
}
