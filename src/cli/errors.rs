//! CLI-specific error types
//!
//! CLI errors end the process with exit code 1. Validation failures are
//! not CLI errors; they are reported on stdout.

use std::io;

use thiserror::Error;

use crate::schema::SchemaError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Schema file missing, unreadable or malformed
    #[error("{}: {}", .0.code(), .0)]
    Schema(#[from] SchemaError),

    /// stdin/stdout or input file failure
    #[error("RECORDCHECK_CLI_IO_ERROR: {0}")]
    Io(String),

    /// Input is not JSON
    #[error("RECORDCHECK_CLI_INPUT_ERROR: {0}")]
    Input(String),
}

impl CliError {
    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        match self {
            CliError::Schema(e) => e.code(),
            CliError::Io(_) => "RECORDCHECK_CLI_IO_ERROR",
            CliError::Input(_) => "RECORDCHECK_CLI_INPUT_ERROR",
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Input(format!("JSON error: {}", e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
