//! CLI module for recordcheck
//!
//! Provides command-line interface for:
//! - validate: Validate a JSON object against a schema file
//! - settings: Validate the process environment against a schema file
//! - check: Check a schema file's structure

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, run_command, settings, validate_input};
pub use errors::{CliError, CliResult};
pub use io::{error_response, ok_response, read_input, write_response};

/// Parse arguments and run the selected command.
///
/// Returns whether the input validated.
pub fn run() -> CliResult<bool> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}
