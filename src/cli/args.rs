//! CLI argument definitions using clap
//!
//! Commands:
//! - recordcheck validate --schema <path> [--input <path>] [--pretty]
//! - recordcheck settings --schema <path> [--prefix <prefix>] [--pretty]
//! - recordcheck check --schema <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// recordcheck - validate JSON records against declarative schemas
#[derive(Parser, Debug)]
#[command(name = "recordcheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a JSON object and print the validated record
    Validate {
        /// Path to schema file
        #[arg(long)]
        schema: PathBuf,

        /// Path to input JSON file (reads one line of stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },

    /// Build a settings record from environment variables
    Settings {
        /// Path to schema file
        #[arg(long)]
        schema: PathBuf,

        /// Variable name prefix
        #[arg(long, default_value = "")]
        prefix: String,

        /// Only read the exact upper-cased variable names
        #[arg(long)]
        case_sensitive: bool,

        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },

    /// Check a schema file's structure
    Check {
        /// Path to schema file
        #[arg(long)]
        schema: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from([
            "recordcheck",
            "validate",
            "--schema",
            "model.json",
            "--input",
            "data.json",
            "--pretty",
        ])
        .unwrap();

        match cli.command {
            Command::Validate { schema, input, pretty } => {
                assert_eq!(schema, PathBuf::from("model.json"));
                assert_eq!(input, Some(PathBuf::from("data.json")));
                assert!(pretty);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_settings_defaults() {
        let cli = Cli::try_parse_from(["recordcheck", "settings", "--schema", "cfg.json"]).unwrap();
        match cli.command {
            Command::Settings { prefix, case_sensitive, pretty, .. } => {
                assert_eq!(prefix, "");
                assert!(!case_sensitive);
                assert!(!pretty);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_schema_is_required() {
        assert!(Cli::try_parse_from(["recordcheck", "check"]).is_err());
    }
}
