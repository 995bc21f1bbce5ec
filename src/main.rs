//! recordcheck CLI entry point
//!
//! 1. Installs the tracing subscriber (stderr, `RUST_LOG` filter)
//! 2. Dispatches to CLI commands (via cli::run)
//! 3. Prints errors to stderr
//!
//! Exit codes: 0 valid, 1 error, 2 input rejected.

use recordcheck::cli;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match cli::run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
