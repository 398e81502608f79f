//! esscroll CLI entry point
//!
//! This is a minimal entrypoint that:
//! 1. Parses CLI arguments and runs the command (via cli::run)
//! 2. Prints errors to stderr
//! 3. Exits with non-zero on failure
//!
//! All logic is delegated to the CLI module.

use esscroll::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
