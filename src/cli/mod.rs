//! CLI module for esscroll
//!
//! Provides command-line interface for:
//! - all: traverse the default account query
//! - range: traverse a timestamp range
//!
//! Documents are written to stdout as bulk NDJSON, logs to stderr.

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{build_request, extract, load_config, parse_time, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{stdout_writer, write_document, BulkWriter};
