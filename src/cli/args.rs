//! CLI argument definitions using clap
//!
//! Commands:
//! - esscroll [--config <path>] [--index <name>] all [--token <t>] [--include-zero-balance]
//! - esscroll [--config <path>] [--index <name>] range --start <t> --stop <t>

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// Extract every matching document from a search index as bulk NDJSON
#[derive(Parser, Debug)]
#[command(name = "esscroll")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Index to traverse, overriding the configured one
    #[arg(long, global = true)]
    pub index: Option<String>,

    /// Minimum log severity on stderr
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Traverse the default account query
    All {
        /// Only accounts holding this token
        #[arg(long)]
        token: Option<String>,

        /// Keep accounts whose balance is zero
        #[arg(long)]
        include_zero_balance: bool,
    },

    /// Traverse documents whose timestamp lies in [start, stop]
    Range {
        /// Epoch seconds or RFC 3339 timestamp
        #[arg(long)]
        start: String,

        /// Epoch seconds or RFC 3339 timestamp
        #[arg(long)]
        stop: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
