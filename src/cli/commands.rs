//! CLI command implementations
//!
//! Sequence for every command:
//! 1. Load and validate configuration
//! 2. Build the search request
//! 3. Run one traversal, writing bulk NDJSON to stdout
//!
//! Logs go to stderr. Ctrl-C cancels the traversal; the cursor is still
//! released before the process exits.

use std::path::Path;
use std::sync::Arc;

use chrono::DateTime;

use crate::config::Config;
use crate::observability::{emit, Event, JsonLogger, LogSink, Severity};
use crate::query::{QueryEncoder, SearchRequest};
use crate::scroll::{cancellation, BatchHandler, CancelSignal, ScrollEngine, TraversalOutcome};

use super::args::{Cli, Command};
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::stdout_writer;

/// Parse arguments and run the selected command
pub async fn run() -> CliResult<()> {
    run_command(Cli::parse_args()).await
}

/// Run a parsed command line
pub async fn run_command(cli: Cli) -> CliResult<()> {
    let severity = Severity::parse(&cli.log_level).ok_or_else(|| {
        CliError::invalid_argument(format!("Unknown log level '{}'", cli.log_level))
    })?;
    let log: Arc<dyn LogSink> = Arc::new(JsonLogger::stderr(severity));

    let config = load_config(&cli.config, log.as_ref())?;
    let index = cli.index.unwrap_or_else(|| config.scroll.index.clone());
    let request = build_request(&cli.command, &config)?;

    let (handle, signal) = cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });

    let mut writer = stdout_writer(log.clone());
    match extract(&config, &index, &request, &mut writer, log, &signal).await? {
        TraversalOutcome::Done(_) => Ok(()),
        TraversalOutcome::Cancelled(summary) => Err(CliError::new(
            CliErrorCode::Cancelled,
            format!(
                "Interrupted after {} documents in {} batches",
                summary.documents, summary.batches
            ),
        )),
    }
}

/// Load configuration and log where it came from
pub fn load_config(path: &Path, log: &dyn LogSink) -> CliResult<Config> {
    let config = Config::load(path)?;
    let path_str = path.display().to_string();
    emit(
        log,
        Event::ConfigLoaded,
        &[
            ("index", &config.scroll.index),
            ("path", &path_str),
            ("url", &config.connection.url),
        ],
    );
    Ok(config)
}

/// Search request for a command, shaped by configuration
pub fn build_request(command: &Command, config: &Config) -> CliResult<SearchRequest> {
    let request = match command {
        Command::All {
            token,
            include_zero_balance,
        } => {
            let mut query = config.account_query();
            if let Some(token) = token {
                query.token = token.clone();
            }
            if *include_zero_balance {
                query.exclude_zero_balance = false;
            }
            query.build()
        }
        Command::Range { start, stop } => SearchRequest::time_range_on(
            &config.query.timestamp_field,
            parse_time(start)?,
            parse_time(stop)?,
        )?,
    };

    Ok(match config.page_size() {
        Some(size) => request.with_size(size),
        None => request,
    })
}

/// Epoch seconds or an RFC 3339 timestamp
pub fn parse_time(value: &str) -> CliResult<i64> {
    if let Ok(secs) = value.trim().parse::<i64>() {
        return Ok(secs);
    }
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.timestamp())
        .map_err(|e| {
            CliError::invalid_argument(format!(
                "'{}' is neither epoch seconds nor RFC 3339: {}",
                value, e
            ))
        })
}

/// Run one traversal against the configured cluster
pub async fn extract<H>(
    config: &Config,
    index: &str,
    request: &SearchRequest,
    handler: &mut H,
    log: Arc<dyn LogSink>,
    cancel: &CancelSignal,
) -> CliResult<TraversalOutcome>
where
    H: BatchHandler + ?Sized,
{
    let engine = ScrollEngine::new(config.transport()?)
        .with_ttl(config.ttl()?)
        .with_encoder(QueryEncoder::default())
        .with_decoder(config.decoder())
        .with_logger(log);

    Ok(engine.run(index, request, handler, cancel).await?)
}
