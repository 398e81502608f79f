//! Observability for esscroll
//!
//! - Structured logging (JSON lines) through an injected [`LogSink`]
//! - Typed lifecycle events
//! - Traversal counters
//!
//! Nothing here is process-global: the CLI builds one sink and one metrics
//! registry and hands them to the engine.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use esscroll::observability::{emit, Event, JsonLogger, LogSink, Severity};
//!
//! let log: Arc<dyn LogSink> = Arc::new(JsonLogger::stderr(Severity::Info));
//! emit(log.as_ref(), Event::ConfigLoaded, &[("path", "./config.toml")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{format_line, JsonLogger, LogRecord, LogSink, MemoryLog, NullLog, Severity};
pub use metrics::{MetricsSnapshot, ScrollMetrics};

/// Log a lifecycle event at its own severity
pub fn emit(sink: &dyn LogSink, event: Event, fields: &[(&str, &str)]) {
    sink.log(event.severity(), event.as_str(), fields);
}
