//! Observable lifecycle events
//!
//! Events are explicit and typed; their names are the `event` key of every
//! log line.

use std::fmt;

use super::logger::Severity;

/// Events emitted during configuration and traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded and validated
    ConfigLoaded,

    // Traversal lifecycle
    /// Initial search about to be sent
    TraversalBegin,
    /// A page arrived and was decoded
    PageFetched,
    /// The handler accepted a batch
    BatchDelivered,
    /// Endpoint reported failed shards for a page
    ShardFailures,
    /// Cursor released at teardown
    CursorReleased,
    /// Cursor release failed; it will expire on its own
    CursorReleaseFailed,
    /// All pages consumed
    TraversalComplete,
    /// Traversal aborted by an error
    TraversalFailed,
    /// Traversal stopped by a cancellation signal
    TraversalCancelled,

    // Output
    /// A batch was written out as bulk NDJSON
    BulkWritten,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::TraversalBegin => "TRAVERSAL_BEGIN",
            Event::PageFetched => "PAGE_FETCHED",
            Event::BatchDelivered => "BATCH_DELIVERED",
            Event::ShardFailures => "SHARD_FAILURES",
            Event::CursorReleased => "CURSOR_RELEASED",
            Event::CursorReleaseFailed => "CURSOR_RELEASE_FAILED",
            Event::TraversalComplete => "TRAVERSAL_COMPLETE",
            Event::TraversalFailed => "TRAVERSAL_FAILED",
            Event::TraversalCancelled => "TRAVERSAL_CANCELLED",
            Event::BulkWritten => "BULK_WRITTEN",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::PageFetched | Event::BatchDelivered => Severity::Trace,
            Event::ShardFailures | Event::CursorReleaseFailed | Event::TraversalCancelled => {
                Severity::Warn
            }
            Event::TraversalFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::TraversalBegin.as_str(), "TRAVERSAL_BEGIN");
        assert_eq!(Event::CursorReleaseFailed.as_str(), "CURSOR_RELEASE_FAILED");
        assert_eq!(format!("{}", Event::ConfigLoaded), "CONFIG_LOADED");
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(Event::CursorReleaseFailed.severity(), Severity::Warn);
        assert_eq!(Event::TraversalFailed.severity(), Severity::Error);
        assert_eq!(Event::TraversalComplete.severity(), Severity::Info);
        assert_eq!(Event::PageFetched.severity(), Severity::Trace);
    }
}
