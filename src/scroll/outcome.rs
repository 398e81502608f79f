//! Traversal results

use uuid::Uuid;

/// Totals of a traversal that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalSummary {
    pub traversal_id: Uuid,
    /// Batches the handler accepted
    pub batches: u64,
    /// Documents in those batches
    pub documents: u64,
    /// Responses received, including the final empty one
    pub pages: u64,
}

/// How a traversal that did not fail ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOutcome {
    /// Every page consumed
    Done(TraversalSummary),
    /// Stopped by a cancellation signal
    Cancelled(TraversalSummary),
}

impl TraversalOutcome {
    pub fn summary(&self) -> &TraversalSummary {
        match self {
            TraversalOutcome::Done(s) | TraversalOutcome::Cancelled(s) => s,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, TraversalOutcome::Done(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TraversalOutcome::Cancelled(_))
    }
}
