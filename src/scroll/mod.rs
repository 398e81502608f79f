//! Scroll traversal
//!
//! Runs a query to exhaustion against a cursor-based endpoint, delivering
//! every page to a caller-supplied handler and releasing the cursor at the
//! end. A traversal is a single-use run; the engine may be reused for
//! sequential traversals.

mod cancel;
mod context;
mod engine;
mod errors;
mod handler;
mod outcome;

pub use cancel::{cancellation, CancelHandle, CancelSignal};
pub use context::{ScrollContext, ScrollId, ScrollTtl, TtlParseError};
pub use engine::ScrollEngine;
pub use errors::{HandlerError, Stage, TraversalError, TraversalErrorKind, TraversalFailure};
pub use handler::BatchHandler;
pub use outcome::{TraversalOutcome, TraversalSummary};
