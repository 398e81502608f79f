//! Consumer contract
//!
//! The engine calls the handler once per non-empty page, in page order, and
//! waits for it to return before requesting the next page.

use super::errors::HandlerError;
use crate::response::Batch;

/// Consumer of traversal batches
///
/// Errors abort the traversal and are not retried by the engine.
pub trait BatchHandler {
    fn handle(&mut self, batch: Batch) -> Result<(), HandlerError>;
}

impl<F> BatchHandler for F
where
    F: FnMut(Batch) -> Result<(), HandlerError>,
{
    fn handle(&mut self, batch: Batch) -> Result<(), HandlerError> {
        self(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_handler() {
        let mut seen = 0usize;
        {
            let mut handler = |batch: Batch| -> Result<(), HandlerError> {
                seen += batch.len() + 1;
                Ok(())
            };
            handler.handle(Batch::empty()).unwrap();
            handler.handle(Batch::empty()).unwrap();
        }
        assert_eq!(seen, 2);
    }
}
