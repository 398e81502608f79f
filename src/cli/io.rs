//! Bulk NDJSON output
//!
//! Each document becomes two lines:
//! - `{"index":{"_id":"<id>"}}`
//! - the document source exactly as the cluster returned it
//!
//! UTF-8 only. One flush per batch.

use std::io::{self, BufWriter, Write};
use std::sync::Arc;

use serde_json::json;

use crate::observability::{emit, Event, LogSink};
use crate::response::{Batch, Document};
use crate::scroll::{BatchHandler, HandlerError};

/// Write one document as an action line plus its source line
pub fn write_document<W: Write>(out: &mut W, document: &Document) -> io::Result<()> {
    let action = json!({ "index": { "_id": document.id() } });
    serde_json::to_writer(&mut *out, &action)?;
    out.write_all(b"\n")?;
    out.write_all(document.source_bytes())?;
    out.write_all(b"\n")
}

/// Handler writing every batch to `out` as bulk NDJSON
pub struct BulkWriter<W: Write> {
    out: W,
    log: Arc<dyn LogSink>,
    batches: u64,
    documents: u64,
}

impl<W: Write> BulkWriter<W> {
    pub fn new(out: W, log: Arc<dyn LogSink>) -> Self {
        Self {
            out,
            log,
            batches: 0,
            documents: 0,
        }
    }

    pub fn batches(&self) -> u64 {
        self.batches
    }

    pub fn documents(&self) -> u64 {
        self.documents
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_batch(&mut self, batch: &Batch) -> io::Result<()> {
        for document in batch.iter() {
            write_document(&mut self.out, document)?;
        }
        self.out.flush()
    }
}

impl<W: Write> BatchHandler for BulkWriter<W> {
    fn handle(&mut self, batch: Batch) -> Result<(), HandlerError> {
        self.write_batch(&batch)?;
        self.batches += 1;
        self.documents += batch.len() as u64;

        emit(
            self.log.as_ref(),
            Event::BulkWritten,
            &[
                ("bulk_size", &batch.len().to_string()),
                ("count", &self.batches.to_string()),
            ],
        );
        Ok(())
    }
}

/// Buffered bulk writer on stdout
pub fn stdout_writer(log: Arc<dyn LogSink>) -> BulkWriter<BufWriter<io::Stdout>> {
    BulkWriter::new(BufWriter::new(io::stdout()), log)
}
