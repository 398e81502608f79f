//! Scroll traversal engine
//!
//! States:
//! - Init: encode, open the cursor with the initial search
//! - Paging: hand the batch to the handler, then fetch the next page with
//!   the most recently returned cursor
//! - Teardown: best-effort cursor release
//! - Done / Failed / Cancelled: terminal
//!
//! One request is outstanding at a time and the next page is not requested
//! until the handler returns, so at most one batch is held in memory.
//! Nothing is retried.

use std::future::Future;
use std::sync::Arc;

use uuid::Uuid;

use super::cancel::CancelSignal;
use super::context::{ScrollContext, ScrollTtl};
use super::errors::{Stage, TraversalError, TraversalFailure};
use super::handler::BatchHandler;
use super::outcome::{TraversalOutcome, TraversalSummary};
use crate::observability::{emit, Event, LogSink, NullLog, ScrollMetrics};
use crate::query::{QueryEncoder, SearchRequest};
use crate::response::{Batch, DecodeError, ResponseDecoder};
use crate::transport::{Transport, TransportResult};

/// Why the traversal is ending
enum Ending {
    Exhausted,
    Cancelled,
    Failed {
        error: TraversalError,
        stage: Stage,
        current_batch_delivered: bool,
    },
}

impl Ending {
    fn failed(error: impl Into<TraversalError>, stage: Stage) -> Self {
        Ending::Failed {
            error: error.into(),
            stage,
            current_batch_delivered: false,
        }
    }
}

/// Per-run state; never shared between traversals
struct Traversal {
    id: Uuid,
    id_str: String,
    context: Option<ScrollContext>,
    ttl: ScrollTtl,
    batches: u64,
    documents: u64,
    pages: u64,
}

impl Traversal {
    fn new(ttl: ScrollTtl) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            id_str: id.to_string(),
            context: None,
            ttl,
            batches: 0,
            documents: 0,
            pages: 0,
        }
    }

    fn summary(&self) -> TraversalSummary {
        TraversalSummary {
            traversal_id: self.id,
            batches: self.batches,
            documents: self.documents,
            pages: self.pages,
        }
    }
}

/// Drives exhaustive scroll traversals over one transport
pub struct ScrollEngine<T: Transport> {
    transport: T,
    encoder: QueryEncoder,
    decoder: ResponseDecoder,
    ttl: ScrollTtl,
    log: Arc<dyn LogSink>,
    metrics: Arc<ScrollMetrics>,
}

impl<T: Transport> ScrollEngine<T> {
    /// Engine with default ttl, codecs, a discarding logger and fresh metrics
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            encoder: QueryEncoder::default(),
            decoder: ResponseDecoder::default(),
            ttl: ScrollTtl::default(),
            log: Arc::new(NullLog),
            metrics: Arc::new(ScrollMetrics::new()),
        }
    }

    pub fn with_ttl(mut self, ttl: ScrollTtl) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_encoder(mut self, encoder: QueryEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn with_decoder(mut self, decoder: ResponseDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_logger(mut self, log: Arc<dyn LogSink>) -> Self {
        self.log = log;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<ScrollMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn metrics(&self) -> &Arc<ScrollMetrics> {
        &self.metrics
    }

    pub fn ttl(&self) -> ScrollTtl {
        self.ttl
    }

    /// Traverse every document matching `request` in `index`
    ///
    /// The handler sees each non-empty page once, in order. The cursor is
    /// released before returning unless the server already expired it.
    pub async fn run<H>(
        &self,
        index: &str,
        request: &SearchRequest,
        handler: &mut H,
        cancel: &CancelSignal,
    ) -> Result<TraversalOutcome, TraversalFailure>
    where
        H: BatchHandler + ?Sized,
    {
        let mut t = Traversal::new(self.ttl);
        self.metrics.increment_traversals_started();
        let ttl_param = self.ttl.as_param();
        emit(
            self.log.as_ref(),
            Event::TraversalBegin,
            &[
                ("index", index),
                ("traversal_id", &t.id_str),
                ("ttl", &ttl_param),
            ],
        );

        let ending = self.drive(&mut t, index, request, handler, cancel).await;
        self.finish(t, ending).await
    }

    async fn drive<H>(
        &self,
        t: &mut Traversal,
        index: &str,
        request: &SearchRequest,
        handler: &mut H,
        cancel: &CancelSignal,
    ) -> Ending
    where
        H: BatchHandler + ?Sized,
    {
        // Init
        if cancel.is_cancelled() {
            return Ending::Cancelled;
        }
        let payload = match self.encoder.encode(request) {
            Ok(p) => p,
            Err(e) => return Ending::failed(e, Stage::Encode),
        };
        let ttl = t.ttl;
        let mut batch = match self
            .fetch(
                t,
                Stage::InitialSearch,
                self.transport.search(index, &payload, ttl),
                cancel,
            )
            .await
        {
            Ok(b) => b,
            Err(ending) => return ending,
        };

        // Paging
        loop {
            if batch.is_empty() {
                return Ending::Exhausted;
            }

            let size = batch.len() as u64;
            if let Err(e) = handler.handle(batch) {
                return Ending::Failed {
                    error: TraversalError::Handler(e),
                    stage: Stage::Handler,
                    current_batch_delivered: true,
                };
            }
            t.batches += 1;
            t.documents += size;
            self.metrics.add_documents_delivered(size);
            let (batches, documents) = (t.batches.to_string(), t.documents.to_string());
            emit(
                self.log.as_ref(),
                Event::BatchDelivered,
                &[
                    ("batch_size", &size.to_string()),
                    ("batches", &batches),
                    ("documents", &documents),
                    ("traversal_id", &t.id_str),
                ],
            );

            if cancel.is_cancelled() {
                return Ending::Cancelled;
            }

            // A non-empty page always leaves a cursor behind (checked in fetch).
            let Some(cursor) = t.context.as_ref().map(|c| c.id().clone()) else {
                return Ending::failed(
                    DecodeError::MissingCursor {
                        field: self.decoder.cursor_field().to_string(),
                    },
                    Stage::Continuation,
                );
            };
            batch = match self
                .fetch(
                    t,
                    Stage::Continuation,
                    self.transport.scroll_next(&cursor, ttl),
                    cancel,
                )
                .await
            {
                Ok(b) => b,
                Err(ending) => return ending,
            };
        }
    }

    /// Await one response, racing cancellation, and decode it
    async fn fetch<F>(
        &self,
        t: &mut Traversal,
        stage: Stage,
        request: F,
        cancel: &CancelSignal,
    ) -> Result<Batch, Ending>
    where
        F: Future<Output = TransportResult<Vec<u8>>>,
    {
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Ending::Cancelled),
            r = request => r,
        };

        let payload = response.map_err(|e| {
            let error = TraversalError::from(e);
            if matches!(error, TraversalError::CursorExpired(_)) {
                // The server already dropped it; nothing to release.
                t.context = None;
            }
            Ending::failed(error, stage)
        })?;

        let page = self
            .decoder
            .decode(&payload)
            .map_err(|e| Ending::failed(e, stage))?;
        t.pages += 1;
        self.metrics.increment_pages_fetched();

        if let Some(id) = page.cursor {
            match t.context.as_mut() {
                Some(ctx) => ctx.advance(id),
                None => t.context = Some(ScrollContext::new(id, t.ttl)),
            }
        }

        let pages = t.pages.to_string();
        emit(
            self.log.as_ref(),
            Event::PageFetched,
            &[
                ("documents", &page.batch.len().to_string()),
                ("hits", &page.hit_count.to_string()),
                ("page", &pages),
                ("stage", stage.as_str()),
                ("traversal_id", &t.id_str),
            ],
        );
        if page.shard_failures > 0 {
            emit(
                self.log.as_ref(),
                Event::ShardFailures,
                &[
                    ("failed_shards", &page.shard_failures.to_string()),
                    ("page", &pages),
                    ("traversal_id", &t.id_str),
                ],
            );
        }

        if !page.batch.is_empty() && t.context.is_none() {
            return Err(Ending::failed(
                DecodeError::MissingCursor {
                    field: self.decoder.cursor_field().to_string(),
                },
                stage,
            ));
        }

        Ok(page.batch)
    }

    /// Release the cursor; failures only warn
    async fn teardown(&self, t: &mut Traversal) {
        let Some(ctx) = t.context.take() else {
            return;
        };

        match self.transport.scroll_close(ctx.id()).await {
            Ok(()) => {
                self.metrics.increment_cursors_released();
                emit(
                    self.log.as_ref(),
                    Event::CursorReleased,
                    &[("traversal_id", &t.id_str)],
                );
            }
            Err(e) => {
                self.metrics.increment_cursor_release_failures();
                let ttl = ctx.ttl().as_param();
                emit(
                    self.log.as_ref(),
                    Event::CursorReleaseFailed,
                    &[
                        ("code", e.code()),
                        ("error", &e.to_string()),
                        ("expires_after", &ttl),
                        ("traversal_id", &t.id_str),
                    ],
                );
            }
        }
    }

    async fn finish(
        &self,
        mut t: Traversal,
        ending: Ending,
    ) -> Result<TraversalOutcome, TraversalFailure> {
        self.teardown(&mut t).await;

        let (batches, documents, pages) = (
            t.batches.to_string(),
            t.documents.to_string(),
            t.pages.to_string(),
        );
        let totals = [
            ("batches", batches.as_str()),
            ("documents", documents.as_str()),
            ("pages", pages.as_str()),
            ("traversal_id", t.id_str.as_str()),
        ];

        match ending {
            Ending::Exhausted => {
                self.metrics.increment_traversals_completed();
                emit(self.log.as_ref(), Event::TraversalComplete, &totals);
                Ok(TraversalOutcome::Done(t.summary()))
            }
            Ending::Cancelled => {
                self.metrics.increment_traversals_cancelled();
                emit(self.log.as_ref(), Event::TraversalCancelled, &totals);
                Ok(TraversalOutcome::Cancelled(t.summary()))
            }
            Ending::Failed {
                error,
                stage,
                current_batch_delivered,
            } => {
                self.metrics.increment_traversals_failed();
                let message = error.to_string();
                let mut fields = totals.to_vec();
                fields.push(("code", error.code()));
                fields.push(("error", &message));
                fields.push(("stage", stage.as_str()));
                emit(self.log.as_ref(), Event::TraversalFailed, &fields);

                Err(TraversalFailure {
                    error,
                    stage,
                    traversal_id: t.id,
                    batches_delivered: t.batches,
                    documents_delivered: t.documents,
                    current_batch_delivered,
                })
            }
        }
    }
}
