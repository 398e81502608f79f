//! Transport seam consumed by the traversal engine

use std::sync::Arc;

use async_trait::async_trait;

use super::errors::TransportResult;
use crate::query::EncodedQuery;
use crate::scroll::{ScrollId, ScrollTtl};

/// Requests against the search cluster
///
/// Credentials and base URL are fixed when the implementation is built.
/// Implementations may be shared between traversals; a cursor never is.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open a cursor with the initial search
    async fn search(
        &self,
        index: &str,
        payload: &EncodedQuery,
        ttl: ScrollTtl,
    ) -> TransportResult<Vec<u8>>;

    /// Fetch the page following `scroll_id`
    async fn scroll_next(&self, scroll_id: &ScrollId, ttl: ScrollTtl) -> TransportResult<Vec<u8>>;

    /// Release the cursor
    async fn scroll_close(&self, scroll_id: &ScrollId) -> TransportResult<()>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn search(
        &self,
        index: &str,
        payload: &EncodedQuery,
        ttl: ScrollTtl,
    ) -> TransportResult<Vec<u8>> {
        (**self).search(index, payload, ttl).await
    }

    async fn scroll_next(&self, scroll_id: &ScrollId, ttl: ScrollTtl) -> TransportResult<Vec<u8>> {
        (**self).scroll_next(scroll_id, ttl).await
    }

    async fn scroll_close(&self, scroll_id: &ScrollId) -> TransportResult<()> {
        (**self).scroll_close(scroll_id).await
    }
}
