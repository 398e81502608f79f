//! Response payload decoding
//!
//! Sources are never parsed: each `_source` is captured as raw JSON text
//! and passed through to the consumer untouched.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::Value;

use super::batch::{Batch, Document, Page};
use super::errors::{DecodeError, DecodeResult};
use crate::scroll::ScrollId;

/// Default top-level field carrying the scroll cursor
pub const DEFAULT_CURSOR_FIELD: &str = "_scroll_id";

#[derive(Deserialize)]
struct HitList {
    hits: Vec<RawHit>,
}

#[derive(Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: Option<Value>,
    #[serde(rename = "_source")]
    source: Option<Box<RawValue>>,
}

#[derive(Deserialize, Default)]
struct ShardStats {
    #[serde(default)]
    failed: u64,
}

/// Parses search and scroll responses into pages
#[derive(Debug, Clone)]
pub struct ResponseDecoder {
    cursor_field: String,
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_CURSOR_FIELD)
    }
}

impl ResponseDecoder {
    /// Create a decoder reading the cursor from `cursor_field`
    pub fn new(cursor_field: impl Into<String>) -> Self {
        Self {
            cursor_field: cursor_field.into(),
        }
    }

    pub fn cursor_field(&self) -> &str {
        &self.cursor_field
    }

    /// Decode one response payload
    pub fn decode(&self, payload: &[u8]) -> DecodeResult<Page> {
        let top: HashMap<String, Box<RawValue>> =
            serde_json::from_slice(payload).map_err(DecodeError::Malformed)?;

        let hits_raw = top
            .get("hits")
            .ok_or_else(|| DecodeError::MissingHits("no 'hits' object".into()))?;
        let list: HitList = serde_json::from_str(hits_raw.get())
            .map_err(|e| DecodeError::MissingHits(e.to_string()))?;

        let hit_count = list.hits.len();
        let mut documents = Vec::with_capacity(hit_count);
        for (index, hit) in list.hits.into_iter().enumerate() {
            let id = match hit.id {
                Some(Value::String(id)) => id,
                _ => return Err(DecodeError::MissingId { index }),
            };
            documents.push(Document::from_parts(id, hit.source));
        }

        let cursor = match top.get(&self.cursor_field) {
            None => None,
            Some(raw) => serde_json::from_str::<Option<String>>(raw.get())
                .map_err(|_| DecodeError::InvalidCursor {
                    field: self.cursor_field.clone(),
                })?
                .map(ScrollId::new),
        };

        // Shard stats are advisory; a shape we do not understand counts as none.
        let shard_failures = top
            .get("_shards")
            .and_then(|raw| serde_json::from_str::<ShardStats>(raw.get()).ok())
            .unwrap_or_default()
            .failed;

        Ok(Page {
            batch: Batch::from_documents(documents),
            cursor,
            hit_count,
            shard_failures,
        })
    }
}

/// Decode with the default cursor field
pub fn decode(payload: &[u8]) -> DecodeResult<Page> {
    ResponseDecoder::default().decode(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hits_and_cursor() {
        let payload = br#"{
            "_scroll_id": "DXF1ZXJ5QW5kRmV0Y2gBAAAAAAAAAD4WYm9laVYtZndUQlNsdDcwakFMNjU1QQ==",
            "took": 1,
            "_shards": {"total": 5, "successful": 5, "failed": 0},
            "hits": {
                "total": 2,
                "hits": [
                    {"_index": "accounts", "_id": "a1", "_source": {"balance": "10", "nested": {"k": [1, 2]}}},
                    {"_index": "accounts", "_id": "a2", "_source": {"balance": "20"}}
                ]
            }
        }"#;

        let page = decode(payload).unwrap();
        assert_eq!(page.hit_count, 2);
        assert_eq!(page.batch.len(), 2);
        assert_eq!(
            page.cursor.as_ref().map(ScrollId::as_str),
            Some("DXF1ZXJ5QW5kRmV0Y2gBAAAAAAAAAD4WYm9laVYtZndUQlNsdDcwakFMNjU1QQ==")
        );
        assert_eq!(
            page.batch.get("a1").unwrap().source(),
            r#"{"balance": "10", "nested": {"k": [1, 2]}}"#
        );
        assert_eq!(page.shard_failures, 0);
    }

    #[test]
    fn test_decode_source_passthrough_is_verbatim() {
        let payload = r#"{"hits":{"hits":[{"_id":"x","_source":{ "z" : 1.50, "a":"é" }}]}}"#;
        let page = decode(payload.as_bytes()).unwrap();
        assert_eq!(page.batch.get("x").unwrap().source(), r#"{ "z" : 1.50, "a":"é" }"#);
    }

    #[test]
    fn test_decode_duplicate_ids_last_write_wins() {
        let payload = br#"{"hits":{"hits":[
            {"_id":"a","_source":{"v":1}},
            {"_id":"b","_source":{"v":2}},
            {"_id":"a","_source":{"v":3}}
        ]}}"#;
        let page = decode(payload).unwrap();
        assert_eq!(page.hit_count, 3);
        assert_eq!(page.batch.len(), 2);
        assert_eq!(page.batch.get("a").unwrap().source(), r#"{"v":3}"#);
    }

    #[test]
    fn test_decode_empty_hits() {
        let page = decode(br#"{"_scroll_id":"abc","hits":{"hits":[]}}"#).unwrap();
        assert!(page.is_exhausted());
        assert_eq!(page.cursor, Some(ScrollId::new("abc")));
    }

    #[test]
    fn test_decode_missing_source_is_null() {
        let page = decode(br#"{"hits":{"hits":[{"_id":"a"}]}}"#).unwrap();
        assert_eq!(page.batch.get("a").unwrap().source(), "null");
    }

    #[test]
    fn test_decode_custom_cursor_field() {
        let decoder = ResponseDecoder::new("cursor");
        let page = decoder
            .decode(br#"{"cursor":"c-1","_scroll_id":"ignored","hits":{"hits":[]}}"#)
            .unwrap();
        assert_eq!(page.cursor, Some(ScrollId::new("c-1")));
    }

    #[test]
    fn test_decode_null_cursor() {
        let page = decode(br#"{"_scroll_id":null,"hits":{"hits":[]}}"#).unwrap();
        assert!(page.cursor.is_none());
    }

    #[test]
    fn test_decode_shard_failures() {
        let page = decode(br#"{"_shards":{"total":3,"failed":2},"hits":{"hits":[]}}"#).unwrap();
        assert_eq!(page.shard_failures, 2);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode(b"not json").unwrap_err();
        assert_eq!(err.code(), "ESQ_DECODE_MALFORMED");
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(matches!(decode(b"[1,2]").unwrap_err(), DecodeError::Malformed(_)));
    }

    #[test]
    fn test_decode_rejects_missing_hits() {
        assert!(matches!(
            decode(br#"{"took":3}"#).unwrap_err(),
            DecodeError::MissingHits(_)
        ));
        assert!(matches!(
            decode(br#"{"hits":{"total":3}}"#).unwrap_err(),
            DecodeError::MissingHits(_)
        ));
        assert!(matches!(
            decode(br#"{"hits":{"hits":{}}}"#).unwrap_err(),
            DecodeError::MissingHits(_)
        ));
    }

    #[test]
    fn test_decode_rejects_missing_id() {
        let err = decode(br#"{"hits":{"hits":[{"_id":"a"},{"_source":{}}]}}"#).unwrap_err();
        assert!(matches!(err, DecodeError::MissingId { index: 1 }));
        let err = decode(br#"{"hits":{"hits":[{"_id":7}]}}"#).unwrap_err();
        assert!(matches!(err, DecodeError::MissingId { index: 0 }));
    }

    #[test]
    fn test_decode_rejects_non_string_cursor() {
        let err = decode(br#"{"_scroll_id":42,"hits":{"hits":[]}}"#).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidCursor { .. }));
    }
}
