//! Batch types handed to the consumer

use std::collections::HashMap;

use serde_json::value::RawValue;

use crate::scroll::ScrollId;

/// One extracted document
///
/// The source is the raw JSON text exactly as the endpoint sent it. A hit
/// without `_source` reads as `null`.
#[derive(Debug, Clone)]
pub struct Document {
    id: String,
    source: Option<Box<RawValue>>,
}

impl Document {
    pub fn new(id: impl Into<String>, source: Box<RawValue>) -> Self {
        Self::from_parts(id, Some(source))
    }

    pub fn from_parts(id: impl Into<String>, source: Option<Box<RawValue>>) -> Self {
        Self {
            id: id.into(),
            source,
        }
    }

    /// Returns the document identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the raw source text
    pub fn source(&self) -> &str {
        self.source.as_deref().map(RawValue::get).unwrap_or("null")
    }

    /// Returns the raw source bytes
    pub fn source_bytes(&self) -> &[u8] {
        self.source().as_bytes()
    }

    /// Returns true if the hit carried a `_source`
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn into_parts(self) -> (String, Option<Box<RawValue>>) {
        (self.id, self.source)
    }
}

/// Ordered documents of one page, identifiers unique
#[derive(Debug, Clone, Default)]
pub struct Batch {
    documents: Vec<Document>,
}

impl Batch {
    /// Creates an empty batch
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a batch, collapsing repeated identifiers
    ///
    /// A repeated identifier replaces the earlier document's source and keeps
    /// the earlier position.
    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let mut slots: HashMap<String, usize> = HashMap::new();
        let mut out: Vec<Document> = Vec::new();

        for doc in documents {
            match slots.get(doc.id()) {
                Some(&slot) => out[slot] = doc,
                None => {
                    slots.insert(doc.id().to_string(), out.len());
                    out.push(doc);
                }
            }
        }

        Self { documents: out }
    }

    /// Returns true if the page carried no documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Returns the number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns an iterator over the documents in endpoint order
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// Returns the identifiers in endpoint order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(Document::id)
    }

    /// Look up a document by identifier
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id() == id)
    }

    /// Identifier to raw source text mapping
    pub fn to_map(&self) -> HashMap<&str, &str> {
        self.documents
            .iter()
            .map(|d| (d.id(), d.source()))
            .collect()
    }

    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }
}

impl IntoIterator for Batch {
    type Item = Document;
    type IntoIter = std::vec::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

/// Decoded response: a batch plus continuation metadata
#[derive(Debug, Clone)]
pub struct Page {
    /// Documents of this page
    pub batch: Batch,
    /// Cursor for the next continuation request
    pub cursor: Option<ScrollId>,
    /// Hits in the payload before identifier collapsing
    pub hit_count: usize,
    /// Shards the endpoint reported as failed for this page
    pub shard_failures: u64,
}

impl Page {
    /// Returns true if this page signals exhaustion
    pub fn is_exhausted(&self) -> bool {
        self.batch.is_empty()
    }
}
