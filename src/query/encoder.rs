//! Wire encoding for search requests
//!
//! Output is deterministic: objects are built on `serde_json::Map`, which
//! keeps keys sorted, so identical requests encode to identical bytes.

use serde_json::{json, Map, Value};

use super::ast::{BoolQuery, Leaf, Occur, Query};
use super::errors::{EncodeError, EncodeResult};
use super::request::SearchRequest;

/// An encoded request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedQuery(Vec<u8>);

impl EncodedQuery {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Set of combinators an endpoint accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub should: bool,
}

impl Dialect {
    /// `must`, `must_not` and `should`
    pub fn standard() -> Self {
        Self { should: true }
    }

    /// `must` and `must_not` only
    pub fn strict() -> Self {
        Self { should: false }
    }

    fn supports(&self, occur: Occur) -> bool {
        match occur {
            Occur::Must | Occur::MustNot => true,
            Occur::Should => self.should,
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::standard()
    }
}

/// Serializes search requests for the search endpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEncoder {
    dialect: Dialect,
}

impl QueryEncoder {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Encode a request into its wire bytes
    pub fn encode(&self, request: &SearchRequest) -> EncodeResult<EncodedQuery> {
        let body = self.to_value(request)?;
        Ok(EncodedQuery(serde_json::to_vec(&body)?))
    }

    /// Build the JSON body without serializing it
    pub fn to_value(&self, request: &SearchRequest) -> EncodeResult<Value> {
        let mut body = Map::new();
        body.insert("query".into(), self.encode_query(request.query())?);

        if let Some(source) = request.source() {
            body.insert("_source".into(), Value::Bool(source));
        }

        if !request.sort().is_empty() {
            let mut sort = Vec::with_capacity(request.sort().len());
            for spec in request.sort() {
                if spec.field.is_empty() {
                    return Err(EncodeError::EmptySortField);
                }
                let mut entry = Map::new();
                entry.insert(spec.field.clone(), json!({ "order": spec.direction.as_str() }));
                sort.push(Value::Object(entry));
            }
            body.insert("sort".into(), Value::Array(sort));
        }

        if let Some(size) = request.size() {
            body.insert("size".into(), Value::from(size));
        }

        Ok(Value::Object(body))
    }

    fn encode_query(&self, query: &Query) -> EncodeResult<Value> {
        match query {
            Query::Leaf(leaf) => encode_leaf(leaf),
            Query::Bool(b) => self.encode_bool(b),
        }
    }

    fn encode_bool(&self, node: &BoolQuery) -> EncodeResult<Value> {
        let mut clauses = Map::new();
        for occur in [Occur::Must, Occur::MustNot, Occur::Should] {
            let children: Vec<&Query> = node.children(occur).collect();
            if children.is_empty() {
                continue;
            }
            if !self.dialect.supports(occur) {
                return Err(EncodeError::UnsupportedCombinator(occur.as_str()));
            }
            let encoded = children
                .into_iter()
                .map(|q| self.encode_query(q))
                .collect::<EncodeResult<Vec<_>>>()?;
            clauses.insert(occur.as_str().into(), Value::Array(encoded));
        }

        Ok(json!({ "bool": clauses }))
    }
}

fn encode_leaf(leaf: &Leaf) -> EncodeResult<Value> {
    if leaf.field() == Some("") {
        return Err(EncodeError::EmptyField(leaf.op_name()));
    }

    match leaf {
        Leaf::MatchAll => Ok(json!({ "match_all": {} })),
        Leaf::Match { field, value } => {
            let mut inner = Map::new();
            inner.insert(field.clone(), value.clone());
            Ok(json!({ "match": inner }))
        }
        Leaf::Range { field, lower, upper } => {
            if lower.is_none() && upper.is_none() {
                return Err(EncodeError::UnboundedRange(field.clone()));
            }
            let mut bounds = Map::new();
            if let Some(b) = lower {
                let key = if b.is_inclusive() { "gte" } else { "gt" };
                bounds.insert(key.into(), b.value().clone());
            }
            if let Some(b) = upper {
                let key = if b.is_inclusive() { "lte" } else { "lt" };
                bounds.insert(key.into(), b.value().clone());
            }
            let mut inner = Map::new();
            inner.insert(field.clone(), Value::Object(bounds));
            Ok(json!({ "range": inner }))
        }
    }
}

/// Encode with the standard dialect
pub fn encode(request: &SearchRequest) -> EncodeResult<EncodedQuery> {
    QueryEncoder::default().encode(request)
}
