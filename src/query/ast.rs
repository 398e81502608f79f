//! Filter tree structures
//!
//! A query is a tree of boolean combinators over leaf predicates.
//! Leaves are immutable once built; combinators own their children.

use serde_json::Value;

/// Boolean clause kinds a combinator can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Occur {
    /// Every child must match
    Must,
    /// No child may match
    MustNot,
    /// At least one child should match
    Should,
}

impl Occur {
    /// Returns the wire key for this clause
    pub fn as_str(&self) -> &'static str {
        match self {
            Occur::Must => "must",
            Occur::MustNot => "must_not",
            Occur::Should => "should",
        }
    }
}

/// One end of a range predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    /// Bound value is part of the range
    Inclusive(Value),
    /// Bound value is excluded from the range
    Exclusive(Value),
}

impl Bound {
    pub fn inclusive(value: impl Into<Value>) -> Self {
        Bound::Inclusive(value.into())
    }

    pub fn exclusive(value: impl Into<Value>) -> Self {
        Bound::Exclusive(value.into())
    }

    /// Returns the bound value
    pub fn value(&self) -> &Value {
        match self {
            Bound::Inclusive(v) | Bound::Exclusive(v) => v,
        }
    }

    /// Returns true if the bound value is part of the range
    pub fn is_inclusive(&self) -> bool {
        matches!(self, Bound::Inclusive(_))
    }
}

/// A leaf predicate
///
/// Once moved into a combinator a leaf is only reachable by shared reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    /// Field matches value
    Match { field: String, value: Value },
    /// Field falls inside a range
    Range {
        field: String,
        lower: Option<Bound>,
        upper: Option<Bound>,
    },
    /// Every document matches
    MatchAll,
}

impl Leaf {
    /// Returns the field the leaf constrains, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            Leaf::Match { field, .. } | Leaf::Range { field, .. } => Some(field),
            Leaf::MatchAll => None,
        }
    }

    /// Returns the operation name for diagnostics
    pub fn op_name(&self) -> &'static str {
        match self {
            Leaf::Match { .. } => "match",
            Leaf::Range { .. } => "range",
            Leaf::MatchAll => "match_all",
        }
    }
}

/// A boolean combinator node
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoolQuery {
    clauses: Vec<(Occur, Query)>,
}

impl BoolQuery {
    /// Create an empty combinator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child that must match
    pub fn must(self, query: Query) -> Self {
        self.with(Occur::Must, query)
    }

    /// Add a child that must not match
    pub fn must_not(self, query: Query) -> Self {
        self.with(Occur::MustNot, query)
    }

    /// Add a child that should match
    pub fn should(self, query: Query) -> Self {
        self.with(Occur::Should, query)
    }

    /// Add a child under the given clause
    pub fn with(mut self, occur: Occur, query: Query) -> Self {
        self.clauses.push((occur, query));
        self
    }

    /// Returns children in insertion order
    pub fn clauses(&self) -> &[(Occur, Query)] {
        &self.clauses
    }

    /// Returns children under one clause, in insertion order
    pub fn children(&self, occur: Occur) -> impl Iterator<Item = &Query> {
        self.clauses
            .iter()
            .filter(move |(o, _)| *o == occur)
            .map(|(_, q)| q)
    }

    /// Returns true if no children were added
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// A filter expression
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Leaf(Leaf),
    Bool(BoolQuery),
}

impl Query {
    /// Match every document
    pub fn match_all() -> Self {
        Query::Leaf(Leaf::MatchAll)
    }

    /// Field matches value
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Leaf(Leaf::Match {
            field: field.into(),
            value: value.into(),
        })
    }

    /// Field within an arbitrary range
    pub fn range(field: impl Into<String>, lower: Option<Bound>, upper: Option<Bound>) -> Self {
        Query::Leaf(Leaf::Range {
            field: field.into(),
            lower,
            upper,
        })
    }

    /// Field within `[start, stop]`
    pub fn between(field: impl Into<String>, start: impl Into<Value>, stop: impl Into<Value>) -> Self {
        Self::range(
            field,
            Some(Bound::Inclusive(start.into())),
            Some(Bound::Inclusive(stop.into())),
        )
    }

    /// Returns the combinator if this node is one
    pub fn as_bool(&self) -> Option<&BoolQuery> {
        match self {
            Query::Bool(b) => Some(b),
            Query::Leaf(_) => None,
        }
    }

    /// Returns the leaf if this node is one
    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Query::Leaf(l) => Some(l),
            Query::Bool(_) => None,
        }
    }

    /// Number of leaves in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            Query::Leaf(_) => 1,
            Query::Bool(b) => b.clauses.iter().map(|(_, q)| q.leaf_count()).sum(),
        }
    }
}

impl From<BoolQuery> for Query {
    fn from(b: BoolQuery) -> Self {
        Query::Bool(b)
    }
}

impl From<Leaf> for Query {
    fn from(l: Leaf) -> Self {
        Query::Leaf(l)
    }
}
