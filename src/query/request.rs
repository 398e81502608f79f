//! Search requests: a filter tree plus result-shaping directives
//!
//! Also holds the two canned requests the extractor issues: the account
//! query and the time-range query.

use super::ast::{BoolQuery, Query};
use super::errors::{QueryError, QueryResult};

/// Default field holding the account token
pub const DEFAULT_TOKEN_FIELD: &str = "token";
/// Default field holding the account balance
pub const DEFAULT_BALANCE_FIELD: &str = "balance";
/// Default literal treated as an empty balance
pub const DEFAULT_ZERO_VALUE: &str = "0";
/// Default timestamp field for range traversals
pub const DEFAULT_TIMESTAMP_FIELD: &str = "timestamp";

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sort specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Field to sort by
    pub field: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// A filter tree plus shaping directives, ready for encoding
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    query: Query,
    source: Option<bool>,
    sort: Vec<SortSpec>,
    size: Option<u32>,
}

impl SearchRequest {
    /// Wrap a query with no shaping directives
    pub fn new(query: Query) -> Self {
        Self {
            query,
            source: None,
            sort: Vec::new(),
            size: None,
        }
    }

    /// Canonical account query with the default field names
    pub fn match_all(exclude_zero_balance: bool, token_filter: &str) -> Self {
        AccountQuery {
            token: token_filter.to_string(),
            exclude_zero_balance,
            ..AccountQuery::default()
        }
        .build()
    }

    /// Inclusive range over the default timestamp field, ascending
    pub fn time_range(start: i64, stop: i64) -> QueryResult<Self> {
        Self::time_range_on(DEFAULT_TIMESTAMP_FIELD, start, stop)
    }

    /// Inclusive range over `field`, sorted ascending on it, full sources
    pub fn time_range_on(field: &str, start: i64, stop: i64) -> QueryResult<Self> {
        if start > stop {
            return Err(QueryError::InvalidRange { start, stop });
        }

        Ok(Self::new(Query::between(field, start, stop))
            .with_source(true)
            .with_sort(SortSpec::asc(field)))
    }

    /// Request (or suppress) source documents
    pub fn with_source(mut self, include: bool) -> Self {
        self.source = Some(include);
        self
    }

    /// Append a sort directive
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort.push(sort);
        self
    }

    /// Set the page size
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn source(&self) -> Option<bool> {
        self.source
    }

    pub fn sort(&self) -> &[SortSpec] {
        &self.sort
    }

    pub fn size(&self) -> Option<u32> {
        self.size
    }
}

/// Parameters of the account query
///
/// The literals are defaults only; deployments override them from config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountQuery {
    pub token_field: String,
    /// Empty means no token constraint
    pub token: String,
    pub exclude_zero_balance: bool,
    pub balance_field: String,
    pub zero_value: String,
}

impl Default for AccountQuery {
    fn default() -> Self {
        Self {
            token_field: DEFAULT_TOKEN_FIELD.to_string(),
            token: String::new(),
            exclude_zero_balance: true,
            balance_field: DEFAULT_BALANCE_FIELD.to_string(),
            zero_value: DEFAULT_ZERO_VALUE.to_string(),
        }
    }
}

impl AccountQuery {
    /// Build the search request
    pub fn build(&self) -> SearchRequest {
        let mut root = BoolQuery::new();
        if !self.token.is_empty() {
            root = root.must(Query::term(self.token_field.as_str(), self.token.as_str()));
        }
        if self.exclude_zero_balance {
            root = root.must_not(Query::term(
                self.balance_field.as_str(),
                self.zero_value.as_str(),
            ));
        }

        if root.is_empty() {
            SearchRequest::new(Query::match_all())
        } else {
            SearchRequest::new(root.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ast::{Leaf, Occur};
    use serde_json::json;

    #[test]
    fn test_match_all_clauses() {
        let req = SearchRequest::match_all(true, "SBHAT-89efd3");
        let root = req.query().as_bool().unwrap();

        let must: Vec<_> = root.children(Occur::Must).collect();
        assert_eq!(must.len(), 1);
        assert_eq!(
            must[0].as_leaf(),
            Some(&Leaf::Match {
                field: "token".into(),
                value: json!("SBHAT-89efd3")
            })
        );

        let must_not: Vec<_> = root.children(Occur::MustNot).collect();
        assert_eq!(must_not.len(), 1);
        assert_eq!(must_not[0].as_leaf().unwrap().field(), Some("balance"));
    }

    #[test]
    fn test_match_all_without_zero_filter() {
        let req = SearchRequest::match_all(false, "tok");
        let root = req.query().as_bool().unwrap();
        assert_eq!(root.children(Occur::MustNot).count(), 0);
        assert_eq!(root.children(Occur::Must).count(), 1);
    }

    #[test]
    fn test_match_all_no_constraints() {
        let req = SearchRequest::match_all(false, "");
        assert_eq!(req.query(), &Query::match_all());
    }

    #[test]
    fn test_account_query_custom_literals() {
        let req = AccountQuery {
            token_field: "asset".into(),
            token: "XYZ".into(),
            exclude_zero_balance: true,
            balance_field: "amount".into(),
            zero_value: "0.0".into(),
        }
        .build();
        let root = req.query().as_bool().unwrap();
        let not: Vec<_> = root.children(Occur::MustNot).collect();
        assert_eq!(
            not[0].as_leaf(),
            Some(&Leaf::Match {
                field: "amount".into(),
                value: json!("0.0")
            })
        );
    }

    #[test]
    fn test_time_range_shaping() {
        let req = SearchRequest::time_range(50, 100).unwrap();
        assert_eq!(req.source(), Some(true));
        assert_eq!(req.sort(), &[SortSpec::asc("timestamp")]);
        assert_eq!(req.query(), &Query::between("timestamp", 50, 100));
    }

    #[test]
    fn test_time_range_single_instant() {
        assert!(SearchRequest::time_range(7, 7).is_ok());
    }

    #[test]
    fn test_time_range_inverted() {
        let err = SearchRequest::time_range(100, 50).unwrap_err();
        assert_eq!(err, QueryError::InvalidRange { start: 100, stop: 50 });
    }
}
