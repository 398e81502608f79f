//! Query model and wire encoder
//!
//! - `ast`: filter tree (combinators over leaf predicates)
//! - `request`: filter tree plus shaping directives, canned requests
//! - `encoder`: deterministic serialization to the search endpoint's body

mod ast;
mod encoder;
mod errors;
mod request;

pub use ast::{BoolQuery, Bound, Leaf, Occur, Query};
pub use encoder::{encode, Dialect, EncodedQuery, QueryEncoder};
pub use errors::{EncodeError, EncodeResult, QueryError, QueryResult};
pub use request::{
    AccountQuery, SearchRequest, SortDirection, SortSpec, DEFAULT_BALANCE_FIELD,
    DEFAULT_TIMESTAMP_FIELD, DEFAULT_TOKEN_FIELD, DEFAULT_ZERO_VALUE,
};
