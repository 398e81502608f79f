//! esscroll - exhaustive scroll-cursor extraction from a search cluster
//!
//! - `query`: filter model and deterministic wire encoder
//! - `response`: page decoding with raw source passthrough
//! - `transport`: the endpoint seam and its HTTP implementation
//! - `scroll`: the traversal engine
//! - `config`, `cli`, `observability`: the surrounding tool

pub mod cli;
pub mod config;
pub mod observability;
pub mod query;
pub mod response;
pub mod scroll;
pub mod transport;
