//! Transport to the search cluster
//!
//! `Transport` is the seam the traversal engine talks through;
//! `HttpTransport` implements it over the cluster's REST scroll API.

mod client;
mod errors;
mod http;

pub use client::Transport;
pub use errors::{TransportError, TransportResult, MAX_ERROR_BODY};
pub use http::{HttpTransport, HttpTransportBuilder, DEFAULT_CURSOR_PARAM};
