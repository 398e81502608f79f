//! Response decoding
//!
//! Turns a raw search or scroll response into a `Page`: the ordered,
//! identifier-unique `Batch` plus the continuation cursor.

mod batch;
mod decoder;
mod errors;

pub use batch::{Batch, Document, Page};
pub use decoder::{decode, ResponseDecoder, DEFAULT_CURSOR_FIELD};
pub use errors::{DecodeError, DecodeResult};
