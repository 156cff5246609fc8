//! # Page Fetcher
//!
//! Turns a `PageRequest` into a `Page` against any `WordStore`.
//! Failures are classified by `ErrorKind` so callers can tell bad input
//! from a missing feature, a transient store problem or corrupt data.

mod decode;
mod errors;
mod fetcher;

pub use decode::decode_row;
pub use errors::{ErrorKind, FetchError, FetchResult};
pub use fetcher::{FetchOptions, PageFetcher};
