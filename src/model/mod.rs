//! # Query Model
//!
//! In-memory representation of a page request and its result. Pure data:
//! construction repairs malformed numeric input, and the only rejections
//! are identifiers outside the attribute allow-list and a zero limit.

mod attribute;
mod errors;
mod range;
mod request;
mod word;

pub use attribute::{Attribute, Domain, SCORE_DOMAIN, SENTIMENT_DOMAIN, WORD_LENGTH_DOMAIN};
pub use errors::{QueryError, QueryResult};
pub use range::RangeFilter;
pub use request::{
    AttributeRanges, PageRequest, Sampling, SortDirection, SortField, SortSpec, DEFAULT_LIMIT,
};
pub use word::{Page, WordRecord};
