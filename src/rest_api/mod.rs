//! # REST API Module
//!
//! HTTP entry point for word lookups: `GET /api/words` (and `/words`),
//! plus `/health` and `/metrics`. Query-string parsing, defaults and
//! clamping live here; the page itself comes from the fetcher.

pub mod errors;
pub mod handler;
pub mod parser;
pub mod response;
pub mod server;

pub use errors::{ErrorResponse, RestError, RestResult};
pub use handler::WordsHandler;
pub use parser::{parse_page_request, ParserLimits};
pub use response::{HealthResponse, MetricsResponse, PageResponse};
pub use server::RestServer;
