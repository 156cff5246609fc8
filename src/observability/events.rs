//! Observable events
//!
//! Every log line the crate emits names one of these.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// Store schema created
    StoreInitialized,
    /// Words imported into the store
    WordsImported,
    /// HTTP server bound and serving
    ServerStart,
    /// HTTP server stopped
    ServerStop,

    // Page requests
    /// Statement compiled (TRACE, carries SQL text)
    QueryCompiled,
    /// Request rejected before reaching the store
    QueryRejected,
    /// Page returned to the caller
    PageFetched,

    // Failures
    /// Store unreachable, failed or timed out
    StoreFailure,
    /// Row could not be decoded into a word
    RowDecodeFailure,
    /// Configured CORS origin list could not be used
    CorsOriginRejected,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreInitialized => "STORE_INITIALIZED",
            Event::WordsImported => "WORDS_IMPORTED",
            Event::ServerStart => "SERVER_START",
            Event::ServerStop => "SERVER_STOP",
            Event::QueryCompiled => "QUERY_COMPILED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::PageFetched => "PAGE_FETCHED",
            Event::StoreFailure => "STORE_FAILURE",
            Event::RowDecodeFailure => "ROW_DECODE_FAILURE",
            Event::CorsOriginRejected => "CORS_ORIGIN_REJECTED",
        }
    }

    /// True for events that mark a failed request
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::StoreFailure | Event::RowDecodeFailure)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
