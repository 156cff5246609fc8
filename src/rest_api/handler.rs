//! # Words Handler
//!
//! Bridges the async HTTP layer and the blocking page fetcher. Each request
//! gets a request id, a store deadline and one trip to the blocking pool.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use uuid::Uuid;

use crate::config::Config;
use crate::fetcher::{FetchOptions, PageFetcher};
use crate::observability::{Event, Logger, MetricsRegistry};
use crate::store::WordStore;

use super::errors::{RestError, RestResult};
use super::parser::{parse_page_request, ParserLimits};
use super::response::PageResponse;

pub struct WordsHandler<S> {
    fetcher: Arc<PageFetcher<S>>,
    limits: ParserLimits,
    query_timeout: Duration,
    metrics: Arc<MetricsRegistry>,
}

impl<S: WordStore + 'static> WordsHandler<S> {
    pub fn new(store: S, limits: ParserLimits, query_timeout: Duration) -> Self {
        let metrics = Arc::new(MetricsRegistry::new());
        let fetcher = PageFetcher::new(store).with_metrics(Arc::clone(&metrics));
        Self {
            fetcher: Arc::new(fetcher),
            limits,
            query_timeout,
            metrics,
        }
    }

    pub fn from_config(store: S, config: &Config) -> Self {
        Self::new(
            store,
            ParserLimits::from(config),
            Duration::from_millis(config.query_timeout_ms),
        )
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Serve one `GET /api/words`
    pub async fn list_words(&self, params: &HashMap<String, String>) -> RestResult<PageResponse> {
        let request_id = Uuid::new_v4().to_string();

        let request = match parse_page_request(params, &self.limits, Utc::now().timestamp()) {
            Ok(request) => request,
            Err(err) => {
                self.metrics.increment_queries_rejected();
                let reason = err.to_string();
                Logger::warn(
                    Event::QueryRejected.as_str(),
                    &[
                        ("request_id", request_id.as_str()),
                        ("code", err.code()),
                        ("reason", reason.as_str()),
                    ],
                );
                return Err(err);
            }
        };

        let options = FetchOptions::default()
            .with_deadline(Instant::now() + self.query_timeout)
            .with_request_id(request_id);
        let fetcher = Arc::clone(&self.fetcher);
        let query = request.clone();

        let page = tokio::task::spawn_blocking(move || fetcher.fetch_with(&query, &options))
            .await
            .map_err(|e| RestError::Internal(e.to_string()))??;

        Ok(PageResponse::new(request, page))
    }
}
