//! Page fetcher
//!
//! Compiles a request for the store's dialect, runs it and turns the rows
//! into a `Page`. The compiled statement asks for `limit + 1` rows; the
//! extra row only signals that another page exists and is never returned.

use std::sync::Arc;
use std::time::Instant;

use crate::compiler::QueryCompiler;
use crate::model::{Page, PageRequest};
use crate::observability::{log_event, Event, Logger, MetricsRegistry, Severity, Timer};
use crate::sql::CompiledQuery;
use crate::store::WordStore;

use super::decode::decode_row;
use super::errors::{ErrorKind, FetchError, FetchResult};

/// Per-call options
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Abandon the statement once this instant passes
    pub deadline: Option<Instant>,
    /// Correlates log lines of one request
    pub request_id: Option<String>,
}

impl FetchOptions {
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

pub struct PageFetcher<S> {
    store: S,
    compiler: QueryCompiler,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl<S: WordStore> PageFetcher<S> {
    pub fn new(store: S) -> Self {
        let compiler = QueryCompiler::new(store.dialect());
        Self {
            store,
            compiler,
            metrics: None,
        }
    }

    /// Count pages and failures into `metrics`
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Compile without executing
    pub fn compile(&self, request: &PageRequest) -> FetchResult<CompiledQuery> {
        Ok(self.compiler.compile(request)?)
    }

    pub fn fetch(&self, request: &PageRequest) -> FetchResult<Page> {
        self.fetch_with(request, &FetchOptions::default())
    }

    pub fn fetch_with(&self, request: &PageRequest, options: &FetchOptions) -> FetchResult<Page> {
        let timer = Timer::new();
        let request_id = options.request_id.as_deref().unwrap_or("-");

        let result = self.run(request, options, request_id);

        match &result {
            Ok(page) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_page(page.len(), request.is_sampling());
                }
                let words = page.len().to_string();
                let has_more = page.has_more.to_string();
                let elapsed = timer.elapsed_ms();
                Logger::info(
                    Event::PageFetched.as_str(),
                    &[
                        ("request_id", request_id),
                        ("words", words.as_str()),
                        ("has_more", has_more.as_str()),
                        ("sampled", if request.is_sampling() { "true" } else { "false" }),
                        ("elapsed_ms", elapsed.as_str()),
                    ],
                );
            }
            Err(err) => self.report_failure(err, request_id),
        }

        result
    }

    fn run(
        &self,
        request: &PageRequest,
        options: &FetchOptions,
        request_id: &str,
    ) -> FetchResult<Page> {
        let compiled = self.compiler.compile(request)?;

        if Logger::enabled(Severity::Trace) {
            let params = compiled.params().len().to_string();
            Logger::trace(
                Event::QueryCompiled.as_str(),
                &[
                    ("request_id", request_id),
                    ("dialect", self.compiler.dialect().name()),
                    ("sql", compiled.sql()),
                    ("params", params.as_str()),
                ],
            );
        }

        let rows = self.store.fetch_rows(&compiled, options.deadline)?;

        let limit = request.limit() as usize;
        let has_more = rows.len() > limit;

        let mut words = Vec::with_capacity(rows.len().min(limit));
        for (index, row) in rows.iter().take(limit).enumerate() {
            let word = decode_row(row).map_err(|message| FetchError::Decode {
                row: index,
                message,
            })?;
            words.push(word);
        }

        Ok(Page::new(words, has_more))
    }

    fn report_failure(&self, err: &FetchError, request_id: &str) {
        let reason = err.to_string();
        let fields = [
            ("request_id", request_id),
            ("code", err.code()),
            ("reason", reason.as_str()),
        ];

        match err.kind() {
            ErrorKind::ClientInput => {
                if let Some(metrics) = &self.metrics {
                    metrics.increment_queries_rejected();
                }
                Logger::warn(Event::QueryRejected.as_str(), &fields);
            }
            ErrorKind::FeatureUnavailable => {
                if let Some(metrics) = &self.metrics {
                    metrics.increment_features_unavailable();
                }
                Logger::warn(Event::QueryRejected.as_str(), &fields);
            }
            ErrorKind::Infrastructure => {
                if let Some(metrics) = &self.metrics {
                    metrics.increment_store_failures();
                }
                log_event(Event::StoreFailure, &fields);
            }
            ErrorKind::DataIntegrity => {
                if let Some(metrics) = &self.metrics {
                    metrics.increment_decode_failures();
                }
                log_event(Event::RowDecodeFailure, &fields);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, QueryError, RangeFilter, Sampling};
    use crate::sql::{Dialect, SqlValue};
    use crate::store::{Row, StoreError, StoreResult};
    use std::sync::Mutex;

    /// Returns canned rows and remembers the last statement it saw
    struct StubStore {
        dialect: Dialect,
        rows: StoreResult<Vec<Row>>,
        seen: Mutex<Option<CompiledQuery>>,
    }

    impl StubStore {
        fn with_rows(rows: Vec<Row>) -> Self {
            Self {
                dialect: Dialect::cockroach(),
                rows: Ok(rows),
                seen: Mutex::new(None),
            }
        }

        fn failing(err: StoreError) -> Self {
            Self {
                dialect: Dialect::cockroach(),
                rows: Err(err),
                seen: Mutex::new(None),
            }
        }
    }

    impl WordStore for StubStore {
        fn dialect(&self) -> Dialect {
            self.dialect
        }

        fn fetch_rows(
            &self,
            query: &CompiledQuery,
            _deadline: Option<Instant>,
        ) -> StoreResult<Vec<Row>> {
            *self.seen.lock().unwrap() = Some(query.clone());
            self.rows.clone()
        }
    }

    fn word_row(text: &str) -> Row {
        let mut values = vec![SqlValue::from(text)];
        values.extend((0..8).map(|_| SqlValue::from(1i64)));
        Row::new(values)
    }

    #[test]
    fn test_sentinel_row_sets_has_more() {
        let store = StubStore::with_rows(vec![word_row("cat"), word_row("dog"), word_row("eel")]);
        let fetcher = PageFetcher::new(store);

        let request = PageRequest::new().with_limit(2);
        let page = fetcher.fetch(&request).unwrap();
        assert!(page.has_more);
        assert_eq!(page.len(), 2);
        assert_eq!(page.words[1].text, "dog");
        assert_eq!(page.next_cursor(&request), Some("dog"));

        let seen = fetcher.store().seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.params().last(), Some(&SqlValue::Integer(3)));
    }

    #[test]
    fn test_exact_limit_has_no_more() {
        let store = StubStore::with_rows(vec![word_row("cat"), word_row("dog")]);
        let request = PageRequest::new().with_limit(2);
        let page = PageFetcher::new(store).fetch(&request).unwrap();
        assert!(!page.has_more);
        assert_eq!(page.len(), 2);
        assert_eq!(page.next_cursor(&request), None);
    }

    #[test]
    fn test_empty_result() {
        let page = PageFetcher::new(StubStore::with_rows(vec![]))
            .fetch(&PageRequest::new())
            .unwrap();
        assert_eq!(page, Page::empty());
    }

    #[test]
    fn test_bad_row_fails_whole_page() {
        let mut values = word_row("dog").values().to_vec();
        values[1] = SqlValue::from(7i64);
        let bad = Row::new(values);
        let store = StubStore::with_rows(vec![word_row("cat"), bad]);
        let metrics = Arc::new(MetricsRegistry::new());
        let fetcher = PageFetcher::new(store).with_metrics(Arc::clone(&metrics));

        let err = fetcher.fetch(&PageRequest::new()).unwrap_err();
        match err {
            FetchError::Decode { row, message } => {
                assert_eq!(row, 1);
                assert!(message.contains("commonness"));
            }
            other => panic!("expected decode error, got {:?}", other),
        }
        assert_eq!(metrics.snapshot().decode_failures, 1);
        assert_eq!(metrics.pages_served(), 0);
    }

    #[test]
    fn test_sentinel_row_is_not_decoded() {
        let sentinel = Row::new(vec![SqlValue::Null]);
        let store = StubStore::with_rows(vec![word_row("cat"), sentinel]);
        let page = PageFetcher::new(store)
            .fetch(&PageRequest::new().with_limit(1))
            .unwrap();
        assert!(page.has_more);
        assert_eq!(page.words[0].text, "cat");
    }

    #[test]
    fn test_store_failure_is_retryable() {
        let metrics = Arc::new(MetricsRegistry::new());
        let fetcher = PageFetcher::new(StubStore::failing(StoreError::Connection(
            "refused".into(),
        )))
        .with_metrics(Arc::clone(&metrics));

        let err = fetcher.fetch(&PageRequest::new()).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
        assert_eq!(metrics.snapshot().store_failures, 1);
    }

    #[test]
    fn test_zero_limit_never_reaches_store() {
        let fetcher = PageFetcher::new(StubStore::with_rows(vec![]));
        let err = fetcher.fetch(&PageRequest::new().with_limit(0)).unwrap_err();
        assert_eq!(err, FetchError::Query(QueryError::InvalidLimit(0)));
        assert!(fetcher.store().seen.lock().unwrap().is_none());
    }

    #[test]
    fn test_sampling_on_dialect_without_hash() {
        let mut store = StubStore::with_rows(vec![]);
        store.dialect = Dialect::postgres();
        let metrics = Arc::new(MetricsRegistry::new());
        let fetcher = PageFetcher::new(store).with_metrics(Arc::clone(&metrics));

        let request = PageRequest::new().with_sampling(Sampling::new(10, "42"));
        let err = fetcher.fetch(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FeatureUnavailable);
        assert_eq!(metrics.snapshot().features_unavailable, 1);
    }

    #[test]
    fn test_metrics_count_sampled_pages() {
        let metrics = Arc::new(MetricsRegistry::new());
        let fetcher = PageFetcher::new(StubStore::with_rows(vec![word_row("cat")]))
            .with_metrics(Arc::clone(&metrics));

        let request = PageRequest::new()
            .with_sampling(Sampling::new(5, "7"))
            .with_named_range("commonness", |attr: Attribute| {
                RangeFilter::clamped(attr.domain(), Some(1), None)
            })
            .unwrap();
        fetcher
            .fetch_with(&request, &FetchOptions::default().with_request_id("r-1"))
            .unwrap();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.pages_served, 1);
        assert_eq!(snapshot.sampled_pages, 1);
        assert_eq!(snapshot.words_returned, 1);
    }
}
