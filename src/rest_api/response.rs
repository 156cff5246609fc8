//! # Response Formatting

use serde::Serialize;

use crate::model::{Page, PageRequest, WordRecord};
use crate::observability::MetricsSnapshot;

/// Body of `GET /api/words`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    /// The request as interpreted after repair and defaulting
    pub query: PageRequest,
    pub words: Vec<WordRecord>,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl PageResponse {
    pub fn new(query: PageRequest, page: Page) -> Self {
        let next_cursor = page.next_cursor(&query).map(str::to_string);
        Self {
            query,
            words: page.words,
            has_more: page.has_more,
            next_cursor,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsResponse {
    pub metrics: MetricsSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_response_shape() {
        let page = Page::new(vec![WordRecord::new("cat"), WordRecord::new("dog")], true);
        let response = PageResponse::new(PageRequest::new().with_limit(2), page);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["hasMore"], true);
        assert_eq!(json["nextCursor"], "dog");
        assert_eq!(json["words"][0]["text"], "cat");
        assert_eq!(json["words"][0]["culturalSensitivity"], 0);
        assert_eq!(json["query"]["limit"], 2);
    }

    #[test]
    fn test_sorted_or_sampled_page_omits_cursor() {
        use crate::model::{Sampling, SortDirection, SortField, SortSpec};

        let page = || Page::new(vec![WordRecord::new("eel"), WordRecord::new("dog")], true);
        let desc = PageRequest::new()
            .with_limit(2)
            .with_sort(SortSpec::new(SortField::Text, SortDirection::Desc));
        let json = serde_json::to_value(PageResponse::new(desc, page())).unwrap();
        assert_eq!(json["hasMore"], true);
        assert!(json.get("nextCursor").is_none());

        let sampled = PageRequest::new()
            .with_limit(2)
            .with_sampling(Sampling::new(6, "seed"));
        let json = serde_json::to_value(PageResponse::new(sampled, page())).unwrap();
        assert!(json.get("nextCursor").is_none());
    }

    #[test]
    fn test_last_page_omits_cursor() {
        let page = Page::new(vec![WordRecord::new("eel")], false);
        let json = serde_json::to_value(PageResponse::new(PageRequest::new(), page)).unwrap();
        assert_eq!(json["hasMore"], false);
        assert!(json.get("nextCursor").is_none());
    }
}
