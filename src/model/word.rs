//! Word records and result pages

use serde::{Deserialize, Serialize};

use super::attribute::Attribute;
use super::request::PageRequest;

/// One catalog entry. Scores missing from input JSON default to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    pub text: String,
    #[serde(default)]
    pub commonness: i64,
    #[serde(default)]
    pub offensiveness: i64,
    #[serde(default)]
    pub sentiment: i64,
    #[serde(default)]
    pub formality: i64,
    #[serde(default)]
    pub cultural_sensitivity: i64,
    #[serde(default)]
    pub figurativeness: i64,
    #[serde(default)]
    pub complexity: i64,
    #[serde(default)]
    pub political: i64,
}

impl WordRecord {
    /// A record with every score at zero
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            commonness: 0,
            offensiveness: 0,
            sentiment: 0,
            formality: 0,
            cultural_sensitivity: 0,
            figurativeness: 0,
            complexity: 0,
            political: 0,
        }
    }

    pub fn with_score(mut self, attr: Attribute, value: i64) -> Self {
        *self.score_mut(attr) = value;
        self
    }

    pub fn score(&self, attr: Attribute) -> i64 {
        match attr {
            Attribute::Commonness => self.commonness,
            Attribute::Offensiveness => self.offensiveness,
            Attribute::Sentiment => self.sentiment,
            Attribute::Formality => self.formality,
            Attribute::CulturalSensitivity => self.cultural_sensitivity,
            Attribute::Figurativeness => self.figurativeness,
            Attribute::Complexity => self.complexity,
            Attribute::Political => self.political,
        }
    }

    pub fn score_mut(&mut self, attr: Attribute) -> &mut i64 {
        match attr {
            Attribute::Commonness => &mut self.commonness,
            Attribute::Offensiveness => &mut self.offensiveness,
            Attribute::Sentiment => &mut self.sentiment,
            Attribute::Formality => &mut self.formality,
            Attribute::CulturalSensitivity => &mut self.cultural_sensitivity,
            Attribute::Figurativeness => &mut self.figurativeness,
            Attribute::Complexity => &mut self.complexity,
            Attribute::Political => &mut self.political,
        }
    }

    /// Check the record invariants: non-empty text, every score in domain
    pub fn check(&self) -> Result<(), String> {
        if self.text.is_empty() {
            return Err("text is empty".to_string());
        }
        for attr in Attribute::ALL {
            let value = self.score(attr);
            let domain = attr.domain();
            if !domain.contains(value) {
                return Err(format!(
                    "{} = {} outside [{}, {}]",
                    attr, value, domain.min, domain.max
                ));
            }
        }
        Ok(())
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub words: Vec<WordRecord>,
    pub has_more: bool,
}

impl Page {
    pub fn new(words: Vec<WordRecord>, has_more: bool) -> Self {
        Self { words, has_more }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), false)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Cursor for the page after this one of `request`: the last word's
    /// text, if more rows exist and the request can be resumed by cursor
    pub fn next_cursor(&self, request: &PageRequest) -> Option<&str> {
        if !self.has_more || !request.is_cursor_resumable() {
            return None;
        }
        self.words.last().map(|w| w.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_accessors_cover_every_attribute() {
        let mut word = WordRecord::new("fox");
        for (i, attr) in Attribute::ALL.iter().enumerate() {
            *word.score_mut(*attr) = i as i64 % 5;
        }
        for (i, attr) in Attribute::ALL.iter().enumerate() {
            assert_eq!(word.score(*attr), i as i64 % 5);
        }
    }

    #[test]
    fn test_check_rejects_out_of_domain() {
        assert!(WordRecord::new("ok").check().is_ok());
        assert!(WordRecord::new("").check().is_err());

        let word = WordRecord::new("bad").with_score(Attribute::Commonness, 6);
        let err = word.check().unwrap_err();
        assert!(err.contains("commonness"));

        let word = WordRecord::new("sad").with_score(Attribute::Sentiment, -5);
        assert!(word.check().is_ok());
    }

    #[test]
    fn test_json_shape() {
        let word = WordRecord::new("owl").with_score(Attribute::CulturalSensitivity, 2);
        let json = serde_json::to_value(&word).unwrap();
        assert_eq!(json["text"], "owl");
        assert_eq!(json["culturalSensitivity"], 2);
        assert_eq!(json["political"], 0);
    }

    #[test]
    fn test_next_cursor() {
        let request = PageRequest::new();
        let page = Page::new(vec![WordRecord::new("a"), WordRecord::new("b")], true);
        assert_eq!(page.next_cursor(&request), Some("b"));

        let page = Page::new(vec![WordRecord::new("a")], false);
        assert_eq!(page.next_cursor(&request), None);
        assert_eq!(Page::empty().next_cursor(&request), None);
    }

    #[test]
    fn test_no_cursor_when_text_order_cannot_resume() {
        use crate::model::{Sampling, SortDirection, SortField, SortSpec};

        let page = Page::new(vec![WordRecord::new("eel"), WordRecord::new("dog")], true);

        let desc =
            PageRequest::new().with_sort(SortSpec::new(SortField::Text, SortDirection::Desc));
        assert_eq!(page.next_cursor(&desc), None);

        let by_score = PageRequest::new().with_sort(SortSpec::new(
            SortField::Attribute(Attribute::Commonness),
            SortDirection::Asc,
        ));
        assert_eq!(page.next_cursor(&by_score), None);

        let sampled = PageRequest::new().with_sampling(Sampling::new(6, "seed"));
        assert_eq!(page.next_cursor(&sampled), None);

        let explicit_asc =
            PageRequest::new().with_sort(SortSpec::new(SortField::Text, SortDirection::Asc));
        assert_eq!(page.next_cursor(&explicit_asc), Some("dog"));
    }
}
