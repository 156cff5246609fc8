//! Scored word attributes and their legal domains
//!
//! The attribute list is closed. Every identifier that reaches query text
//! (filter columns, sort columns) comes from this enum, never from caller
//! input directly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::{QueryError, QueryResult};

/// Inclusive integer bounds of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub min: i64,
    pub max: i64,
}

impl Domain {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Returns true if `value` lies within the domain
    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Domain of most attribute scores
pub const SCORE_DOMAIN: Domain = Domain::new(0, 5);

/// Domain of the sentiment score
pub const SENTIMENT_DOMAIN: Domain = Domain::new(-5, 5);

/// Domain of `length(text)` filters
pub const WORD_LENGTH_DOMAIN: Domain = Domain::new(0, 255);

/// A scored attribute tracked for every word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Commonness,
    Offensiveness,
    Sentiment,
    Formality,
    CulturalSensitivity,
    Figurativeness,
    Complexity,
    Political,
}

impl Attribute {
    /// Number of tracked attributes
    pub const COUNT: usize = 8;

    /// All attributes in declared order.
    ///
    /// This order fixes the projection column order and the order in which
    /// range clauses are appended during compilation.
    pub const ALL: [Attribute; Attribute::COUNT] = [
        Attribute::Commonness,
        Attribute::Offensiveness,
        Attribute::Sentiment,
        Attribute::Formality,
        Attribute::CulturalSensitivity,
        Attribute::Figurativeness,
        Attribute::Complexity,
        Attribute::Political,
    ];

    /// Position in declared order
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Name used by the JSON API
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Commonness => "commonness",
            Attribute::Offensiveness => "offensiveness",
            Attribute::Sentiment => "sentiment",
            Attribute::Formality => "formality",
            Attribute::CulturalSensitivity => "culturalSensitivity",
            Attribute::Figurativeness => "figurativeness",
            Attribute::Complexity => "complexity",
            Attribute::Political => "political",
        }
    }

    /// Column name in the `words` table
    pub fn column(&self) -> &'static str {
        match self {
            Attribute::Commonness => "commonness",
            Attribute::Offensiveness => "offensiveness",
            Attribute::Sentiment => "sentiment",
            Attribute::Formality => "formality",
            Attribute::CulturalSensitivity => "culturalsensitivity",
            Attribute::Figurativeness => "figurativeness",
            Attribute::Complexity => "complexity",
            Attribute::Political => "political",
        }
    }

    /// Legal score bounds
    pub fn domain(&self) -> Domain {
        match self {
            Attribute::Sentiment => SENTIMENT_DOMAIN,
            _ => SCORE_DOMAIN,
        }
    }

    /// Resolve a caller-supplied identifier against the allow-list.
    ///
    /// Matching is ASCII case-insensitive and ignores underscores, so
    /// `culturalSensitivity`, `CulturalSensitivity`, `culturalsensitivity`
    /// and `cultural_sensitivity` all resolve.
    pub fn parse(name: &str) -> QueryResult<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Attribute::ALL
            .iter()
            .copied()
            .find(|attr| attr.column() == normalized)
            .ok_or_else(|| QueryError::UnknownField(name.to_string()))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Attribute {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::parse(s)
    }
}
