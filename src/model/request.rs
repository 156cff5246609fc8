//! Page request: the structured form of one lookup

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::attribute::{Attribute, WORD_LENGTH_DOMAIN};
use super::errors::{QueryError, QueryResult};
use super::range::RangeFilter;

/// Default page size
pub const DEFAULT_LIMIT: u32 = 100;

/// One range filter per tracked attribute, in declared order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRanges {
    ranges: [RangeFilter; Attribute::COUNT],
}

impl AttributeRanges {
    /// All filters span their full domain
    pub fn full() -> Self {
        Self {
            ranges: Attribute::ALL.map(|attr| RangeFilter::full(attr.domain())),
        }
    }

    pub fn get(&self, attr: Attribute) -> RangeFilter {
        self.ranges[attr.index()]
    }

    pub fn set(&mut self, attr: Attribute, range: RangeFilter) {
        self.ranges[attr.index()] = range;
    }

    /// Filters that narrow their domain, in declared order
    pub fn active(&self) -> impl Iterator<Item = (Attribute, RangeFilter)> + '_ {
        Attribute::ALL
            .iter()
            .map(move |attr| (*attr, self.get(*attr)))
            .filter(|(attr, range)| !range.is_full(attr.domain()))
    }
}

impl Default for AttributeRanges {
    fn default() -> Self {
        Self::full()
    }
}

impl Serialize for AttributeRanges {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Attribute::COUNT))?;
        for attr in Attribute::ALL {
            map.serialize_entry(attr.name(), &self.get(attr))?;
        }
        map.end()
    }
}

/// Seeded pseudo-random sampling directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sampling {
    count: u32,
    seed: String,
}

impl Sampling {
    /// Returns `None` for a zero count, which means "not sampling"
    pub fn new(count: u32, seed: impl Into<String>) -> Option<Self> {
        if count == 0 {
            return None;
        }
        Some(Self {
            count,
            seed: seed.into(),
        })
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

/// Column a page may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Text,
    Attribute(Attribute),
}

impl SortField {
    /// Resolve a caller-supplied sort identifier against the allow-list
    pub fn parse(name: &str) -> QueryResult<Self> {
        if name.eq_ignore_ascii_case("text") {
            return Ok(SortField::Text);
        }
        Attribute::parse(name).map(SortField::Attribute)
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::Text => "text",
            SortField::Attribute(attr) => attr.column(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SortField::Text => "text",
            SortField::Attribute(attr) => attr.name(),
        }
    }
}

impl Serialize for SortField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> QueryResult<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(QueryError::InvalidSortDirection(value.to_string())),
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Requested presentation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new(SortField::Text, SortDirection::Asc)
    }
}

/// A request for one page of words
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    ranges: AttributeRanges,
    word_length: RangeFilter,
    start_from: String,
    sampling: Option<Sampling>,
    sort: Option<SortSpec>,
    prefix: Option<String>,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            ranges: AttributeRanges::full(),
            word_length: RangeFilter::full(WORD_LENGTH_DOMAIN),
            start_from: String::new(),
            sampling: None,
            sort: None,
            prefix: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// A request for the first page with no filters
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(mut self, attr: Attribute, range: RangeFilter) -> Self {
        self.ranges.set(attr, range);
        self
    }

    /// Set a range by caller-supplied attribute name
    pub fn with_named_range(
        self,
        name: &str,
        range_for: impl FnOnce(Attribute) -> RangeFilter,
    ) -> QueryResult<Self> {
        let attr = Attribute::parse(name)?;
        let range = range_for(attr);
        Ok(self.with_range(attr, range))
    }

    pub fn with_word_length(mut self, range: RangeFilter) -> Self {
        self.word_length = range;
        self
    }

    pub fn with_start_from(mut self, cursor: impl Into<String>) -> Self {
        self.start_from = cursor.into();
        self
    }

    pub fn with_sampling(mut self, sampling: Option<Sampling>) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set the text prefix filter; an empty prefix clears it
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = if prefix.is_empty() { None } else { Some(prefix) };
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn ranges(&self) -> &AttributeRanges {
        &self.ranges
    }

    pub fn word_length(&self) -> RangeFilter {
        self.word_length
    }

    pub fn start_from(&self) -> &str {
        &self.start_from
    }

    pub fn sampling(&self) -> Option<&Sampling> {
        self.sampling.as_ref()
    }

    pub fn is_sampling(&self) -> bool {
        self.sampling.is_some()
    }

    /// Requested order, or the default `text ASC`
    pub fn sort(&self) -> SortSpec {
        self.sort.unwrap_or_default()
    }

    /// Whether a `text > cursor` predicate continues this request.
    ///
    /// Only `text ASC` pages without sampling can be resumed; any other order
    /// or a pinned sample would skip or repeat rows.
    pub fn is_cursor_resumable(&self) -> bool {
        !self.is_sampling() && self.sort() == SortSpec::default()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Check the invariants construction cannot enforce on its own
    pub fn validate(&self) -> QueryResult<()> {
        if self.limit == 0 {
            return Err(QueryError::InvalidLimit(0));
        }
        Ok(())
    }
}
