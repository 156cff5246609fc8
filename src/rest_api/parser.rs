//! # Query-String Parser
//!
//! Turns the raw query string of `GET /api/words` into a `PageRequest`.
//! Numeric input is repaired rather than rejected: unparsable bounds fall
//! back to the domain edge, the limit is clamped to `[1, max_limit]` and the
//! sample size to `[0, max_random_count]`. Only identifiers are rejected: a
//! range key naming an unknown attribute, an unknown sort field or an
//! unknown sort direction.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::Config;
use crate::model::{
    Attribute, PageRequest, RangeFilter, Sampling, SortDirection, SortField, SortSpec,
    DEFAULT_LIMIT, WORD_LENGTH_DOMAIN,
};

use super::errors::RestResult;

/// Bounds applied while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserLimits {
    pub default_limit: u32,
    pub max_limit: u32,
    pub max_random_count: u32,
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: 1000,
            max_random_count: 10_000,
        }
    }
}

impl From<&Config> for ParserLimits {
    fn from(config: &Config) -> Self {
        Self {
            default_limit: config.default_limit,
            max_limit: config.max_limit,
            max_random_count: config.max_random_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Min,
    Max,
}

/// `minCommonness`, `maxLength`
fn prefixed_bound() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(min|max)([A-Z][A-Za-z_]*)$").expect("static pattern"))
}

/// `commonnessMin`, `lengthMax`
fn suffixed_bound() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([a-z][A-Za-z_]*)(Min|Max)$").expect("static pattern"))
}

/// Split a range key into its bound and the name it bounds
fn range_key(key: &str) -> Option<(Bound, &str)> {
    if let Some(caps) = prefixed_bound().captures(key) {
        let bound = if &caps[1] == "min" { Bound::Min } else { Bound::Max };
        return caps.get(2).map(|m| (bound, m.as_str()));
    }
    if let Some(caps) = suffixed_bound().captures(key) {
        let bound = if &caps[2] == "Min" { Bound::Min } else { Bound::Max };
        return caps.get(1).map(|m| (bound, m.as_str()));
    }
    None
}

#[derive(Default)]
struct RawBounds<'a> {
    min: Option<&'a str>,
    max: Option<&'a str>,
}

impl<'a> RawBounds<'a> {
    fn set(&mut self, bound: Bound, value: &'a str) {
        match bound {
            Bound::Min => self.min = Some(value),
            Bound::Max => self.max = Some(value),
        }
    }
}

/// Parse one request's query parameters.
///
/// `arrival_secs` seeds sampling when the caller pins no `randomSeed`.
pub fn parse_page_request(
    params: &HashMap<String, String>,
    limits: &ParserLimits,
    arrival_secs: i64,
) -> RestResult<PageRequest> {
    let mut attribute_bounds: [RawBounds<'_>; Attribute::COUNT] = Default::default();
    let mut length_bounds = RawBounds::default();

    for (key, value) in params {
        let Some((bound, name)) = range_key(key) else {
            continue;
        };
        if name.eq_ignore_ascii_case("length") {
            length_bounds.set(bound, value);
            continue;
        }
        let attr = Attribute::parse(name)?;
        attribute_bounds[attr.index()].set(bound, value);
    }

    let mut request = PageRequest::new();

    for attr in Attribute::ALL {
        let raw = &attribute_bounds[attr.index()];
        request = request.with_range(attr, RangeFilter::parse(attr.domain(), raw.min, raw.max));
    }
    request = request.with_word_length(RangeFilter::parse(
        WORD_LENGTH_DOMAIN,
        length_bounds.min,
        length_bounds.max,
    ));

    if let Some(cursor) = params.get("startFrom").or_else(|| params.get("from")) {
        request = request.with_start_from(cursor.as_str());
    }

    if let Some(prefix) = params.get("prefix") {
        request = request.with_prefix(prefix.as_str());
    }

    let count = parse_clamped(params.get("randomCount"), 0, 0, limits.max_random_count);
    let seed = match params.get("randomSeed") {
        Some(seed) if !seed.is_empty() => seed.clone(),
        _ => arrival_secs.to_string(),
    };
    request = request.with_sampling(Sampling::new(count, seed));

    let field = params.get("sortField").map(|f| SortField::parse(f)).transpose()?;
    let direction = params
        .get("sortDirection")
        .map(|d| SortDirection::parse(d))
        .transpose()?;
    if field.is_some() || direction.is_some() {
        request = request.with_sort(SortSpec::new(
            field.unwrap_or(SortField::Text),
            direction.unwrap_or_default(),
        ));
    }

    let limit = parse_clamped(
        params.get("limit"),
        limits.default_limit,
        1,
        limits.max_limit,
    );
    request = request.with_limit(limit);

    Ok(request)
}

/// Parse an integer and clamp it to `[lo, hi]`; absent or unparsable → `default`
fn parse_clamped(value: Option<&String>, default: u32, lo: u32, hi: u32) -> u32 {
    match value.and_then(|v| v.trim().parse::<i64>().ok()) {
        Some(n) => n.clamp(lo as i64, hi as i64) as u32,
        None => default,
    }
}
