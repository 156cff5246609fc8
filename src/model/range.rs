//! Inclusive range filters with silent repair
//!
//! A `RangeFilter` is always well-formed: bounds lie inside the domain and
//! `min <= max`. Malformed input never produces an error, it produces the
//! nearest legal filter.

use serde::Serialize;

use super::attribute::Domain;

/// Inclusive `[min, max]` filter over one attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeFilter {
    min: i64,
    max: i64,
}

impl RangeFilter {
    /// The no-op filter spanning the whole domain
    pub fn full(domain: Domain) -> Self {
        Self {
            min: domain.min,
            max: domain.max,
        }
    }

    /// Build a filter, repairing out-of-domain bounds.
    ///
    /// A missing or out-of-domain `min` becomes `domain.min`; likewise `max`
    /// becomes `domain.max`. If the repaired bounds are inverted the whole
    /// filter falls back to the full domain.
    pub fn clamped(domain: Domain, min: Option<i64>, max: Option<i64>) -> Self {
        let min = min.filter(|v| domain.contains(*v)).unwrap_or(domain.min);
        let max = max.filter(|v| domain.contains(*v)).unwrap_or(domain.max);

        if min > max {
            return Self::full(domain);
        }

        Self { min, max }
    }

    /// Build a filter from raw text bounds; unparsable text counts as absent
    pub fn parse(domain: Domain, min: Option<&str>, max: Option<&str>) -> Self {
        Self::clamped(domain, parse_bound(min), parse_bound(max))
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// True if this filter does not narrow `domain`
    pub fn is_full(&self, domain: Domain) -> bool {
        self.min == domain.min && self.max == domain.max
    }

    /// True if the lower bound narrows `domain`
    pub fn has_min(&self, domain: Domain) -> bool {
        self.min > domain.min
    }

    /// True if the upper bound narrows `domain`
    pub fn has_max(&self, domain: Domain) -> bool {
        self.max < domain.max
    }

    /// True if `value` passes the filter
    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }
}

fn parse_bound(text: Option<&str>) -> Option<i64> {
    text.and_then(|t| t.trim().parse::<i64>().ok())
}
