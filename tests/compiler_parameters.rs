//! Compiler Parameter Numbering Tests
//!
//! Every combination of optional clauses must produce placeholders numbered
//! 1..=n in text order, with exactly n parameters:
//! - No index is skipped when a clause is absent
//! - No index is duplicated
//! - The sentinel limit is always the last parameter

use regex::Regex;

use wordlist::compiler::QueryCompiler;
use wordlist::model::{
    Attribute, PageRequest, RangeFilter, Sampling, SortDirection, SortField, SortSpec,
    WORD_LENGTH_DOMAIN,
};
use wordlist::sql::{CompiledQuery, Dialect, SqlValue};

// =============================================================================
// Helper Functions
// =============================================================================

const OPTIONAL_CLAUSES: usize = 8;

/// Build the request with the optional clauses selected by `mask`
fn request_for(mask: u32) -> PageRequest {
    let on = |bit: usize| mask & (1 << bit) != 0;
    let mut request = PageRequest::new().with_start_from("b").with_limit(7);

    if on(0) {
        let domain = Attribute::Commonness.domain();
        request = request.with_range(
            Attribute::Commonness,
            RangeFilter::clamped(domain, Some(2), None),
        );
    }
    if on(1) {
        let domain = Attribute::Sentiment.domain();
        request = request.with_range(
            Attribute::Sentiment,
            RangeFilter::clamped(domain, Some(-2), Some(3)),
        );
    }
    if on(2) {
        let domain = Attribute::Political.domain();
        request = request.with_range(
            Attribute::Political,
            RangeFilter::clamped(domain, None, Some(1)),
        );
    }
    if on(3) || on(4) {
        let min = if on(3) { Some(3) } else { None };
        let max = if on(4) { Some(9) } else { None };
        request = request.with_word_length(RangeFilter::clamped(WORD_LENGTH_DOMAIN, min, max));
    }
    if on(5) {
        request = request.with_prefix("a_%");
    }
    if on(6) {
        request = request.with_sampling(Sampling::new(20, "seed"));
    }
    if on(7) {
        request = request.with_sort(SortSpec::new(
            SortField::Attribute(Attribute::Complexity),
            SortDirection::Desc,
        ));
    }
    request
}

/// Number of parameters the selected clauses must bind
fn expected_params(mask: u32) -> usize {
    let on = |bit: usize| mask & (1 << bit) != 0;
    let mut count = 2; // cursor + limit
    count += (0..3).filter(|b| on(*b)).count() * 2;
    count += (3..6).filter(|b| on(*b)).count();
    if on(6) {
        count += 2;
    }
    count
}

fn placeholder_numbers(compiled: &CompiledQuery, dialect: &Dialect) -> Vec<usize> {
    let pattern = match dialect.name() {
        "sqlite" => r"\?(\d+)",
        _ => r"\$(\d+)",
    };
    Regex::new(pattern)
        .unwrap()
        .captures_iter(compiled.sql())
        .map(|c| c[1].parse().unwrap())
        .collect()
}

fn assert_sequential(compiled: &CompiledQuery, dialect: &Dialect, mask: u32) {
    let numbers = placeholder_numbers(compiled, dialect);
    let expected: Vec<usize> = (1..=compiled.params().len()).collect();
    assert_eq!(
        numbers,
        expected,
        "mask {:08b} on {}: {}",
        mask,
        dialect.name(),
        compiled.sql()
    );
    assert_eq!(compiled.params().len(), expected_params(mask));
}

// =============================================================================
// Exhaustive Clause Combinations
// =============================================================================

/// All 2^8 combinations on a dialect with a hash function.
#[test]
fn test_every_combination_numbers_sequentially() {
    for dialect in [Dialect::cockroach(), Dialect::sqlite()] {
        let compiler = QueryCompiler::new(dialect);
        for mask in 0..(1u32 << OPTIONAL_CLAUSES) {
            let compiled = compiler.compile(&request_for(mask)).unwrap();
            assert_sequential(&compiled, &dialect, mask);
        }
    }
}

/// The sentinel limit is always bound last, as limit + 1.
#[test]
fn test_sentinel_limit_is_last_parameter() {
    let compiler = QueryCompiler::new(Dialect::cockroach());
    for mask in 0..(1u32 << OPTIONAL_CLAUSES) {
        let compiled = compiler.compile(&request_for(mask)).unwrap();
        assert_eq!(compiled.params().last(), Some(&SqlValue::Integer(8)));
        assert_eq!(compiled.params().first(), Some(&SqlValue::from("b")));
    }
}

/// Without sampling, postgres compiles every combination too.
#[test]
fn test_postgres_without_sampling() {
    let dialect = Dialect::postgres();
    let compiler = QueryCompiler::new(dialect);
    for mask in (0..(1u32 << OPTIONAL_CLAUSES)).filter(|m| m & (1 << 6) == 0) {
        let compiled = compiler.compile(&request_for(mask)).unwrap();
        assert_sequential(&compiled, &dialect, mask);
    }
}

// =============================================================================
// Clause Content Tests
// =============================================================================

/// Range clauses follow declared attribute order, not insertion order.
#[test]
fn test_range_clauses_in_declared_order() {
    let request = PageRequest::new()
        .with_range(
            Attribute::Political,
            RangeFilter::clamped(Attribute::Political.domain(), Some(1), None),
        )
        .with_range(
            Attribute::Commonness,
            RangeFilter::clamped(Attribute::Commonness.domain(), Some(1), None),
        );
    let compiled = QueryCompiler::new(Dialect::cockroach())
        .compile(&request)
        .unwrap();

    let sql = compiled.sql();
    let commonness = sql.find("commonness >= $2").unwrap();
    let political = sql.find("political >= $4").unwrap();
    assert!(commonness < political);
}

/// Sampled statements close the inner query before the outer order.
#[test]
fn test_sampled_statement_shape() {
    let request = PageRequest::new().with_sampling(Sampling::new(5, "42"));
    let compiled = QueryCompiler::new(Dialect::cockroach())
        .compile(&request)
        .unwrap();

    assert!(compiled.sql().starts_with("SELECT text, commonness"));
    assert!(compiled
        .sql()
        .ends_with("ORDER BY fnv64(CONCAT($2, text)), text LIMIT $3) AS sample ORDER BY text ASC LIMIT $4"));
    assert_eq!(
        compiled.params(),
        &[
            SqlValue::from(""),
            SqlValue::from("42"),
            SqlValue::Integer(5),
            SqlValue::Integer(101),
        ]
    );
}

/// Caller-supplied identifiers never reach the statement text.
#[test]
fn test_injected_sort_field_is_rejected() {
    assert!(SortField::parse("text; DROP TABLE words").is_err());
    assert!(PageRequest::new()
        .with_named_range("commonness) OR (1=1", |attr| RangeFilter::full(attr.domain()))
        .is_err());
}

/// Values that look like placeholders stay in the parameter list.
#[test]
fn test_placeholder_lookalike_values_are_bound() {
    let request = PageRequest::new()
        .with_start_from("$1")
        .with_prefix("?2");
    let dialect = Dialect::cockroach();
    let compiled = QueryCompiler::new(dialect).compile(&request).unwrap();

    assert!(!compiled.sql().contains("?2"));
    assert_eq!(compiled.params()[0], SqlValue::from("$1"));
    assert_eq!(compiled.params()[1], SqlValue::from("?2%"));
    assert_sequential(&compiled, &dialect, 1 << 5);
}
