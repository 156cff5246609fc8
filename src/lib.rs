//! wordlist - paginated, filterable, optionally sampled word catalog lookups
//!
//! A request flows leaf-first through the crate:
//! `rest_api`/`cli` parse it into a `model::PageRequest`, `compiler` turns
//! that into one parameterized statement, a `store::WordStore` runs it and
//! `fetcher` decodes the rows into a `model::Page`.

pub mod cli;
pub mod compiler;
pub mod config;
pub mod fetcher;
pub mod model;
pub mod observability;
pub mod rest_api;
pub mod sql;
pub mod store;
