//! CLI command implementations
//!
//! Each command loads the configuration, applies its log level, does one
//! thing and prints one JSON object. `serve` is the only long-running one.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::fetcher::{FetchOptions, PageFetcher};
use crate::model::WordRecord;
use crate::observability::{log_event, Event, Logger, ObservationScope};
use crate::rest_api::{parse_page_request, PageResponse, ParserLimits, RestServer, WordsHandler};
use crate::sql::CompiledQuery;
use crate::store::SqliteStore;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Entry point for the binary: parse arguments, run, report failure as JSON
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    let result = run_command(cli.command);
    if let Err(err) = &result {
        write_error(err.code_str(), err.message())?;
    }
    result
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Import { config, file } => import(&config, &file),
        Command::Query {
            config,
            params,
            explain,
        } => query(&config, &params, explain),
        Command::Serve { config, port } => serve(&config, port),
    }
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity());
    let path = config_path.display().to_string();
    log_event(
        Event::ConfigLoaded,
        &[("path", path.as_str()), ("database", config.database_path.as_str())],
    );
    Ok(config)
}

#[derive(Debug, Serialize)]
struct InitResult {
    database: String,
}

/// Create the words table. Safe to repeat.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let result = initialize_store(&config)?;
    write_response(&result)
}

fn initialize_store(config: &Config) -> CliResult<InitResult> {
    let scope =
        ObservationScope::with_fields("INIT", &[("database", config.database_path.as_str())]);
    let store = SqliteStore::new(config.database_path());
    if let Err(err) = store.initialize() {
        scope.fail(&err.to_string());
        return Err(err.into());
    }
    scope.complete(&[]);
    log_event(
        Event::StoreInitialized,
        &[("database", config.database_path.as_str())],
    );
    Ok(InitResult {
        database: config.database_path.clone(),
    })
}

#[derive(Debug, Serialize)]
struct ImportResult {
    imported: usize,
    total: u64,
}

/// Load a JSON array of word records into the store
pub fn import(config_path: &Path, file: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let result = import_words(&config, file)?;
    write_response(&result)
}

fn import_words(config: &Config, file: &Path) -> CliResult<ImportResult> {
    let file_name = file.display().to_string();
    let scope = ObservationScope::with_fields("IMPORT", &[("file", file_name.as_str())]);

    let content = fs::read_to_string(file)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", file_name, e)))?;
    let words: Vec<WordRecord> = serde_json::from_str(&content).map_err(|e| {
        CliError::invalid_argument(format!("{} is not an array of words: {}", file_name, e))
    })?;

    let store = SqliteStore::new(config.database_path());
    let imported = match store.initialize().and_then(|_| store.insert_words(&words)) {
        Ok(imported) => imported,
        Err(err) => {
            scope.fail(&err.to_string());
            return Err(err.into());
        }
    };
    let total = store.count_words()?;

    let imported_str = imported.to_string();
    let total_str = total.to_string();
    scope.complete(&[("imported", imported_str.as_str()), ("total", total_str.as_str())]);
    log_event(
        Event::WordsImported,
        &[("imported", imported_str.as_str()), ("total", total_str.as_str())],
    );

    Ok(ImportResult { imported, total })
}

/// Fetch one page, or with `explain` print the compiled statement
pub fn query(config_path: &Path, params: &[String], explain: bool) -> CliResult<()> {
    let config = load_config(config_path)?;
    let output = run_query(&config, params, explain)?;
    match output {
        QueryOutput::Page(page) => write_response(&page),
        QueryOutput::Explain(compiled) => write_response(&compiled),
    }
}

#[derive(Debug)]
enum QueryOutput {
    Page(PageResponse),
    Explain(CompiledQuery),
}

fn run_query(config: &Config, params: &[String], explain: bool) -> CliResult<QueryOutput> {
    let params = parse_params(params)?;
    let limits = ParserLimits::from(config);
    let request = parse_page_request(&params, &limits, Utc::now().timestamp())?;

    let fetcher = PageFetcher::new(SqliteStore::new(config.database_path()));
    if explain {
        return Ok(QueryOutput::Explain(fetcher.compile(&request)?));
    }

    let options = FetchOptions::default()
        .with_deadline(Instant::now() + Duration::from_millis(config.query_timeout_ms))
        .with_request_id(Uuid::new_v4().to_string());
    let page = fetcher.fetch_with(&request, &options)?;
    Ok(QueryOutput::Page(PageResponse::new(request, page)))
}

/// Split `key=value` arguments; a repeated key keeps its last value
fn parse_params(params: &[String]) -> CliResult<HashMap<String, String>> {
    params
        .iter()
        .map(|param| match param.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => Err(CliError::invalid_argument(format!(
                "Expected key=value, got '{}'",
                param
            ))),
        })
        .collect()
}

/// Serve the HTTP API until the listener fails
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
    }

    let store = SqliteStore::new(config.database_path());
    let handler = WordsHandler::from_config(store, &config);
    let server = RestServer::new(handler, config.http.clone());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}
