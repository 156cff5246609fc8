//! CLI module for wordlist
//!
//! Provides command-line interface for:
//! - init: Create the words table
//! - import: Load words from a JSON file
//! - query: Fetch or explain one page
//! - serve: Run the HTTP API

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{import, init, query, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
