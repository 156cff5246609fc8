//! CLI argument definitions using clap
//!
//! Commands:
//! - wordlist init --config <path>
//! - wordlist import --config <path> --file <words.json>
//! - wordlist query --config <path> [--param key=value]... [--explain]
//! - wordlist serve --config <path> [--port <port>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// wordlist - paginated, filterable word catalog lookups
#[derive(Parser, Debug)]
#[command(name = "wordlist")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the words table in the configured database
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./wordlist.json")]
        config: PathBuf,
    },

    /// Load words from a JSON array, replacing existing entries by text
    Import {
        /// Path to configuration file
        #[arg(long, default_value = "./wordlist.json")]
        config: PathBuf,

        /// JSON file holding an array of word records
        #[arg(long)]
        file: PathBuf,
    },

    /// Fetch one page and print it
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./wordlist.json")]
        config: PathBuf,

        /// Query parameter as key=value, same keys as GET /api/words
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Print the compiled statement instead of running it
        #[arg(long)]
        explain: bool,
    },

    /// Serve the HTTP API
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./wordlist.json")]
        config: PathBuf,

        /// Listen port, overriding the configuration
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
