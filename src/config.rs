//! Service configuration
//!
//! Loaded from a JSON file; every field except the file itself has a default,
//! so `{}` is a valid configuration. `WORDLIST_DATABASE` overrides
//! `database_path` after the file is read.

use std::fs;
use std::path::{Path, PathBuf};

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::DEFAULT_LIMIT;
use crate::observability::Severity;

/// Environment variable overriding `database_path`
pub const DATABASE_ENV: &str = "WORDLIST_DATABASE";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file holding the `words` relation
    #[serde(default = "default_database_path")]
    pub database_path: String,

    #[serde(default)]
    pub http: HttpConfig,

    /// Page size when the caller gives none
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Largest page size a caller may ask for
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,

    /// Largest sample a caller may ask for
    #[serde(default = "default_max_random_count")]
    pub max_random_count: u32,

    /// Per-request store deadline
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_database_path() -> String {
    "./words.db".to_string()
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_max_limit() -> u32 {
    1000
}

fn default_max_random_count() -> u32 {
    10_000
}

fn default_query_timeout_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            http: HttpConfig::default(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            max_random_count: default_max_random_count(),
            query_timeout_ms: default_query_timeout_ms(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load, apply the environment override, then validate
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_json(&content)?.with_env_override(std::env::var(DATABASE_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn with_env_override(mut self, database: Option<String>) -> Self {
        if let Some(path) = database.filter(|p| !p.is_empty()) {
            self.database_path = path;
        }
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.database_path.is_empty() {
            return Err(ConfigError::Invalid("database_path must not be empty".into()));
        }
        if self.default_limit == 0 {
            return Err(ConfigError::Invalid("default_limit must be > 0".into()));
        }
        if self.max_limit == 0 {
            return Err(ConfigError::Invalid("max_limit must be > 0".into()));
        }
        if self.default_limit > self.max_limit {
            return Err(ConfigError::Invalid(format!(
                "default_limit {} exceeds max_limit {}",
                self.default_limit, self.max_limit
            )));
        }
        if self.max_random_count == 0 {
            return Err(ConfigError::Invalid("max_random_count must be > 0".into()));
        }
        if self.query_timeout_ms == 0 {
            return Err(ConfigError::Invalid("query_timeout_ms must be > 0".into()));
        }
        if Severity::parse(&self.log_level).is_none() {
            return Err(ConfigError::Invalid(format!(
                "Unknown log_level '{}'",
                self.log_level
            )));
        }
        self.http.allowed_origins()?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
    }

    pub fn severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Info)
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by CORS; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `cors_origins` as header values, failing on the first entry that is
    /// not a bare `http(s)://host[:port]` origin
    pub fn allowed_origins(&self) -> ConfigResult<Vec<HeaderValue>> {
        self.cors_origins.iter().map(|o| parse_origin(o)).collect()
    }
}

fn parse_origin(origin: &str) -> ConfigResult<HeaderValue> {
    let authority = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"));
    match authority {
        Some(authority) if !authority.is_empty() && !authority.contains('/') => {
            HeaderValue::from_str(origin).map_err(|_| {
                ConfigError::Invalid(format!(
                    "cors origin '{}' is not a valid header value",
                    origin
                ))
            })
        }
        _ => Err(ConfigError::Invalid(format!(
            "cors origin '{}' must have the form http(s)://host[:port]",
            origin
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.database_path, "./words.db");
        assert_eq!(config.default_limit, 100);
        assert_eq!(config.max_limit, 1000);
        assert_eq!(config.http.socket_addr(), "0.0.0.0:8080");
        assert_eq!(config.severity(), Severity::Info);
        config.validate().unwrap();
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wordlist.json");
        let body = json!({
            "database_path": "/var/lib/words.db",
            "http": { "port": 9000, "cors_origins": ["http://localhost:5173"] },
            "max_limit": 500,
            "log_level": "trace"
        });
        fs::write(&path, body.to_string()).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.max_limit, 500);
        assert_eq!(config.severity(), Severity::Trace);
    }

    #[test]
    fn test_malformed_cors_origins_rejected() {
        let with_origins = |origins: &[&str]| Config {
            http: HttpConfig {
                cors_origins: origins.iter().map(|o| o.to_string()).collect(),
                ..HttpConfig::default()
            },
            ..Config::default()
        };

        let config = with_origins(&["http://localhost:5173", "https://app.example.com:8443"]);
        config.validate().unwrap();
        assert_eq!(config.http.allowed_origins().unwrap().len(), 2);

        for bad in [
            "localhost:5173",
            "htps://app.example.com",
            "https://app.example.com/",
            "https://",
            "http://bad\nhost",
        ] {
            let err = with_origins(&["http://localhost:5173", bad]).validate().unwrap_err();
            match err {
                ConfigError::Invalid(message) => assert!(message.contains("cors origin")),
                other => panic!("expected invalid config for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/wordlist.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Config::from_json("{not json").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }

    #[test]
    fn test_validation() {
        let config = Config::from_json(r#"{"default_limit": 0}"#).unwrap();
        assert!(config.validate().is_err());

        let config = Config::from_json(r#"{"default_limit": 50, "max_limit": 10}"#).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("exceeds max_limit"));

        let config = Config::from_json(r#"{"query_timeout_ms": 0}"#).unwrap();
        assert!(config.validate().is_err());

        let config = Config::from_json(r#"{"log_level": "LOUD"}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_override() {
        let config = Config::default().with_env_override(Some("/tmp/other.db".into()));
        assert_eq!(config.database_path(), PathBuf::from("/tmp/other.db"));

        let config = Config::default().with_env_override(Some(String::new()));
        assert_eq!(config.database_path, "./words.db");
    }
}
