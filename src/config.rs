//! Application configuration.
//!
//! The whole application is configured from one JSON document (by default
//! `config/config.json`). Every section has defaults, so a partial document
//! is valid. Keys use PascalCase to stay compatible with existing deployments.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable consulted when no `--config` flag is given.
pub const CONFIG_ENV: &str = "NOTEPAD_CONFIG";

/// Config location used when neither the flag nor the env var is set.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    #[diagnostic(
        code(notepad::config::io),
        help("Pass --config <file> or set the NOTEPAD_CONFIG environment variable")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse {}: {source}", path.display())]
    #[diagnostic(code(notepad::config::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level settings document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Config {
    pub database: DatabaseInfo,
    pub recaptcha: RecaptchaInfo,
    pub server: ServerInfo,
    pub session: SessionInfo,
    pub view: ViewInfo,
}

impl Config {
    /// Read and parse the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a config document held in memory.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Pick the config path. Precedence: CLI flag > `NOTEPAD_CONFIG` > default.
    pub fn resolve_path(cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}

/// Storage backend selected at startup.
///
/// Unrecognized names deserialize to [`DatabaseType::Unknown`] instead of
/// failing the whole document; opening the repositories then reports a
/// configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum DatabaseType {
    #[default]
    Sqlite,
    SurrealDb,
    Redb,
    Unknown,
}

impl From<String> for DatabaseType {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "sqlite" | "sql" => DatabaseType::Sqlite,
            "surrealdb" | "surreal" => DatabaseType::SurrealDb,
            "redb" => DatabaseType::Redb,
            _ => DatabaseType::Unknown,
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatabaseType::Sqlite => "SQLite",
            DatabaseType::SurrealDb => "SurrealDB",
            DatabaseType::Redb => "Redb",
            DatabaseType::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Backend selector plus the connection parameters of every backend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DatabaseInfo {
    #[serde(rename = "Type")]
    pub kind: DatabaseType,
    #[serde(rename = "SQLite")]
    pub sqlite: SqliteInfo,
    #[serde(rename = "SurrealDB")]
    pub surrealdb: SurrealInfo,
    pub redb: RedbInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SqliteInfo {
    /// sqlx connection URL, e.g. `sqlite://notepad.db?mode=rwc`.
    pub url: String,
    pub max_connections: u32,
}

impl Default for SqliteInfo {
    fn default() -> Self {
        Self {
            url: "sqlite://notepad.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SurrealInfo {
    /// Endpoint understood by the `any` engine: `mem://`, `surrealkv://path`, `ws://host:port`.
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for SurrealInfo {
    fn default() -> Self {
        Self {
            url: "surrealkv://notepad.surreal".to_string(),
            namespace: "notepad".to_string(),
            database: "notepad".to_string(),
            username: None,
            password: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RedbInfo {
    pub path: PathBuf,
}

impl Default for RedbInfo {
    fn default() -> Self {
        Self {
            path: PathBuf::from("notepad.redb"),
        }
    }
}

/// Google reCAPTCHA settings used on the registration form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RecaptchaInfo {
    pub enabled: bool,
    pub secret: String,
    pub site_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ServerInfo {
    pub hostname: String,
    #[serde(rename = "HTTPPort")]
    pub http_port: u16,
}

impl ServerInfo {
    /// Address handed to the TCP listener.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.hostname, self.http_port)
    }
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            hostname: "127.0.0.1".to_string(),
            http_port: 8080,
        }
    }
}

/// Session cookie settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SessionInfo {
    pub name: String,
    /// SQLite URL of the server-side session store.
    pub store: String,
    pub options: SessionOptions,
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self {
            name: "gosess".to_string(),
            store: "sqlite://data/sessions.db?mode=rwc".to_string(),
            options: SessionOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SessionOptions {
    pub path: String,
    /// Inactivity expiry in seconds.
    pub max_age: i64,
    pub secure: bool,
    pub http_only: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            max_age: 28800,
            secure: false,
            http_only: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ViewInfo {
    /// Prefix prepended to every link and asset URL.
    #[serde(rename = "BaseURI")]
    pub base_uri: String,
}

impl Default for ViewInfo {
    fn default() -> Self {
        Self {
            base_uri: "/".to_string(),
        }
    }
}
