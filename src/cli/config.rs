//! Configuration file
//!
//! ```json
//! {
//!   "database_path": "./data/gate.db",
//!   "port": 8836,
//!   "schemas": { "orders": ["customer", "total"] },
//!   "backup_path": "./backups/gate.db",
//!   "log_level": "warn"
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::http_server::config::{default_cors_origins, default_host, default_port};
use crate::http_server::HttpServerConfig;
use crate::observability::Severity;
use crate::schema::SchemaCatalog;
use crate::store::{DatabaseConfig, DEFAULT_BUSY_TIMEOUT_MS};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file (required)
    pub database_path: PathBuf,

    /// Busy timeout for contended writes (default 5000)
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Endpoint name -> expected field names
    #[serde(default)]
    pub schemas: BTreeMap<String, Vec<String>>,

    /// Secret for `/api/endpoints`; unset leaves registration open
    #[serde(default)]
    pub admin_key: Option<String>,

    /// Backup target file; unset disables backups
    #[serde(default)]
    pub backup_path: Option<PathBuf>,

    #[serde(default = "default_backup_interval_secs")]
    pub backup_interval_secs: u64,

    /// Session lifetime since last write; unset means no expiry
    #[serde(default)]
    pub session_ttl_secs: Option<u64>,

    /// Lowest severity written to the log (default "info")
    #[serde(default)]
    pub log_level: Severity,
}

/// Upper bound for worker periods and session lifetimes (ten years)
pub const MAX_PERIOD_SECS: u64 = 10 * 365 * 24 * 60 * 60;

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

fn default_backup_interval_secs() -> u64 {
    3600
}

impl Config {
    /// Config with every optional field at its default
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            busy_timeout_ms: default_busy_timeout_ms(),
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            schemas: BTreeMap::new(),
            admin_key: None,
            backup_path: None,
            backup_interval_secs: default_backup_interval_secs(),
            session_ttl_secs: None,
            log_level: Severity::default(),
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(CliError::config_error("database_path must not be empty"));
        }

        if self.backup_interval_secs == 0 {
            return Err(CliError::config_error("backup_interval_secs must be > 0"));
        }

        if self.backup_interval_secs > MAX_PERIOD_SECS {
            return Err(CliError::config_error(format!(
                "backup_interval_secs must be <= {}",
                MAX_PERIOD_SECS
            )));
        }

        if self.session_ttl_secs == Some(0) {
            return Err(CliError::config_error("session_ttl_secs must be > 0 when set"));
        }

        if matches!(self.session_ttl_secs, Some(secs) if secs > MAX_PERIOD_SECS) {
            return Err(CliError::config_error(format!(
                "session_ttl_secs must be <= {}",
                MAX_PERIOD_SECS
            )));
        }

        if matches!(self.admin_key.as_deref(), Some(key) if key.is_empty()) {
            return Err(CliError::config_error("admin_key must not be empty when set"));
        }

        if matches!(&self.backup_path, Some(p) if p == &self.database_path) {
            return Err(CliError::config_error(
                "backup_path must differ from database_path",
            ));
        }

        let http = self.http_config();
        if let Some(origin) = http.invalid_origins().first() {
            return Err(CliError::config_error(format!(
                "cors_origins contains an invalid origin: {:?}",
                origin
            )));
        }

        for (endpoint, fields) in &self.schemas {
            if fields.iter().any(|f| f.trim().is_empty()) {
                return Err(CliError::config_error(format!(
                    "Schema for '{}' contains an empty field name",
                    endpoint
                )));
            }
        }

        Ok(())
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            path: self.database_path.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
        }
    }

    pub fn http_config(&self) -> HttpServerConfig {
        HttpServerConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
        }
    }

    pub fn schema_catalog(&self) -> SchemaCatalog {
        SchemaCatalog::from_config(&self.schemas)
    }

    pub fn session_ttl(&self) -> Option<chrono::Duration> {
        // chrono::Duration holds at most i64::MAX milliseconds
        const MAX_SECS: u64 = (i64::MAX / 1000) as u64;
        self.session_ttl_secs
            .map(|secs| chrono::Duration::seconds(secs.min(MAX_SECS) as i64))
    }
}
