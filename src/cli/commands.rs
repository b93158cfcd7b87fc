//! CLI command implementations
//!
//! `serve` boot sequence:
//! 1. Configuration load, log threshold
//! 2. Store open (creates the endpoint table if missing)
//! 3. Gateway wiring
//! 4. Background workers (backup, session eviction)
//! 5. HTTP serving until Ctrl-C

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use crate::backup::{spawn_backup_worker, BackupService};
use crate::endpoints::{EndpointRegistration, SqliteEndpointRegistry};
use crate::engine::ExecutionEngine;
use crate::gateway::Gateway;
use crate::http_server::{HttpServer, ServerContext};
use crate::observability::{log_event, log_event_with_fields, Event, Logger, MetricsRegistry};
use crate::session::{spawn_eviction_worker, SessionStore};
use crate::store::Database;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config, port } => serve(&config, port),
        Command::Register {
            config,
            name,
            method,
            credential,
            template,
        } => register(
            &config,
            EndpointRegistration::new(name, method, credential, template),
        ),
        Command::Backup { config } => backup(&config),
    }
}

/// Create the database file and the endpoint table
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let db = open_database(&config)?;

    write_response(json!({
        "initialized": true,
        "database_path": db.path().display().to_string(),
    }))
}

/// Start the HTTP gateway
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.log_level);
    log_event(Event::BootStart);

    let config_display = config_path.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("config", config_display.as_str())]);

    let db = open_database(&config)?;
    let db_display = db.path().display().to_string();
    log_event_with_fields(Event::StoreReady, &[("database_path", db_display.as_str())]);

    let metrics = Arc::new(MetricsRegistry::new());
    let gateway = Arc::new(build_gateway(&config, db.clone(), Arc::clone(&metrics)));
    let sessions = Arc::new(SessionStore::with_ttl(config.session_ttl()));

    let mut http_config = config.http_config();
    if let Some(port) = port {
        http_config.port = port;
    }
    let server = HttpServer::new(
        http_config,
        ServerContext {
            gateway,
            sessions: Arc::clone(&sessions),
            admin_key: config.admin_key.clone(),
        },
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let backup_worker = config.backup_path.as_ref().map(|target| {
            let service = BackupService::new(db.clone(), target, Arc::clone(&metrics));
            spawn_backup_worker(
                Arc::new(service),
                Duration::from_secs(config.backup_interval_secs),
            )
        });
        let eviction_worker = config
            .session_ttl_secs
            .map(|secs| spawn_eviction_worker(Arc::clone(&sessions), Duration::from_secs(secs)));

        let result = server.start().await;

        for worker in [backup_worker, eviction_worker].into_iter().flatten() {
            worker.abort();
        }
        log_event(Event::ShutdownComplete);

        result.map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Register an endpoint directly against the database
pub fn register(config_path: &Path, registration: EndpointRegistration) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let db = open_database(&config)?;
    let gateway = build_gateway(&config, db, Arc::new(MetricsRegistry::new()));

    let endpoint_id = gateway
        .register(registration)
        .map_err(|e| CliError::command_failed(e.to_string()))?;

    write_response(json!({ "endpoint_id": endpoint_id }))
}

/// Write a backup now
pub fn backup(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let target = config
        .backup_path
        .clone()
        .ok_or_else(|| CliError::config_error("backup_path is not configured"))?;
    let db = open_database(&config)?;

    let report = BackupService::new(db, target, Arc::new(MetricsRegistry::new()))
        .run()
        .map_err(|e| CliError::command_failed(format!("{}: {}", e.code(), e)))?;

    write_response(json!({
        "path": report.path.display().to_string(),
        "bytes": report.bytes,
    }))
}

/// Open the database, creating its parent directory first
pub fn open_database(config: &Config) -> CliResult<Database> {
    if let Some(parent) = config
        .database_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        fs::create_dir_all(parent).map_err(|e| {
            CliError::store_error(format!("Failed to create directory {:?}: {}", parent, e))
        })?;
    }

    Database::open(config.database_config()).map_err(|e| CliError::store_error(e.to_string()))
}

/// Wire a gateway over the SQLite registry and the configured schemas
pub fn build_gateway(config: &Config, db: Database, metrics: Arc<MetricsRegistry>) -> Gateway {
    Gateway::new(
        Arc::new(SqliteEndpointRegistry::new(db.clone())),
        Arc::new(config.schema_catalog()),
        ExecutionEngine::new(db),
        metrics,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::{EndpointKey, EndpointRegistry};
    use tempfile::TempDir;

    fn config_file(tmp: &TempDir, config: &Config) -> std::path::PathBuf {
        let path = tmp.path().join("sqlgate.json");
        fs::write(&path, serde_json::to_string(config).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_init_creates_database() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("data/gate.db");
        let path = config_file(&tmp, &Config::new(&db_path));

        init(&path).unwrap();
        assert!(db_path.exists());
    }

    #[test]
    fn test_register_command_persists() {
        let tmp = TempDir::new().unwrap();
        let config = Config::new(tmp.path().join("gate.db"));
        let path = config_file(&tmp, &config);

        register(
            &path,
            EndpointRegistration::new("orders", "post", "k1", "INSERT INTO o VALUES ($x$)"),
        )
        .unwrap();

        let registry = SqliteEndpointRegistry::new(open_database(&config).unwrap());
        let found = registry
            .resolve(&EndpointKey::new("orders", "POST"), "k1")
            .unwrap();
        assert!(found.is_some());
    }

    #[test]
    fn test_backup_requires_target() {
        let tmp = TempDir::new().unwrap();
        let path = config_file(&tmp, &Config::new(tmp.path().join("gate.db")));
        let err = backup(&path).unwrap_err();
        assert_eq!(err.code_str(), "SQLGATE_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_backup_command_writes_file() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::new(tmp.path().join("gate.db"));
        config.backup_path = Some(tmp.path().join("backups/gate.db"));
        let path = config_file(&tmp, &config);

        backup(&path).unwrap();
        assert!(tmp.path().join("backups/gate.db").exists());
    }
}
