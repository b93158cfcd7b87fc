//! Backup subsystem for sqlgate
//!
//! Produces a consistent, standalone copy of the primary database file.
//!
//! # Algorithm
//!
//! 1. Create the target directory if needed
//! 2. `VACUUM INTO` a `.partial` sibling of the target
//! 3. Rename the sibling over the target
//! 4. On any failure, remove the sibling
//!
//! The previous backup is replaced only by a complete new one.
//! Backup never writes to the primary database.

mod errors;
mod worker;

pub use errors::{BackupError, BackupResult};
pub use worker::spawn_backup_worker;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::params;

use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::store::Database;

/// What a finished backup produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupReport {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Copies the primary database to a fixed target path
#[derive(Debug, Clone)]
pub struct BackupService {
    db: Database,
    target: PathBuf,
    metrics: Arc<MetricsRegistry>,
}

impl BackupService {
    pub fn new(db: Database, target: impl Into<PathBuf>, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            db,
            target: target.into(),
            metrics,
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Run one backup. Logs and counts the outcome.
    pub fn run(&self) -> BackupResult<BackupReport> {
        let target = self.target.display().to_string();
        log_event_with_fields(Event::BackupStart, &[("target", target.as_str())]);

        match self.copy() {
            Ok(report) => {
                self.metrics.increment_backups();
                let bytes = report.bytes.to_string();
                log_event_with_fields(
                    Event::BackupComplete,
                    &[("target", target.as_str()), ("bytes", bytes.as_str())],
                );
                Ok(report)
            }
            Err(err) => {
                self.metrics.increment_backup_failures();
                let reason = err.to_string();
                log_event_with_fields(
                    Event::BackupFailed,
                    &[
                        ("target", target.as_str()),
                        ("code", err.code()),
                        ("reason", reason.as_str()),
                    ],
                );
                Err(err)
            }
        }
    }

    fn copy(&self) -> BackupResult<BackupReport> {
        if let Some(parent) = self.target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| BackupError::Target {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let partial = partial_path(&self.target);
        remove_if_present(&partial).map_err(|source| BackupError::Target {
            path: partial.clone(),
            source,
        })?;

        if let Err(err) = self.vacuum_into(&partial) {
            let _ = remove_if_present(&partial);
            return Err(err);
        }

        if let Err(source) = fs::rename(&partial, &self.target) {
            let _ = remove_if_present(&partial);
            return Err(BackupError::Finalize {
                path: self.target.clone(),
                source,
            });
        }

        let bytes = fs::metadata(&self.target)
            .map(|m| m.len())
            .map_err(|source| BackupError::Finalize {
                path: self.target.clone(),
                source,
            })?;

        Ok(BackupReport {
            path: self.target.clone(),
            bytes,
        })
    }

    fn vacuum_into(&self, destination: &Path) -> BackupResult<()> {
        let conn = self.db.connect()?;
        let destination = destination.to_string_lossy().into_owned();
        conn.execute("VACUUM INTO ?1", params![destination])?;
        Ok(())
    }
}

/// `<target>.partial`
fn partial_path(target: &Path) -> PathBuf {
    let mut name: OsString = target.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

fn remove_if_present(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DatabaseConfig;
    use rusqlite::Connection;
    use tempfile::TempDir;

    fn service(tmp: &TempDir, target: PathBuf) -> BackupService {
        let db = Database::open(DatabaseConfig::new(tmp.path().join("gate.db"))).unwrap();
        db.connect()
            .unwrap()
            .execute_batch("CREATE TABLE t (v TEXT); INSERT INTO t VALUES ('kept');")
            .unwrap();
        BackupService::new(db, target, Arc::new(MetricsRegistry::new()))
    }

    #[test]
    fn test_backup_is_a_readable_copy() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("backups/gate-backup.db");
        let service = service(&tmp, target.clone());

        let report = service.run().unwrap();
        assert_eq!(report.path, target);
        assert!(report.bytes > 0);
        assert!(!partial_path(&target).exists());

        let copy = Connection::open(&target).unwrap();
        let v: String = copy.query_row("SELECT v FROM t", [], |r| r.get(0)).unwrap();
        assert_eq!(v, "kept");
        assert_eq!(service.metrics.snapshot().backups_created, 1);
    }

    #[test]
    fn test_backup_overwrites_previous() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("gate-backup.db");
        let service = service(&tmp, target.clone());

        service.run().unwrap();
        service
            .db
            .connect()
            .unwrap()
            .execute("INSERT INTO t VALUES ('second')", [])
            .unwrap();
        service.run().unwrap();

        let copy = Connection::open(&target).unwrap();
        let n: i64 = copy.query_row("SELECT COUNT(*) FROM t", [], |r| r.get(0)).unwrap();
        assert_eq!(n, 2);
    }

    #[test]
    fn test_failure_is_counted() {
        let tmp = TempDir::new().unwrap();
        // target's parent is a regular file, so the directory cannot be created
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let service = service(&tmp, blocker.join("gate-backup.db"));

        let err = service.run().unwrap_err();
        assert_eq!(err.code(), "SQLGATE_BACKUP_IO");
        assert_eq!(service.metrics.snapshot().backup_failures, 1);
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("/b/gate.db")),
            PathBuf::from("/b/gate.db.partial")
        );
    }
}
