//! Periodic backup worker

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::BackupService;
use crate::observability::Logger;

/// Run `service` every `period` on the blocking pool. The first backup
/// happens one period after the call. Failures are logged by the service
/// and never stop the worker.
pub fn spawn_backup_worker(service: Arc<BackupService>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let service = Arc::clone(&service);
            if let Err(e) = tokio::task::spawn_blocking(move || service.run()).await {
                Logger::error("BACKUP_WORKER_JOIN_FAILED", &[("error", e.to_string().as_str())]);
            }
        }
    })
}
