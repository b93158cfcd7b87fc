//! Periodic eviction of expired sessions

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::store::SessionStore;
use crate::observability::{log_event_with_fields, Event, Logger};

/// Evict expired sessions from `store` every `period`
pub fn spawn_eviction_worker(store: Arc<SessionStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match store.evict_expired() {
                Ok(0) => {}
                Ok(n) => {
                    let n = n.to_string();
                    log_event_with_fields(Event::SessionsEvicted, &[("count", n.as_str())]);
                }
                Err(e) => {
                    Logger::error("SESSION_EVICTION_FAILED", &[("error", e.to_string().as_str())])
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_worker_evicts() {
        let store = Arc::new(SessionStore::with_ttl(Some(chrono::Duration::zero())));
        store.start(json!({"a": 1})).unwrap();

        let handle = spawn_eviction_worker(Arc::clone(&store), Duration::from_millis(20));
        let mut waited = 0;
        while !store.is_empty().unwrap() && waited < 100 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            waited += 1;
        }
        handle.abort();

        assert!(store.is_empty().unwrap());
    }
}
