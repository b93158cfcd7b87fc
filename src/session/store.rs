//! Process-scoped session documents
//!
//! Created once at startup and handed to whatever needs it. Sessions
//! expire only when a TTL is configured; the TTL runs from the last write.

use std::collections::HashMap;
use std::sync::RwLock;

use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde_json::Value;

use super::errors::{SessionError, SessionResult};

#[derive(Debug, Clone)]
struct SessionEntry {
    document: Value,
    updated_at: DateTime<Utc>,
}

/// Concurrent session id -> JSON document map
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    ttl: Option<Duration>,
}

/// Random 256-bit session id, URL-safe base64 without padding
pub fn generate_session_id() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

impl SessionStore {
    /// Store whose sessions never expire
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Open a session holding `document` and return its id
    pub fn start(&self, document: Value) -> SessionResult<String> {
        let id = generate_session_id();
        self.write()?.insert(
            id.clone(),
            SessionEntry {
                document,
                updated_at: Utc::now(),
            },
        );
        Ok(id)
    }

    /// Current document, if the session exists and has not expired
    pub fn get(&self, id: &str) -> SessionResult<Option<Value>> {
        let sessions = self.read()?;
        Ok(sessions
            .get(id)
            .filter(|entry| !self.is_expired(entry, Utc::now()))
            .map(|entry| entry.document.clone()))
    }

    /// Insert or replace the document under `id`
    pub fn store(&self, id: &str, document: Value) -> SessionResult<()> {
        if id.trim().is_empty() {
            return Err(SessionError::InvalidId);
        }
        self.write()?.insert(
            id.to_string(),
            SessionEntry {
                document,
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }

    /// Remove the session and return its last document
    pub fn end(&self, id: &str) -> SessionResult<Option<Value>> {
        let removed = self.write()?.remove(id);
        let now = Utc::now();
        Ok(removed
            .filter(|entry| !self.is_expired(entry, now))
            .map(|entry| entry.document))
    }

    /// Drop every expired session. Returns how many were removed.
    pub fn evict_expired(&self) -> SessionResult<usize> {
        if self.ttl.is_none() {
            return Ok(0);
        }
        let now = Utc::now();
        let mut sessions = self.write()?;
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        Ok(before - sessions.len())
    }

    pub fn len(&self) -> SessionResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> SessionResult<bool> {
        Ok(self.read()?.is_empty())
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn is_expired(&self, entry: &SessionEntry, now: DateTime<Utc>) -> bool {
        match self.ttl {
            // a deadline past the representable range never arrives
            Some(ttl) => entry
                .updated_at
                .checked_add_signed(ttl)
                .is_some_and(|deadline| deadline <= now),
            None => false,
        }
    }

    fn read(
        &self,
    ) -> SessionResult<std::sync::RwLockReadGuard<'_, HashMap<String, SessionEntry>>> {
        self.sessions
            .read()
            .map_err(|_| SessionError::Storage("Lock poisoned".to_string()))
    }

    fn write(
        &self,
    ) -> SessionResult<std::sync::RwLockWriteGuard<'_, HashMap<String, SessionEntry>>> {
        self.sessions
            .write()
            .map_err(|_| SessionError::Storage("Lock poisoned".to_string()))
    }
}
