//! Endpoint registry
//!
//! Resolution is by exact `(name, method, credential)`. When the same
//! triple was registered more than once, the lowest id wins so repeated
//! resolutions always return the same definition.

use std::sync::RwLock;

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::credential::{Access, CredentialGate};
use super::definition::{EndpointDefinition, EndpointKey, EndpointRegistration};
use super::errors::{RegistryError, RegistryResult};
use crate::store::Database;

/// Endpoint registry trait
pub trait EndpointRegistry: Send + Sync {
    /// Find the definition for `key` whose credential equals `credential`
    fn resolve(
        &self,
        key: &EndpointKey,
        credential: &str,
    ) -> RegistryResult<Option<EndpointDefinition>>;

    /// Store a new definition and return its id
    fn register(&self, registration: EndpointRegistration) -> RegistryResult<i64>;

    /// All definitions in id order
    fn list(&self) -> RegistryResult<Vec<EndpointDefinition>>;
}

/// Registry backed by the `dynamic_endpoints` table
#[derive(Debug, Clone)]
pub struct SqliteEndpointRegistry {
    db: Database,
}

const SELECT_COLUMNS: &str =
    "SELECT id, endpoint_name, method, credential, sql_template, created_at FROM dynamic_endpoints";

impl SqliteEndpointRegistry {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<EndpointDefinition> {
        Ok(EndpointDefinition {
            id: row.get(0)?,
            name: row.get(1)?,
            method: row.get(2)?,
            credential: row.get(3)?,
            sql_template: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl EndpointRegistry for SqliteEndpointRegistry {
    fn resolve(
        &self,
        key: &EndpointKey,
        credential: &str,
    ) -> RegistryResult<Option<EndpointDefinition>> {
        let conn = self.db.connect()?;
        let sql = format!(
            "{} WHERE endpoint_name = ?1 AND method = ?2 AND credential = ?3 \
             ORDER BY id ASC LIMIT 1",
            SELECT_COLUMNS
        );
        let found = conn
            .query_row(&sql, params![key.name, key.method, credential], Self::from_row)
            .optional()?;
        Ok(found)
    }

    fn register(&self, registration: EndpointRegistration) -> RegistryResult<i64> {
        let registration = registration.normalize()?;
        let conn = self.db.connect()?;
        conn.execute(
            "INSERT INTO dynamic_endpoints \
             (endpoint_name, method, credential, sql_template, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                registration.endpoint_name,
                registration.method,
                registration.credential,
                registration.sql_template,
                Utc::now(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn list(&self) -> RegistryResult<Vec<EndpointDefinition>> {
        let conn = self.db.connect()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id ASC", SELECT_COLUMNS))?;
        let rows = stmt.query_map([], Self::from_row)?;
        let mut definitions = Vec::new();
        for row in rows {
            definitions.push(row?);
        }
        Ok(definitions)
    }
}

/// In-memory registry for tests and embedding
#[derive(Debug, Default)]
pub struct InMemoryEndpointRegistry {
    definitions: RwLock<Vec<EndpointDefinition>>,
}

impl InMemoryEndpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EndpointRegistry for InMemoryEndpointRegistry {
    fn resolve(
        &self,
        key: &EndpointKey,
        credential: &str,
    ) -> RegistryResult<Option<EndpointDefinition>> {
        let definitions = self
            .definitions
            .read()
            .map_err(|_| RegistryError::Storage("Lock poisoned".to_string()))?;

        // Stored in id order, so the first match is the lowest id.
        Ok(definitions
            .iter()
            .filter(|d| d.name == key.name && d.method == key.method)
            .find(|d| CredentialGate::check(d, credential) == Access::Allowed)
            .cloned())
    }

    fn register(&self, registration: EndpointRegistration) -> RegistryResult<i64> {
        let registration = registration.normalize()?;
        let mut definitions = self
            .definitions
            .write()
            .map_err(|_| RegistryError::Storage("Lock poisoned".to_string()))?;

        let id = definitions.last().map_or(1, |d| d.id + 1);
        definitions.push(EndpointDefinition {
            id,
            name: registration.endpoint_name,
            method: registration.method,
            credential: registration.credential,
            sql_template: registration.sql_template,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn list(&self) -> RegistryResult<Vec<EndpointDefinition>> {
        let definitions = self
            .definitions
            .read()
            .map_err(|_| RegistryError::Storage("Lock poisoned".to_string()))?;
        Ok(definitions.clone())
    }
}
