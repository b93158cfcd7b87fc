//! Endpoint definitions and registration input

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{RegistryError, RegistryResult};

/// Lookup key for a registered endpoint. The method is held uppercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointKey {
    pub name: String,
    pub method: String,
}

impl EndpointKey {
    pub fn new(name: impl Into<String>, method: impl AsRef<str>) -> Self {
        Self {
            name: name.into(),
            method: method.as_ref().to_ascii_uppercase(),
        }
    }
}

/// A registered endpoint. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDefinition {
    pub id: i64,

    pub name: String,

    pub method: String,

    /// Shared secret callers must present. Never serialized.
    #[serde(skip_serializing)]
    pub credential: String,

    pub sql_template: String,

    pub created_at: DateTime<Utc>,
}

impl EndpointDefinition {
    pub fn key(&self) -> EndpointKey {
        EndpointKey::new(self.name.clone(), &self.method)
    }
}

/// Input to [`EndpointRegistry::register`](super::EndpointRegistry::register)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRegistration {
    pub endpoint_name: String,
    pub method: String,
    #[serde(alias = "apiKey")]
    pub credential: String,
    #[serde(alias = "sqlCommand")]
    pub sql_template: String,
}

impl EndpointRegistration {
    pub fn new(
        endpoint_name: impl Into<String>,
        method: impl Into<String>,
        credential: impl Into<String>,
        sql_template: impl Into<String>,
    ) -> Self {
        Self {
            endpoint_name: endpoint_name.into(),
            method: method.into(),
            credential: credential.into(),
            sql_template: sql_template.into(),
        }
    }

    /// Reject blank fields and uppercase the method.
    pub fn normalize(mut self) -> RegistryResult<Self> {
        if self.endpoint_name.trim().is_empty() {
            return Err(RegistryError::MissingField("endpointName"));
        }
        if self.method.trim().is_empty() {
            return Err(RegistryError::MissingField("method"));
        }
        if self.credential.is_empty() {
            return Err(RegistryError::MissingField("credential"));
        }
        if self.sql_template.trim().is_empty() {
            return Err(RegistryError::MissingField("sqlTemplate"));
        }

        self.method = self.method.trim().to_ascii_uppercase();
        Ok(self)
    }
}
