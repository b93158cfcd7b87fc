//! # Endpoint Registry
//!
//! Named, method-scoped, credential-guarded SQL templates that callers
//! register at runtime and invoke over HTTP.
//!
//! ## Invariants
//! - Resolution matches name, method and credential exactly
//! - Duplicate registrations resolve to the earliest one
//! - Credentials are never serialized

mod credential;
mod definition;
mod errors;
mod registry;

pub use credential::{constant_time_str_eq, Access, CredentialGate};
pub use definition::{EndpointDefinition, EndpointKey, EndpointRegistration};
pub use errors::{RegistryError, RegistryResult};
pub use registry::{EndpointRegistry, InMemoryEndpointRegistry, SqliteEndpointRegistry};
