//! # Schema Validation
//!
//! Per-endpoint expected field lists and the validator that checks row
//! batches against them before anything executes.
//!
//! Descriptors come from static configuration, not from the endpoint
//! definitions themselves.

mod descriptor;
mod errors;
mod validator;

pub use descriptor::{SchemaCatalog, SchemaDescriptor};
pub use errors::ValidationFailure;
pub use validator::SchemaValidator;
