//! sqlgate - named SQL endpoints over HTTP
//!
//! Operators register SQL templates under a name, method and credential.
//! Callers invoke them with JSON rows whose fields fill the `$field$`
//! placeholders. Batches run inside a single transaction.

pub mod backup;
pub mod cli;
pub mod endpoints;
pub mod engine;
pub mod gateway;
pub mod http_server;
pub mod observability;
pub mod schema;
pub mod session;
pub mod store;
pub mod template;
