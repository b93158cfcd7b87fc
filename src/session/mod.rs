//! # Sessions
//!
//! Ephemeral JSON documents keyed by a random session id.

mod errors;
mod store;
mod worker;

pub use errors::{SessionError, SessionResult};
pub use store::{generate_session_id, SessionStore};
pub use worker::spawn_eviction_worker;
