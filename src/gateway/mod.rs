//! # Gateway
//!
//! Orchestrates a request end to end:
//!
//! 1. resolve `(name, method, credential)` and apply the credential gate
//! 2. validate the row batch against the endpoint's schema descriptor
//! 3. execute the batch in one transaction
//!
//! Every failure ends the request in a terminal state and maps to one
//! [`GatewayError`] kind.

mod errors;
mod lifecycle;
mod service;

pub use errors::{GatewayError, GatewayResult, INTERNAL_SERVER_ERROR_TEXT};
pub use lifecycle::{ForbiddenTransition, RequestLifecycle, RequestState};
pub use service::{Gateway, Invocation, InvocationBody, ReadRequest};
