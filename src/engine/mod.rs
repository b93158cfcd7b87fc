//! # Execution Engine
//!
//! Applies a parsed template against the backing store. Write batches run
//! in one `BEGIN IMMEDIATE` transaction and are all-or-nothing. Reads run
//! a single statement and return rows as JSON objects.

mod errors;
mod executor;

pub use errors::ExecutionError;
pub use executor::{bind_parameters, BatchOutcome, ExecutionEngine};
