//! Validation failure details

use thiserror::Error;

/// Why a batch was rejected before execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    /// No descriptor configured for the endpoint (fail-closed)
    #[error("no expected structure found for endpoint '{0}'")]
    UnknownDescriptor(String),

    /// A row lacks one or more expected fields
    #[error("row {row} is missing required fields: {}", missing.join(", "))]
    MissingFields { row: usize, missing: Vec<String> },

    /// The batch has no rows
    #[error("no row data")]
    EmptyBatch,
}
