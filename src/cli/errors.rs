//! CLI errors
//!
//! Printed as `<CODE>: <message>` on stderr. Each category has its own
//! process exit status so scripts can tell a bad config from a dead store.

use std::io;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    ConfigError,
    IoError,
    StoreError,
    BootFailed,
    CommandFailed,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "SQLGATE_CLI_CONFIG_ERROR",
            Self::IoError => "SQLGATE_CLI_IO_ERROR",
            Self::StoreError => "SQLGATE_CLI_STORE_ERROR",
            Self::BootFailed => "SQLGATE_CLI_BOOT_FAILED",
            Self::CommandFailed => "SQLGATE_CLI_COMMAND_FAILED",
        }
    }

    /// Process exit status for this category
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed => 1,
            Self::ConfigError => 2,
            Self::StoreError => 3,
            Self::BootFailed => 4,
            Self::IoError => 5,
        }
    }
}

#[derive(Debug, Error)]
#[error("{}: {message}", .code.code())]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn store_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::StoreError, msg)
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    pub fn command_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::CommandFailed, msg)
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> i32 {
        self.code.exit_code()
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON output failed: {}", e))
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::config_error("database_path must not be empty");
        assert_eq!(
            err.to_string(),
            "SQLGATE_CLI_CONFIG_ERROR: database_path must not be empty"
        );
        assert_eq!(err.code(), CliErrorCode::ConfigError);
        assert_eq!(err.message(), "database_path must not be empty");
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            CliErrorCode::ConfigError,
            CliErrorCode::IoError,
            CliErrorCode::StoreError,
            CliErrorCode::BootFailed,
            CliErrorCode::CommandFailed,
        ];
        let mut exits: Vec<i32> = codes.iter().map(CliErrorCode::exit_code).collect();
        exits.sort_unstable();
        exits.dedup();
        assert_eq!(exits.len(), codes.len());
        assert!(exits.iter().all(|c| *c != 0));
    }

    #[test]
    fn test_io_conversion() {
        let err = CliError::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert_eq!(err.code_str(), "SQLGATE_CLI_IO_ERROR");
    }
}
