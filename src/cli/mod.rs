//! CLI module for sqlgate
//!
//! Provides command-line interface for:
//! - init: Create the database and endpoint table
//! - serve: Run the HTTP gateway
//! - register: Register an endpoint from the shell
//! - backup: Write a backup immediately

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{backup, build_gateway, init, open_database, register, run, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_response, write_response_to};
