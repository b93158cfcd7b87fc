//! sqlgate CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`. Errors go to
//! stderr and the exit status names the error category.

use sqlgate::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}
