//! CLI module for salesdb
//!
//! Provides command-line interface for:
//! - serve: Load the dataset and run the HTTP API
//! - import: Convert a CSV export into a document store
//! - query: One-shot listing, summary or filter-options call

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{BackendKind, Cli, Command, FilterArgs, ListArgs, QueryKind, SourceArgs};
pub use commands::{import, init_tracing, open_engine, query, run, run_command, serve};
pub use config::{BackendConfig, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
