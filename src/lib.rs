//! salesdb - a deterministic, read-only sales transaction query service
//!
//! Subsystems:
//! - `dataset`: record type, field catalogue, CSV loading
//! - `query`: criteria, validation, predicate, search, sort, paging, formatting
//! - `backend`: in-memory and document-collection storage adapters
//! - `engine`: the query facade over one backend
//! - `http_server`: axum transport
//! - `cli`: command line and configuration

pub mod backend;
pub mod cli;
pub mod dataset;
pub mod engine;
pub mod http_server;
pub mod query;
