//! Query engine for salesdb
//!
//! Composes validation, predicate building, backend retrieval, pagination
//! and display formatting into three operations:
//!
//! - [`QueryEngine::list_transactions`]
//! - [`QueryEngine::summary`]
//! - [`QueryEngine::filter_options`]
//!
//! The engine never knows which backend it holds.

mod engine;

pub use engine::QueryEngine;
