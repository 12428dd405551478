//! Sales HTTP Routes
//!
//! Thin wrappers over [`QueryEngine`]: bind parameters, run the engine on the
//! blocking pool, serialize the result.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::engine::QueryEngine;
use crate::query::{FilterOptions, QueryResult, SummaryStats, TransactionPage};

use super::errors::{RestError, RestResult};
use super::params;

// ==================
// Shared State
// ==================

/// State shared across sales handlers
#[derive(Debug)]
pub struct SalesState {
    pub engine: QueryEngine,
}

impl SalesState {
    pub fn new(engine: QueryEngine) -> Self {
        Self { engine }
    }
}

/// Create sales routes (mounted under `/api/sales`)
pub fn sales_routes(state: Arc<SalesState>) -> Router {
    Router::new()
        .route("/transactions", get(list_transactions_handler))
        .route("/summary", get(summary_handler))
        .route("/filter-options", get(filter_options_handler))
        .with_state(state)
}

/// Runs an engine call off the async workers
async fn run<T, F>(state: &Arc<SalesState>, call: F) -> RestResult<T>
where
    T: Send + 'static,
    F: FnOnce(&QueryEngine) -> QueryResult<T> + Send + 'static,
{
    let engine = state.engine.clone();
    let result = tokio::task::spawn_blocking(move || call(&engine))
        .await
        .map_err(|e| RestError::Internal(format!("query task failed: {}", e)))?;
    Ok(result?)
}

async fn list_transactions_handler(
    State(state): State<Arc<SalesState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> RestResult<Json<TransactionPage>> {
    let request = params::list_request(&pairs)?;
    let page = run(&state, move |engine| engine.list_transactions(&request)).await?;
    Ok(Json(page))
}

async fn summary_handler(
    State(state): State<Arc<SalesState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> RestResult<Json<SummaryStats>> {
    let filters = params::filter_criteria(&pairs, false)?;
    let stats = run(&state, move |engine| engine.summary(&filters)).await?;
    Ok(Json(stats))
}

async fn filter_options_handler(
    State(state): State<Arc<SalesState>>,
) -> RestResult<Json<FilterOptions>> {
    let options = run(&state, |engine| engine.filter_options()).await?;
    Ok(Json(options))
}

// ==================
// Service Routes
// ==================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `/` and `/health`
pub fn service_routes() -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
}

async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Sales Management API".to_string(),
    })
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
