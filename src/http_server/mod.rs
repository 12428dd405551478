//! # Sales HTTP Server Module
//!
//! Thin axum transport over the query engine.
//!
//! # Endpoints
//!
//! - `/` - Service banner
//! - `/health` - Health check
//! - `/api/sales/transactions` - Filtered, sorted, paginated listing
//! - `/api/sales/summary` - Totals over the filtered set
//! - `/api/sales/filter-options` - Distinct values for filter controls

pub mod config;
pub mod errors;
pub mod params;
pub mod sales_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{RestError, RestResult};
pub use server::HttpServer;
