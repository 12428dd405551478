//! CLI command implementations
//!
//! Startup order for every command that queries:
//! 1. Resolve configuration (file + flags)
//! 2. Initialise tracing
//! 3. Load the dataset into the configured backend
//! 4. Hand the backend to a [`QueryEngine`]

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::backend::{DocumentBackend, DocumentCollection, MemoryBackend, SalesBackend};
use crate::dataset::load_csv;
use crate::engine::QueryEngine;
use crate::http_server::HttpServer;
use crate::query::{ListRequest, PageRequest};

use super::args::{BackendKind, Cli, Command, QueryKind, SourceArgs};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { source, port } => serve(&source, port),
        Command::Import {
            csv,
            out,
            batch_size,
        } => import(&csv, &out, batch_size),
        Command::Query { source, kind } => query(&source, kind),
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides `default_filter`.
///
/// Logs go to stderr so stdout stays machine-readable.
pub fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    // a second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Loads the configured dataset and wraps it in an engine
pub fn open_engine(config: &Config) -> CliResult<QueryEngine> {
    let backend: Arc<dyn SalesBackend> = match config.backend.kind {
        BackendKind::Memory => {
            let path = config
                .backend
                .csv_path
                .as_deref()
                .ok_or_else(|| CliError::config_error("backend.csv_path is not set"))?;
            Arc::new(MemoryBackend::new(load_csv(path)?))
        }
        BackendKind::Document => {
            let path = config
                .backend
                .store_path
                .as_deref()
                .ok_or_else(|| CliError::config_error("backend.store_path is not set"))?;
            Arc::new(DocumentBackend::new(DocumentCollection::open(path)?))
        }
    };
    info!(backend = backend.name(), "query engine ready");
    Ok(QueryEngine::new(backend))
}

/// Start the HTTP API and serve until Ctrl+C
pub fn serve(source: &SourceArgs, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::resolve(source)?;
    if let Some(port) = port {
        config.http.port = port;
    }
    init_tracing(&config.log_filter);

    let engine = open_engine(&config)?;
    let server = HttpServer::new(engine.clone(), config.http.clone());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    let served = rt.block_on(async {
        server
            .start(shutdown_signal())
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    });

    engine.shutdown()?;
    info!("dataset released");
    served
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received, stopping"),
        // without a signal handler the server runs until killed
        Err(e) => {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await
        }
    }
}

/// Normalize a CSV export and write it as a document store
pub fn import(csv: &Path, out: &Path, batch_size: usize) -> CliResult<()> {
    init_tracing("salesdb=info");
    let records = load_csv(csv)?;
    let report = DocumentCollection::import(out, &records, batch_size)?;
    write_response(&serde_json::json!({
        "inserted": report.inserted,
        "duplicate_ids": report.duplicate_ids,
        "path": out.display().to_string(),
    }))
}

/// Execute a single query and print the JSON result
pub fn query(source: &SourceArgs, kind: QueryKind) -> CliResult<()> {
    let config = Config::resolve(source)?;
    init_tracing(&config.log_filter);
    let engine = open_engine(&config)?;

    let outcome = match kind {
        QueryKind::List(args) => PageRequest::new(args.page, args.page_size)
            .map(|page| ListRequest::new(args.filters.to_criteria(), args.sort(), page))
            .and_then(|request| engine.list_transactions(&request))
            .map(|page| serde_json::to_value(page)),
        QueryKind::Summary(filters) => engine
            .summary(&filters.to_criteria())
            .map(|stats| serde_json::to_value(stats)),
        QueryKind::Options => engine
            .filter_options()
            .map(|options| serde_json::to_value(options)),
    };

    match outcome {
        Ok(value) => write_response(&value?),
        Err(e) => {
            write_error(e.code().code(), e.message())?;
            Err(e.into())
        }
    }
}
