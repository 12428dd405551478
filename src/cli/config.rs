//! Configuration file
//!
//! ```json
//! {
//!   "backend": { "kind": "memory", "csv_path": "./sales.csv" },
//!   "http": { "host": "0.0.0.0", "port": 8000, "cors_origins": ["http://localhost:3000"] },
//!   "log_filter": "salesdb=info"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;

use super::args::{BackendKind, SourceArgs};
use super::errors::{CliError, CliResult};

/// Which backend to open and where its data lives
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,

    /// Flat file for the memory backend
    #[serde(default)]
    pub csv_path: Option<PathBuf>,

    /// JSON-lines file for the document backend
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub http: HttpServerConfig,

    /// Default tracing filter; `RUST_LOG` takes precedence
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "salesdb=info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            http: HttpServerConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load configuration from file.
    ///
    /// Not validated: command-line overrides may still supply a data path.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    /// Config file plus command-line overrides.
    ///
    /// A missing file is only acceptable when a data path was given on the
    /// command line.
    pub fn resolve(source: &SourceArgs) -> CliResult<Self> {
        let mut config = if source.config.exists() {
            Self::load(&source.config)?
        } else if source.csv.is_some() || source.store.is_some() {
            let mut config = Config::default();
            if source.csv.is_none() {
                config.backend.kind = BackendKind::Document;
            }
            config
        } else {
            return Err(CliError::config_error(format!(
                "Config file {} not found; pass --csv or --store to run without one",
                source.config.display()
            )));
        };

        if let Some(kind) = source.backend {
            config.backend.kind = kind;
        }
        if let Some(csv) = &source.csv {
            config.backend.csv_path = Some(csv.clone());
        }
        if let Some(store) = &source.store {
            config.backend.store_path = Some(store.clone());
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks that the selected backend has a data path
    pub fn validate(&self) -> CliResult<()> {
        match self.backend.kind {
            BackendKind::Memory if self.backend.csv_path.is_none() => {
                return Err(CliError::config_error(
                    "backend.kind 'memory' requires backend.csv_path",
                ));
            }
            BackendKind::Document if self.backend.store_path.is_none() => {
                return Err(CliError::config_error(
                    "backend.kind 'document' requires backend.store_path",
                ));
            }
            _ => {}
        }

        if self.log_filter.trim().is_empty() {
            return Err(CliError::config_error("log_filter must not be empty"));
        }

        if self.http.port == 0 {
            return Err(CliError::config_error("http.port must be > 0"));
        }

        Ok(())
    }
}
