//! CLI argument definitions using clap
//!
//! Commands:
//! - salesdb serve --config <path> [--port N] [--backend memory|document]
//! - salesdb import --csv <path> --out <path> [--batch-size N]
//! - salesdb query --config <path> list|summary|options [filters]

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::query::{FilterCriteria, SortSpec, DEFAULT_PAGE_SIZE};

/// salesdb - query service over a sales transaction dataset
#[derive(Parser, Debug)]
#[command(name = "salesdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API
    Serve {
        #[command(flatten)]
        source: SourceArgs,

        /// Port override
        #[arg(long)]
        port: Option<u16>,
    },

    /// Normalize a CSV export into a JSON-lines document store
    Import {
        /// CSV file to read
        #[arg(long)]
        csv: PathBuf,

        /// Document store file to write
        #[arg(long)]
        out: PathBuf,

        /// Documents per batch
        #[arg(long, default_value_t = crate::backend::document::DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },

    /// Run one query, print the JSON result and exit
    Query {
        #[command(flatten)]
        source: SourceArgs,

        #[command(subcommand)]
        kind: QueryKind,
    },
}

/// Storage backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Memory,
    Document,
}

/// Where the dataset comes from
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Path to configuration file
    #[arg(long, default_value = "./salesdb.json")]
    pub config: PathBuf,

    /// Backend override
    #[arg(long, value_enum)]
    pub backend: Option<BackendKind>,

    /// CSV path override (memory backend)
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Document store path override (document backend)
    #[arg(long)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum QueryKind {
    /// Paginated transaction listing
    List(ListArgs),
    /// Totals over the filtered set
    Summary(FilterArgs),
    /// Distinct values for filter controls
    Options,
}

/// Filter flags; list flags may be repeated
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long = "region")]
    pub regions: Vec<String>,

    #[arg(long = "gender")]
    pub genders: Vec<String>,

    #[arg(long = "category")]
    pub categories: Vec<String>,

    #[arg(long = "tag")]
    pub tags: Vec<String>,

    #[arg(long = "payment")]
    pub payment_methods: Vec<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub age_min: Option<i64>,

    #[arg(long, allow_hyphen_values = true)]
    pub age_max: Option<i64>,

    #[arg(long)]
    pub date_from: Option<String>,

    #[arg(long)]
    pub date_to: Option<String>,
}

impl FilterArgs {
    pub fn to_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search: self.search.clone(),
            customer_regions: self.regions.clone(),
            genders: self.genders.clone(),
            product_categories: self.categories.clone(),
            tags: self.tags.clone(),
            payment_methods: self.payment_methods.clone(),
            age_min: self.age_min,
            age_max: self.age_max,
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// date, quantity or customer_name
    #[arg(long, default_value = "date")]
    pub sort_by: String,

    /// asc or desc
    #[arg(long, default_value = "desc")]
    pub sort_order: String,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,
}

impl ListArgs {
    pub fn sort(&self) -> SortSpec {
        SortSpec::parse(&self.sort_by, &self.sort_order)
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
