//! Normalized dataset for salesdb
//!
//! The dataset is produced once at startup and is read-only afterwards.
//! Query code assumes every field is present and typed; all cleaning
//! happens here, in the loader.

mod errors;
mod loader;
mod record;

pub use errors::{DatasetError, DatasetResult};
pub use loader::{load_csv, normalize_header, read_csv};
pub use record::{split_tokens, CategoricalField, Transaction, TransactionField};
