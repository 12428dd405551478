//! Storage backends
//!
//! Two interchangeable implementations of [`SalesBackend`]:
//!
//! - [`MemoryBackend`]: full scan over a table loaded from CSV
//! - [`DocumentBackend`]: filter documents and aggregation pipelines over an
//!   embedded JSON-lines collection
//!
//! For the same dataset and request both return identical results. The
//! engine picks one at startup and never inspects which.

pub mod document;
mod handle;
mod memory;

pub use document::{DocumentBackend, DocumentCollection, ImportReport};
pub use memory::MemoryBackend;

use crate::dataset::CategoricalField;
use crate::query::{FilterPredicate, PageRequest, QueryResult, Selection, SortSpec, SummaryStats};

/// Operations every backend provides
pub trait SalesBackend: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Filter, stable sort and page. `total` counts every match.
    fn select(
        &self,
        predicate: &FilterPredicate,
        sort: &SortSpec,
        page: &PageRequest,
    ) -> QueryResult<Selection>;

    /// Totals over every match
    fn aggregate(&self, predicate: &FilterPredicate) -> QueryResult<SummaryStats>;

    /// Distinct non-empty stored values of a categorical field, ascending
    fn distinct_values(&self, field: CategoricalField) -> QueryResult<Vec<String>>;

    /// Distinct tag tokens across all records, ascending
    fn distinct_tags(&self) -> QueryResult<Vec<String>>;

    /// Detaches the dataset; later calls fail with `BackendUnavailable`
    fn release(&self) -> QueryResult<()>;
}
