//! Document-store backend
//!
//! Translates each request into a [`DocFilter`] and, for summaries, an
//! aggregation pipeline, then runs them against an embedded
//! [`DocumentCollection`] persisted as JSON lines.

mod collection;
mod pipeline;
mod query;

pub use collection::{document_sort_key, DocumentCollection, ImportReport, DEFAULT_BATCH_SIZE};
pub use pipeline::{Accumulator, GroupSpec, Stage};
pub use query::DocFilter;

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::{debug, warn};

use crate::dataset::{split_tokens, CategoricalField, Transaction, TransactionField};
use crate::query::{
    FilterPredicate, PageRequest, PageWindow, QueryError, QueryResult, Selection, SortSpec,
    SummaryStats,
};

use super::handle::StoreHandle;
use super::SalesBackend;

/// Backend over an embedded document collection
#[derive(Debug)]
pub struct DocumentBackend {
    collection: StoreHandle<DocumentCollection>,
}

impl DocumentBackend {
    pub const NAME: &'static str = "document";

    pub fn new(collection: DocumentCollection) -> Self {
        Self {
            collection: StoreHandle::attached(Self::NAME, collection),
        }
    }

    pub fn detached() -> Self {
        Self {
            collection: StoreHandle::detached(Self::NAME),
        }
    }

    /// Pipeline computing the summary totals over `filter`
    pub fn summary_pipeline(filter: DocFilter) -> Vec<Stage> {
        vec![
            Stage::Match(filter),
            Stage::Group(
                GroupSpec::all()
                    .with_output("total_units_sold", Accumulator::Sum(TransactionField::Quantity))
                    .with_output("total_amount", Accumulator::Sum(TransactionField::TotalAmount))
                    .with_output(
                        "total_discount",
                        Accumulator::SumDifference(
                            TransactionField::TotalAmount,
                            TransactionField::FinalAmount,
                        ),
                    )
                    .with_output("total_sales_records", Accumulator::Count),
            ),
        ]
    }
}

/// Distinct trimmed, non-empty string values of `field`, ascending.
///
/// Runs a `$group` keyed on the field and reads back the group ids.
fn distinct_strings(collection: &DocumentCollection, field: TransactionField) -> Vec<String> {
    let groups = collection.aggregate(&[Stage::Group(GroupSpec::by(field))]);
    let values: BTreeSet<String> = groups
        .iter()
        .filter_map(|group| group.get("_id").and_then(Value::as_str))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    values.into_iter().collect()
}

/// Decodes a stored document, or explains why it cannot be.
fn to_transaction(document: &Value) -> QueryResult<Transaction> {
    let id = document
        .get(TransactionField::TransactionId.name())
        .map(Value::to_string)
        .unwrap_or_else(|| "<no id>".to_string());
    serde_json::from_value(document.clone())
        .map_err(|e| QueryError::conversion_failed(id, e.to_string()))
}

impl SalesBackend for DocumentBackend {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn select(
        &self,
        predicate: &FilterPredicate,
        sort: &SortSpec,
        page: &PageRequest,
    ) -> QueryResult<Selection> {
        let collection = self.collection.acquire()?;
        let filter = DocFilter::from_predicate(predicate)?;
        debug!(query = %filter.to_document(), sort = sort.field.as_str(), "document find");

        let (total, documents) = collection.find(&filter, sort, PageWindow::for_request(page));

        let mut rows = Vec::with_capacity(documents.len());
        for document in documents {
            match to_transaction(document) {
                Ok(record) => rows.push(record),
                Err(e) => warn!(error = %e, "skipping unconvertible document"),
            }
        }

        Ok(Selection { total, rows })
    }

    fn aggregate(&self, predicate: &FilterPredicate) -> QueryResult<SummaryStats> {
        let collection = self.collection.acquire()?;
        let stages = Self::summary_pipeline(DocFilter::from_predicate(predicate)?);
        let rendered = Value::Array(stages.iter().map(Stage::to_document).collect());
        debug!(pipeline = %rendered, "document aggregate");

        let Some(group) = collection.aggregate(&stages).into_iter().next() else {
            return Ok(SummaryStats::default());
        };
        let number = |key: &str| group.get(key).and_then(Value::as_f64).unwrap_or(0.0);

        Ok(SummaryStats {
            total_units_sold: number("total_units_sold").round() as u64,
            total_amount: number("total_amount"),
            total_discount: number("total_discount"),
            total_sales_records: group
                .get("total_sales_records")
                .and_then(Value::as_u64)
                .unwrap_or(0),
        })
    }

    fn distinct_values(&self, field: CategoricalField) -> QueryResult<Vec<String>> {
        let collection = self.collection.acquire()?;
        Ok(distinct_strings(&collection, field.field()))
    }

    fn distinct_tags(&self) -> QueryResult<Vec<String>> {
        let collection = self.collection.acquire()?;
        let tokens: BTreeSet<String> = distinct_strings(&collection, TransactionField::Tags)
            .iter()
            .flat_map(|list| split_tokens(list).map(str::to_string).collect::<Vec<_>>())
            .collect();
        Ok(tokens.into_iter().collect())
    }

    fn release(&self) -> QueryResult<()> {
        self.collection.release().map(|_| ())
    }
}
