//! In-memory table backend
//!
//! Holds the normalized records in a `Vec` and answers every request with a
//! full scan. Each request works on a borrowed view of an `Arc` snapshot;
//! the table itself is never mutated.

use std::collections::BTreeSet;

use tracing::debug;

use crate::dataset::{CategoricalField, Transaction};
use crate::query::{
    FilterPredicate, PageRequest, PageWindow, QueryResult, ResultSorter, Selection, SortSpec,
    SummaryStats,
};

use super::handle::StoreHandle;
use super::SalesBackend;

/// Full-scan backend over an in-memory table
#[derive(Debug)]
pub struct MemoryBackend {
    table: StoreHandle<Vec<Transaction>>,
}

impl MemoryBackend {
    pub const NAME: &'static str = "memory";

    /// Backend over an already loaded table
    pub fn new(records: Vec<Transaction>) -> Self {
        Self {
            table: StoreHandle::attached(Self::NAME, records),
        }
    }

    /// Backend with no table attached yet
    pub fn detached() -> Self {
        Self {
            table: StoreHandle::detached(Self::NAME),
        }
    }
}

impl SalesBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn select(
        &self,
        predicate: &FilterPredicate,
        sort: &SortSpec,
        page: &PageRequest,
    ) -> QueryResult<Selection> {
        let table = self.table.acquire()?;

        let matched: Vec<&Transaction> = if predicate.is_unconstrained() {
            table.iter().collect()
        } else {
            table.iter().filter(|t| predicate.matches(t)).collect()
        };
        let total = matched.len() as u64;
        debug!(scanned = table.len(), matched = total, "memory scan complete");

        let sorted = ResultSorter::sort_transactions(matched, sort);
        let rows = PageWindow::for_request(page)
            .apply(sorted)
            .into_iter()
            .cloned()
            .collect();

        Ok(Selection { total, rows })
    }

    fn aggregate(&self, predicate: &FilterPredicate) -> QueryResult<SummaryStats> {
        let table = self.table.acquire()?;
        let mut stats = SummaryStats::default();
        for record in table.iter().filter(|t| predicate.matches(t)) {
            stats.accumulate(record);
        }
        Ok(stats)
    }

    fn distinct_values(&self, field: CategoricalField) -> QueryResult<Vec<String>> {
        let table = self.table.acquire()?;
        let values: BTreeSet<&str> = table
            .iter()
            .map(|t| field.value(t).trim())
            .filter(|v| !v.is_empty())
            .collect();
        Ok(values.into_iter().map(str::to_string).collect())
    }

    fn distinct_tags(&self) -> QueryResult<Vec<String>> {
        let table = self.table.acquire()?;
        let tokens: BTreeSet<&str> = table.iter().flat_map(Transaction::tag_tokens).collect();
        Ok(tokens.into_iter().map(str::to_string).collect())
    }

    fn release(&self) -> QueryResult<()> {
        self.table.release().map(|_| ())
    }
}
