//! Query engine facade
//!
//! Execution flow for a listing (strict order):
//! 1. Validate ranges and build the predicate
//! 2. Backend selects, stable-sorts and windows the matches
//! 3. Compute total pages
//! 4. Apply display casing to the returned rows
//!
//! Summaries and filter options skip sorting and paging entirely.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::backend::SalesBackend;
use crate::dataset::CategoricalField;
use crate::query::{
    display_case, format_transaction, total_pages, FilterCriteria, FilterOptions,
    FilterPredicate, ListRequest, QueryResult, SummaryStats, TransactionPage,
};

/// One contract over whichever backend was injected at startup
#[derive(Clone)]
pub struct QueryEngine {
    backend: Arc<dyn SalesBackend>,
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl QueryEngine {
    pub fn new(backend: Arc<dyn SalesBackend>) -> Self {
        Self { backend }
    }

    /// Name of the active backend
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Releases the backend's dataset. Later requests fail.
    pub fn shutdown(&self) -> QueryResult<()> {
        self.backend.release()
    }

    /// Paginated, sorted, display-formatted listing.
    ///
    /// Same request + same dataset = same page.
    pub fn list_transactions(&self, request: &ListRequest) -> QueryResult<TransactionPage> {
        // Step 1: validation happens inside build, before any data access
        let predicate = FilterPredicate::build(&request.filters)?;
        debug!(
            backend = self.backend.name(),
            sort_by = request.sort.field.as_str(),
            sort_order = request.sort.direction.as_str(),
            page = request.page.page(),
            page_size = request.page.page_size(),
            "listing transactions"
        );

        // Step 2
        let selection = self
            .backend
            .select(&predicate, &request.sort, &request.page)?;

        if let Some(term) = &predicate.search {
            info!(search = term.raw(), hits = selection.total, "search complete");
        }

        // Steps 3-4
        let page_size = request.page.page_size();
        let page = TransactionPage {
            transactions: selection.rows.iter().map(format_transaction).collect(),
            total: selection.total,
            page: request.page.page(),
            page_size,
            total_pages: total_pages(selection.total, page_size),
        };

        info!(
            total = page.total,
            returned = page.transactions.len(),
            page = page.page,
            "transactions listed"
        );
        Ok(page)
    }

    /// Totals over the full filtered set
    pub fn summary(&self, filters: &FilterCriteria) -> QueryResult<SummaryStats> {
        let predicate = FilterPredicate::build(filters)?;
        let stats = self.backend.aggregate(&predicate)?;
        info!(
            records = stats.total_sales_records,
            units = stats.total_units_sold,
            "summary computed"
        );
        Ok(stats)
    }

    /// Distinct display-cased values over the whole dataset
    pub fn filter_options(&self) -> QueryResult<FilterOptions> {
        let field = |f: CategoricalField| -> QueryResult<Vec<String>> {
            Ok(display_sorted(self.backend.distinct_values(f)?))
        };

        let options = FilterOptions {
            customer_regions: field(CategoricalField::CustomerRegion)?,
            genders: field(CategoricalField::Gender)?,
            product_categories: field(CategoricalField::ProductCategory)?,
            payment_methods: field(CategoricalField::PaymentMethod)?,
            tags: display_sorted(self.backend.distinct_tags()?),
        };
        debug!(
            regions = options.customer_regions.len(),
            tags = options.tags.len(),
            "filter options enumerated"
        );
        Ok(options)
    }
}

/// Formats, dedupes and sorts on the formatted value
fn display_sorted(values: Vec<String>) -> Vec<String> {
    values
        .iter()
        .map(|v| display_case(v))
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
