//! Query subsystem for salesdb
//!
//! Backend-independent pieces of the query engine.
//!
//! # Request Flow (strict order)
//!
//! 1. Validate age/date ranges
//! 2. Normalize criteria into a [`FilterPredicate`]
//! 3. Backend selects matching rows (scan + mask, or document query)
//! 4. Stable sort
//! 5. Page window
//! 6. Display formatting
//!
//! # Invariants
//!
//! - Validation happens before any data is touched
//! - Same request + same dataset = same result, byte for byte

mod criteria;
mod errors;
mod format;
mod pagination;
mod predicate;
mod result;
mod search;
mod sorter;
mod validation;

pub use criteria::{
    FilterCriteria, ListRequest, PageRequest, SortDirection, SortField, SortSpec,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use errors::{QueryError, QueryErrorCode, QueryResult, Severity};
pub use format::{display_case, display_tags, format_transaction};
pub use pagination::{total_pages, PageWindow};
pub use predicate::{normalize_list, record_has_any_tag, FilterPredicate};
pub use result::{FilterOptions, Selection, SummaryStats, TransactionPage};
pub use search::{digits_only, SearchTerm, TEXT_SEARCH_FIELDS};
pub use sorter::{compare_keys, ResultSorter, SortKey};
pub use validation::{validate_ranges, AGE_BOUNDS};
