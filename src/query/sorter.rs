//! Result sorting
//!
//! Sorting is stable: ties keep their prior relative order in both
//! directions. Missing keys sort last regardless of direction.

use std::cmp::Ordering;

use crate::dataset::Transaction;

use super::criteria::{SortDirection, SortField, SortSpec};

/// Extracted sort key
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    /// Key for a typed record; `customer_name` sorts case-insensitively.
    pub fn for_transaction(record: &Transaction, field: SortField) -> Self {
        match field {
            SortField::Date => SortKey::Text(record.date.clone()),
            SortField::Quantity => SortKey::Number(f64::from(record.quantity)),
            SortField::CustomerName => SortKey::Text(record.customer_name.to_lowercase()),
        }
    }

    fn cmp_same(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            // numbers before text
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
        }
    }
}

/// Compares two optional keys; `None` is always last.
pub fn compare_keys(a: Option<&SortKey>, b: Option<&SortKey>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match direction {
            SortDirection::Asc => a.cmp_same(b),
            SortDirection::Desc => a.cmp_same(b).reverse(),
        },
    }
}

/// Sorts items by an extracted key
pub struct ResultSorter;

impl ResultSorter {
    /// Stable sort of `items` by `key` according to `spec`.
    pub fn sort<T, F>(items: Vec<T>, spec: &SortSpec, key: F) -> Vec<T>
    where
        F: Fn(&T, SortField) -> Option<SortKey>,
    {
        let mut keyed: Vec<(Option<SortKey>, T)> = items
            .into_iter()
            .map(|item| (key(&item, spec.field), item))
            .collect();

        // slice::sort_by is a stable merge sort
        keyed.sort_by(|(a, _), (b, _)| compare_keys(a.as_ref(), b.as_ref(), spec.direction));

        keyed.into_iter().map(|(_, item)| item).collect()
    }

    /// Sorts borrowed transactions
    pub fn sort_transactions<'a>(
        records: Vec<&'a Transaction>,
        spec: &SortSpec,
    ) -> Vec<&'a Transaction> {
        Self::sort(records, spec, |t, field| Some(SortKey::for_transaction(t, field)))
    }
}
