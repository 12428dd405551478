//! Result types returned by the query engine

use serde::{Deserialize, Serialize};

use crate::dataset::Transaction;

/// One page of matching transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    /// Matching records across all pages
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl TransactionPage {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Aggregates over the full filtered set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_units_sold: u64,
    pub total_amount: f64,
    /// Sum of `total_amount - final_amount`
    pub total_discount: f64,
    pub total_sales_records: u64,
}

impl SummaryStats {
    /// Folds one record into the running totals
    pub fn accumulate(&mut self, record: &Transaction) {
        self.total_units_sold += u64::from(record.quantity);
        self.total_amount += record.total_amount;
        self.total_discount += record.discount_amount();
        self.total_sales_records += 1;
    }
}

/// Distinct, display-cased values for building filter controls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub customer_regions: Vec<String>,
    pub genders: Vec<String>,
    pub product_categories: Vec<String>,
    pub payment_methods: Vec<String>,
    pub tags: Vec<String>,
}

/// Rows selected by a backend for one page, before formatting
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub total: u64,
    pub rows: Vec<Transaction>,
}
