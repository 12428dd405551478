//! Flat-file loader
//!
//! Reads the raw CSV export once at startup and produces fully typed,
//! normalized [`Transaction`] records:
//!
//! - header names lower-cased, spaces replaced by `_`
//! - every value trimmed, literal `nan`/`NaN` treated as empty
//! - categorical fields and tags lower-cased
//! - unparseable or missing numbers become zero

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use super::errors::{DatasetError, DatasetResult};
use super::record::{Transaction, TransactionField};

/// Rows between progress log lines
const PROGRESS_INTERVAL: usize = 10_000;

/// Loads and normalizes a CSV file.
pub fn load_csv(path: &Path) -> DatasetResult<Vec<Transaction>> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }
    info!(path = %path.display(), "loading CSV dataset");
    let file = File::open(path)?;
    let records = read_csv(file)?;
    info!(records = records.len(), "CSV dataset loaded");
    Ok(records)
}

/// Reads and normalizes CSV data from any reader.
pub fn read_csv<R: Read>(reader: R) -> DatasetResult<Vec<Transaction>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let columns: HashMap<TransactionField, usize> = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| {
            TransactionField::from_name(&normalize_header(header)).map(|f| (f, idx))
        })
        .collect();

    for field in TransactionField::ALL {
        if !columns.contains_key(&field) {
            debug!(column = field.name(), "column missing from CSV, using defaults");
        }
    }

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let cell = |field: TransactionField| {
            columns
                .get(&field)
                .and_then(|idx| row.get(*idx))
                .unwrap_or("")
        };
        records.push(normalize_row(cell));

        if records.len() % PROGRESS_INTERVAL == 0 {
            debug!(loaded = records.len(), "CSV load progress");
        }
    }

    Ok(records)
}

/// Builds a record from raw cell values
fn normalize_row<'a>(cell: impl Fn(TransactionField) -> &'a str) -> Transaction {
    use TransactionField as F;
    let text = |field: F| clean_text(cell(field), field.is_lowercased());

    Transaction {
        transaction_id: parse_count(cell(F::TransactionId)),
        date: text(F::Date),
        customer_id: text(F::CustomerId),
        customer_name: text(F::CustomerName),
        phone_number: text(F::PhoneNumber),
        gender: text(F::Gender),
        age: parse_count(cell(F::Age)).min(u64::from(u32::MAX)) as u32,
        customer_region: text(F::CustomerRegion),
        customer_type: text(F::CustomerType),
        product_id: text(F::ProductId),
        product_name: text(F::ProductName),
        brand: text(F::Brand),
        product_category: text(F::ProductCategory),
        tags: text(F::Tags),
        quantity: parse_count(cell(F::Quantity)).min(u64::from(u32::MAX)) as u32,
        price_per_unit: parse_amount(cell(F::PricePerUnit)),
        discount_percentage: parse_amount(cell(F::DiscountPercentage)),
        total_amount: parse_amount(cell(F::TotalAmount)),
        final_amount: parse_amount(cell(F::FinalAmount)),
        payment_method: text(F::PaymentMethod),
        order_status: text(F::OrderStatus),
        delivery_type: text(F::DeliveryType),
        store_id: text(F::StoreId),
        store_location: text(F::StoreLocation),
        salesperson_id: text(F::SalespersonId),
        employee_name: text(F::EmployeeName),
    }
}

/// `"Customer Region"` -> `"customer_region"`
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

fn clean_text(raw: &str, lowercase: bool) -> String {
    let trimmed = raw.trim();
    if trimmed == "nan" || trimmed == "NaN" {
        return String::new();
    }
    if lowercase {
        trimmed.to_lowercase()
    } else {
        trimmed.to_string()
    }
}

/// Non-negative integer; accepts `"5"` and `"5.0"`
fn parse_count(raw: &str) -> u64 {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<u64>() {
        return v;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v.trunc() as u64,
        _ => 0,
    }
}

fn parse_amount(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
