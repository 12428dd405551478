//! Free-text search matching
//!
//! A record matches a search term if any clause holds:
//! - case-insensitive substring of one of [`TEXT_SEARCH_FIELDS`]
//! - the term's digits equal the transaction id
//! - the term's digits appear in the raw or digit-only phone number
//!
//! Digit clauses only apply when the term contains at least one digit.

use crate::dataset::{Transaction, TransactionField};

/// Fields matched by case-insensitive substring
pub const TEXT_SEARCH_FIELDS: [TransactionField; 12] = [
    TransactionField::CustomerName,
    TransactionField::ProductName,
    TransactionField::EmployeeName,
    TransactionField::StoreLocation,
    TransactionField::Brand,
    TransactionField::CustomerType,
    TransactionField::OrderStatus,
    TransactionField::DeliveryType,
    TransactionField::CustomerId,
    TransactionField::ProductId,
    TransactionField::StoreId,
    TransactionField::SalespersonId,
];

/// A parsed, non-empty search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    lowered: String,
    digits: Option<String>,
}

impl SearchTerm {
    /// Returns `None` for absent or blank input.
    pub fn parse(input: Option<&str>) -> Option<Self> {
        let raw = input?.trim();
        if raw.is_empty() {
            return None;
        }
        let digits = digits_only(raw);
        Some(Self {
            raw: raw.to_string(),
            lowered: raw.to_lowercase(),
            digits: (!digits.is_empty()).then_some(digits),
        })
    }

    /// Trimmed input as given
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Lower-cased term used for substring clauses
    pub fn lowered(&self) -> &str {
        &self.lowered
    }

    /// Digit substring, if the term has any digits
    pub fn digits(&self) -> Option<&str> {
        self.digits.as_deref()
    }

    pub fn matches(&self, record: &Transaction) -> bool {
        let text_hit = TEXT_SEARCH_FIELDS.iter().any(|field| {
            record
                .text(*field)
                .is_some_and(|value| value.to_lowercase().contains(&self.lowered))
        });
        if text_hit {
            return true;
        }

        match &self.digits {
            Some(digits) => {
                record.transaction_id.to_string() == *digits
                    || record.phone_number.contains(digits.as_str())
                    || digits_only(&record.phone_number).contains(digits.as_str())
            }
            None => false,
        }
    }
}

/// Removes every non-digit character
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}
