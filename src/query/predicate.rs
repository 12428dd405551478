//! Filter predicate construction
//!
//! Turns raw [`FilterCriteria`] into a validated, normalized, statically
//! typed predicate. Backends either evaluate it directly (row mask) or
//! translate it into their own query language; the composition is always
//!
//! `AND(region, gender, category, payment, age, date, OR(tags), OR(search))`

use std::collections::BTreeSet;

use crate::dataset::{CategoricalField, Transaction};

use super::criteria::FilterCriteria;
use super::errors::QueryResult;
use super::search::SearchTerm;
use super::validation::validate_ranges;

/// Validated predicate over transactions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPredicate {
    pub customer_regions: Option<BTreeSet<String>>,
    pub genders: Option<BTreeSet<String>>,
    pub product_categories: Option<BTreeSet<String>>,
    pub payment_methods: Option<BTreeSet<String>>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    /// Matches if any tag is a whole token of the record's tag list
    pub tags: Option<BTreeSet<String>>,
    pub search: Option<SearchTerm>,
}

impl FilterPredicate {
    /// Validates ranges, then normalizes every dimension.
    pub fn build(criteria: &FilterCriteria) -> QueryResult<Self> {
        validate_ranges(criteria)?;

        Ok(Self {
            customer_regions: normalize_list(&criteria.customer_regions),
            genders: normalize_list(&criteria.genders),
            product_categories: normalize_list(&criteria.product_categories),
            payment_methods: normalize_list(&criteria.payment_methods),
            // validated to 0..=150
            age_min: criteria.age_min.map(|v| v as u32),
            age_max: criteria.age_max.map(|v| v as u32),
            date_from: normalize_date(criteria.date_from.as_deref()),
            date_to: normalize_date(criteria.date_to.as_deref()),
            tags: normalize_list(&criteria.tags),
            search: SearchTerm::parse(criteria.search.as_deref()),
        })
    }

    /// Set constraint for a categorical dimension, if any
    pub fn categorical(&self, field: CategoricalField) -> Option<&BTreeSet<String>> {
        match field {
            CategoricalField::CustomerRegion => self.customer_regions.as_ref(),
            CategoricalField::Gender => self.genders.as_ref(),
            CategoricalField::ProductCategory => self.product_categories.as_ref(),
            CategoricalField::PaymentMethod => self.payment_methods.as_ref(),
        }
    }

    /// True when no dimension constrains the result
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }

    /// Evaluates the predicate against one record.
    pub fn matches(&self, record: &Transaction) -> bool {
        for field in CategoricalField::ALL {
            if let Some(allowed) = self.categorical(field) {
                if !allowed.contains(&field.value(record).to_lowercase()) {
                    return false;
                }
            }
        }

        if self.age_min.is_some_and(|min| record.age < min)
            || self.age_max.is_some_and(|max| record.age > max)
        {
            return false;
        }

        if let Some(from) = &self.date_from {
            if record.date.as_str() < from.as_str() {
                return false;
            }
        }
        if let Some(to) = &self.date_to {
            if record.date.as_str() > to.as_str() {
                return false;
            }
        }

        if let Some(tags) = &self.tags {
            if !record_has_any_tag(record, tags) {
                return false;
            }
        }

        match &self.search {
            Some(term) => term.matches(record),
            None => true,
        }
    }
}

/// Whole-token tag membership
pub fn record_has_any_tag(record: &Transaction, tags: &BTreeSet<String>) -> bool {
    record
        .tag_tokens()
        .any(|token| tags.contains(&token.to_lowercase()))
}

/// Trims, lower-cases and drops blanks; an empty result means no filter.
pub fn normalize_list(values: &[String]) -> Option<BTreeSet<String>> {
    let set: BTreeSet<String> = values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect();
    (!set.is_empty()).then_some(set)
}

fn normalize_date(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
