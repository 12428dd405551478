//! Query documents for the document collection
//!
//! A [`DocFilter`] is a typed filter tree evaluated directly against JSON
//! documents. It renders to a Mongo-style query document for logging and
//! explain output; evaluation never goes through that rendering.

use std::collections::BTreeSet;

use regex::Regex;
use serde_json::{json, Map, Value};

use crate::dataset::{CategoricalField, TransactionField};
use crate::query::{digits_only, FilterPredicate, QueryError, QueryResult, TEXT_SEARCH_FIELDS};

/// Filter over JSON documents
#[derive(Debug, Clone)]
pub enum DocFilter {
    /// All children match; empty matches everything
    And(Vec<DocFilter>),
    /// Any child matches; empty matches nothing
    Or(Vec<DocFilter>),
    /// Lower-cased string value is one of `values`
    In {
        field: TransactionField,
        values: BTreeSet<String>,
    },
    /// Inclusive range; numbers compare numerically, strings lexicographically
    Range {
        field: TransactionField,
        gte: Option<Value>,
        lte: Option<Value>,
    },
    /// Case-insensitive substring; `needle` is lower-case
    Contains {
        field: TransactionField,
        needle: String,
    },
    /// Decimal text of the value equals `text`
    TextEquals {
        field: TransactionField,
        text: String,
    },
    /// Digit-only form of the value contains `digits`
    DigitsContains {
        field: TransactionField,
        digits: String,
    },
    /// Value is a comma-separated list containing `token` as a whole entry
    TokenMatch {
        field: TransactionField,
        pattern: Regex,
    },
}

impl DocFilter {
    /// Filter that matches every document
    pub fn all() -> Self {
        DocFilter::And(Vec::new())
    }

    /// Translates a validated predicate into a query document.
    pub fn from_predicate(predicate: &FilterPredicate) -> QueryResult<Self> {
        let mut clauses = Vec::new();

        for field in CategoricalField::ALL {
            if let Some(values) = predicate.categorical(field) {
                clauses.push(DocFilter::In {
                    field: field.field(),
                    values: values.clone(),
                });
            }
        }

        if predicate.age_min.is_some() || predicate.age_max.is_some() {
            clauses.push(DocFilter::Range {
                field: TransactionField::Age,
                gte: predicate.age_min.map(Value::from),
                lte: predicate.age_max.map(Value::from),
            });
        }

        if predicate.date_from.is_some() || predicate.date_to.is_some() {
            clauses.push(DocFilter::Range {
                field: TransactionField::Date,
                gte: predicate.date_from.clone().map(Value::String),
                lte: predicate.date_to.clone().map(Value::String),
            });
        }

        if let Some(tags) = &predicate.tags {
            let mut any_tag = Vec::with_capacity(tags.len());
            for tag in tags {
                any_tag.push(DocFilter::token_match(TransactionField::Tags, tag)?);
            }
            clauses.push(DocFilter::Or(any_tag));
        }

        if let Some(term) = &predicate.search {
            let mut any = Vec::new();
            for field in TEXT_SEARCH_FIELDS {
                any.push(DocFilter::Contains {
                    field,
                    needle: term.lowered().to_string(),
                });
            }
            if let Some(digits) = term.digits() {
                any.push(DocFilter::TextEquals {
                    field: TransactionField::TransactionId,
                    text: digits.to_string(),
                });
                any.push(DocFilter::Contains {
                    field: TransactionField::PhoneNumber,
                    needle: digits.to_string(),
                });
                any.push(DocFilter::DigitsContains {
                    field: TransactionField::PhoneNumber,
                    digits: digits.to_string(),
                });
            }
            clauses.push(DocFilter::Or(any));
        }

        Ok(DocFilter::And(clauses))
    }

    /// Whole-token match inside a comma-separated list, case-insensitive
    pub fn token_match(field: TransactionField, token: &str) -> QueryResult<Self> {
        let pattern = format!(r"(?i)(^|,)\s*{}\s*(,|$)", regex::escape(token));
        let pattern = Regex::new(&pattern)
            .map_err(|e| QueryError::query_failed(format!("Invalid tag pattern: {}", e)))?;
        Ok(DocFilter::TokenMatch { field, pattern })
    }

    /// Evaluates the filter against one document.
    pub fn matches(&self, document: &Value) -> bool {
        match self {
            DocFilter::And(children) => children.iter().all(|c| c.matches(document)),
            DocFilter::Or(children) => children.iter().any(|c| c.matches(document)),
            DocFilter::In { field, values } => string_value(document, *field)
                .is_some_and(|v| values.contains(&v.to_lowercase())),
            DocFilter::Range { field, gte, lte } => match field_value(document, *field) {
                Some(actual) => {
                    gte.as_ref().map_or(true, |b| compare(actual, b).is_some_and(|o| o.is_ge()))
                        && lte
                            .as_ref()
                            .map_or(true, |b| compare(actual, b).is_some_and(|o| o.is_le()))
                }
                None => false,
            },
            DocFilter::Contains { field, needle } => text_value(document, *field)
                .is_some_and(|v| v.to_lowercase().contains(needle.as_str())),
            DocFilter::TextEquals { field, text } => {
                text_value(document, *field).is_some_and(|v| v == *text)
            }
            DocFilter::DigitsContains { field, digits } => text_value(document, *field)
                .is_some_and(|v| digits_only(&v).contains(digits.as_str())),
            DocFilter::TokenMatch { field, pattern } => {
                string_value(document, *field).is_some_and(|v| pattern.is_match(v))
            }
        }
    }

    /// Top-level date bounds, used to pick candidates from the date index
    pub fn date_bounds(&self) -> Option<(Option<&str>, Option<&str>)> {
        let DocFilter::And(children) = self else {
            return None;
        };
        children.iter().find_map(|child| match child {
            DocFilter::Range {
                field: TransactionField::Date,
                gte,
                lte,
            } => Some((
                gte.as_ref().and_then(Value::as_str),
                lte.as_ref().and_then(Value::as_str),
            )),
            _ => None,
        })
    }

    /// Mongo-style rendering for logs
    pub fn to_document(&self) -> Value {
        match self {
            DocFilter::And(children) if children.is_empty() => json!({}),
            DocFilter::And(children) => {
                json!({ "$and": children.iter().map(DocFilter::to_document).collect::<Vec<_>>() })
            }
            DocFilter::Or(children) => {
                json!({ "$or": children.iter().map(DocFilter::to_document).collect::<Vec<_>>() })
            }
            DocFilter::In { field, values } => json!({ field.name(): { "$in": values } }),
            DocFilter::Range { field, gte, lte } => {
                let mut ops = Map::new();
                if let Some(v) = gte {
                    ops.insert("$gte".into(), v.clone());
                }
                if let Some(v) = lte {
                    ops.insert("$lte".into(), v.clone());
                }
                json!({ field.name(): ops })
            }
            DocFilter::Contains { field, needle } => json!({
                field.name(): { "$regex": regex::escape(needle), "$options": "i" }
            }),
            DocFilter::TextEquals { field, text } => json!({
                "$expr": { "$eq": [{ "$toString": format!("${}", field.name()) }, text] }
            }),
            DocFilter::DigitsContains { field, digits } => json!({
                field.name(): { "$digitsContain": digits }
            }),
            DocFilter::TokenMatch { field, pattern } => json!({
                field.name(): { "$regex": pattern.as_str() }
            }),
        }
    }
}

fn field_value(document: &Value, field: TransactionField) -> Option<&Value> {
    document.get(field.name()).filter(|v| !v.is_null())
}

fn string_value(document: &Value, field: TransactionField) -> Option<&str> {
    field_value(document, field).and_then(Value::as_str)
}

/// Strings as-is, numbers in decimal form
fn text_value(document: &Value, field: TransactionField) -> Option<String> {
    match field_value(document, field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Same-type comparison only; mixed types never compare
fn compare(actual: &Value, bound: &Value) -> Option<std::cmp::Ordering> {
    match (actual, bound) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
        _ => None,
    }
}
