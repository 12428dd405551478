//! Range validation
//!
//! Runs before any predicate is built, so malformed ranges never reach a
//! backend.

use chrono::NaiveDate;

use super::criteria::FilterCriteria;
use super::errors::{QueryError, QueryResult};

/// Inclusive bounds for `age_min` / `age_max`
pub const AGE_BOUNDS: (i64, i64) = (0, 150);

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validates the age and date ranges of a request.
pub fn validate_ranges(criteria: &FilterCriteria) -> QueryResult<()> {
    validate_age("age_min", criteria.age_min)?;
    validate_age("age_max", criteria.age_max)?;

    if let (Some(min), Some(max)) = (criteria.age_min, criteria.age_max) {
        if min > max {
            return Err(QueryError::invalid_range(format!(
                "Conflicting age range: age_min ({}) cannot be greater than age_max ({})",
                min, max
            )));
        }
    }

    let from = parse_date(criteria.date_from.as_deref())?;
    let to = parse_date(criteria.date_to.as_deref())?;

    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(QueryError::invalid_range(format!(
                "Conflicting date range: date_from ({}) cannot be after date_to ({})",
                from, to
            )));
        }
    }

    Ok(())
}

fn validate_age(name: &str, value: Option<i64>) -> QueryResult<()> {
    match value {
        Some(v) if v < AGE_BOUNDS.0 || v > AGE_BOUNDS.1 => Err(QueryError::invalid_range(format!(
            "Invalid {}: {}. Must be between {} and {}.",
            name, v, AGE_BOUNDS.0, AGE_BOUNDS.1
        ))),
        _ => Ok(()),
    }
}

/// Blank strings count as absent
fn parse_date(value: Option<&str>) -> QueryResult<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Some)
            .map_err(|_| {
                QueryError::invalid_range(format!(
                    "Invalid date '{}'. Expected YYYY-MM-DD format.",
                    raw
                ))
            }),
    }
}
