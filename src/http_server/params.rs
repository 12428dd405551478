//! Query-string binding
//!
//! List filters arrive as repeated keys (`genders=male&genders=female`);
//! a trailing `[]` on the key is accepted as well. Unknown keys are ignored.

use crate::query::{
    FilterCriteria, ListRequest, PageRequest, SortSpec, DEFAULT_PAGE_SIZE,
};

use super::errors::{RestError, RestResult};

/// Raw query pairs in request order
pub type QueryPairs = [(String, String)];

fn key(raw: &str) -> &str {
    raw.strip_suffix("[]").unwrap_or(raw)
}

fn values<'a>(pairs: &'a QueryPairs, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    pairs
        .iter()
        .filter(move |(k, _)| key(k) == name)
        .map(|(_, v)| v.as_str())
}

/// Last value wins for scalar parameters
fn scalar<'a>(pairs: &'a QueryPairs, name: &'a str) -> Option<&'a str> {
    values(pairs, name).last()
}

fn list(pairs: &QueryPairs, name: &str) -> Vec<String> {
    values(pairs, name).map(str::to_string).collect()
}

fn number<T: std::str::FromStr>(pairs: &QueryPairs, name: &str) -> RestResult<Option<T>> {
    match scalar(pairs, name).map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| RestError::invalid_param(name, raw)),
    }
}

/// Filter dimensions shared by the listing and summary routes.
///
/// `search` is only bound when `with_search` is set.
pub fn filter_criteria(pairs: &QueryPairs, with_search: bool) -> RestResult<FilterCriteria> {
    Ok(FilterCriteria {
        search: if with_search {
            scalar(pairs, "search").map(str::to_string)
        } else {
            None
        },
        customer_regions: list(pairs, "customer_regions"),
        genders: list(pairs, "genders"),
        product_categories: list(pairs, "product_categories"),
        tags: list(pairs, "tags"),
        payment_methods: list(pairs, "payment_methods"),
        age_min: number(pairs, "age_min")?,
        age_max: number(pairs, "age_max")?,
        date_from: scalar(pairs, "date_from").map(str::to_string),
        date_to: scalar(pairs, "date_to").map(str::to_string),
    })
}

/// Full listing request: filters, sort and page
pub fn list_request(pairs: &QueryPairs) -> RestResult<ListRequest> {
    let filters = filter_criteria(pairs, true)?;
    let sort = SortSpec::parse(
        scalar(pairs, "sort_by").unwrap_or("date"),
        scalar(pairs, "sort_order").unwrap_or("desc"),
    );
    let page = PageRequest::new(
        number(pairs, "page")?.unwrap_or(1),
        number(pairs, "page_size")?.unwrap_or(DEFAULT_PAGE_SIZE),
    )?;
    Ok(ListRequest::new(filters, sort, page))
}
