//! Per-request query parameters
//!
//! Criteria are built fresh for every request and never persisted.

use serde::{Deserialize, Serialize};

use super::errors::{QueryError, QueryResult};

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size used when none is given
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Raw filter parameters as received from the caller.
///
/// List values are normalized later by the predicate builder; an empty list
/// means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub customer_regions: Vec<String>,
    pub genders: Vec<String>,
    pub age_min: Option<i64>,
    pub age_max: Option<i64>,
    pub product_categories: Vec<String>,
    pub tags: Vec<String>,
    pub payment_methods: Vec<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_regions<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.customer_regions = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_genders<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genders = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.product_categories = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_payment_methods<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.payment_methods = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_age(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.age_min = min;
        self.age_max = max;
        self
    }

    pub fn with_dates(mut self, from: Option<&str>, to: Option<&str>) -> Self {
        self.date_from = from.map(str::to_string);
        self.date_to = to.map(str::to_string);
        self
    }
}

/// Supported sort keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Date,
    Quantity,
    CustomerName,
}

impl SortField {
    /// Parses a sort key; anything unrecognized sorts by date.
    pub fn parse(value: &str) -> Self {
        match value {
            "quantity" => SortField::Quantity,
            "customer_name" => SortField::CustomerName,
            _ => SortField::Date,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Quantity => "quantity",
            SortField::CustomerName => "customer_name",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// `"asc"` is ascending; every other value is descending.
    pub fn parse(value: &str) -> Self {
        if value == "asc" {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sort specification (single key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn asc(field: SortField) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: SortField) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Lenient parse of the raw `sort_by` / `sort_order` pair
    pub fn parse(sort_by: &str, sort_order: &str) -> Self {
        Self::new(SortField::parse(sort_by), SortDirection::parse(sort_order))
    }
}

/// Requested page (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Validates `page >= 1` and `1 <= page_size <= 100`.
    pub fn new(page: u32, page_size: u32) -> QueryResult<Self> {
        if page < 1 {
            return Err(QueryError::invalid_page(format!(
                "Invalid page: {}. Must be at least 1.",
                page
            )));
        }
        if page_size < 1 || page_size > MAX_PAGE_SIZE {
            return Err(QueryError::invalid_page(format!(
                "Invalid page_size: {}. Must be between 1 and {}.",
                page_size, MAX_PAGE_SIZE
            )));
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A full listing request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListRequest {
    pub filters: FilterCriteria,
    pub sort: SortSpec,
    pub page: PageRequest,
}

impl ListRequest {
    pub fn new(filters: FilterCriteria, sort: SortSpec, page: PageRequest) -> Self {
        Self {
            filters,
            sort,
            page,
        }
    }
}
