//! Listing criteria: the filter, sort, and pagination inputs for a
//! product listing, plus the lenient conversion from raw request strings.

use serde::Deserialize;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_LIMIT: i64 = 10;

/// Starting row used when the caller does not ask for one.
pub const DEFAULT_OFFSET: i64 = 0;

/// Result ordering for a listing.
///
/// Each variant maps to a fixed `ORDER BY` clause, so no caller-supplied
/// text ever reaches the statement's ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    /// Natural store order (no `ORDER BY`).
    #[default]
    Natural,
    PriceAsc,
    PriceDesc,
}

impl SortMode {
    /// Parse a `sort` request value. Anything unrecognised, including the
    /// empty string, means natural order.
    pub fn from_param(value: &str) -> Self {
        match value.trim() {
            "price_asc" => Self::PriceAsc,
            "price_desc" => Self::PriceDesc,
            _ => Self::Natural,
        }
    }

    /// The `ORDER BY` clause for this mode, if any.
    pub fn order_by(&self) -> Option<&'static str> {
        match self {
            Self::Natural => None,
            Self::PriceAsc => Some("ORDER BY p.price ASC"),
            Self::PriceDesc => Some("ORDER BY p.price DESC"),
        }
    }
}

/// Raw listing parameters as they arrive on a request's query string.
///
/// Every field is kept as text so that a malformed number never rejects
/// the request; [`ListingCriteria::from_params`] decides what survives.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Resolved criteria for one listing query.
///
/// `limit` and `offset` always hold a value. Price bounds are not checked
/// against each other; `min_price > max_price` simply matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCriteria {
    pub category: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub sort: SortMode,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ListingCriteria {
    fn default() -> Self {
        Self {
            category: None,
            min_price: None,
            max_price: None,
            sort: SortMode::Natural,
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl ListingCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn min_price(mut self, price: i64) -> Self {
        self.min_price = Some(price);
        self
    }

    pub fn max_price(mut self, price: i64) -> Self {
        self.max_price = Some(price);
        self
    }

    pub fn sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Resolve raw request parameters into criteria.
    ///
    /// This never fails. An empty category is treated as absent. A price
    /// bound that is not a non-negative integer is dropped without error,
    /// and a bad `limit` or `offset` falls back to its default. Callers that
    /// send sloppy query strings get a wider listing instead of an error.
    pub fn from_params(params: &ListingParams) -> Self {
        let category = params
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Self {
            category,
            min_price: parse_non_negative(params.min_price.as_deref()),
            max_price: parse_non_negative(params.max_price.as_deref()),
            sort: params
                .sort
                .as_deref()
                .map(SortMode::from_param)
                .unwrap_or_default(),
            limit: parse_non_negative(params.limit.as_deref()).unwrap_or(DEFAULT_LIMIT),
            offset: parse_non_negative(params.offset.as_deref()).unwrap_or(DEFAULT_OFFSET),
        }
    }
}

fn parse_non_negative(value: Option<&str>) -> Option<i64> {
    value?.trim().parse::<i64>().ok().filter(|v| *v >= 0)
}

#[cfg(test)]
#[path = "tests/criteria_tests.rs"]
mod tests;
