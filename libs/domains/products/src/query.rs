//! Query planning for product listings.
//!
//! Turns raw, untrusted query-string parameters into a [`QueryPlan`]: a
//! backend-independent filter, a sort order and a pagination window.
//! Planning never fails; every malformed input is replaced by its default.

use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;
use strum::{Display, EnumString};
use utoipa::IntoParams;

use crate::models::Product;

/// Products per page
pub const PAGE_SIZE: u64 = 10;

/// Query-string parameters accepted by the listing endpoint.
///
/// Every parameter is optional and malformed values fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// 1-based page number read from the leading digits; missing, non-numeric or below 1 means 1
    #[param(example = "1")]
    pub page: Option<String>,
    /// Case-insensitive substring of the product name
    pub search: Option<String>,
    /// `Low to High`, `High to Low` or `Newest first` (default)
    #[param(example = "Low to High")]
    pub sort: Option<String>,
    /// Case-insensitive substring of the brand
    pub brand: Option<String>,
    /// Case-insensitive substring of the category
    pub category: Option<String>,
    /// Lowest price, inclusive (default 0)
    pub minimum: Option<String>,
    /// Highest price, inclusive (missing or 0 means unbounded)
    pub maximum: Option<String>,
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum SortOrder {
    /// Cheapest first, then newest first
    #[strum(serialize = "Low to High")]
    PriceAscending,
    /// Most expensive first, then newest first
    #[strum(serialize = "High to Low")]
    PriceDescending,
    #[default]
    #[strum(serialize = "Newest first")]
    NewestFirst,
}

impl SortOrder {
    /// Exact, case-sensitive token match. Unknown tokens sort newest first.
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or_default()
    }
}

/// Inclusive price bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }
}

/// Backend-independent product predicate.
///
/// Text fields are case-insensitive substring matches and are only present
/// for non-empty input. The price range always applies.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductFilter {
    pub product_name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub price: PriceRange,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        contains_ignore_case(&product.product_name, self.product_name.as_deref())
            && contains_ignore_case(&product.brand, self.brand.as_deref())
            && contains_ignore_case(&product.category, self.category.as_deref())
            && self.price.contains(product.price)
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

/// Everything a repository needs to fetch one page
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub filter: ProductFilter,
    pub order: SortOrder,
    /// Coerced 1-based page number
    pub page: u64,
    pub skip: u64,
    pub limit: u64,
}

/// Listing request after coercion
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page: u64,
    pub search: String,
    pub sort: SortOrder,
    pub brand: String,
    pub category: String,
    pub minimum: f64,
    pub maximum: f64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
            sort: SortOrder::default(),
            brand: String::new(),
            category: String::new(),
            minimum: 0.0,
            maximum: f64::INFINITY,
        }
    }
}

impl ListQuery {
    /// Coerce raw query-string parameters. Unknown keys are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let text = |key: &str| params.get(key).cloned().unwrap_or_default();

        Self {
            page: params.get("page").map_or(1, |raw| parse_page(raw)),
            search: text("search"),
            sort: params
                .get("sort")
                .map(|raw| SortOrder::from_token(raw))
                .unwrap_or_default(),
            brand: text("brand"),
            category: text("category"),
            minimum: params
                .get("minimum")
                .map_or(0.0, |raw| parse_price(raw, 0.0)),
            maximum: params
                .get("maximum")
                .map_or(f64::INFINITY, |raw| parse_price(raw, f64::INFINITY)),
        }
    }

    pub fn plan(&self) -> QueryPlan {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        QueryPlan {
            filter: ProductFilter {
                product_name: non_empty(&self.search),
                brand: non_empty(&self.brand),
                category: non_empty(&self.category),
                price: PriceRange {
                    min: self.minimum,
                    max: self.maximum,
                },
            },
            order: self.sort,
            page: self.page,
            skip: (self.page - 1).saturating_mul(PAGE_SIZE),
            limit: PAGE_SIZE,
        }
    }
}

/// Plan a listing straight from raw query-string parameters.
pub fn plan(params: &HashMap<String, String>) -> QueryPlan {
    ListQuery::from_params(params).plan()
}

/// `ceil(total / PAGE_SIZE)`
pub fn total_pages(total: u64) -> u64 {
    total.div_ceil(PAGE_SIZE)
}

static INTEGER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?[0-9]+").unwrap_or_else(|_| unreachable!("static pattern"))
});

static DECIMAL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .unwrap_or_else(|_| unreachable!("static pattern"))
});

/// Leading digits of `raw` as a page number. Anything that does not start
/// with a positive integer is page 1; trailing text is ignored.
fn parse_page(raw: &str) -> u64 {
    let Some(prefix) = INTEGER_PREFIX.find(raw.trim_start()) else {
        return 1;
    };
    let prefix = prefix.as_str();
    if prefix.starts_with('-') {
        return 1;
    }

    match prefix.trim_start_matches('+').parse::<u64>() {
        Ok(0) => 1,
        Ok(page) => page,
        // only overflow is left once the prefix matched
        Err(_) => u64::MAX,
    }
}

/// Leading decimal number of `raw`. Zero, NaN and no number at all fall
/// back to `default`, so `maximum=0` leaves the range unbounded.
fn parse_price(raw: &str, default: f64) -> f64 {
    DECIMAL_PREFIX
        .find(raw.trim_start())
        .and_then(|prefix| prefix.as_str().parse::<f64>().ok())
        .filter(|value| *value != 0.0 && !value.is_nan())
        .unwrap_or(default)
}
