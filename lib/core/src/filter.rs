// Catalog filters applied before scoring
use serde::{Deserialize, Serialize};
use tracing::warn;
use crate::item::CatalogItem;

pub trait Filter {
    fn matches(&self, item: &CatalogItem) -> bool;
}

/// Substring conditions are case-insensitive ("icontains").
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    CategoryContains(String),
    BrandContains(String),
    /// Matches the title, or a structured color when the item carries one
    ColorContains(String),
    MaxPrice(f64),
    And(Vec<FilterCondition>),
}

pub struct ItemFilter {
    condition: FilterCondition,
}

impl ItemFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    /// Accept every item
    pub fn any() -> Self {
        Self::new(FilterCondition::And(Vec::new()))
    }

    fn icontains(haystack: &str, needle: &str) -> bool {
        haystack.to_lowercase().contains(needle)
    }

    fn matches_condition(condition: &FilterCondition, item: &CatalogItem) -> bool {
        match condition {
            FilterCondition::CategoryContains(value) => {
                Self::icontains(item.category.as_str(), value)
            }
            FilterCondition::BrandContains(value) => Self::icontains(&item.brand, value),
            FilterCondition::ColorContains(value) => {
                Self::icontains(&item.title, value)
                    || item.colors.iter().any(|c| Self::icontains(c, value))
            }
            FilterCondition::MaxPrice(max) => item.price <= *max,
            FilterCondition::And(conditions) => {
                conditions.iter().all(|c| Self::matches_condition(c, item))
            }
        }
    }
}

impl Filter for ItemFilter {
    fn matches(&self, item: &CatalogItem) -> bool {
        Self::matches_condition(&self.condition, item)
    }
}

/// Optional, conjunctive search filters as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub max_price: Option<f64>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_max_price(mut self, max_price: f64) -> Self {
        self.max_price = Some(max_price);
        self
    }

    /// Apply a raw price ceiling. Unparseable or non-positive values are ignored.
    #[must_use]
    pub fn with_raw_max_price(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = raw {
            match parse_price(raw) {
                Ok(price) => self.max_price = Some(price),
                Err(e) => warn!("Ignoring price filter: {}", e),
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.brand.is_none()
            && self.color.is_none()
            && self.max_price.is_none()
    }

    /// Build the conjunctive filter. Blank string values are not applied.
    pub fn to_filter(&self) -> ItemFilter {
        let mut conditions = Vec::new();

        let normalized = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_lowercase)
        };

        if let Some(category) = normalized(&self.category) {
            conditions.push(FilterCondition::CategoryContains(category));
        }
        if let Some(brand) = normalized(&self.brand) {
            conditions.push(FilterCondition::BrandContains(brand));
        }
        if let Some(color) = normalized(&self.color) {
            conditions.push(FilterCondition::ColorContains(color));
        }
        if let Some(max_price) = self.max_price.filter(|p| p.is_finite()) {
            conditions.push(FilterCondition::MaxPrice(max_price));
        }

        ItemFilter::new(FilterCondition::And(conditions))
    }
}

/// Parse a price ceiling such as "500", "$79.99" or "1,200".
pub fn parse_price(raw: &str) -> crate::Result<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    let value: f64 = cleaned
        .parse()
        .map_err(|_| crate::Error::InvalidFilter(format!("unparseable price '{}'", raw)))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(crate::Error::InvalidFilter(format!("price out of range '{}'", raw)));
    }
    Ok(value)
}
