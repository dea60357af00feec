//! Candidate filtering for a single category picker.
//!
//! Every call walks the full catalog; there is no index to keep in sync.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::AppError;
use crate::models::{Category, Component, Price};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    PriceAsc,
    PriceDesc,
    Name,
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price_asc" => Ok(SortKey::PriceAsc),
            "price_desc" => Ok(SortKey::PriceDesc),
            "name" => Ok(SortKey::Name),
            other => Err(AppError::validation(format!("unknown sort key '{other}'"))),
        }
    }
}

/// Brand constraint. `all` on the wire is the wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BrandFilter {
    #[default]
    All,
    Exact(String),
}

impl From<Option<&str>> for BrandFilter {
    fn from(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") | Some("all") => BrandFilter::All,
            Some(brand) => BrandFilter::Exact(brand.to_string()),
        }
    }
}

impl BrandFilter {
    fn matches(&self, component: &Component) -> bool {
        match self {
            BrandFilter::All => true,
            BrandFilter::Exact(brand) => component.brand.as_deref() == Some(brand.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub category: Option<Category>,
    /// Inclusive lower bound.
    pub min_price: Option<Price>,
    /// Inclusive upper bound.
    pub max_price: Option<Price>,
    pub brand: BrandFilter,
    pub sort: SortKey,
}

impl CatalogFilter {
    pub fn for_category(category: Category) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    fn matches(&self, component: &Component) -> bool {
        self.category.map_or(true, |c| component.category == c)
            && self.min_price.map_or(true, |min| component.price >= min)
            && self.max_price.map_or(true, |max| component.price <= max)
            && self.brand.matches(component)
    }

    /// Returns matching components in the requested order. Ties keep catalog order.
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Component> {
        let mut out: Vec<&Component> = catalog
            .components()
            .iter()
            .filter(|c| self.matches(c))
            .collect();

        match self.sort {
            SortKey::PriceAsc => out.sort_by_key(|c| c.price),
            SortKey::PriceDesc => out.sort_by(|a, b| b.price.cmp(&a.price)),
            SortKey::Name => out.sort_by(|a, b| a.name.cmp(&b.name)),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(found: Vec<&Component>) -> Vec<&str> {
        found.into_iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn price_range_is_inclusive() {
        let catalog = Catalog::builtin();
        let filter = CatalogFilter {
            min_price: Some(Price::from_cents(299_99)),
            max_price: Some(Price::from_cents(359_99)),
            ..CatalogFilter::for_category(Category::Cpu)
        };
        assert_eq!(ids(filter.apply(&catalog)), vec!["cpu4", "cpu5", "cpu3"]);
    }

    #[test]
    fn brand_exact_and_wildcard() {
        let catalog = Catalog::builtin();
        let amd = CatalogFilter {
            brand: BrandFilter::from(Some("AMD")),
            ..CatalogFilter::for_category(Category::Gpu)
        };
        assert_eq!(ids(amd.apply(&catalog)), vec!["gpu2", "gpu5", "gpu7"]);

        let all = CatalogFilter {
            brand: BrandFilter::from(Some("all")),
            ..CatalogFilter::for_category(Category::Gpu)
        };
        assert_eq!(all.apply(&catalog).len(), 8);

        // brand matching is exact, not case-folded
        let lower = CatalogFilter {
            brand: BrandFilter::from(Some("amd")),
            ..CatalogFilter::for_category(Category::Gpu)
        };
        assert!(lower.apply(&catalog).is_empty());
    }

    #[test]
    fn sort_orders() {
        let catalog = Catalog::builtin();
        let mut filter = CatalogFilter::for_category(Category::Psu);

        filter.sort = SortKey::PriceDesc;
        assert_eq!(ids(filter.apply(&catalog)), vec!["psu4", "psu3", "psu2", "psu1"]);

        filter.sort = SortKey::Name;
        assert_eq!(
            ids(filter.apply(&catalog)),
            vec!["psu1", "psu3", "psu2", "psu4"]
        );
    }

    #[test]
    fn equal_prices_keep_catalog_order() {
        let catalog = Catalog::builtin();
        // cpu4, gpu1 and psu4 all cost 299.99
        let filter = CatalogFilter {
            min_price: Some(Price::from_cents(299_99)),
            max_price: Some(Price::from_cents(299_99)),
            ..CatalogFilter::default()
        };
        assert_eq!(ids(filter.apply(&catalog)), vec!["cpu4", "gpu1", "psu4"]);
    }

    #[test]
    fn inverted_range_is_empty() {
        let catalog = Catalog::builtin();
        let filter = CatalogFilter {
            min_price: Some(Price::from_cents(500_00)),
            max_price: Some(Price::from_cents(100_00)),
            ..CatalogFilter::default()
        };
        assert!(filter.apply(&catalog).is_empty());
    }

    #[test]
    fn sort_key_parsing() {
        assert_eq!("price_desc".parse::<SortKey>().unwrap(), SortKey::PriceDesc);
        assert!("cheapest".parse::<SortKey>().is_err());
    }
}
