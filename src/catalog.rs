//! Catalog

use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Sentinel category meaning "no category restriction".
pub const ALL_CATEGORIES: &str = "All";

/// Product
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Product name
    pub name: String,

    /// Product category
    pub category: String,

    /// Reference to the product image
    pub image: String,

    /// Product unit price
    pub price: Money<'a, Currency>,
}

/// Filter applied when listing the catalog.
///
/// An absent category (or the [`ALL_CATEGORIES`] sentinel) and an absent
/// query each mean "no restriction"; when both are present they compose
/// with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Exact-match category restriction.
    pub category: Option<String>,

    /// Case-insensitive substring match against the product name.
    pub query: Option<String>,
}

impl CatalogFilter {
    /// Returns whether a product passes the filter.
    #[must_use]
    pub fn matches(&self, product: &Product<'_>) -> bool {
        let category_matches = self
            .category
            .as_deref()
            .is_none_or(|category| category == ALL_CATEGORIES || product.category == category);

        let query_matches = self
            .query
            .as_deref()
            .is_none_or(|query| product.name.to_lowercase().contains(&query.to_lowercase()));

        category_matches && query_matches
    }
}

/// Read-only source of products, for example a fixture set or a real
/// inventory backend.
pub trait CatalogSource {
    /// Every product the source knows, in display order.
    fn list_all(&self) -> Vec<Product<'static>>;
}

/// The set of purchasable products, listed in insertion order.
#[derive(Debug, Default)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    order: Vec<ProductKey>,
}

impl Catalog<'static> {
    /// Build a catalog from a data source, preserving the source's order.
    #[must_use]
    pub fn from_source(source: &dyn CatalogSource) -> Self {
        let mut catalog = Catalog::new();

        for product in source.list_all() {
            catalog.insert(product);
        }

        catalog
    }
}

impl<'a> Catalog<'a> {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product to the catalog, returning its key.
    pub fn insert(&mut self, product: Product<'a>) -> ProductKey {
        let key = self.products.insert(product);
        self.order.push(key);

        key
    }

    /// Look up a product by key.
    #[must_use]
    pub fn get(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Iterate over the products in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductKey, &Product<'a>)> {
        self.order
            .iter()
            .filter_map(|&key| self.products.get(key).map(|product| (key, product)))
    }

    /// List the products passing the filter, in insertion order.
    ///
    /// A pure read: unmatched filters yield an empty list, never an error.
    #[must_use]
    pub fn list(&self, filter: &CatalogFilter) -> Vec<(ProductKey, &Product<'a>)> {
        self.iter()
            .filter(|(_, product)| filter.matches(product))
            .collect()
    }

    /// Distinct product categories, in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();

        for (_, product) in self.iter() {
            if !seen.contains(&product.category.as_str()) {
                seen.push(product.category.as_str());
            }
        }

        seen
    }

    /// Get the number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;

    use super::*;

    fn product(name: &str, category: &str, minor: i64) -> Product<'static> {
        Product {
            name: name.to_string(),
            category: category.to_string(),
            image: format!("https://example.com/{name}.jpg"),
            price: Money::from_minor(minor, USD),
        }
    }

    fn test_catalog() -> Catalog<'static> {
        let mut catalog = Catalog::new();

        catalog.insert(product("Cheeseburger", "Food", 899));
        catalog.insert(product("Coca Cola", "Drinks", 249));
        catalog.insert(product("Iced Coffee", "Drinks", 499));
        catalog.insert(product("Chocolate Cake", "Desserts", 649));

        catalog
    }

    #[test]
    fn unfiltered_list_returns_everything_in_insertion_order() {
        let catalog = test_catalog();

        let names: Vec<&str> = catalog
            .list(&CatalogFilter::default())
            .into_iter()
            .map(|(_, product)| product.name.as_str())
            .collect();

        assert_eq!(
            names,
            vec!["Cheeseburger", "Coca Cola", "Iced Coffee", "Chocolate Cake"]
        );
    }

    #[test]
    fn category_filter_is_exact_match() {
        let catalog = test_catalog();

        let filter = CatalogFilter {
            category: Some("Drinks".to_string()),
            query: None,
        };

        let names: Vec<&str> = catalog
            .list(&filter)
            .into_iter()
            .map(|(_, product)| product.name.as_str())
            .collect();

        assert_eq!(names, vec!["Coca Cola", "Iced Coffee"]);
    }

    #[test]
    fn all_sentinel_category_means_no_restriction() {
        let catalog = test_catalog();

        let filter = CatalogFilter {
            category: Some(ALL_CATEGORIES.to_string()),
            query: None,
        };

        assert_eq!(catalog.list(&filter).len(), 4);
    }

    #[test]
    fn query_filter_is_case_insensitive_substring() {
        let catalog = test_catalog();

        let filter = CatalogFilter {
            category: None,
            query: Some("COLA".to_string()),
        };

        let matches = catalog.list(&filter);

        assert_eq!(matches.len(), 1);
        assert!(
            matches
                .first()
                .is_some_and(|(_, product)| product.name == "Coca Cola"),
            "expected the cola product to match"
        );
    }

    #[test]
    fn category_and_query_compose_with_and() {
        let catalog = test_catalog();

        let filter = CatalogFilter {
            category: Some("Drinks".to_string()),
            query: Some("cola".to_string()),
        };

        let matches = catalog.list(&filter);

        assert_eq!(matches.len(), 1);

        let mismatched = CatalogFilter {
            category: Some("Food".to_string()),
            query: Some("cola".to_string()),
        };

        assert!(catalog.list(&mismatched).is_empty());
    }

    #[test]
    fn unmatched_filter_yields_empty_list() {
        let catalog = test_catalog();

        let filter = CatalogFilter {
            category: None,
            query: Some("sushi".to_string()),
        };

        assert!(catalog.list(&filter).is_empty());
    }

    #[test]
    fn categories_are_distinct_in_first_seen_order() {
        let catalog = test_catalog();

        assert_eq!(catalog.categories(), vec!["Food", "Drinks", "Desserts"]);
    }

    #[test]
    fn get_returns_inserted_product() {
        let mut catalog = Catalog::new();
        let key = catalog.insert(product("Muffin", "Desserts", 299));

        assert!(
            catalog.get(key).is_some_and(|p| p.name == "Muffin"),
            "expected the inserted product to be retrievable"
        );
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.is_empty());
    }
}
