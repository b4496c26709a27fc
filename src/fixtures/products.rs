//! Product Fixtures

use serde::Deserialize;

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// ISO currency code shared by every price in the file
    pub currency: String,

    /// Products in display order
    pub products: Vec<ProductFixture>,
}

/// Product fixture from YAML
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Stable lookup key within the fixture set
    pub key: String,

    /// Product name
    pub name: String,

    /// Product category
    pub category: String,

    /// Reference to the product image
    pub image: String,

    /// Decimal price string, e.g. `"8.99"`
    pub price: String,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn products_fixture_parses_in_order() -> TestResult {
        let yaml = r#"
currency: USD
products:
  - key: burger
    name: Cheeseburger
    category: Food
    image: https://example.com/burger.jpg
    price: "8.99"
  - key: pizza
    name: Pepperoni Pizza
    category: Food
    image: https://example.com/pizza.jpg
    price: "12.99"
"#;

        let fixture: ProductsFixture = serde_norway::from_str(yaml)?;

        assert_eq!(fixture.currency, "USD");

        let keys: Vec<&str> = fixture
            .products
            .iter()
            .map(|product| product.key.as_str())
            .collect();

        assert_eq!(keys, vec!["burger", "pizza"]);

        Ok(())
    }

    #[test]
    fn products_fixture_rejects_missing_fields() {
        let yaml = r"
currency: USD
products:
  - key: burger
    name: Cheeseburger
";

        let result: Result<ProductsFixture, _> = serde_norway::from_str(yaml);

        assert!(result.is_err(), "expected missing fields to be rejected");
    }
}
