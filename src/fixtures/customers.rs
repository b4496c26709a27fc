//! Customer Fixtures

use jiff::Timestamp;
use serde::Deserialize;

/// Wrapper for customers in YAML
#[derive(Debug, Deserialize)]
pub struct CustomersFixture {
    /// ISO currency code shared by every spend amount in the file
    pub currency: String,

    /// Customers in display order
    pub customers: Vec<CustomerFixture>,
}

/// Customer fixture from YAML
#[derive(Debug, Deserialize)]
pub struct CustomerFixture {
    /// Stable lookup key within the fixture set
    pub key: String,

    /// Customer name
    pub name: String,

    /// Contact email
    pub email: String,

    /// Contact phone number
    pub phone: String,

    /// Postal address
    pub address: String,

    /// When the record was created
    pub created_at: Timestamp,

    /// When the customer last completed an order, if ever
    #[serde(default)]
    pub last_purchase: Option<Timestamp>,

    /// Decimal lifetime spend string, e.g. `"1250.75"`
    pub total_spent: String,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn customers_fixture_parses_optional_last_purchase() -> TestResult {
        let yaml = r#"
currency: USD
customers:
  - key: john-doe
    name: John Doe
    email: john.doe@example.com
    phone: 123-456-7890
    address: 123 Main St, Anytown, USA
    created_at: 2023-01-15T00:00:00Z
    last_purchase: 2023-04-20T00:00:00Z
    total_spent: "1250.75"
  - key: mike-johnson
    name: Mike Johnson
    email: mike.johnson@example.com
    phone: 555-123-4567
    address: 789 Pine Rd, Nowhere, USA
    created_at: 2023-03-05T00:00:00Z
    total_spent: "0"
"#;

        let fixture: CustomersFixture = serde_norway::from_str(yaml)?;

        assert_eq!(fixture.customers.len(), 2);

        let john = fixture.customers.first().ok_or("expected john")?;
        assert!(john.last_purchase.is_some());

        let mike = fixture.customers.last().ok_or("expected mike")?;
        assert!(mike.last_purchase.is_none());
        assert_eq!(mike.total_spent, "0");

        Ok(())
    }
}
