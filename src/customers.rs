//! Customers

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

new_key_type! {
    /// Customer Key
    pub struct CustomerKey;
}

/// Errors related to directory construction.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A record's spend currency differs from the directory currency
    /// (record currency, directory currency).
    #[error("Record has currency {0}, but directory has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// A customer known to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord<'a> {
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
    pub last_purchase: Option<Timestamp>,

    /// Lifetime spend across completed orders
    pub total_spent: Money<'a, Currency>,
}

impl CustomerRecord<'_> {
    /// Case-insensitive substring match against name, email, or phone.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();

        self.name.to_lowercase().contains(&query)
            || self.email.to_lowercase().contains(&query)
            || self.phone.to_lowercase().contains(&query)
    }
}

/// Details for a customer being added to the directory.
///
/// The directory assigns the key, the creation timestamp, and a zero
/// lifetime spend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    /// Customer name
    pub name: String,

    /// Contact email
    pub email: String,

    /// Contact phone number
    pub phone: String,

    /// Postal address
    pub address: String,
}

/// Read-only source of customer records, for example a fixture set or a
/// real backend.
pub trait CustomerSource {
    /// Every record the source knows, in display order.
    fn list_all(&self) -> Vec<CustomerRecord<'static>>;
}

/// Searchable collection of customer records, kept in insertion order.
///
/// Lookups are forgiving: updates and removals of unknown keys are silent
/// no-ops, and no uniqueness is enforced beyond the key itself (two records
/// may share an email).
#[derive(Debug, Clone)]
pub struct CustomerDirectory<'a> {
    records: SlotMap<CustomerKey, CustomerRecord<'a>>,
    order: Vec<CustomerKey>,
    currency: &'static Currency,
}

impl CustomerDirectory<'static> {
    /// Build a directory from a data source, preserving the source's order.
    ///
    /// # Errors
    ///
    /// Returns a [`DirectoryError::CurrencyMismatch`] if a sourced record's
    /// spend is not in the given currency.
    pub fn from_source(
        source: &dyn CustomerSource,
        currency: &'static Currency,
    ) -> Result<Self, DirectoryError> {
        let mut directory = CustomerDirectory::new(currency);

        for record in source.list_all() {
            directory.insert_record(record)?;
        }

        Ok(directory)
    }
}

impl<'a> CustomerDirectory<'a> {
    /// Create a new empty directory for the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        CustomerDirectory {
            records: SlotMap::with_key(),
            order: Vec::new(),
            currency,
        }
    }

    /// Add a customer, stamping the creation time and zeroing their spend.
    pub fn add(&mut self, customer: NewCustomer) -> CustomerKey {
        let record = CustomerRecord {
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            address: customer.address,
            created_at: Timestamp::now(),
            last_purchase: None,
            total_spent: Money::from_minor(0, self.currency),
        };

        let key = self.records.insert(record);
        self.order.push(key);

        key
    }

    /// Insert a pre-existing record, keeping its timestamps and spend.
    ///
    /// This is the loading path for external customer sources.
    ///
    /// # Errors
    ///
    /// Returns a [`DirectoryError::CurrencyMismatch`] if the record's spend
    /// is not in the directory currency.
    pub fn insert_record(
        &mut self,
        record: CustomerRecord<'a>,
    ) -> Result<CustomerKey, DirectoryError> {
        if record.total_spent.currency() != self.currency {
            return Err(DirectoryError::CurrencyMismatch(
                record.total_spent.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        let key = self.records.insert(record);
        self.order.push(key);

        Ok(key)
    }

    /// Replace the record for a key wholesale.
    ///
    /// Returns whether a record was replaced; unknown keys are a silent
    /// no-op.
    pub fn update(&mut self, key: CustomerKey, record: CustomerRecord<'a>) -> bool {
        let Some(existing) = self.records.get_mut(key) else {
            return false;
        };

        *existing = record;

        true
    }

    /// Remove a customer, returning their record if one was present.
    pub fn remove(&mut self, key: CustomerKey) -> Option<CustomerRecord<'a>> {
        let removed = self.records.remove(key);

        if removed.is_some() {
            self.order.retain(|&existing| existing != key);
        }

        removed
    }

    /// Find the customers matching a query, in collection order.
    ///
    /// The match is a case-insensitive substring test against name, email,
    /// and phone; an empty query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<(CustomerKey, &CustomerRecord<'a>)> {
        self.iter()
            .filter(|(_, record)| record.matches_query(query))
            .collect()
    }

    /// Accumulate a settled order onto a customer's record.
    ///
    /// Returns whether the customer was found; unknown keys and mismatched
    /// currencies are silent no-ops, keeping checkout forgiving.
    pub fn record_purchase(
        &mut self,
        key: CustomerKey,
        amount: Money<'a, Currency>,
        at: Timestamp,
    ) -> bool {
        let Some(record) = self.records.get_mut(key) else {
            return false;
        };

        if amount.currency() != record.total_spent.currency() {
            return false;
        }

        let minor = record
            .total_spent
            .to_minor_units()
            .saturating_add(amount.to_minor_units());

        record.total_spent = Money::from_minor(minor, record.total_spent.currency());
        record.last_purchase = Some(at);

        true
    }

    /// Look up a customer by key.
    #[must_use]
    pub fn get(&self, key: CustomerKey) -> Option<&CustomerRecord<'a>> {
        self.records.get(key)
    }

    /// Iterate over the customers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (CustomerKey, &CustomerRecord<'a>)> {
        self.order
            .iter()
            .filter_map(|&key| self.records.get(key).map(|record| (key, record)))
    }

    /// Get the number of customers in the directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Get the currency new customers start their spend in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, USD};
    use slotmap::KeyData;
    use testresult::TestResult;

    use super::*;

    /// A key whose slot index is far beyond anything the tests allocate.
    fn absent_key() -> CustomerKey {
        KeyData::from_ffi((1 << 32) | 999).into()
    }

    fn new_customer(name: &str, email: &str, phone: &str) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            address: "123 Main St, Anytown, USA".to_string(),
        }
    }

    fn test_directory() -> (CustomerDirectory<'static>, CustomerKey, CustomerKey) {
        let mut directory = CustomerDirectory::new(USD);

        let john = directory.add(new_customer(
            "John Doe",
            "john.doe@example.com",
            "123-456-7890",
        ));

        let jane = directory.add(new_customer(
            "Jane Smith",
            "jane.smith@example.com",
            "987-654-3210",
        ));

        (directory, john, jane)
    }

    #[test]
    fn add_initialises_spend_and_creation_time() {
        let (directory, john, _) = test_directory();

        let record = directory.get(john);

        assert!(
            record.is_some_and(|r| r.total_spent == Money::from_minor(0, USD)),
            "expected a fresh record with zero spend"
        );
        assert!(
            record.is_some_and(|r| r.last_purchase.is_none()),
            "expected no purchase on a fresh record"
        );
    }

    #[test]
    fn search_matches_name_email_and_phone_case_insensitively() {
        let (directory, _, jane) = test_directory();

        let by_name: Vec<CustomerKey> = directory
            .search("JANE")
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(by_name, vec![jane]);

        let by_email: Vec<CustomerKey> = directory
            .search("jane.smith@")
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(by_email, vec![jane]);

        let by_phone: Vec<CustomerKey> = directory
            .search("987-654")
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(by_phone, vec![jane]);
    }

    #[test]
    fn empty_query_matches_everything_in_insertion_order() {
        let (directory, john, jane) = test_directory();

        let keys: Vec<CustomerKey> = directory.search("").into_iter().map(|(key, _)| key).collect();

        assert_eq!(keys, vec![john, jane]);
    }

    #[test]
    fn search_with_no_matches_is_empty() {
        let (directory, _, _) = test_directory();

        assert!(directory.search("nobody").is_empty());
    }

    #[test]
    fn update_replaces_record_wholesale() -> TestResult {
        let (mut directory, john, _) = test_directory();

        let mut replacement = directory.get(john).cloned().ok_or("expected a record")?;
        replacement.phone = "555-000-1111".to_string();

        assert!(directory.update(john, replacement));
        assert!(
            directory.get(john).is_some_and(|r| r.phone == "555-000-1111"),
            "expected the replacement to be visible"
        );

        Ok(())
    }

    #[test]
    fn update_unknown_key_is_a_no_op() {
        let (mut directory, john, _) = test_directory();

        let record = directory.get(john).cloned();

        assert!(record.is_some_and(|r| !directory.update(absent_key(), r)));
        assert_eq!(directory.len(), 2);
    }

    #[test]
    fn remove_deletes_record_and_preserves_order() {
        let (mut directory, john, jane) = test_directory();

        let removed = directory.remove(john);

        assert!(
            removed.is_some_and(|r| r.name == "John Doe"),
            "expected the removed record back"
        );
        assert_eq!(directory.len(), 1);

        let keys: Vec<CustomerKey> = directory.search("").into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![jane]);
    }

    #[test]
    fn remove_unknown_key_is_a_no_op() {
        let (mut directory, john, _) = test_directory();

        directory.remove(john);

        assert!(directory.remove(john).is_none());
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn record_purchase_accumulates_spend_and_stamps_time() {
        let (mut directory, john, _) = test_directory();
        let at = Timestamp::UNIX_EPOCH;

        assert!(directory.record_purchase(john, Money::from_minor(1978, USD), at));
        assert!(directory.record_purchase(john, Money::from_minor(22, USD), at));

        let record = directory.get(john);

        assert!(
            record.is_some_and(|r| r.total_spent == Money::from_minor(2000, USD)),
            "expected the spend to accumulate"
        );
        assert!(
            record.is_some_and(|r| r.last_purchase == Some(at)),
            "expected the purchase time to be stamped"
        );
    }

    #[test]
    fn record_purchase_unknown_key_is_a_no_op() {
        let (mut directory, _, _) = test_directory();

        assert!(!directory.record_purchase(
            absent_key(),
            Money::from_minor(100, USD),
            Timestamp::now()
        ));
    }

    #[test]
    fn record_purchase_mismatched_currency_is_a_no_op() {
        let (mut directory, john, _) = test_directory();

        assert!(!directory.record_purchase(john, Money::from_minor(100, EUR), Timestamp::now()));
        assert!(
            directory
                .get(john)
                .is_some_and(|r| r.total_spent == Money::from_minor(0, USD)),
            "expected the spend to be untouched"
        );
    }

    #[test]
    fn duplicate_emails_are_permitted() {
        let (mut directory, _, _) = test_directory();

        directory.add(new_customer(
            "John Clone",
            "john.doe@example.com",
            "111-222-3333",
        ));

        assert_eq!(directory.search("john.doe@example.com").len(), 2);
    }

    #[test]
    fn insert_record_rejects_mismatched_currency() {
        let mut directory = CustomerDirectory::new(USD);

        let record = CustomerRecord {
            name: "Marie".to_string(),
            email: "marie@example.com".to_string(),
            phone: "06 12 34 56 78".to_string(),
            address: "12 Rue de la Paix, Paris".to_string(),
            created_at: Timestamp::UNIX_EPOCH,
            last_purchase: None,
            total_spent: Money::from_minor(0, EUR),
        };

        let result = directory.insert_record(record);

        match result {
            Err(DirectoryError::CurrencyMismatch(record_currency, directory_currency)) => {
                assert_eq!(record_currency, EUR.iso_alpha_code);
                assert_eq!(directory_currency, USD.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }
    }
}
