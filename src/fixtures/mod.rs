//! Fixtures
//!
//! Sample-data loading behind the store's data-access seam. The catalog,
//! the customer directory, and the admin reports are only ever populated
//! through here, so a real data source can replace the YAML files without
//! touching the core.

use std::{fs, path::PathBuf, str::FromStr};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogSource, Product, ProductKey},
    customers::{CustomerDirectory, CustomerKey, CustomerRecord, CustomerSource, DirectoryError},
    reports::{SalesReport, SalesSummary, StaffRecord, StockRecord},
};

pub mod customers;
pub mod products;
pub mod reports;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercent(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between fixture files
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No customers loaded
    #[error("No customers loaded; load a customers fixture first")]
    NoCustomers,

    /// Directory insertion error
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Resolve an ISO currency code.
fn currency_for(code: &str) -> Result<&'static Currency, FixtureError> {
    iso::find(code).ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))
}

/// Parse a decimal amount string into money in the given currency.
///
/// The amount may not carry more fractional digits than the currency's
/// minor unit allows.
pub(crate) fn parse_money(
    raw: &str,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, FixtureError> {
    let amount =
        Decimal::from_str(raw).map_err(|_err| FixtureError::InvalidPrice(raw.to_string()))?;

    let factor = 10_i64
        .checked_pow(currency.exponent)
        .ok_or_else(|| FixtureError::InvalidPrice(raw.to_string()))?;

    let scaled = amount
        .checked_mul(Decimal::from(factor))
        .ok_or_else(|| FixtureError::InvalidPrice(raw.to_string()))?;

    if !scaled.fract().is_zero() {
        return Err(FixtureError::InvalidPrice(raw.to_string()));
    }

    let minor = scaled
        .to_i64()
        .ok_or_else(|| FixtureError::InvalidPrice(raw.to_string()))?;

    Ok(Money::from_minor(minor, currency))
}

/// Parse a fractional rate string (e.g. `0.15` for 15%).
pub(crate) fn parse_percent(raw: &str) -> Result<Percentage, FixtureError> {
    let rate =
        Decimal::from_str(raw).map_err(|_err| FixtureError::InvalidPercent(raw.to_string()))?;

    Ok(Percentage::from(rate))
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Catalog built from the products fixture
    catalog: Catalog<'a>,

    /// Directory built from the customers fixture
    directory: Option<CustomerDirectory<'a>>,

    /// String key -> generated key mappings for lookups
    product_keys: FxHashMap<String, ProductKey>,
    customer_keys: FxHashMap<String, CustomerKey>,

    /// Report data built from the reports fixture
    stock: Vec<StockRecord<'a>>,
    staff: Vec<StaffRecord>,
    sales: Option<SalesReport<'a>>,

    /// Currency shared by every loaded file
    currency: Option<&'static Currency>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with the default base path.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with a custom base path.
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: Catalog::new(),
            directory: None,
            product_keys: FxHashMap::default(),
            customer_keys: FxHashMap::default(),
            stock: Vec::new(),
            staff: Vec::new(),
            sales: None,
            currency: None,
        }
    }

    /// Load the products, customers, and reports files of a named set.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if any file cannot be read or parsed, or
    /// if the files disagree on currency.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_products(name)?;
        fixture.load_customers(name)?;
        fixture.load_reports(name)?;

        Ok(fixture)
    }

    /// Load products from a YAML fixture file into the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file cannot be read or parsed, or
    /// if there is a currency mismatch.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: products::ProductsFixture = serde_norway::from_str(&contents)?;

        let currency = currency_for(&fixture.currency)?;
        self.note_currency(currency)?;

        for entry in fixture.products {
            let price = parse_money(&entry.price, currency)?;

            let key = self.catalog.insert(Product {
                name: entry.name,
                category: entry.category,
                image: entry.image,
                price,
            });

            self.product_keys.insert(entry.key, key);
        }

        Ok(self)
    }

    /// Load customers from a YAML fixture file into the directory.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file cannot be read or parsed, or
    /// if there is a currency mismatch.
    pub fn load_customers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("customers").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: customers::CustomersFixture = serde_norway::from_str(&contents)?;

        let currency = currency_for(&fixture.currency)?;
        self.note_currency(currency)?;

        let directory = self
            .directory
            .get_or_insert_with(|| CustomerDirectory::new(currency));

        for entry in fixture.customers {
            let total_spent = parse_money(&entry.total_spent, currency)?;

            let key = directory.insert_record(CustomerRecord {
                name: entry.name,
                email: entry.email,
                phone: entry.phone,
                address: entry.address,
                created_at: entry.created_at,
                last_purchase: entry.last_purchase,
                total_spent,
            })?;

            self.customer_keys.insert(entry.key, key);
        }

        Ok(self)
    }

    /// Load stock, staff, and sales data from a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file cannot be read or parsed, or
    /// if there is a currency mismatch.
    pub fn load_reports(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("reports").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: reports::ReportsFixture = serde_norway::from_str(&contents)?;

        let currency = currency_for(&fixture.currency)?;
        self.note_currency(currency)?;

        for entry in fixture.stock {
            self.stock.push(entry.into_record(currency)?);
        }

        self.staff.extend(fixture.staff);

        let summary = SalesSummary {
            today: fixture.sales.summary.today.into_period(currency)?,
            this_week: fixture.sales.summary.this_week.into_period(currency)?,
            this_month: fixture.sales.summary.this_month.into_period(currency)?,
        };

        let mut recent = Vec::with_capacity(fixture.sales.transactions.len());

        for transaction in fixture.sales.transactions {
            recent.push(transaction.into_record(currency)?);
        }

        self.sales = Some(SalesReport { summary, recent });

        Ok(self)
    }

    /// Record the file currency, rejecting disagreement between files.
    fn note_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            _ => {
                self.currency = Some(currency);

                Ok(())
            }
        }
    }

    /// The loaded catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog<'a> {
        &self.catalog
    }

    /// Take ownership of the loaded catalog.
    pub fn take_catalog(&mut self) -> Catalog<'a> {
        std::mem::take(&mut self.catalog)
    }

    /// The loaded customer directory, if a customers file was loaded.
    #[must_use]
    pub fn directory(&self) -> Option<&CustomerDirectory<'a>> {
        self.directory.as_ref()
    }

    /// Mutable access to the loaded customer directory.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCustomers`] if no customers file was
    /// loaded.
    pub fn directory_mut(&mut self) -> Result<&mut CustomerDirectory<'a>, FixtureError> {
        self.directory.as_mut().ok_or(FixtureError::NoCustomers)
    }

    /// Take ownership of the loaded customer directory.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCustomers`] if no customers file was
    /// loaded.
    pub fn take_directory(&mut self) -> Result<CustomerDirectory<'a>, FixtureError> {
        self.directory.take().ok_or(FixtureError::NoCustomers)
    }

    /// Look up a product's generated key by its fixture key.
    #[must_use]
    pub fn product_key(&self, key: &str) -> Option<ProductKey> {
        self.product_keys.get(key).copied()
    }

    /// Look up a customer's generated key by its fixture key.
    #[must_use]
    pub fn customer_key(&self, key: &str) -> Option<CustomerKey> {
        self.customer_keys.get(key).copied()
    }

    /// The loaded stock records.
    #[must_use]
    pub fn stock(&self) -> &[StockRecord<'a>] {
        &self.stock
    }

    /// The loaded staff records.
    #[must_use]
    pub fn staff(&self) -> &[StaffRecord] {
        &self.staff
    }

    /// The loaded sales report, if a reports file was loaded.
    #[must_use]
    pub fn sales(&self) -> Option<&SalesReport<'a>> {
        self.sales.as_ref()
    }

    /// The currency shared by every loaded file.
    #[must_use]
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogSource for Fixture<'static> {
    fn list_all(&self) -> Vec<Product<'static>> {
        self.catalog
            .iter()
            .map(|(_, product)| product.clone())
            .collect()
    }
}

impl CustomerSource for Fixture<'static> {
    fn list_all(&self) -> Vec<CustomerRecord<'static>> {
        self.directory.as_ref().map_or_else(Vec::new, |directory| {
            directory.iter().map(|(_, record)| record.clone()).collect()
        })
    }
}
