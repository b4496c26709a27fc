//! Report Fixtures

use jiff::Timestamp;
use rusty_money::iso::Currency;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, parse_money, parse_percent},
    reports::{PeriodSales, SaleStatus, StaffRecord, StockRecord, TransactionRecord},
};

/// Wrapper for report data in YAML
#[derive(Debug, Deserialize)]
pub struct ReportsFixture {
    /// ISO currency code shared by every amount in the file
    pub currency: String,

    /// Stock levels for the product management view
    pub stock: Vec<StockFixture>,

    /// Staff accounts for the user management view
    pub staff: Vec<StaffRecord>,

    /// Sales overview data
    pub sales: SalesFixture,
}

/// Stock fixture from YAML
#[derive(Debug, Deserialize)]
pub struct StockFixture {
    /// Product name
    pub name: String,

    /// Product category
    pub category: String,

    /// Decimal price string, e.g. `"3.99"`
    pub price: String,

    /// Units on hand
    pub stock: u32,
}

impl StockFixture {
    /// Convert to a [`StockRecord`] in the file currency.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the price string is invalid.
    pub fn into_record(
        self,
        currency: &'static Currency,
    ) -> Result<StockRecord<'static>, FixtureError> {
        let price = parse_money(&self.price, currency)?;

        Ok(StockRecord {
            name: self.name,
            category: self.category,
            price,
            stock: self.stock,
        })
    }
}

/// Sales overview fixture from YAML
#[derive(Debug, Deserialize)]
pub struct SalesFixture {
    /// Headline figures per period
    pub summary: SummaryFixture,

    /// Most recent transactions, newest first
    pub transactions: Vec<TransactionFixture>,
}

/// Headline figures fixture from YAML
#[derive(Debug, Deserialize)]
pub struct SummaryFixture {
    /// Sales so far today
    pub today: PeriodFixture,

    /// Sales so far this week
    pub this_week: PeriodFixture,

    /// Sales so far this month
    pub this_month: PeriodFixture,
}

/// One period's figures from YAML
#[derive(Debug, Deserialize)]
pub struct PeriodFixture {
    /// Decimal total string, e.g. `"1245.89"`
    pub total: String,

    /// Fractional change string against the previous period, e.g. `"0.15"`
    pub change: String,
}

impl PeriodFixture {
    /// Convert to a [`PeriodSales`] in the file currency.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the total or change string is invalid.
    pub fn into_period(
        self,
        currency: &'static Currency,
    ) -> Result<PeriodSales<'static>, FixtureError> {
        Ok(PeriodSales {
            total: parse_money(&self.total, currency)?,
            change: parse_percent(&self.change)?,
        })
    }
}

/// Transaction fixture from YAML
#[derive(Debug, Deserialize)]
pub struct TransactionFixture {
    /// Human-facing transaction reference
    pub reference: String,

    /// Customer the sale was made to
    pub customer: String,

    /// When the sale was placed
    pub placed_at: Timestamp,

    /// Decimal amount string
    pub amount: String,

    /// Settlement status
    pub status: SaleStatus,
}

impl TransactionFixture {
    /// Convert to a [`TransactionRecord`] in the file currency.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the amount string is invalid.
    pub fn into_record(
        self,
        currency: &'static Currency,
    ) -> Result<TransactionRecord<'static>, FixtureError> {
        let amount = parse_money(&self.amount, currency)?;

        Ok(TransactionRecord {
            reference: self.reference,
            customer: self.customer,
            placed_at: self.placed_at,
            amount,
            status: self.status,
        })
    }
}
