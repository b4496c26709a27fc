//! Reports
//!
//! Read-only record types behind the management pages: stock levels, staff
//! accounts, and the sales overview. These carry no mutation operations;
//! they are loaded from a data source and rendered.

use std::{fmt, io};

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::pricing::percent_points;

/// Errors that can occur when rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// Stock level for a managed product.
#[derive(Debug, Clone, PartialEq)]
pub struct StockRecord<'a> {
    /// Product name
    pub name: String,

    /// Product category
    pub category: String,

    /// Current unit price
    pub price: Money<'a, Currency>,

    /// Units on hand
    pub stock: u32,
}

/// Role a staff member holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Operates the till.
    Cashier,

    /// Oversees a store.
    Manager,

    /// Administers the system.
    Admin,
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaffRole::Cashier => f.write_str("Cashier"),
            StaffRole::Manager => f.write_str("Manager"),
            StaffRole::Admin => f.write_str("Admin"),
        }
    }
}

/// Whether a staff account is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffStatus {
    /// The account can sign in.
    Active,

    /// The account is disabled.
    Inactive,
}

impl fmt::Display for StaffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaffStatus::Active => f.write_str("Active"),
            StaffStatus::Inactive => f.write_str("Inactive"),
        }
    }
}

/// A staff account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StaffRecord {
    /// Staff member name
    pub name: String,

    /// Sign-in email
    pub email: String,

    /// Assigned role
    pub role: StaffRole,

    /// Account status
    pub status: StaffStatus,
}

/// Settlement status of a recorded sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Settled in full.
    Completed,

    /// Awaiting settlement.
    Pending,

    /// Settled then returned.
    Refunded,
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleStatus::Completed => f.write_str("Completed"),
            SaleStatus::Pending => f.write_str("Pending"),
            SaleStatus::Refunded => f.write_str("Refunded"),
        }
    }
}

/// One recorded sale.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord<'a> {
    /// Human-facing transaction reference, e.g. `TXN-5647`
    pub reference: String,

    /// Customer the sale was made to
    pub customer: String,

    /// When the sale was placed
    pub placed_at: Timestamp,

    /// Amount settled
    pub amount: Money<'a, Currency>,

    /// Settlement status
    pub status: SaleStatus,
}

/// Sales figures for one reporting period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodSales<'a> {
    /// Total sales over the period
    pub total: Money<'a, Currency>,

    /// Fractional change against the previous period
    pub change: Percentage,
}

/// Headline sales figures across the standard periods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalesSummary<'a> {
    /// Sales so far today
    pub today: PeriodSales<'a>,

    /// Sales so far this week
    pub this_week: PeriodSales<'a>,

    /// Sales so far this month
    pub this_month: PeriodSales<'a>,
}

/// The sales overview: headline figures plus recent transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesReport<'a> {
    /// Headline figures
    pub summary: SalesSummary<'a>,

    /// Most recent transactions, newest first
    pub recent: Vec<TransactionRecord<'a>>,
}

impl SalesReport<'_> {
    /// Render the headline figures and the transactions table.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::IO`] if the report cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        let rows = [
            (" Today:", &self.summary.today),
            (" This week:", &self.summary.this_week),
            (" This month:", &self.summary.this_month),
        ];

        writeln!(out).map_err(|_err| ReportError::IO)?;

        for (label, period) in rows {
            let total = period.total.to_string();
            let change = format_change(period.change);

            writeln!(out, "{label:<13} {total:>12}  ({change})").map_err(|_err| ReportError::IO)?;
        }

        let mut builder = Builder::default();

        builder.push_record(["Reference", "Customer", "Date", "Amount", "Status"]);

        for transaction in &self.recent {
            builder.push_record([
                transaction.reference.clone(),
                transaction.customer.clone(),
                transaction.placed_at.strftime("%Y-%m-%d %H:%M").to_string(),
                transaction.amount.to_string(),
                transaction.status.to_string(),
            ]);
        }

        render_table(&mut out, builder, 3..4)
    }
}

/// Render the stock table for the product management view.
///
/// # Errors
///
/// Returns [`ReportError::IO`] if the table cannot be written.
pub fn write_stock_table(
    mut out: impl io::Write,
    rows: &[StockRecord<'_>],
) -> Result<(), ReportError> {
    let mut builder = Builder::default();

    builder.push_record(["Product Name", "Category", "Price", "Stock"]);

    for record in rows {
        builder.push_record([
            record.name.clone(),
            record.category.clone(),
            record.price.to_string(),
            record.stock.to_string(),
        ]);
    }

    render_table(&mut out, builder, 2..4)
}

/// Render the staff table for the user management view.
///
/// # Errors
///
/// Returns [`ReportError::IO`] if the table cannot be written.
pub fn write_staff_table(
    mut out: impl io::Write,
    rows: &[StaffRecord],
) -> Result<(), ReportError> {
    let mut builder = Builder::default();

    builder.push_record(["Name", "Email", "Role", "Status"]);

    for record in rows {
        builder.push_record([
            record.name.clone(),
            record.email.clone(),
            record.role.to_string(),
            record.status.to_string(),
        ]);
    }

    render_table(&mut out, builder, 0..0)
}

/// Build and write a table with a bold header and right-aligned numeric
/// columns.
fn render_table(
    out: &mut impl io::Write,
    builder: Builder,
    numeric_columns: std::ops::Range<usize>,
) -> Result<(), ReportError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);

    if !numeric_columns.is_empty() {
        table.modify(Columns::new(numeric_columns), Alignment::right());
    }

    writeln!(out, "\n{table}").map_err(|_err| ReportError::IO)
}

/// Format a fractional change as signed percent points, e.g. `+15%`.
fn format_change(change: Percentage) -> String {
    let points = percent_points(change);

    if points.is_sign_negative() {
        format!("{points}%")
    } else {
        format!("+{points}%")
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    fn sample_report() -> TestResult<SalesReport<'static>> {
        Ok(SalesReport {
            summary: SalesSummary {
                today: PeriodSales {
                    total: Money::from_minor(124_589, USD),
                    change: Percentage::from(0.15),
                },
                this_week: PeriodSales {
                    total: Money::from_minor(894_250, USD),
                    change: Percentage::from(0.08),
                },
                this_month: PeriodSales {
                    total: Money::from_minor(3_275_821, USD),
                    change: Percentage::from(0.12),
                },
            },
            recent: vec![TransactionRecord {
                reference: "TXN-5647".to_string(),
                customer: "John Doe".to_string(),
                placed_at: "2025-04-22T10:30:00Z".parse()?,
                amount: Money::from_minor(12_500, USD),
                status: SaleStatus::Completed,
            }],
        })
    }

    #[test]
    fn sales_report_renders_summary_and_transactions() -> TestResult {
        let report = sample_report()?;

        let mut out = Vec::new();
        report.write_to(&mut out)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Today:"));
        assert!(output.contains("$1,245.89"));
        assert!(output.contains("(+15%)"));
        assert!(output.contains("TXN-5647"));
        assert!(output.contains("2025-04-22 10:30"));
        assert!(output.contains("Completed"));

        Ok(())
    }

    #[test]
    fn negative_change_renders_without_plus_sign() {
        assert_eq!(format_change(Percentage::from(-0.05)), "-5%");
        assert_eq!(format_change(Percentage::from(0.05)), "+5%");
    }

    #[test]
    fn stock_table_lists_every_row() -> TestResult {
        let rows = [
            StockRecord {
                name: "Coffee".to_string(),
                category: "Beverages".to_string(),
                price: Money::from_minor(399, USD),
                stock: 100,
            },
            StockRecord {
                name: "Croissant".to_string(),
                category: "Bakery".to_string(),
                price: Money::from_minor(450, USD),
                stock: 50,
            },
        ];

        let mut out = Vec::new();
        write_stock_table(&mut out, &rows)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Coffee"));
        assert!(output.contains("Croissant"));
        assert!(output.contains("$4.50"));
        assert!(output.contains("100"));

        Ok(())
    }

    #[test]
    fn staff_table_renders_roles_and_statuses() -> TestResult {
        let rows = [StaffRecord {
            name: "Maria Manager".to_string(),
            email: "maria@example.com".to_string(),
            role: StaffRole::Manager,
            status: StaffStatus::Active,
        }];

        let mut out = Vec::new();
        write_staff_table(&mut out, &rows)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Maria Manager"));
        assert!(output.contains("Manager"));
        assert!(output.contains("Active"));

        Ok(())
    }

    #[test]
    fn staff_record_deserialises_from_yaml() -> TestResult {
        let yaml = r"
name: David Admin
email: david@example.com
role: admin
status: inactive
";

        let record: StaffRecord = serde_norway::from_str(yaml)?;

        assert_eq!(record.role, StaffRole::Admin);
        assert_eq!(record.status, StaffStatus::Inactive);

        Ok(())
    }
}
