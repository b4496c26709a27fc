//! Receipt

use std::io;

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    catalog::{Catalog, ProductKey},
    checkout::{CompletedOrder, PaymentMethod},
    pricing::{PricingError, percent_points},
};

/// Errors that can occur when building or rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error finding a product in the catalog.
    #[error("Missing product")]
    MissingProduct(ProductKey),

    /// Wrapped pricing error from line total derivation.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// One rendered line of a receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine<'a> {
    /// Product name at the time of sale.
    pub name: String,

    /// Units sold.
    pub quantity: u32,

    /// Price per unit.
    pub unit_price: Money<'a, Currency>,

    /// Units times unit price.
    pub line_total: Money<'a, Currency>,
}

/// Final receipt for a completed order.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    lines: Vec<ReceiptLine<'a>>,
    subtotal: Money<'a, Currency>,
    tax: Money<'a, Currency>,
    total: Money<'a, Currency>,
    tax_rate: Percentage,
    payment: PaymentMethod,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from a completed order, resolving product names
    /// against the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::MissingProduct`] if an ordered product is not
    /// in the catalog, or a wrapped [`PricingError`] if a line total
    /// overflows.
    pub fn from_order(
        order: &CompletedOrder<'a>,
        catalog: &Catalog<'a>,
    ) -> Result<Self, ReceiptError> {
        let mut lines = Vec::with_capacity(order.lines().len());

        for cart_line in order.lines() {
            let product = catalog
                .get(cart_line.product())
                .ok_or(ReceiptError::MissingProduct(cart_line.product()))?;

            lines.push(ReceiptLine {
                name: product.name.clone(),
                quantity: cart_line.quantity(),
                unit_price: cart_line.unit_price(),
                line_total: cart_line.line_total()?,
            });
        }

        let totals = order.totals();

        Ok(Receipt {
            lines,
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            tax_rate: order.tax_rate(),
            payment: order.payment(),
        })
    }

    /// The receipt lines, in the order they were added to the cart.
    #[must_use]
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Total cost before tax.
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Tax charged on the subtotal.
    #[must_use]
    pub fn tax(&self) -> Money<'a, Currency> {
        self.tax
    }

    /// Total amount settled.
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// The tax rate the order was settled with.
    #[must_use]
    pub fn tax_rate(&self) -> Percentage {
        self.tax_rate
    }

    /// The payment method the order was settled with.
    #[must_use]
    pub fn payment(&self) -> PaymentMethod {
        self.payment
    }

    /// Render the receipt as a table plus a totals summary.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Qty", "Item", "Unit Price", "Amount"]);

        for line in &self.lines {
            builder.push_record([
                line.quantity.to_string(),
                line.name.clone(),
                line.unit_price.to_string(),
                line.line_total.to_string(),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(1, separator);

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..4), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        self.write_summary(&mut out)
    }

    /// Write the aligned totals summary under the table.
    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let tax_label = format!(" Tax ({}%):", percent_points(self.tax_rate));

        let rows = [
            (" Subtotal:", self.subtotal.to_string()),
            (tax_label.as_str(), self.tax.to_string()),
            (" Total:", self.total.to_string()),
        ];

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in &rows {
            writeln!(out, "{label:>label_width$}  {value:>value_width$}")
                .map_err(|_err| ReceiptError::IO)?;
        }

        writeln!(out, "\n Paid via {}\n", self.payment).map_err(|_err| ReceiptError::IO)
    }
}
