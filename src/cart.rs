//! Cart

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    catalog::ProductKey,
    pricing::{self, PricingError},
};

/// Errors related to cart mutation.
#[derive(Debug, Error)]
pub enum CartError {
    /// An item's currency differs from the cart currency (item currency, cart currency).
    #[error("Item has currency {0}, but cart has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// One product line within a cart.
///
/// The unit price is captured when the product is first added, so the cart
/// totals without consulting the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    product: ProductKey,
    unit_price: Money<'a, Currency>,
    quantity: u32,
}

impl<'a> CartLine<'a> {
    /// Returns the product this line refers to.
    #[must_use]
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Returns the unit price captured when the line was created.
    #[must_use]
    pub fn unit_price(&self) -> Money<'a, Currency> {
        self.unit_price
    }

    /// Returns the quantity on the line, always at least one.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Calculate the total price of the line.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the multiplication overflows.
    pub fn line_total(&self) -> Result<Money<'a, Currency>, PricingError> {
        pricing::line_total(self.unit_price, self.quantity)
    }
}

/// The current order: product lines in insertion order, one line per product.
#[derive(Debug)]
pub struct Cart<'a> {
    lines: SmallVec<[CartLine<'a>; 8]>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create a new empty cart for the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: SmallVec::new(),
            currency,
        }
    }

    /// Add one unit of a product to the cart.
    ///
    /// If a line for the product already exists its quantity is incremented,
    /// otherwise a new line is appended with quantity one. Returns the
    /// line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::CurrencyMismatch`] if the unit price is not in
    /// the cart currency.
    pub fn add_item(
        &mut self,
        product: ProductKey,
        unit_price: Money<'a, Currency>,
    ) -> Result<u32, CartError> {
        if unit_price.currency() != self.currency {
            return Err(CartError::CurrencyMismatch(
                unit_price.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(line) = self.lines.iter_mut().find(|line| line.product == product) {
            line.quantity = line.quantity.saturating_add(1);

            return Ok(line.quantity);
        }

        self.lines.push(CartLine {
            product,
            unit_price,
            quantity: 1,
        });

        Ok(1)
    }

    /// Set the quantity on a product's line.
    ///
    /// A quantity of zero removes the line. Unknown products are a silent
    /// no-op. Returns the new quantity when a line was updated, `None` when
    /// the line was removed or absent.
    pub fn update_quantity(&mut self, product: ProductKey, quantity: u32) -> Option<u32> {
        if quantity == 0 {
            self.remove_item(product);

            return None;
        }

        let line = self.lines.iter_mut().find(|line| line.product == product)?;
        line.quantity = quantity;

        Some(quantity)
    }

    /// Remove a product's line from the cart.
    ///
    /// Returns whether a line was removed; unknown products are a silent
    /// no-op.
    pub fn remove_item(&mut self, product: ProductKey) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product != product);

        self.lines.len() != before
    }

    /// Empty the cart unconditionally.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Calculate the subtotal of the cart.
    ///
    /// Recomputed on every call, never cached.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if minor-unit arithmetic overflows.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        let mut minor = 0i64;

        for line in &self.lines {
            minor = minor
                .checked_add(line.line_total()?.to_minor_units())
                .ok_or(PricingError::AmountOverflow)?;
        }

        Ok(Money::from_minor(minor, self.currency))
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn line(&self, product: ProductKey) -> Option<&CartLine<'a>> {
        self.lines.iter().find(|line| line.product == product)
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.lines.iter()
    }

    /// Get the number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
