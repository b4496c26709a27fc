//! Pricing

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors that can occur while deriving prices and totals.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// A minor-unit amount overflowed the representable range.
    #[error("amount overflowed minor-unit arithmetic")]
    AmountOverflow,

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// Calculates the total price for a quantity of a single item.
///
/// # Errors
///
/// Returns [`PricingError::AmountOverflow`] if the multiplication overflows
/// the minor-unit range.
pub fn line_total<'a>(
    unit_price: Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::AmountOverflow)?;

    Ok(Money::from_minor(minor, unit_price.currency()))
}

/// Calculates the tax due on an amount at the given rate.
///
/// The calculation happens in decimal space on minor units and is rounded
/// midpoint-away-from-zero at the minor-unit boundary, so intermediate
/// precision is never lost to compounding.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the rate cannot be safely
/// applied to the amount.
pub fn tax_amount<'a>(
    amount: Money<'a, Currency>,
    rate: Percentage,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = tax_on_minor(rate, amount.to_minor_units())?;

    Ok(Money::from_minor(minor, amount.currency()))
}

/// Calculates the tax in minor units for a rate and a minor-unit amount.
fn tax_on_minor(rate: Percentage, minor: i64) -> Result<i64, PricingError> {
    let Some(minor) = Decimal::from_i64(minor) else {
        unreachable!("always returns `Some` for every `i64`")
    };

    let applied = rate * minor;

    let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let Some(rounded) = rounded.to_i64() else {
        return Err(PricingError::PercentConversion);
    };

    Ok(rounded)
}

/// Converts a fractional rate to percent points for display.
pub fn percent_points(rate: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.10), so multiply by 100 to print percent points.
    ((rate * Decimal::ONE) * Decimal::ONE_HUNDRED)
        .round_dp(2)
        .normalize()
}
