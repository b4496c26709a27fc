//! Checkout

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine},
    pricing::{self, PricingError},
};

/// Default tax rate applied to checkout totals (10%).
#[must_use]
pub fn default_tax_rate() -> Percentage {
    Percentage::from(Decimal::new(10, 2))
}

/// The payment methods a customer can settle an order with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Physical cash at the counter.
    Cash,

    /// Credit or debit card.
    CreditCard,

    /// Phone or watch wallet payment.
    DigitalWallet,
}

impl PaymentMethod {
    /// Every available payment method, in display order.
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::CreditCard,
        PaymentMethod::Cash,
        PaymentMethod::DigitalWallet,
    ];

    /// Stable identifier for the method.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DigitalWallet => "digital_wallet",
        }
    }

    /// Human-readable name for the method.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DigitalWallet => "Digital Wallet",
        }
    }

    /// Short description shown alongside the method.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Pay with cash at the counter",
            PaymentMethod::CreditCard => "Pay by credit or debit card",
            PaymentMethod::DigitalWallet => "Pay with a phone or watch wallet",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Rejected checkout transitions.
///
/// These are user-facing validation outcomes, not system failures; the flow
/// and the cart are left unchanged by every rejection.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was requested while the cart had no lines.
    #[error("cannot open checkout with an empty cart")]
    EmptyCart,

    /// A transition that requires an open checkout was requested while closed.
    #[error("checkout is not open")]
    NotOpen,

    /// Completion was attempted before a payment method was selected.
    #[error("no payment method selected")]
    NoPaymentMethod,

    /// Wrapped pricing error from totals derivation.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Derived totals for an order at the checkout's tax rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals<'a> {
    /// Sum of all line totals before tax.
    pub subtotal: Money<'a, Currency>,

    /// Tax due on the subtotal.
    pub tax: Money<'a, Currency>,

    /// Subtotal plus tax.
    pub total: Money<'a, Currency>,
}

/// Snapshot of an order taken at the moment checkout completes.
#[derive(Debug, Clone)]
pub struct CompletedOrder<'a> {
    lines: Vec<CartLine<'a>>,
    totals: OrderTotals<'a>,
    tax_rate: Percentage,
    payment: PaymentMethod,
}

impl<'a> CompletedOrder<'a> {
    /// The cart lines as they stood when the order completed.
    #[must_use]
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// The totals settled for the order.
    #[must_use]
    pub fn totals(&self) -> OrderTotals<'a> {
        self.totals
    }

    /// The tax rate the totals were derived with.
    #[must_use]
    pub fn tax_rate(&self) -> Percentage {
        self.tax_rate
    }

    /// The payment method the order was settled with.
    #[must_use]
    pub fn payment(&self) -> PaymentMethod {
        self.payment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckoutState {
    Closed,
    Open { selected: Option<PaymentMethod> },
}

/// The short-lived state machine from checkout request to settlement.
///
/// Transitions: Closed → Open → (complete | cancel) → Closed. Both terminal
/// transitions return the flow to Closed; there are no partial-failure
/// states.
#[derive(Debug)]
pub struct CheckoutFlow {
    state: CheckoutState,
    tax_rate: Percentage,
}

impl CheckoutFlow {
    /// Create a closed flow with the default tax rate.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tax_rate(default_tax_rate())
    }

    /// Create a closed flow with a custom tax rate.
    #[must_use]
    pub fn with_tax_rate(tax_rate: Percentage) -> Self {
        CheckoutFlow {
            state: CheckoutState::Closed,
            tax_rate,
        }
    }

    /// The tax rate applied to totals.
    #[must_use]
    pub fn tax_rate(&self) -> Percentage {
        self.tax_rate
    }

    /// Whether the flow is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, CheckoutState::Open { .. })
    }

    /// The currently selected payment method, if any.
    #[must_use]
    pub fn selected_payment(&self) -> Option<PaymentMethod> {
        match self.state {
            CheckoutState::Open { selected } => selected,
            CheckoutState::Closed => None,
        }
    }

    /// Open the flow for the given cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines; the
    /// flow remains Closed.
    pub fn open(&mut self, cart: &Cart<'_>) -> Result<(), CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.state = CheckoutState::Open { selected: None };

        Ok(())
    }

    /// Select the payment method for the order; reselection overwrites.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotOpen`] if the flow is not open.
    pub fn select_payment(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        match self.state {
            CheckoutState::Open { .. } => {
                self.state = CheckoutState::Open {
                    selected: Some(method),
                };

                Ok(())
            }
            CheckoutState::Closed => Err(CheckoutError::NotOpen),
        }
    }

    /// Derive the order totals for a cart at the flow's tax rate.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if minor-unit arithmetic overflows.
    pub fn totals<'a>(&self, cart: &Cart<'a>) -> Result<OrderTotals<'a>, PricingError> {
        let subtotal = cart.subtotal()?;
        let tax = pricing::tax_amount(subtotal, self.tax_rate)?;

        let total_minor = subtotal
            .to_minor_units()
            .checked_add(tax.to_minor_units())
            .ok_or(PricingError::AmountOverflow)?;

        Ok(OrderTotals {
            subtotal,
            tax,
            total: Money::from_minor(total_minor, cart.currency()),
        })
    }

    /// Complete the order: settle totals, clear the cart, close the flow.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotOpen`] if the flow is closed, or
    /// [`CheckoutError::NoPaymentMethod`] if nothing is selected; in both
    /// cases the flow and the cart are unchanged.
    pub fn complete<'a>(
        &mut self,
        cart: &mut Cart<'a>,
    ) -> Result<CompletedOrder<'a>, CheckoutError> {
        let CheckoutState::Open { selected } = self.state else {
            return Err(CheckoutError::NotOpen);
        };

        let Some(payment) = selected else {
            return Err(CheckoutError::NoPaymentMethod);
        };

        let totals = self.totals(cart)?;
        let lines = cart.iter().cloned().collect();

        cart.clear();
        self.state = CheckoutState::Closed;

        Ok(CompletedOrder {
            lines,
            totals,
            tax_rate: self.tax_rate,
            payment,
        })
    }

    /// Cancel the flow, discarding any selection without touching the cart.
    ///
    /// Returns whether the flow was open. Cancelling a closed flow is a
    /// no-op.
    pub fn cancel(&mut self) -> bool {
        let was_open = self.is_open();
        self.state = CheckoutState::Closed;

        was_open
    }
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}
