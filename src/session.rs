//! Session
//!
//! A session owns the state for one checkout: the cart, the checkout flow,
//! and the customer attached to the order. Mutations go through the session
//! so a presentation layer can subscribe to changes via [`SessionObserver`]
//! instead of polling; the core stays presentation-agnostic.

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    catalog::{Catalog, ProductKey},
    checkout::{CheckoutError, CheckoutFlow, OrderTotals, PaymentMethod},
    customers::{CustomerDirectory, CustomerKey},
    pricing::PricingError,
    receipt::{Receipt, ReceiptError},
};

/// Errors surfaced by session-level operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Wrapped checkout transition rejection.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Wrapped receipt construction error.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
}

/// Callbacks for state changes within a session.
///
/// Every method has an empty default, so observers implement only what they
/// care about.
pub trait SessionObserver {
    /// A unit of a product was added; `quantity` is the line's new quantity.
    fn item_added(&mut self, _product: ProductKey, _quantity: u32) {}

    /// A line's quantity was set directly.
    fn quantity_updated(&mut self, _product: ProductKey, _quantity: u32) {}

    /// A line was removed from the cart.
    fn item_removed(&mut self, _product: ProductKey) {}

    /// The cart was emptied.
    fn cart_cleared(&mut self) {}

    /// The checkout flow opened.
    fn checkout_opened(&mut self) {}

    /// A payment method was selected (reselection overwrites).
    fn payment_selected(&mut self, _method: PaymentMethod) {}

    /// The checkout flow was cancelled.
    fn checkout_cancelled(&mut self) {}

    /// The order settled; the receipt is the final snapshot.
    fn order_completed(&mut self, _receipt: &Receipt<'_>) {}

    /// A customer was attached to the order.
    fn customer_attached(&mut self, _customer: CustomerKey) {}

    /// The attached customer was cleared.
    fn customer_detached(&mut self) {}
}

/// An observer that ignores every callback.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Session-scoped state for one order: cart, checkout flow, and the
/// optionally attached customer.
#[derive(Debug)]
pub struct Session<'a> {
    cart: Cart<'a>,
    checkout: CheckoutFlow,
    customer: Option<CustomerKey>,
}

impl<'a> Session<'a> {
    /// Create a session with an empty cart and a closed checkout flow.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Session {
            cart: Cart::new(currency),
            checkout: CheckoutFlow::new(),
            customer: None,
        }
    }

    /// Create a session whose checkout applies a custom tax rate.
    #[must_use]
    pub fn with_tax_rate(currency: &'static Currency, tax_rate: Percentage) -> Self {
        Session {
            cart: Cart::new(currency),
            checkout: CheckoutFlow::with_tax_rate(tax_rate),
            customer: None,
        }
    }

    /// The session's cart.
    #[must_use]
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// The session's checkout flow.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutFlow {
        &self.checkout
    }

    /// The customer attached to the order, if any.
    #[must_use]
    pub fn customer(&self) -> Option<CustomerKey> {
        self.customer
    }

    /// Add one unit of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the unit price is not in the cart
    /// currency.
    pub fn add_item(
        &mut self,
        product: ProductKey,
        unit_price: Money<'a, Currency>,
    ) -> Result<u32, CartError> {
        self.add_item_with_observer(product, unit_price, &mut NoopObserver)
    }

    /// [`Self::add_item`], reporting the change to an observer.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the unit price is not in the cart
    /// currency.
    pub fn add_item_with_observer(
        &mut self,
        product: ProductKey,
        unit_price: Money<'a, Currency>,
        observer: &mut dyn SessionObserver,
    ) -> Result<u32, CartError> {
        let quantity = self.cart.add_item(product, unit_price)?;
        observer.item_added(product, quantity);

        Ok(quantity)
    }

    /// Set the quantity on a product's line; zero removes it.
    pub fn update_quantity(&mut self, product: ProductKey, quantity: u32) {
        self.update_quantity_with_observer(product, quantity, &mut NoopObserver);
    }

    /// [`Self::update_quantity`], reporting the change to an observer.
    ///
    /// Unknown products stay a silent no-op and report nothing.
    pub fn update_quantity_with_observer(
        &mut self,
        product: ProductKey,
        quantity: u32,
        observer: &mut dyn SessionObserver,
    ) {
        if quantity == 0 {
            self.remove_item_with_observer(product, observer);

            return;
        }

        if let Some(updated) = self.cart.update_quantity(product, quantity) {
            observer.quantity_updated(product, updated);
        }
    }

    /// Remove a product's line from the cart.
    pub fn remove_item(&mut self, product: ProductKey) {
        self.remove_item_with_observer(product, &mut NoopObserver);
    }

    /// [`Self::remove_item`], reporting the change to an observer.
    pub fn remove_item_with_observer(
        &mut self,
        product: ProductKey,
        observer: &mut dyn SessionObserver,
    ) {
        if self.cart.remove_item(product) {
            observer.item_removed(product);
        }
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.clear_cart_with_observer(&mut NoopObserver);
    }

    /// [`Self::clear_cart`], reporting the change to an observer.
    pub fn clear_cart_with_observer(&mut self, observer: &mut dyn SessionObserver) {
        self.cart.clear();
        observer.cart_cleared();
    }

    /// Open the checkout flow for the current cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart is empty.
    pub fn begin_checkout(&mut self) -> Result<(), CheckoutError> {
        self.begin_checkout_with_observer(&mut NoopObserver)
    }

    /// [`Self::begin_checkout`], reporting the change to an observer.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart is empty.
    pub fn begin_checkout_with_observer(
        &mut self,
        observer: &mut dyn SessionObserver,
    ) -> Result<(), CheckoutError> {
        self.checkout.open(&self.cart)?;
        observer.checkout_opened();

        Ok(())
    }

    /// Select the payment method for the order.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotOpen`] if checkout has not been opened.
    pub fn select_payment(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        self.select_payment_with_observer(method, &mut NoopObserver)
    }

    /// [`Self::select_payment`], reporting the change to an observer.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotOpen`] if checkout has not been opened.
    pub fn select_payment_with_observer(
        &mut self,
        method: PaymentMethod,
        observer: &mut dyn SessionObserver,
    ) -> Result<(), CheckoutError> {
        self.checkout.select_payment(method)?;
        observer.payment_selected(method);

        Ok(())
    }

    /// Cancel the checkout flow, leaving the cart untouched.
    pub fn cancel_checkout(&mut self) {
        self.cancel_checkout_with_observer(&mut NoopObserver);
    }

    /// [`Self::cancel_checkout`], reporting the change to an observer.
    pub fn cancel_checkout_with_observer(&mut self, observer: &mut dyn SessionObserver) {
        if self.checkout.cancel() {
            observer.checkout_cancelled();
        }
    }

    /// Derive the order totals for the current cart.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if minor-unit arithmetic overflows.
    pub fn totals(&self) -> Result<OrderTotals<'a>, PricingError> {
        self.checkout.totals(&self.cart)
    }

    /// Complete the order: settle totals, clear the cart, close the flow,
    /// and stamp the purchase on the attached customer, if any.
    ///
    /// The attachment is order-scoped, so completion detaches the customer.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] wrapping the rejected checkout transition
    /// or the receipt failure; rejected completions leave the cart and the
    /// flow unchanged.
    pub fn complete_checkout(
        &mut self,
        catalog: &Catalog<'a>,
        directory: &mut CustomerDirectory<'a>,
    ) -> Result<Receipt<'a>, SessionError> {
        self.complete_checkout_with_observer(catalog, directory, &mut NoopObserver)
    }

    /// [`Self::complete_checkout`], reporting the receipt to an observer.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] wrapping the rejected checkout transition
    /// or the receipt failure; rejected completions leave the cart and the
    /// flow unchanged.
    pub fn complete_checkout_with_observer(
        &mut self,
        catalog: &Catalog<'a>,
        directory: &mut CustomerDirectory<'a>,
        observer: &mut dyn SessionObserver,
    ) -> Result<Receipt<'a>, SessionError> {
        // Resolve every ordered product up front, so a missing product
        // rejects the completion before the flow clears the cart.
        for line in self.cart.iter() {
            if catalog.get(line.product()).is_none() {
                return Err(SessionError::Receipt(ReceiptError::MissingProduct(
                    line.product(),
                )));
            }
        }

        let order = self.checkout.complete(&mut self.cart)?;
        let receipt = Receipt::from_order(&order, catalog)?;

        if let Some(customer) = self.customer.take() {
            directory.record_purchase(customer, receipt.total(), Timestamp::now());
        }

        observer.order_completed(&receipt);

        Ok(receipt)
    }

    /// Attach a customer to the order; reattachment overwrites.
    pub fn attach_customer(&mut self, customer: CustomerKey) {
        self.attach_customer_with_observer(customer, &mut NoopObserver);
    }

    /// [`Self::attach_customer`], reporting the change to an observer.
    pub fn attach_customer_with_observer(
        &mut self,
        customer: CustomerKey,
        observer: &mut dyn SessionObserver,
    ) {
        self.customer = Some(customer);
        observer.customer_attached(customer);
    }

    /// Clear the attached customer, if any.
    pub fn detach_customer(&mut self) {
        self.detach_customer_with_observer(&mut NoopObserver);
    }

    /// [`Self::detach_customer`], reporting the change to an observer.
    pub fn detach_customer_with_observer(&mut self, observer: &mut dyn SessionObserver) {
        if self.customer.take().is_some() {
            observer.customer_detached();
        }
    }
}
