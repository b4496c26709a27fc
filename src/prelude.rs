//! Till prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine},
    catalog::{ALL_CATEGORIES, Catalog, CatalogFilter, CatalogSource, Product, ProductKey},
    checkout::{
        CheckoutError, CheckoutFlow, CompletedOrder, OrderTotals, PaymentMethod, default_tax_rate,
    },
    customers::{
        CustomerDirectory, CustomerKey, CustomerRecord, CustomerSource, DirectoryError,
        NewCustomer,
    },
    fixtures::{Fixture, FixtureError},
    pricing::PricingError,
    receipt::{Receipt, ReceiptError, ReceiptLine},
    reports::{
        PeriodSales, ReportError, SaleStatus, SalesReport, SalesSummary, StaffRecord, StaffRole,
        StaffStatus, StockRecord, TransactionRecord, write_staff_table, write_stock_table,
    },
    session::{NoopObserver, Session, SessionError, SessionObserver},
};
