//! Storefront Demo
//!
//! Walks one full point-of-sale session: browse the catalog, build an
//! order, check out, and print the receipt plus the admin report tables.
//!
//! Use `-f` to load a fixture set by name
//! Use `-c` / `-q` to filter the displayed menu by category / search query
//! Use `--no-reports` to skip the admin tables

#![expect(clippy::print_stdout, reason = "Example code")]

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tabled::{
    builder::Builder,
    settings::{Alignment, Color, Style, object::{Columns, Rows}},
};

use till::{
    catalog::{Catalog, CatalogFilter, ProductKey},
    checkout::PaymentMethod,
    fixtures::Fixture,
    receipt::Receipt,
    reports::{write_staff_table, write_stock_table},
    session::{Session, SessionObserver},
    utils::StorefrontArgs,
};

/// Observer that narrates session changes the way a UI would re-render.
#[derive(Debug)]
struct Narrator;

impl SessionObserver for Narrator {
    fn item_added(&mut self, _product: ProductKey, quantity: u32) {
        println!("  + item added to cart (x{quantity})");
    }

    fn checkout_opened(&mut self) {
        println!("  > checkout opened");
    }

    fn payment_selected(&mut self, method: PaymentMethod) {
        println!("  > paying via {method}");
    }

    fn order_completed(&mut self, receipt: &Receipt<'_>) {
        println!("  > order completed: {}", receipt.total());
    }
}

pub fn main() -> Result<()> {
    let args = StorefrontArgs::parse();

    let mut fixture = Fixture::from_set(&args.fixture)?;

    let currency = fixture
        .currency()
        .context("fixture set has no products")?;

    let catalog = fixture.take_catalog();
    let mut directory = fixture.take_directory()?;

    let filter = CatalogFilter {
        category: args.category.clone(),
        query: args.query.clone(),
    };

    print_menu(&catalog, &filter);

    let mut session = Session::new(currency);
    let mut narrator = Narrator;

    for (key, quantity) in [("cheeseburger", 2u32), ("coca-cola", 1u32)] {
        let product_key = fixture
            .product_key(key)
            .with_context(|| format!("product {key} missing from fixture set"))?;

        let price = catalog
            .get(product_key)
            .with_context(|| format!("product {key} missing from catalog"))?
            .price;

        for _ in 0..quantity {
            session.add_item_with_observer(product_key, price, &mut narrator)?;
        }
    }

    if let Some((jane, record)) = directory.search("jane").first().copied() {
        println!("  > customer attached: {}", record.name);
        session.attach_customer(jane);
    }

    session.begin_checkout_with_observer(&mut narrator)?;
    session.select_payment_with_observer(PaymentMethod::Cash, &mut narrator)?;

    let receipt =
        session.complete_checkout_with_observer(&catalog, &mut directory, &mut narrator)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    receipt.write_to(&mut handle)?;

    if !args.no_reports {
        write_stock_table(&mut handle, fixture.stock())?;
        write_staff_table(&mut handle, fixture.staff())?;

        if let Some(sales) = fixture.sales() {
            sales.write_to(&mut handle)?;
        }
    }

    Ok(())
}

/// Print the filtered menu the way the product grid displays it.
fn print_menu(catalog: &Catalog<'_>, filter: &CatalogFilter) {
    let listing = catalog.list(filter);

    if listing.is_empty() {
        println!("\nNo products found.");

        return;
    }

    let mut builder = Builder::default();

    builder.push_record(["Item", "Category", "Price"]);

    for (_, product) in listing {
        builder.push_record([
            product.name.clone(),
            product.category.clone(),
            product.price.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..3), Alignment::right());

    println!("\n{table}");
}
