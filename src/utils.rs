//! Utils

use clap::Parser;

/// Arguments for the storefront demo
#[derive(Debug, Parser)]
pub struct StorefrontArgs {
    /// Fixture set to load for the catalog, customers, and reports
    #[clap(short, long, default_value = "storefront")]
    pub fixture: String,

    /// Category to restrict the displayed menu to
    #[clap(short, long)]
    pub category: Option<String>,

    /// Search query to restrict the displayed menu to
    #[clap(short, long)]
    pub query: Option<String>,

    /// Skip the admin report tables
    #[clap(long)]
    pub no_reports: bool,
}
