//! Command-line arguments for the quote client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::{Parser, Subcommand};
use elevator_common::invoice::InvoiceStatus;
use elevator_common::net::{COMMAND_PORT, addr};
use elevator_common::system::Category;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Elevator pre-invoice client", long_about = None)]
pub struct Args {
    /// Server address as `host:port`.
    #[clap(long, default_value_t = addr("127.0.0.1", COMMAND_PORT))]
    pub server: String,

    /// Print the raw JSON response instead of a table.
    #[clap(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: ClientCommand,
}

/// Top-level actions.
#[derive(Debug, Subcommand)]
pub enum ClientCommand {
    /// Price the catalog for a system type and stop count.
    Quote {
        /// System type.
        #[clap(long, value_enum)]
        system: Category,
        /// Number of stops.
        #[clap(long)]
        stops: u32,
    },
    /// Inspect or edit the inventory catalog.
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage stored invoices.
    Invoice {
        #[command(subcommand)]
        action: InvoiceAction,
    },
    /// Check that the server is up.
    Health,
}

/// Catalog subcommands.
#[derive(Debug, Subcommand)]
pub enum CatalogAction {
    /// List catalog records.
    List {
        /// Only this system type.
        #[clap(long, value_enum)]
        category: Option<Category>,
        /// Only active (`true`) or inactive (`false`) records.
        #[clap(long)]
        active: Option<bool>,
    },
    /// Show one catalog record.
    Show {
        /// Catalog item id.
        item_id: u32,
    },
    /// Change price, activity, or formula parameters of a record.
    Update {
        /// Catalog item id.
        item_id: u32,
        /// New unit price.
        #[clap(long)]
        price: Option<f64>,
        /// New active flag.
        #[clap(long)]
        active: Option<bool>,
        /// New fixed quantity.
        #[clap(long)]
        fixed_qty: Option<f64>,
        /// New ratio reference stop count.
        #[clap(long)]
        ratio_stops: Option<u32>,
        /// New ratio reference quantity.
        #[clap(long)]
        ratio_qty: Option<u32>,
    },
}

/// Invoice subcommands.
#[derive(Debug, Subcommand)]
pub enum InvoiceAction {
    /// List invoices, newest first.
    List {
        /// Only this status.
        #[clap(long, value_enum)]
        status: Option<InvoiceStatus>,
        /// Page size.
        #[clap(long)]
        limit: Option<usize>,
        /// Invoices to skip.
        #[clap(long)]
        offset: Option<usize>,
    },
    /// Show one invoice by id.
    Show {
        /// Invoice id.
        id: u64,
    },
    /// Show one invoice by number, e.g. `INV-2610-0001`.
    Find {
        /// Invoice number.
        number: String,
    },
    /// Compute a quote and store it as a draft invoice.
    Create {
        /// System type.
        #[clap(long, value_enum)]
        system: Category,
        /// Number of stops.
        #[clap(long)]
        stops: u32,
        /// Customer name.
        #[clap(long)]
        customer: Option<String>,
        /// Free-form notes.
        #[clap(long)]
        notes: Option<String>,
    },
    /// Change customer, status, or notes of an invoice.
    Update {
        /// Invoice id.
        id: u64,
        /// New customer name.
        #[clap(long)]
        customer: Option<String>,
        /// New status.
        #[clap(long, value_enum)]
        status: Option<InvoiceStatus>,
        /// New notes.
        #[clap(long)]
        notes: Option<String>,
    },
    /// Edit one line of an invoice.
    EditLine {
        /// Invoice id.
        id: u64,
        /// Item id of the line.
        item_id: u32,
        /// New name.
        #[clap(long)]
        name: Option<String>,
        /// New unit label.
        #[clap(long)]
        unit: Option<String>,
        /// New quantity.
        #[clap(long)]
        quantity: Option<f64>,
        /// New unit price.
        #[clap(long)]
        price: Option<f64>,
    },
    /// Append a custom line to an invoice.
    AddLine {
        /// Invoice id.
        id: u64,
        /// Name of the new line.
        #[clap(long)]
        name: String,
        /// Unit label.
        #[clap(long, default_value = "عدد")]
        unit: String,
        /// Quantity.
        #[clap(long, default_value_t = 1.0)]
        quantity: f64,
        /// Unit price.
        #[clap(long, default_value_t = 0.0)]
        price: f64,
    },
    /// Remove every line with an item id from an invoice.
    RemoveLine {
        /// Invoice id.
        id: u64,
        /// Item id of the line.
        item_id: u32,
    },
    /// Delete an invoice.
    Delete {
        /// Invoice id.
        id: u64,
    },
}
