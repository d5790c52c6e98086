//! Elevator quote client — sends one request to the pre-invoice server and prints
//! the answer. It can price the catalog for a system type and stop count, browse
//! and edit the catalog, and create, list, edit and delete invoices.
//!
//! Usage example (CLI):
//! ```bash
//! elevator_client --server 192.168.0.10:4000 quote --system gearless --stops 7
//! elevator_client invoice create --system hydraulic --stops 4 --customer "Rahimi"
//! elevator_client invoice edit-line 3 59 --quantity 5
//! ```
#![warn(missing_docs)]
mod args;
mod render;
mod sender;

use crate::args::{Args, CatalogAction, ClientCommand, InvoiceAction};
use crate::sender::CommandSender;
use clap::Parser;
use elevator_common::QuoteError;
use elevator_common::Result;
use elevator_common::catalog::CatalogItemPatch;
use elevator_common::invoice::{InvoiceDraft, InvoiceFilter, InvoicePatch};
use elevator_common::protocol::{Request, Response};
use elevator_common::quote::{LineEdit, LinePatch};
use elevator_common::system::{Category, StopCount};
use log::{error, info};

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();
    let sender = CommandSender::new(&args.server);

    let response = match run(&sender, args.command) {
        Ok(response) => response,
        Err(e) => {
            error!("{}", e);
            return Err(e);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }
    Ok(())
}

fn run(sender: &CommandSender, command: ClientCommand) -> Result<Response> {
    match command {
        ClientCommand::Quote { system, stops } => sender.send(&Request::CalculateQuote {
            system_type: system.to_string(),
            stop_count: stops,
        }),
        ClientCommand::Catalog { action } => run_catalog(sender, action),
        ClientCommand::Invoice { action } => run_invoice(sender, action),
        ClientCommand::Health => sender.send(&Request::Health),
    }
}

fn run_catalog(sender: &CommandSender, action: CatalogAction) -> Result<Response> {
    let request = match action {
        CatalogAction::List { category, active } => Request::InventoryItems {
            category: category.map(|c| c.to_string()),
            is_active: active,
        },
        CatalogAction::Show { item_id } => Request::InventoryItem { item_id },
        CatalogAction::Update {
            item_id,
            price,
            active,
            fixed_qty,
            ratio_stops,
            ratio_qty,
        } => Request::UpdateInventoryItem {
            item_id,
            input: CatalogItemPatch {
                unit_price: price,
                is_active: active,
                fixed_qty,
                ratio_stops,
                ratio_qty,
            },
        },
    };
    sender.send(&request)
}

fn run_invoice(sender: &CommandSender, action: InvoiceAction) -> Result<Response> {
    match action {
        InvoiceAction::List {
            status,
            limit,
            offset,
        } => sender.send(&Request::Invoices {
            filter: InvoiceFilter {
                status,
                limit,
                offset,
            },
        }),
        InvoiceAction::Show { id } => sender.send(&Request::Invoice { id }),
        InvoiceAction::Find { number } => sender.send(&Request::InvoiceByNumber {
            invoice_number: number,
        }),
        InvoiceAction::Create {
            system,
            stops,
            customer,
            notes,
        } => create_invoice(sender, system, stops, customer, notes),
        InvoiceAction::Update {
            id,
            customer,
            status,
            notes,
        } => sender.send(&Request::UpdateInvoice {
            id,
            input: InvoicePatch {
                customer_name: customer,
                items: None,
                status,
                notes,
            },
        }),
        InvoiceAction::EditLine {
            id,
            item_id,
            name,
            unit,
            quantity,
            price,
        } => edit_line(
            sender,
            id,
            LineEdit::Update {
                item_id,
                patch: LinePatch {
                    name,
                    unit,
                    quantity,
                    unit_price: price,
                },
            },
        ),
        InvoiceAction::AddLine {
            id,
            name,
            unit,
            quantity,
            price,
        } => edit_line(
            sender,
            id,
            LineEdit::Add {
                name,
                unit,
                quantity,
                unit_price: price,
            },
        ),
        InvoiceAction::RemoveLine { id, item_id } => {
            edit_line(sender, id, LineEdit::Remove { item_id })
        }
        InvoiceAction::Delete { id } => sender.send(&Request::DeleteInvoice { id }),
    }
}

/// Price the catalog, then store the resulting lines as a draft invoice.
fn create_invoice(
    sender: &CommandSender,
    system: Category,
    stops: u32,
    customer: Option<String>,
    notes: Option<String>,
) -> Result<Response> {
    let stop_count = StopCount::new(stops)?;
    let quote = match sender.send(&Request::CalculateQuote {
        system_type: system.to_string(),
        stop_count: stops,
    })? {
        Response::Quote(quote) => quote,
        other => return Err(unexpected(&other)),
    };
    info!(
        "Quote has {} lines, total {}",
        quote.items().len(),
        render::format_amount(quote.grand_total())
    );

    sender.send(&Request::CreateInvoice {
        input: InvoiceDraft {
            customer_name: customer,
            system_type: system,
            stop_count,
            items: quote.into_items(),
            notes,
        },
    })
}

/// Ask the server to apply one line edit to invoice `id`.
fn edit_line(sender: &CommandSender, id: u64, edit: LineEdit) -> Result<Response> {
    info!("Editing a line of invoice {}", id);
    sender.send(&Request::EditInvoiceLine { id, edit })
}

fn unexpected(response: &Response) -> QuoteError {
    QuoteError::Format(format!("Unexpected response: {:?}", response))
}

fn print_response(response: &Response) {
    match response {
        Response::Quote(quote) => render::print_quote(quote),
        Response::InventoryItems(records) => render::print_records(records),
        Response::InventoryItem(Some(record)) => render::print_record(record),
        Response::InventoryItem(None) => println!("No such catalog item"),
        Response::Invoices(invoices) => render::print_invoices(invoices),
        Response::Invoice(Some(invoice)) => render::print_invoice(invoice),
        Response::Invoice(None) => println!("No such invoice"),
        Response::Deleted(true) => println!("Invoice deleted"),
        Response::Deleted(false) => println!("No such invoice"),
        Response::Health { status, timestamp } => println!("{} at {}", status, timestamp),
        Response::Error { message } => println!("Error: {}", message),
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
