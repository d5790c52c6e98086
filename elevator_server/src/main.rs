//! Elevator pre-invoice server binary.
//!
//! Usage example (CLI):
//! ```bash
//! elevator_server --bind 0.0.0.0:4000 --catalog data/catalog.json --store data/invoices.json
//! ```
use std::net::TcpStream;
use std::sync::Arc;

use clap::Parser;
use crossbeam_channel::unbounded;
use elevator_common::Result;
use elevator_common::catalog::Catalog;
use elevator_common::store::{InvoiceStore, JsonFileInvoiceStore, MemoryInvoiceStore};
use elevator_server::args::Args;
use elevator_server::worker::spawn_workers;
use elevator_server::{CommandReceiver, QuoteService};
use log::{error, info, warn};

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    let catalog = Catalog::load(&args.catalog)?;
    info!(
        "Catalog {} loaded: {} records",
        args.catalog.display(),
        catalog.len()
    );
    if catalog.is_empty() {
        warn!("Catalog is empty, every quote will have no lines");
    }

    let store: Box<dyn InvoiceStore> = match &args.store {
        Some(path) => {
            let store = JsonFileInvoiceStore::open(path)?;
            info!("Invoices are stored in {}", store.path().display());
            Box::new(store)
        }
        None => {
            warn!("No --store given, invoices are kept in memory only");
            Box::new(MemoryInvoiceStore::new())
        }
    };

    let service = Arc::new(QuoteService::new(catalog, Some(args.catalog.clone()), store));
    let receiver = CommandReceiver::new(&args.bind)?;

    let (conn_tx, conn_rx) = unbounded::<TcpStream>();
    let workers = spawn_workers(args.workers, conn_rx, Arc::clone(&service));
    info!("{} workers serving requests", workers.len());

    if let Err(e) = receiver.accept_loop(conn_tx) {
        error!("Receiver loop failed: {}", e);
        return Err(e);
    }

    for worker in workers {
        if worker.join().is_err() {
            error!("A worker thread panicked");
        }
    }
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
