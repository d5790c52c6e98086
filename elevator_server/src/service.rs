//! Request dispatch over the catalog snapshot and the invoice store.
//!
//! Quotes are computed from a typed copy of the catalog taken under a short read
//! lock, so concurrent quote requests never wait on each other. Catalog edits
//! take the write lock and are written back to the catalog file when one is
//! configured.
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::Utc;
use elevator_common::QuoteError;
use elevator_common::catalog::{Catalog, CatalogItemPatch, CatalogRecord};
use elevator_common::protocol::{Request, Response};
use elevator_common::quote::{Quote, build_quote};
use elevator_common::store::InvoiceStore;
use elevator_common::system::{Category, StopCount};
use log::{info, warn};

/// Shared state behind every worker.
pub struct QuoteService {
    catalog: RwLock<Catalog>,
    catalog_path: Option<PathBuf>,
    store: Box<dyn InvoiceStore>,
}

impl QuoteService {
    /// Create a service. Catalog edits are persisted only if `catalog_path` is set.
    pub fn new(catalog: Catalog, catalog_path: Option<PathBuf>, store: Box<dyn InvoiceStore>) -> Self {
        Self {
            catalog: RwLock::new(catalog),
            catalog_path,
            store,
        }
    }

    /// Answer one request. Failures become [`Response::Error`].
    pub fn handle(&self, request: Request) -> Response {
        match self.dispatch(request) {
            Ok(response) => response,
            Err(e) => {
                warn!("Request failed: {}", e);
                Response::from(e)
            }
        }
    }

    fn dispatch(&self, request: Request) -> Result<Response, QuoteError> {
        let response = match request {
            Request::CalculateQuote {
                system_type,
                stop_count,
            } => Response::Quote(self.calculate_quote(&system_type, stop_count)?),
            Request::InventoryItems {
                category,
                is_active,
            } => {
                let category = category.as_deref().map(Category::parse).transpose()?;
                Response::InventoryItems(self.catalog.read()?.items(category, is_active))
            }
            Request::InventoryItem { item_id } => {
                Response::InventoryItem(self.catalog.read()?.item(item_id).cloned())
            }
            Request::UpdateInventoryItem { item_id, input } => {
                Response::InventoryItem(Some(self.update_inventory_item(item_id, &input)?))
            }
            Request::Invoices { filter } => Response::Invoices(self.store.list(&filter)?),
            Request::Invoice { id } => Response::Invoice(self.store.get(id)?),
            Request::InvoiceByNumber { invoice_number } => {
                Response::Invoice(self.store.get_by_number(&invoice_number)?)
            }
            Request::CreateInvoice { input } => {
                let invoice = self.store.create(input, Utc::now())?;
                info!(
                    "Invoice {} created for {} ({} lines, total {})",
                    invoice.invoice_number,
                    invoice.customer_name,
                    invoice.quote.items().len(),
                    invoice.grand_total()
                );
                Response::Invoice(Some(invoice))
            }
            Request::UpdateInvoice { id, input } => {
                Response::Invoice(Some(self.store.update(id, input, Utc::now())?))
            }
            Request::EditInvoiceLine { id, edit } => {
                let invoice = self.store.edit_line(id, &edit, Utc::now())?;
                info!(
                    "Invoice {} line edit applied, total {}",
                    invoice.invoice_number,
                    invoice.grand_total()
                );
                Response::Invoice(Some(invoice))
            }
            Request::DeleteInvoice { id } => {
                let deleted = self.store.delete(id)?;
                if deleted {
                    info!("Invoice {} deleted", id);
                }
                Response::Deleted(deleted)
            }
            Request::Health => Response::Health {
                status: "ok".to_string(),
                timestamp: Utc::now(),
            },
        };
        Ok(response)
    }

    /// Validate the inputs and price the catalog for them.
    pub fn calculate_quote(&self, system_type: &str, stop_count: u32) -> Result<Quote, QuoteError> {
        let category = Category::parse(system_type)?;
        let stops = StopCount::new(stop_count)?;
        let items = self.catalog.read()?.typed_items();

        let quote = build_quote(&items, category, stops.get());
        if quote.is_empty() {
            warn!("Quote for {} with {} stops has no lines", category, stops.get());
        }
        Ok(quote)
    }

    fn update_inventory_item(
        &self,
        item_id: u32,
        patch: &CatalogItemPatch,
    ) -> Result<CatalogRecord, QuoteError> {
        let mut catalog = self.catalog.write()?;
        let mut next = catalog.clone();
        let record = next.update_item(item_id, patch)?.clone();
        if let Some(path) = &self.catalog_path {
            next.save(path)?;
        }
        *catalog = next;
        info!("Catalog item {} updated", item_id);
        Ok(record)
    }
}
