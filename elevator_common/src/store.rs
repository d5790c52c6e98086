//! Invoice persistence.
//!
//! Two stores implement [`InvoiceStore`]:
//! - `MemoryInvoiceStore` keeps everything in process memory (tests, demos);
//! - `JsonFileInvoiceStore` keeps the same state in one JSON file and rewrites
//!   it after every change.
//!
//! Ids and invoice numbers are derived from the stored state while the store
//! lock is held, so they survive restarts and never collide between concurrent
//! writers sharing one store.
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::QuoteError;
use crate::invoice::{
    DEFAULT_CUSTOMER, DEFAULT_LIST_LIMIT, Invoice, InvoiceDraft, InvoiceFilter, InvoicePatch,
    InvoiceStatus, invoice_number, month_prefix, sequence_of,
};
use crate::quote::{LineEdit, Quote};

/// Operations every invoice store supports.
pub trait InvoiceStore: Send + Sync {
    /// Store a new draft invoice created at `now`.
    fn create(&self, draft: InvoiceDraft, now: DateTime<Utc>) -> Result<Invoice, QuoteError>;

    /// Invoice with `id`, if any.
    fn get(&self, id: u64) -> Result<Option<Invoice>, QuoteError>;

    /// Invoice with `invoice_number`, if any.
    fn get_by_number(&self, invoice_number: &str) -> Result<Option<Invoice>, QuoteError>;

    /// Newest-first page of invoices matching `filter`.
    fn list(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, QuoteError>;

    /// Apply `patch` to invoice `id` at `now`.
    fn update(&self, id: u64, patch: InvoicePatch, now: DateTime<Utc>) -> Result<Invoice, QuoteError>;

    /// Apply one line edit to the quote of invoice `id` at `now`.
    ///
    /// The edit runs against the stored lines under the store lock, so two
    /// clients editing different lines of one invoice never overwrite each other.
    fn edit_line(&self, id: u64, edit: &LineEdit, now: DateTime<Utc>) -> Result<Invoice, QuoteError>;

    /// Remove invoice `id`. Returns `false` if it did not exist.
    fn delete(&self, id: u64) -> Result<bool, QuoteError>;
}

/// Everything a store persists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreState {
    next_id: u64,
    invoices: Vec<Invoice>,
}

impl StoreState {
    fn next_sequence(&self, prefix: &str) -> u32 {
        self.invoices
            .iter()
            .filter_map(|inv| sequence_of(&inv.invoice_number, prefix))
            .max()
            .unwrap_or(0)
            + 1
    }

    fn create(&mut self, draft: InvoiceDraft, now: DateTime<Utc>) -> Invoice {
        let prefix = month_prefix(now);
        let sequence = self.next_sequence(&prefix);
        self.next_id = self.next_id.max(1);
        let id = self.next_id;
        self.next_id += 1;

        let customer_name = draft
            .customer_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_CUSTOMER.to_string());

        let invoice = Invoice {
            id,
            invoice_number: invoice_number(now, sequence),
            customer_name,
            system_type: draft.system_type,
            stop_count: draft.stop_count,
            quote: Quote::from_lines(draft.items),
            status: InvoiceStatus::Draft,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        };
        self.invoices.push(invoice.clone());
        invoice
    }

    fn get(&self, id: u64) -> Option<Invoice> {
        self.invoices.iter().find(|inv| inv.id == id).cloned()
    }

    fn get_by_number(&self, invoice_number: &str) -> Option<Invoice> {
        self.invoices
            .iter()
            .find(|inv| inv.invoice_number == invoice_number)
            .cloned()
    }

    fn list(&self, filter: &InvoiceFilter) -> Vec<Invoice> {
        let mut matching: Vec<&Invoice> = self
            .invoices
            .iter()
            .filter(|inv| filter.status.is_none_or(|s| inv.status == s))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        matching
            .into_iter()
            .skip(filter.offset.unwrap_or(0))
            .take(filter.limit.unwrap_or(DEFAULT_LIST_LIMIT))
            .cloned()
            .collect()
    }

    fn update(&mut self, id: u64, patch: InvoicePatch, now: DateTime<Utc>) -> Result<Invoice, QuoteError> {
        let invoice = self
            .invoices
            .iter_mut()
            .find(|inv| inv.id == id)
            .ok_or(QuoteError::InvoiceNotFound(id))?;

        if let Some(name) = patch.customer_name.filter(|n| !n.trim().is_empty()) {
            invoice.customer_name = name;
        }
        if let Some(items) = patch.items {
            invoice.quote = Quote::from_lines(items);
        }
        if let Some(status) = patch.status {
            invoice.status = status;
        }
        if let Some(notes) = patch.notes {
            invoice.notes = Some(notes);
        }
        invoice.updated_at = now;
        Ok(invoice.clone())
    }

    fn edit_line(&mut self, id: u64, edit: &LineEdit, now: DateTime<Utc>) -> Result<Invoice, QuoteError> {
        let invoice = self
            .invoices
            .iter_mut()
            .find(|inv| inv.id == id)
            .ok_or(QuoteError::InvoiceNotFound(id))?;
        invoice.quote.apply(edit)?;
        invoice.updated_at = now;
        Ok(invoice.clone())
    }

    fn delete(&mut self, id: u64) -> bool {
        let before = self.invoices.len();
        self.invoices.retain(|inv| inv.id != id);
        self.invoices.len() != before
    }
}

/// Invoice store living in process memory.
#[derive(Debug, Default)]
pub struct MemoryInvoiceStore {
    state: Mutex<StoreState>,
}

impl MemoryInvoiceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl InvoiceStore for MemoryInvoiceStore {
    fn create(&self, draft: InvoiceDraft, now: DateTime<Utc>) -> Result<Invoice, QuoteError> {
        Ok(self.state.lock()?.create(draft, now))
    }

    fn get(&self, id: u64) -> Result<Option<Invoice>, QuoteError> {
        Ok(self.state.lock()?.get(id))
    }

    fn get_by_number(&self, invoice_number: &str) -> Result<Option<Invoice>, QuoteError> {
        Ok(self.state.lock()?.get_by_number(invoice_number))
    }

    fn list(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, QuoteError> {
        Ok(self.state.lock()?.list(filter))
    }

    fn update(&self, id: u64, patch: InvoicePatch, now: DateTime<Utc>) -> Result<Invoice, QuoteError> {
        self.state.lock()?.update(id, patch, now)
    }

    fn edit_line(&self, id: u64, edit: &LineEdit, now: DateTime<Utc>) -> Result<Invoice, QuoteError> {
        self.state.lock()?.edit_line(id, edit, now)
    }

    fn delete(&self, id: u64) -> Result<bool, QuoteError> {
        Ok(self.state.lock()?.delete(id))
    }
}

/// Invoice store backed by a single JSON file.
#[derive(Debug)]
pub struct JsonFileInvoiceStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl JsonFileInvoiceStore {
    /// Open the store at `path`, starting empty if the file does not exist yet.
    pub fn open(path: &Path) -> Result<Self, QuoteError> {
        let state = if path.exists() {
            let file = File::open(path)?;
            serde_json::from_reader(BufReader::new(file))?
        } else {
            info!("Invoice store {} does not exist, starting empty", path.display());
            StoreState::default()
        };
        debug!("Opened invoice store {} with {} invoices", path.display(), state.invoices.len());
        Ok(Self {
            path: path.to_path_buf(),
            state: Mutex::new(state),
        })
    }

    /// File backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InvoiceStore for JsonFileInvoiceStore {
    fn create(&self, draft: InvoiceDraft, now: DateTime<Utc>) -> Result<Invoice, QuoteError> {
        let mut state = self.state.lock()?;
        let mut next = state.clone();
        let invoice = next.create(draft, now);
        write_json_atomically(&self.path, &next)?;
        *state = next;
        Ok(invoice)
    }

    fn get(&self, id: u64) -> Result<Option<Invoice>, QuoteError> {
        Ok(self.state.lock()?.get(id))
    }

    fn get_by_number(&self, invoice_number: &str) -> Result<Option<Invoice>, QuoteError> {
        Ok(self.state.lock()?.get_by_number(invoice_number))
    }

    fn list(&self, filter: &InvoiceFilter) -> Result<Vec<Invoice>, QuoteError> {
        Ok(self.state.lock()?.list(filter))
    }

    fn update(&self, id: u64, patch: InvoicePatch, now: DateTime<Utc>) -> Result<Invoice, QuoteError> {
        let mut state = self.state.lock()?;
        let mut next = state.clone();
        let invoice = next.update(id, patch, now)?;
        write_json_atomically(&self.path, &next)?;
        *state = next;
        Ok(invoice)
    }

    fn edit_line(&self, id: u64, edit: &LineEdit, now: DateTime<Utc>) -> Result<Invoice, QuoteError> {
        let mut state = self.state.lock()?;
        let mut next = state.clone();
        let invoice = next.edit_line(id, edit, now)?;
        write_json_atomically(&self.path, &next)?;
        *state = next;
        Ok(invoice)
    }

    fn delete(&self, id: u64) -> Result<bool, QuoteError> {
        let mut state = self.state.lock()?;
        let mut next = state.clone();
        if !next.delete(id) {
            return Ok(false);
        }
        write_json_atomically(&self.path, &next)?;
        *state = next;
        Ok(true)
    }
}

/// Serialize `value` as pretty JSON to a sibling temp file, then rename it over `path`.
pub(crate) fn write_json_atomically<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), QuoteError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
