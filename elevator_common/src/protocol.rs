//! Request/response payloads exchanged between client and server.
//!
//! The transport is one JSON document per line over TCP: the client writes a
//! single [`Request`] line, the server answers with a single [`Response`] line
//! and closes the connection. System types and statuses travel as plain
//! strings and are parsed case-insensitively on the server.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogItemPatch, CatalogRecord};
use crate::error::QuoteError;
use crate::invoice::{Invoice, InvoiceDraft, InvoiceFilter, InvoicePatch};
use crate::quote::{LineEdit, Quote};

/// Command sent by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Request {
    /// Price every active catalog item of a system type.
    CalculateQuote {
        /// `gearless` or `hydraulic`, any case.
        system_type: String,
        /// Number of stops, validated on the server.
        stop_count: u32,
    },
    /// List catalog records.
    InventoryItems {
        /// Only records of this system type.
        #[serde(default)]
        category: Option<String>,
        /// Only records with this active flag.
        #[serde(default)]
        is_active: Option<bool>,
    },
    /// Fetch one catalog record.
    InventoryItem {
        /// Catalog item id.
        item_id: u32,
    },
    /// Patch one catalog record.
    UpdateInventoryItem {
        /// Catalog item id.
        item_id: u32,
        /// Fields to change.
        input: CatalogItemPatch,
    },
    /// List stored invoices.
    Invoices {
        /// Status filter and paging.
        #[serde(default)]
        filter: InvoiceFilter,
    },
    /// Fetch one invoice by id.
    Invoice {
        /// Invoice id.
        id: u64,
    },
    /// Fetch one invoice by number.
    InvoiceByNumber {
        /// Invoice number, `INV-YYMM-NNNN`.
        invoice_number: String,
    },
    /// Store a new invoice.
    CreateInvoice {
        /// Invoice contents.
        input: InvoiceDraft,
    },
    /// Patch a stored invoice.
    UpdateInvoice {
        /// Invoice id.
        id: u64,
        /// Fields to change.
        input: InvoicePatch,
    },
    /// Change one line of a stored invoice.
    EditInvoiceLine {
        /// Invoice id.
        id: u64,
        /// Line change.
        edit: LineEdit,
    },
    /// Remove a stored invoice.
    DeleteInvoice {
        /// Invoice id.
        id: u64,
    },
    /// Liveness probe.
    Health,
}

/// Answer sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Response {
    /// Result of `calculate_quote`.
    Quote(Quote),
    /// Result of `inventory_items`.
    InventoryItems(Vec<CatalogRecord>),
    /// Result of `inventory_item` and `update_inventory_item`.
    InventoryItem(Option<CatalogRecord>),
    /// Result of `invoices`.
    Invoices(Vec<Invoice>),
    /// Result of `invoice`, `invoice_by_number`, `create_invoice`, `update_invoice`,
    /// `edit_invoice_line`.
    Invoice(Option<Invoice>),
    /// Result of `delete_invoice`.
    Deleted(bool),
    /// Result of `health`.
    Health {
        /// Always `ok`.
        status: String,
        /// Server time.
        timestamp: DateTime<Utc>,
    },
    /// The request could not be served.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

impl Request {
    /// Encode as one JSON line, newline included.
    pub fn to_line(&self) -> Result<Vec<u8>, QuoteError> {
        encode_line(self)
    }

    /// Decode one JSON line.
    pub fn from_line(line: &str) -> Result<Self, QuoteError> {
        Ok(serde_json::from_str(line.trim())?)
    }
}

impl Response {
    /// Encode as one JSON line, newline included.
    pub fn to_line(&self) -> Result<Vec<u8>, QuoteError> {
        encode_line(self)
    }

    /// Decode one JSON line.
    pub fn from_line(line: &str) -> Result<Self, QuoteError> {
        Ok(serde_json::from_str(line.trim())?)
    }

    /// Turn an `Error` response into `QuoteError::Remote`.
    pub fn into_result(self) -> Result<Self, QuoteError> {
        match self {
            Response::Error { message } => Err(QuoteError::Remote(message)),
            other => Ok(other),
        }
    }
}

impl From<QuoteError> for Response {
    fn from(err: QuoteError) -> Self {
        Response::Error {
            message: err.to_string(),
        }
    }
}

fn encode_line<T: Serialize>(value: &T) -> Result<Vec<u8>, QuoteError> {
    let mut bytes = serde_json::to_vec(value)?;
    bytes.push(b'\n');
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wire_format() {
        let req = Request::CalculateQuote {
            system_type: "GEARLESS".to_string(),
            stop_count: 7,
        };
        let line = String::from_utf8(req.to_line().unwrap()).unwrap();
        assert_eq!(
            line,
            "{\"op\":\"calculate_quote\",\"systemType\":\"GEARLESS\",\"stopCount\":7}\n"
        );
        assert_eq!(Request::from_line(&line).unwrap(), req);
    }

    #[test]
    fn optional_fields_may_be_omitted() {
        let req = Request::from_line(r#"{"op":"inventory_items"}"#).unwrap();
        assert_eq!(
            req,
            Request::InventoryItems {
                category: None,
                is_active: None
            }
        );
        let req = Request::from_line(r#"{"op":"invoices"}"#).unwrap();
        assert_eq!(
            req,
            Request::Invoices {
                filter: InvoiceFilter::default()
            }
        );
        assert_eq!(Request::from_line(r#"{"op":"health"}"#).unwrap(), Request::Health);
    }

    #[test]
    fn line_edit_wire_format() {
        let req = Request::from_line(
            r#"{"op":"edit_invoice_line","id":3,"edit":{"action":"update","itemId":59,"patch":{"quantity":5}}}"#,
        )
        .unwrap();
        let Request::EditInvoiceLine { id, edit } = req else {
            panic!("unexpected {:?}", req);
        };
        assert_eq!(id, 3);
        let LineEdit::Update { item_id, patch } = edit else {
            panic!("unexpected {:?}", edit);
        };
        assert_eq!(item_id, 59);
        assert_eq!(patch.quantity, Some(5.0));

        let req = Request::from_line(
            r#"{"op":"edit_invoice_line","id":3,"edit":{"action":"add","name":"paint","unit":"عدد","quantity":2,"unitPrice":5}}"#,
        )
        .unwrap();
        assert!(matches!(req, Request::EditInvoiceLine { edit: LineEdit::Add { .. }, .. }));
    }

    #[test]
    fn error_response_becomes_remote_error() {
        let resp: Response = QuoteError::InvoiceNotFound(3).into();
        let decoded = Response::from_line(&String::from_utf8(resp.to_line().unwrap()).unwrap()).unwrap();
        match decoded.into_result() {
            Err(QuoteError::Remote(message)) => assert_eq!(message, "Invoice not found: 3"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
