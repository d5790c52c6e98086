//! Stored pre-invoices and their numbering.
//!
//! An invoice is a quote frozen together with the customer, system type and
//! stop count it was built for. Invoice numbers look like `INV-2610-0007`:
//! two-digit year, two-digit month, then a four-digit sequence that restarts
//! every month.
use chrono::{DateTime, Datelike, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::QuoteError;
use crate::quote::{Quote, QuoteLineItem};
use crate::system::{Category, StopCount};

/// Customer name used when none is given.
pub const DEFAULT_CUSTOMER: &str = "مشتری";
/// Page size used by listings that do not ask for one.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Lifecycle status of an invoice.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    Hash,
    Eq,
    PartialEq,
)]
#[serde(rename_all = "lowercase")]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum InvoiceStatus {
    /// Editable working copy.
    #[default]
    #[serde(alias = "DRAFT")]
    Draft,
    /// Issued to the customer.
    #[serde(alias = "FINALIZED")]
    Finalized,
    /// Withdrawn.
    #[serde(alias = "CANCELLED")]
    Cancelled,
}

impl InvoiceStatus {
    /// Parse a user supplied status, ignoring case.
    pub fn parse(raw: &str) -> Result<Self, QuoteError> {
        raw.trim()
            .parse::<Self>()
            .map_err(|_| QuoteError::UnknownStatus(raw.to_string()))
    }
}

/// Stored invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Store-assigned id, never reused.
    pub id: u64,
    /// Human-facing number, `INV-YYMM-NNNN`.
    pub invoice_number: String,
    /// Customer the invoice is addressed to.
    pub customer_name: String,
    /// System type the quote was built for.
    pub system_type: Category,
    /// Stop count the quote was built for.
    pub stop_count: StopCount,
    /// Priced lines and grand total.
    pub quote: Quote,
    /// Lifecycle status.
    pub status: InvoiceStatus,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Sum of all line totals.
    pub fn grand_total(&self) -> i64 {
        self.quote.grand_total()
    }
}

/// Input for creating an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    /// Customer name; empty or missing becomes [`DEFAULT_CUSTOMER`].
    #[serde(default)]
    pub customer_name: Option<String>,
    /// System type the quote was built for.
    pub system_type: Category,
    /// Stop count the quote was built for.
    pub stop_count: StopCount,
    /// Lines to store. Totals are recomputed.
    pub items: Vec<QuoteLineItem>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update of an invoice. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePatch {
    /// New customer name. An empty string is ignored.
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Replacement lines; the grand total follows them.
    #[serde(default)]
    pub items: Option<Vec<QuoteLineItem>>,
    /// New status.
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    /// New notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Listing filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFilter {
    /// Only invoices with this status.
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    /// Page size, [`DEFAULT_LIST_LIMIT`] when missing.
    #[serde(default)]
    pub limit: Option<usize>,
    /// Number of matching invoices to skip.
    #[serde(default)]
    pub offset: Option<usize>,
}

/// Prefix shared by every invoice number issued in the month of `now`.
pub fn month_prefix(now: DateTime<Utc>) -> String {
    format!("INV-{:02}{:02}-", now.year() % 100, now.month())
}

/// Invoice number for the `sequence`-th invoice of the month of `now`.
pub fn invoice_number(now: DateTime<Utc>, sequence: u32) -> String {
    format!("{}{:04}", month_prefix(now), sequence)
}

/// Sequence part of `number` if it was issued under `prefix`.
pub fn sequence_of(number: &str, prefix: &str) -> Option<u32> {
    number.strip_prefix(prefix)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn number_format() {
        let now = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(month_prefix(now), "INV-2603-");
        assert_eq!(invoice_number(now, 7), "INV-2603-0007");
        assert_eq!(invoice_number(now, 12345), "INV-2603-12345");
    }

    #[test]
    fn sequence_parsing() {
        assert_eq!(sequence_of("INV-2603-0042", "INV-2603-"), Some(42));
        assert_eq!(sequence_of("INV-2604-0042", "INV-2603-"), None);
        assert_eq!(sequence_of("INV-2603-abc", "INV-2603-"), None);
    }

    #[test]
    fn status_parse_and_display() {
        assert_eq!(InvoiceStatus::parse("FINALIZED").unwrap(), InvoiceStatus::Finalized);
        assert_eq!(InvoiceStatus::Cancelled.to_string(), "cancelled");
        assert_eq!(InvoiceStatus::default(), InvoiceStatus::Draft);
        assert!(InvoiceStatus::parse("paid").is_err());
    }
}
