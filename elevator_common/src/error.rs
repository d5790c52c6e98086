//! Error types shared between client and server.
//!
//! The `QuoteError` enum unifies common failure cases for I/O, serialization,
//! channel communication, and domain lookups, allowing crates to propagate a
//! single error type.
//!
//! The quantity calculator and the quote assembler never produce these errors:
//! a catalog entry with an unusable formula simply yields a zero quantity.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Crossbeam/channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Crossbeam/channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),

    /// Stop count outside of the range accepted for a quote.
    #[error("Stop count {value} is out of range ({min}..={max})")]
    StopCountOutOfRange {
        /// Rejected value.
        value: u32,
        /// Lowest accepted stop count.
        min: u32,
        /// Highest accepted stop count.
        max: u32,
    },

    /// System type string that is neither `gearless` nor `hydraulic`.
    #[error("Unknown system type: {0}")]
    UnknownCategory(String),

    /// Invoice status string that does not name a known status.
    #[error("Unknown invoice status: {0}")]
    UnknownStatus(String),

    /// No catalog record carries the requested item id.
    #[error("Catalog item not found: {0}")]
    CatalogItemNotFound(u32),

    /// No stored invoice matches the requested id.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(u64),

    /// A quote edit referenced an item id that has no line in the quote.
    #[error("Quote line not found: {0}")]
    LineNotFound(u32),

    /// The peer answered with an error response.
    #[error("Server error: {0}")]
    Remote(String),
}

impl<T> From<PoisonError<T>> for QuoteError {
    fn from(err: PoisonError<T>) -> Self {
        QuoteError::MutexLock(err.to_string())
    }
}
