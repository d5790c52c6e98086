//!
//! Common types and utilities shared by the elevator quote server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuoteError` used across the workspace.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `system` — elevator system types and validated stop counts.
//! - `catalog` — inventory records, typed calculation rules, catalog snapshot.
//! - `quantity` — the per-item quantity calculator.
//! - `quote` — quote assembly and line editing.
//! - `invoice` — stored invoices and invoice numbering.
//! - `store` — invoice persistence.
//! - `protocol` — JSON request/response payloads exchanged over TCP.
//! - `net` — networking constants and small helpers.
#![warn(missing_docs)]
pub mod catalog;
pub mod error;
pub mod invoice;
pub mod net;
pub mod protocol;
pub mod quantity;
pub mod quote;
pub mod result;
pub mod store;
pub mod system;

pub use catalog::{CalcRule, Catalog, CatalogItem, CatalogRecord};
pub use error::QuoteError;
pub use quantity::calculate_quantity;
pub use quote::{Quote, QuoteLineItem, build_quote};
pub use result::Result;
pub use system::{Category, StopCount};
