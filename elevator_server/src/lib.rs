//! Elevator pre-invoice command server.
//!
//! The server owns the inventory catalog and the invoice store and answers
//! line-delimited JSON requests over TCP. Its building blocks:
//!
//! - `CommandReceiver` — accepts TCP connections and hands them to the pool
//!   through a `crossbeam_channel`.
//! - `worker` — a fixed pool of threads; each reads one request from a
//!   connection, answers it, and closes the connection.
//! - `QuoteService` — dispatches requests to the quote assembler, the catalog,
//!   and the invoice store.
//!
//! A failing client only ends its own connection; it never stops the server.
#![warn(missing_docs)]
pub mod args;
pub mod receiver;
pub mod service;
pub mod worker;

pub use receiver::CommandReceiver;
pub use service::QuoteService;
