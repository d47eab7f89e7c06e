//! Infrastructure layer: storage adapters for the scheduling and invoicing
//! ports.
//!
//! The in-memory implementations here carry the uniqueness constraints the
//! domain relies on — `(studio, start)` for sessions, `(studio, period)` for
//! invoices — enforced under a single lock so check-and-insert is atomic.

pub mod memory;


pub use memory::{
    InMemoryInvoiceStore, InMemorySessionStore, InMemoryStudioStore, InMemoryTemplateStore,
};
