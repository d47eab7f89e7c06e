//! In-memory store implementations.
//!
//! Intended for tests/dev and for the single-process desktop deployment.
//! Each store keeps its uniqueness index behind the same lock as its data,
//! so the existence check and the insert cannot interleave with another
//! caller's.

mod invoices;
mod sessions;
mod studios;
mod templates;

pub use invoices::InMemoryInvoiceStore;
pub use sessions::InMemorySessionStore;
pub use studios::InMemoryStudioStore;
pub use templates::InMemoryTemplateStore;

use studiobill_core::DomainError;

/// A poisoned lock means a writer panicked mid-update; surface it instead of
/// unwrapping.
pub(crate) fn poisoned() -> DomainError {
    DomainError::invariant("store lock poisoned")
}
