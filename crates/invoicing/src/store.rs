//! Storage port for invoices.
//!
//! The implementation lives in `studiobill-infra`. As with the session store,
//! the uniqueness obligations are part of the contract here, not an
//! implementation detail: invoice creation is exposed to a double-tap race
//! and must be settled at the storage layer.

use studiobill_core::{DomainResult, InvoiceId, StudioId};

use crate::invoice::{Invoice, PaymentStatus};
use crate::period::BillingPeriod;

pub trait InvoiceStore: Send + Sync {
    fn find_by_studio_and_period(
        &self,
        studio_id: StudioId,
        period: BillingPeriod,
    ) -> DomainResult<Option<Invoice>>;

    fn get(&self, id: InvoiceId) -> DomainResult<Option<Invoice>>;

    /// Live invoices issued in `year`; deleted invoices no longer count.
    fn count_by_year(&self, year: i32) -> DomainResult<usize>;

    /// Next numbering sequence for `year`, from a counter that never rewinds.
    ///
    /// Must be serialized against concurrent issuance: two callers never see
    /// the same value.
    fn next_sequence(&self, year: i32) -> DomainResult<u32>;

    /// Insert an invoice.
    ///
    /// Returns `Conflict` when an invoice already exists for the same
    /// `(studio, period)`. The check-and-insert must be atomic with respect
    /// to concurrent callers; a conflict is surfaced to the user as
    /// "already exists", not swallowed.
    fn insert(&self, invoice: Invoice) -> DomainResult<()>;

    /// Overwrite an existing invoice. `NotFound` if it was deleted meanwhile.
    fn update(&self, invoice: &Invoice) -> DomainResult<()>;

    /// Delete an invoice. The underlying sessions keep their status; the
    /// invoice's number is never re-issued.
    fn delete(&self, id: InvoiceId) -> DomainResult<()>;

    fn list_by_year(&self, year: i32) -> DomainResult<Vec<Invoice>>;

    /// Invoices filtered by payment status (`None` lists everything).
    fn list_by_status(&self, status: Option<PaymentStatus>) -> DomainResult<Vec<Invoice>>;
}
