//! Human-readable invoice numbers, scoped per calendar year.

use serde::{Deserialize, Serialize};
use tracing::debug;

use studiobill_core::{DomainError, DomainResult};

use crate::store::InvoiceStore;

/// An invoice number such as `2025-005`: issuing year plus a per-year
/// sequence, zero-padded to three digits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InvoiceNumber {
    pub year: i32,
    pub sequence: u32,
}

impl InvoiceNumber {
    pub fn new(year: i32, sequence: u32) -> Self {
        Self { year, sequence }
    }
}

impl core::fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{:03}", self.year, self.sequence)
    }
}

/// Issues invoice numbers, monotonically non-decreasing within a year.
///
/// Sequences come from a persisted per-year counter that never rewinds:
/// deleting an invoice does not free its number. Deletion can therefore
/// leave gaps, but a number, once issued, is never seen twice — a deliberate
/// departure from deriving the sequence from a live count, which would
/// re-issue a remembered number after a deletion.
pub struct NumberingAuthority<'a> {
    invoices: &'a dyn InvoiceStore,
}

impl<'a> NumberingAuthority<'a> {
    pub fn new(invoices: &'a dyn InvoiceStore) -> Self {
        Self { invoices }
    }

    pub fn issue(&self, year: i32) -> DomainResult<InvoiceNumber> {
        if !(2000..=9999).contains(&year) {
            return Err(DomainError::validation(format!(
                "invalid year for invoice numbering: {year}"
            )));
        }

        let sequence = self.invoices.next_sequence(year)?;
        let number = InvoiceNumber::new(year, sequence);
        debug!(%number, "issued invoice number");
        Ok(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_three_digit_sequence() {
        assert_eq!(InvoiceNumber::new(2025, 5).to_string(), "2025-005");
        assert_eq!(InvoiceNumber::new(2025, 1).to_string(), "2025-001");
        assert_eq!(InvoiceNumber::new(2025, 1234).to_string(), "2025-1234");
    }

    #[test]
    fn orders_by_year_then_sequence() {
        assert!(InvoiceNumber::new(2024, 9) < InvoiceNumber::new(2025, 1));
        assert!(InvoiceNumber::new(2025, 1) < InvoiceNumber::new(2025, 2));
    }
}
