use std::collections::HashMap;
use std::sync::RwLock;

use studiobill_core::{DomainError, DomainResult, InvoiceId, StudioId};
use studiobill_invoicing::{BillingPeriod, Invoice, InvoiceStore, PaymentStatus};

use super::poisoned;

#[derive(Debug, Default)]
struct Inner {
    invoices: HashMap<InvoiceId, Invoice>,
    /// Uniqueness index over `(studio, period)`.
    periods: HashMap<(StudioId, i32, u32), InvoiceId>,
    /// Per-year numbering counters. Deliberately separate from the invoice
    /// map: deleting an invoice never rewinds its year's counter, so a
    /// number, once issued, is never issued again.
    sequences: HashMap<i32, u32>,
}

/// In-memory invoice store.
#[derive(Debug, Default)]
pub struct InMemoryInvoiceStore {
    inner: RwLock<Inner>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn period_key(studio_id: StudioId, period: BillingPeriod) -> (StudioId, i32, u32) {
    (studio_id, period.year, period.month)
}

impl InvoiceStore for InMemoryInvoiceStore {
    fn find_by_studio_and_period(
        &self,
        studio_id: StudioId,
        period: BillingPeriod,
    ) -> DomainResult<Option<Invoice>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner
            .periods
            .get(&period_key(studio_id, period))
            .and_then(|id| inner.invoices.get(id))
            .cloned())
    }

    fn get(&self, id: InvoiceId) -> DomainResult<Option<Invoice>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.invoices.get(&id).cloned())
    }

    fn count_by_year(&self, year: i32) -> DomainResult<usize> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner
            .invoices
            .values()
            .filter(|i| i.number.year == year)
            .count())
    }

    fn next_sequence(&self, year: i32) -> DomainResult<u32> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let counter = inner.sequences.entry(year).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    fn insert(&self, invoice: Invoice) -> DomainResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let key = period_key(invoice.studio_id, invoice.period);
        if inner.periods.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "invoice already exists for studio {} in {}",
                invoice.studio_id, invoice.period
            )));
        }
        inner.periods.insert(key, invoice.id);
        inner.invoices.insert(invoice.id, invoice);
        Ok(())
    }

    fn update(&self, invoice: &Invoice) -> DomainResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if !inner.invoices.contains_key(&invoice.id) {
            return Err(DomainError::NotFound);
        }
        inner.invoices.insert(invoice.id, invoice.clone());
        Ok(())
    }

    fn delete(&self, id: InvoiceId) -> DomainResult<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let invoice = inner.invoices.remove(&id).ok_or_else(DomainError::not_found)?;
        inner
            .periods
            .remove(&period_key(invoice.studio_id, invoice.period));
        // `sequences` untouched: the freed period may be re-invoiced, the
        // number may not.
        Ok(())
    }

    fn list_by_year(&self, year: i32) -> DomainResult<Vec<Invoice>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        let mut list: Vec<_> = inner
            .invoices
            .values()
            .filter(|i| i.number.year == year)
            .cloned()
            .collect();
        list.sort_by_key(|i| i.number);
        Ok(list)
    }

    fn list_by_status(&self, status: Option<PaymentStatus>) -> DomainResult<Vec<Invoice>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        let mut list: Vec<_> = inner
            .invoices
            .values()
            .filter(|i| status.is_none_or(|s| i.status == s))
            .cloned()
            .collect();
        list.sort_by_key(|i| i.number);
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use studiobill_core::Money;
    use studiobill_invoicing::InvoiceNumber;

    fn invoice(studio_id: StudioId, sequence: u32, month: u32) -> Invoice {
        Invoice::issue(
            studio_id,
            InvoiceNumber::new(2025, sequence),
            BillingPeriod::new(2025, month).unwrap(),
            180,
            Money::from_cents(4_000),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn insert_rejects_duplicate_studio_period() {
        let store = InMemoryInvoiceStore::new();
        let studio_id = StudioId::new();

        store.insert(invoice(studio_id, 1, 3)).unwrap();
        let err = store.insert(invoice(studio_id, 2, 3)).unwrap_err();
        assert!(err.is_conflict());

        // Other month, other studio: both fine.
        store.insert(invoice(studio_id, 2, 4)).unwrap();
        store.insert(invoice(StudioId::new(), 3, 3)).unwrap();
    }

    #[test]
    fn sequence_counter_survives_delete() {
        let store = InMemoryInvoiceStore::new();
        let studio_id = StudioId::new();

        assert_eq!(store.next_sequence(2025).unwrap(), 1);
        let first = invoice(studio_id, 1, 3);
        let first_id = first.id;
        store.insert(first).unwrap();

        store.delete(first_id).unwrap();
        assert_eq!(store.count_by_year(2025).unwrap(), 0);

        // The freed period can be invoiced again, but under a fresh number.
        assert_eq!(store.next_sequence(2025).unwrap(), 2);
        store.insert(invoice(studio_id, 2, 3)).unwrap();
    }

    #[test]
    fn sequences_are_per_year() {
        let store = InMemoryInvoiceStore::new();
        assert_eq!(store.next_sequence(2025).unwrap(), 1);
        assert_eq!(store.next_sequence(2025).unwrap(), 2);
        assert_eq!(store.next_sequence(2026).unwrap(), 1);
    }

    #[test]
    fn update_missing_invoice_is_not_found() {
        let store = InMemoryInvoiceStore::new();
        let orphan = invoice(StudioId::new(), 1, 3);
        assert_eq!(store.update(&orphan).unwrap_err(), DomainError::NotFound);
    }

    #[test]
    fn list_by_status_filters() {
        let store = InMemoryInvoiceStore::new();
        let mut paid = invoice(StudioId::new(), 1, 3);
        paid.mark_paid(Utc::now()).unwrap();
        store.insert(paid).unwrap();
        store.insert(invoice(StudioId::new(), 2, 3)).unwrap();

        assert_eq!(store.list_by_status(None).unwrap().len(), 2);
        assert_eq!(
            store
                .list_by_status(Some(PaymentStatus::Paid))
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            store
                .list_by_status(Some(PaymentStatus::Pending))
                .unwrap()
                .len(),
            1
        );
    }
}
