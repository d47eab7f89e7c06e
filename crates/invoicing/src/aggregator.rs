//! Invoice aggregation: live billing summaries and invoice materialization.
//!
//! Summaries are computed on demand from the current completed-session set
//! and the studio's current rate; nothing here is persisted until the user
//! confirms creation, at which point the aggregate is re-computed and frozen
//! onto the invoice.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use studiobill_core::{DomainError, DomainResult, InvoiceId, Money, StudioId};
use studiobill_scheduling::SessionStore;
use studiobill_studios::{Studio, StudioDirectory};

use crate::invoice::{Invoice, PaymentStatus};
use crate::numbering::NumberingAuthority;
use crate::period::BillingPeriod;
use crate::store::InvoiceStore;

/// The already-materialized invoice referenced from a summary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingInvoice {
    pub id: InvoiceId,
    pub number: crate::numbering::InvoiceNumber,
    pub status: PaymentStatus,
}

/// Non-persisted projection the user reviews before confirming creation.
///
/// Always reflects the *current* rate and *current* completed-session set,
/// independent of any previously frozen invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub studio_id: StudioId,
    pub studio_name: String,
    pub period: BillingPeriod,
    pub total_minutes: u32,
    pub session_count: usize,
    /// The studio's current rate, not a frozen one.
    pub hourly_rate: Money,
    pub total_amount: Money,
    pub existing_invoice: Option<ExistingInvoice>,
}

impl InvoiceSummary {
    pub fn total_hours(&self) -> f64 {
        f64::from(self.total_minutes) / 60.0
    }
}

/// Aggregates completed sessions per `(studio, period)` and materializes
/// invoices from the live aggregate. Stateless over its three ports.
pub struct InvoiceAggregator<'a> {
    studios: &'a dyn StudioDirectory,
    sessions: &'a dyn SessionStore,
    invoices: &'a dyn InvoiceStore,
}

impl<'a> InvoiceAggregator<'a> {
    pub fn new(
        studios: &'a dyn StudioDirectory,
        sessions: &'a dyn SessionStore,
        invoices: &'a dyn InvoiceStore,
    ) -> Self {
        Self {
            studios,
            sessions,
            invoices,
        }
    }

    /// Sum of completed minutes (and the session count) for one studio in
    /// one period. Scheduled and Cancelled sessions never count.
    fn completed_minutes(
        &self,
        studio_id: StudioId,
        period: BillingPeriod,
    ) -> DomainResult<(u32, usize)> {
        let completed = self.sessions.list_completed(studio_id, period.range())?;
        let mut total: u64 = 0;
        for session in &completed {
            total += u64::from(session.duration_minutes);
        }
        let total = u32::try_from(total)
            .map_err(|_| DomainError::invariant("completed minutes overflow"))?;
        Ok((total, completed.len()))
    }

    /// Summary row for one studio, or `None` when there is nothing to show:
    /// a studio with zero completed minutes and no existing invoice produces
    /// no row, not a zero row.
    pub fn summary_for(
        &self,
        studio: &Studio,
        period: BillingPeriod,
    ) -> DomainResult<Option<InvoiceSummary>> {
        let (total_minutes, session_count) = self.completed_minutes(studio.id, period)?;
        let existing = self.invoices.find_by_studio_and_period(studio.id, period)?;

        if total_minutes == 0 && existing.is_none() {
            return Ok(None);
        }

        Ok(Some(InvoiceSummary {
            studio_id: studio.id,
            studio_name: studio.name.clone(),
            period,
            total_minutes,
            session_count,
            hourly_rate: studio.hourly_rate,
            total_amount: studio.hourly_rate.for_minutes(total_minutes)?,
            existing_invoice: existing.map(|i| ExistingInvoice {
                id: i.id,
                number: i.number,
                status: i.status,
            }),
        }))
    }

    /// Summary rows for every active studio with something to show in the
    /// period.
    pub fn build_summaries(&self, period: BillingPeriod) -> DomainResult<Vec<InvoiceSummary>> {
        let mut rows = Vec::new();
        for studio in self.studios.active_studios()? {
            if let Some(row) = self.summary_for(&studio, period)? {
                rows.push(row);
            }
        }
        debug!(%period, rows = rows.len(), "built invoice summaries");
        Ok(rows)
    }

    /// Materialize an invoice for one studio and period, on explicit user
    /// confirmation.
    ///
    /// Everything is re-validated against live state here, not against the
    /// summary the user looked at: the existing-invoice check runs again and
    /// the totals are re-aggregated. The storage uniqueness constraint on
    /// `(studio, period)` settles the remaining double-tap race; losing it
    /// surfaces as a `Conflict` to the caller.
    pub fn create_invoice(
        &self,
        studio_id: StudioId,
        period: BillingPeriod,
        now: DateTime<Utc>,
    ) -> DomainResult<Invoice> {
        let studio = self
            .studios
            .get(studio_id)?
            .ok_or_else(DomainError::not_found)?;

        if self
            .invoices
            .find_by_studio_and_period(studio_id, period)?
            .is_some()
        {
            return Err(DomainError::conflict(format!(
                "invoice already exists for studio '{}' in {period}",
                studio.name
            )));
        }

        let (total_minutes, session_count) = self.completed_minutes(studio_id, period)?;
        if total_minutes == 0 {
            return Err(DomainError::validation(format!(
                "no completed sessions for studio '{}' in {period}",
                studio.name
            )));
        }

        let number = NumberingAuthority::new(self.invoices).issue(period.year)?;
        let invoice = Invoice::issue(
            studio_id,
            number,
            period,
            total_minutes,
            studio.hourly_rate,
            now,
        )?;

        self.invoices.insert(invoice.clone())?;

        info!(
            invoice_id = %invoice.id,
            number = %invoice.number,
            studio_id = %studio_id,
            %period,
            sessions = session_count,
            amount = %invoice.total_amount,
            "created invoice"
        );
        Ok(invoice)
    }

    /// Explicit manual refresh of an invoice's stored totals from the live
    /// completed-session set. Totals do not follow session edits
    /// automatically; this is the only path that re-opens them.
    pub fn recompute_invoice(&self, invoice_id: InvoiceId) -> DomainResult<Invoice> {
        let mut invoice = self
            .invoices
            .get(invoice_id)?
            .ok_or_else(DomainError::not_found)?;

        let (total_minutes, _) = self.completed_minutes(invoice.studio_id, invoice.period)?;
        invoice.recompute_totals(total_minutes)?;
        self.invoices.update(&invoice)?;

        info!(
            invoice_id = %invoice.id,
            minutes = invoice.total_minutes,
            amount = %invoice.total_amount,
            "recomputed invoice totals"
        );
        Ok(invoice)
    }

    /// Due-date sweep: flip every Pending invoice past its due date to
    /// Overdue. Returns how many were flipped.
    pub fn mark_overdue_invoices(&self, today: NaiveDate) -> DomainResult<usize> {
        let mut flipped = 0;
        for mut invoice in self.invoices.list_by_status(Some(PaymentStatus::Pending))? {
            if invoice.is_past_due(today) {
                invoice.mark_overdue()?;
                self.invoices.update(&invoice)?;
                flipped += 1;
            }
        }
        if flipped > 0 {
            info!(%today, flipped, "marked invoices overdue");
        }
        Ok(flipped)
    }
}
