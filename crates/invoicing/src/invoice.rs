use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use studiobill_core::{DomainError, DomainResult, InvoiceId, Money, StudioId};

use crate::numbering::InvoiceNumber;
use crate::period::BillingPeriod;

/// Days until a freshly issued invoice falls due.
pub const PAYMENT_TERMS_DAYS: u64 = 30;

/// Payment lifecycle of an issued invoice.
///
/// All transitions are user-triggered except the due-date sweep that flips
/// Pending to Overdue. Cancelled is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

/// Materialized billing document for one `(studio, period)`.
///
/// Hours, rate and amount are frozen at creation; editing the studio's rate
/// afterwards never changes an issued invoice. An explicit recompute is the
/// only way stored totals follow the live session set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub studio_id: StudioId,
    pub number: InvoiceNumber,
    pub period: BillingPeriod,
    pub total_minutes: u32,
    /// Hourly rate frozen from the studio at creation time.
    pub hourly_rate: Money,
    pub total_amount: Money,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub due_date: NaiveDate,
    pub paid_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    /// Path of a rendered document, if one has been produced.
    pub document_path: Option<String>,
}

impl Invoice {
    /// Materialize an invoice from a live aggregate.
    ///
    /// The caller (the aggregator) has already re-validated that no invoice
    /// exists for the period and summed the completed minutes.
    pub fn issue(
        studio_id: StudioId,
        number: InvoiceNumber,
        period: BillingPeriod,
        total_minutes: u32,
        hourly_rate: Money,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if hourly_rate.is_zero() {
            return Err(DomainError::validation("hourly rate must be positive"));
        }
        if total_minutes == 0 {
            return Err(DomainError::validation(
                "cannot issue an invoice over zero completed minutes",
            ));
        }

        let total_amount = hourly_rate.for_minutes(total_minutes)?;

        Ok(Self {
            id: InvoiceId::new(),
            studio_id,
            number,
            period,
            total_minutes,
            hourly_rate,
            total_amount,
            status: PaymentStatus::Pending,
            created_at: now,
            due_date: now.date_naive() + Days::new(PAYMENT_TERMS_DAYS),
            paid_at: None,
            notes: None,
            document_path: None,
        })
    }

    fn ensure_not_cancelled(&self) -> DomainResult<()> {
        if self.status == PaymentStatus::Cancelled {
            return Err(DomainError::conflict("invoice is cancelled"));
        }
        Ok(())
    }

    /// Pending/Overdue -> Paid; records the payment timestamp.
    pub fn mark_paid(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_not_cancelled()?;
        if self.status == PaymentStatus::Paid {
            return Err(DomainError::conflict("invoice is already paid"));
        }
        self.status = PaymentStatus::Paid;
        self.paid_at = Some(now);
        Ok(())
    }

    /// Paid -> Pending; clears the payment timestamp (payment was recorded
    /// in error).
    pub fn reopen(&mut self) -> DomainResult<()> {
        if self.status != PaymentStatus::Paid {
            return Err(DomainError::conflict(format!(
                "only a paid invoice can be reopened (status: {:?})",
                self.status
            )));
        }
        self.status = PaymentStatus::Pending;
        self.paid_at = None;
        Ok(())
    }

    /// Pending -> Overdue.
    pub fn mark_overdue(&mut self) -> DomainResult<()> {
        if self.status != PaymentStatus::Pending {
            return Err(DomainError::conflict(format!(
                "only a pending invoice can become overdue (status: {:?})",
                self.status
            )));
        }
        self.status = PaymentStatus::Overdue;
        Ok(())
    }

    /// Any live status -> Cancelled. Terminal: nothing transitions out.
    pub fn cancel(&mut self) -> DomainResult<()> {
        self.ensure_not_cancelled()?;
        self.status = PaymentStatus::Cancelled;
        Ok(())
    }

    /// Whether the due-date sweep should flip this invoice to Overdue.
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        self.status == PaymentStatus::Pending && today > self.due_date
    }

    /// Explicit manual refresh of the stored totals from a live aggregate.
    ///
    /// Minutes and amount follow the new aggregate; the frozen rate, the
    /// number and the payment status are preserved.
    pub fn recompute_totals(&mut self, total_minutes: u32) -> DomainResult<()> {
        if total_minutes == 0 {
            return Err(DomainError::validation(
                "cannot recompute an invoice down to zero completed minutes",
            ));
        }
        self.total_minutes = total_minutes;
        self.total_amount = self.hourly_rate.for_minutes(total_minutes)?;
        Ok(())
    }

    pub fn total_hours(&self) -> f64 {
        f64::from(self.total_minutes) / 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_invoice() -> Invoice {
        Invoice::issue(
            StudioId::new(),
            InvoiceNumber::new(2025, 1),
            BillingPeriod::new(2025, 3).unwrap(),
            225,
            Money::from_cents(4_000),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn issue_freezes_totals_and_starts_pending() {
        let invoice = test_invoice();
        assert_eq!(invoice.status, PaymentStatus::Pending);
        assert_eq!(invoice.total_amount, Money::from_cents(15_000));
        assert_eq!(invoice.total_hours(), 3.75);
        assert_eq!(invoice.paid_at, None);
        assert_eq!(
            invoice.due_date,
            invoice.created_at.date_naive() + Days::new(PAYMENT_TERMS_DAYS)
        );
    }

    #[test]
    fn issue_rejects_zero_rate_and_zero_minutes() {
        let err = Invoice::issue(
            StudioId::new(),
            InvoiceNumber::new(2025, 1),
            BillingPeriod::new(2025, 3).unwrap(),
            60,
            Money::ZERO,
            Utc::now(),
        )
        .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for zero rate"),
        }

        assert!(
            Invoice::issue(
                StudioId::new(),
                InvoiceNumber::new(2025, 1),
                BillingPeriod::new(2025, 3).unwrap(),
                0,
                Money::from_cents(4_000),
                Utc::now(),
            )
            .is_err()
        );
    }

    #[test]
    fn paid_round_trip_sets_and_clears_paid_at() {
        let mut invoice = test_invoice();
        let now = Utc::now();

        invoice.mark_paid(now).unwrap();
        assert_eq!(invoice.status, PaymentStatus::Paid);
        assert_eq!(invoice.paid_at, Some(now));

        invoice.reopen().unwrap();
        assert_eq!(invoice.status, PaymentStatus::Pending);
        assert_eq!(invoice.paid_at, None);
    }

    #[test]
    fn overdue_invoice_can_still_be_paid() {
        let mut invoice = test_invoice();
        invoice.mark_overdue().unwrap();
        assert_eq!(invoice.status, PaymentStatus::Overdue);

        invoice.mark_paid(Utc::now()).unwrap();
        assert_eq!(invoice.status, PaymentStatus::Paid);
    }

    #[test]
    fn cancelled_is_terminal() {
        let mut invoice = test_invoice();
        invoice.cancel().unwrap();
        assert_eq!(invoice.status, PaymentStatus::Cancelled);

        assert!(invoice.mark_paid(Utc::now()).is_err());
        assert!(invoice.mark_overdue().is_err());
        assert!(invoice.reopen().is_err());
        assert!(invoice.cancel().is_err());
        assert_eq!(invoice.status, PaymentStatus::Cancelled);
    }

    #[test]
    fn reopen_requires_paid() {
        let mut invoice = test_invoice();
        let err = invoice.reopen().unwrap_err();
        match err {
            DomainError::Conflict(_) => {}
            _ => panic!("Expected Conflict error reopening a pending invoice"),
        }
    }

    #[test]
    fn past_due_only_applies_to_pending() {
        let mut invoice = test_invoice();
        let after_due = invoice.due_date + Days::new(1);

        assert!(invoice.is_past_due(after_due));
        assert!(!invoice.is_past_due(invoice.due_date));

        invoice.mark_paid(Utc::now()).unwrap();
        assert!(!invoice.is_past_due(after_due));
    }

    #[test]
    fn recompute_keeps_frozen_rate_number_and_status() {
        let mut invoice = test_invoice();
        let number = invoice.number;
        invoice.mark_paid(Utc::now()).unwrap();

        invoice.recompute_totals(300).unwrap();
        assert_eq!(invoice.total_minutes, 300);
        assert_eq!(invoice.total_amount, Money::from_cents(20_000));
        assert_eq!(invoice.hourly_rate, Money::from_cents(4_000));
        assert_eq!(invoice.number, number);
        assert_eq!(invoice.status, PaymentStatus::Paid);

        assert!(invoice.recompute_totals(0).is_err());
    }

    #[test]
    fn serializes_statuses_snake_case() {
        let invoice = test_invoice();
        let json = serde_json::to_value(&invoice).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["number"]["year"], 2025);
        assert_eq!(json["total_minutes"], 225);
    }
}
