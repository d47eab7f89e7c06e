//! Dashboard metrics over issued invoices.
//!
//! Read-only rollups for the review screens: realized revenue from paid
//! invoices in a month/quarter/year, plus what is still open.

use serde::{Deserialize, Serialize};

use studiobill_core::{DomainError, DomainResult, Money};

use crate::invoice::{Invoice, PaymentStatus};
use crate::store::InvoiceStore;

/// Reporting window, always within a single calendar year.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsPeriod {
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
    Year { year: i32 },
}

impl MetricsPeriod {
    pub fn month(year: i32, month: u32) -> DomainResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation(format!("invalid month: {month}")));
        }
        Ok(Self::Month { year, month })
    }

    pub fn quarter(year: i32, quarter: u32) -> DomainResult<Self> {
        if !(1..=4).contains(&quarter) {
            return Err(DomainError::validation(format!(
                "invalid quarter: {quarter}"
            )));
        }
        Ok(Self::Quarter { year, quarter })
    }

    pub fn year(year: i32) -> Self {
        Self::Year { year }
    }

    fn issuing_year(&self) -> i32 {
        match *self {
            Self::Month { year, .. } | Self::Quarter { year, .. } | Self::Year { year } => year,
        }
    }

    fn contains(&self, invoice: &Invoice) -> bool {
        let month = invoice.period.month;
        match *self {
            Self::Month { year, month: m } => invoice.period.year == year && month == m,
            Self::Quarter { year, quarter } => {
                invoice.period.year == year && (month - 1) / 3 + 1 == quarter
            }
            Self::Year { year } => invoice.period.year == year,
        }
    }
}

/// Rollup the dashboard shows for one reporting window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    /// Sum of paid invoices in the window.
    pub revenue: Money,
    /// Sum of pending + overdue invoices in the window.
    pub outstanding: Money,
    pub total_invoices: usize,
    pub paid_invoices: usize,
    /// Pending + overdue.
    pub open_invoices: usize,
}

pub fn dashboard_metrics(
    invoices: &dyn InvoiceStore,
    period: MetricsPeriod,
) -> DomainResult<DashboardMetrics> {
    let mut metrics = DashboardMetrics::default();

    for invoice in invoices.list_by_year(period.issuing_year())? {
        if !period.contains(&invoice) {
            continue;
        }
        metrics.total_invoices += 1;
        match invoice.status {
            PaymentStatus::Paid => {
                metrics.paid_invoices += 1;
                metrics.revenue = metrics.revenue.checked_add(invoice.total_amount)?;
            }
            PaymentStatus::Pending | PaymentStatus::Overdue => {
                metrics.open_invoices += 1;
                metrics.outstanding = metrics.outstanding.checked_add(invoice.total_amount)?;
            }
            PaymentStatus::Cancelled => {}
        }
    }

    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_and_quarter_validate_bounds() {
        assert!(MetricsPeriod::month(2025, 0).is_err());
        assert!(MetricsPeriod::month(2025, 12).is_ok());
        assert!(MetricsPeriod::quarter(2025, 5).is_err());
        assert!(MetricsPeriod::quarter(2025, 4).is_ok());
    }

    #[test]
    fn quarter_buckets_months_correctly() {
        use crate::numbering::InvoiceNumber;
        use crate::period::BillingPeriod;
        use chrono::Utc;
        use studiobill_core::StudioId;

        let invoice = |month| {
            Invoice::issue(
                StudioId::new(),
                InvoiceNumber::new(2025, 1),
                BillingPeriod::new(2025, month).unwrap(),
                60,
                Money::from_cents(4_000),
                Utc::now(),
            )
            .unwrap()
        };

        let q2 = MetricsPeriod::quarter(2025, 2).unwrap();
        assert!(!q2.contains(&invoice(3)));
        assert!(q2.contains(&invoice(4)));
        assert!(q2.contains(&invoice(6)));
        assert!(!q2.contains(&invoice(7)));
    }
}
