//! Invoicing domain module.
//!
//! Aggregates completed sessions into per-period billing summaries,
//! materializes invoices with frozen pricing, issues per-year invoice
//! numbers, and governs the payment lifecycle of issued invoices.

pub mod aggregator;
pub mod invoice;
pub mod metrics;
pub mod numbering;
pub mod period;
pub mod store;

pub use aggregator::{ExistingInvoice, InvoiceAggregator, InvoiceSummary};
pub use invoice::{Invoice, PAYMENT_TERMS_DAYS, PaymentStatus};
pub use metrics::{DashboardMetrics, MetricsPeriod, dashboard_metrics};
pub use numbering::{InvoiceNumber, NumberingAuthority};
pub use period::BillingPeriod;
pub use store::InvoiceStore;
