//! Recurring-session scheduling domain module.
//!
//! This crate contains the templates that describe recurring work, the
//! concrete sessions they produce, and the auto-scheduler that keeps a
//! bounded look-ahead window populated. Decision logic is pure over the
//! storage ports in [`store`]; all times are naive local wall-clock.

pub mod scheduler;
pub mod session;
pub mod store;
pub mod template;

pub use scheduler::{
    LOOK_AHEAD_DAYS, RecurringScheduler, ScheduledOccurrence, SchedulerReport, TemplateFailure,
};
pub use session::{Provenance, Session, SessionStatus};
pub use store::{SessionStore, TemplateStore};
pub use template::RecurrenceTemplate;
