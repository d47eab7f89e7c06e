use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use studiobill_core::{DomainError, DomainResult, Money, StudioId};

/// Billing counterparty: a client site where sessions take place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Studio {
    pub id: StudioId,
    pub name: String,
    /// Hourly rate charged for work at this studio.
    ///
    /// Read at invoice-creation time and frozen onto the invoice; editing it
    /// later never changes an already-issued invoice.
    pub hourly_rate: Money,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Studio {
    pub fn new(
        name: impl Into<String>,
        hourly_rate: Money,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("studio name cannot be empty"));
        }
        if hourly_rate.is_zero() {
            return Err(DomainError::validation("hourly rate must be positive"));
        }

        Ok(Self {
            id: StudioId::new(),
            name,
            hourly_rate,
            active: true,
            created_at: now,
        })
    }

    pub fn set_hourly_rate(&mut self, hourly_rate: Money) -> DomainResult<()> {
        if hourly_rate.is_zero() {
            return Err(DomainError::validation("hourly rate must be positive"));
        }
        self.hourly_rate = hourly_rate;
        Ok(())
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Read-side port onto the studio directory.
///
/// The CRUD screens that maintain studios live outside this core; the
/// scheduler and invoice aggregator only ever read through this trait.
pub trait StudioDirectory: Send + Sync {
    /// Studios that currently appear in scheduling and invoicing.
    fn active_studios(&self) -> DomainResult<Vec<Studio>>;

    fn get(&self, id: StudioId) -> DomainResult<Option<Studio>>;

    /// Current hourly rate; `NotFound` if the studio does not exist.
    fn hourly_rate(&self, id: StudioId) -> DomainResult<Money>;
}
