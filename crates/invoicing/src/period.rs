use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use studiobill_core::{DomainError, DomainResult};

/// A billing period: one calendar month at one studio's local wall-clock.
///
/// Exactly one invoice may exist per `(studio, period)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub year: i32,
    pub month: u32,
}

impl BillingPeriod {
    pub fn new(year: i32, month: u32) -> DomainResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation(format!("invalid month: {month}")));
        }
        if !(2000..=9999).contains(&year) {
            return Err(DomainError::validation(format!("invalid year: {year}")));
        }
        Ok(Self { year, month })
    }

    /// The period a given calendar date falls in.
    pub fn of(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Half-open naive datetime range `[first of month, first of next month)`.
    pub fn range(&self) -> (NaiveDateTime, NaiveDateTime) {
        let start = first_of_month(self.year, self.month);
        let end = if self.month == 12 {
            first_of_month(self.year + 1, 1)
        } else {
            first_of_month(self.year, self.month + 1)
        };
        (start, end)
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let (start, end) = self.range();
        at >= start && at < end
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDateTime {
    // month is validated to 1..=12, day 1 always exists.
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_hms_opt(0, 0, 0)
        .unwrap_or(NaiveDateTime::MIN)
}

impl core::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}
