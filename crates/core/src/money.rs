//! Money in the smallest currency unit (cents).
//!
//! Single-currency by design; amounts and hourly rates share one type.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// An amount of money in cents.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::invariant("money amount overflow"))
    }

    /// Bill `minutes` of work at an hourly rate of `self`.
    ///
    /// Rounds half-up to the cent, so a monthly total is computed once over
    /// the summed minutes rather than per session.
    pub fn for_minutes(self, minutes: u32) -> DomainResult<Money> {
        let cent_minutes = (self.0 as u128) * (minutes as u128);
        let cents = (cent_minutes + 30) / 60;
        u64::try_from(cents)
            .map(Money)
            .map_err(|_| DomainError::invariant("billing amount overflow"))
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
