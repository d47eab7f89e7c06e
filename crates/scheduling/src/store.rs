//! Storage ports used by the scheduler and the invoice aggregation layer.
//!
//! Implementations live in `studiobill-infra`. The contracts here carry the
//! concurrency obligations the scheduler relies on; see [`SessionStore::insert`].

use chrono::{NaiveDate, NaiveDateTime};

use studiobill_core::{DomainResult, SessionId, StudioId, TemplateId};

use crate::session::Session;
use crate::template::RecurrenceTemplate;

/// Port onto recurring-session templates.
pub trait TemplateStore: Send + Sync {
    /// Templates that are active and have auto-generation enabled.
    fn list_active_auto(&self) -> DomainResult<Vec<RecurrenceTemplate>>;

    /// Record the most recent date a template produced a session for.
    ///
    /// `NotFound` if the template has been deleted in the meantime.
    fn update_last_generated(&self, template_id: TemplateId, date: NaiveDate) -> DomainResult<()>;
}

/// Port onto concrete sessions.
pub trait SessionStore: Send + Sync {
    /// Whether a session already occupies `(studio_id, start)`.
    fn exists(&self, studio_id: StudioId, start: NaiveDateTime) -> DomainResult<bool>;

    /// Insert a session.
    ///
    /// Returns `Conflict` when `(studio_id, start)` is already taken. The
    /// check-and-insert must be atomic with respect to concurrent callers —
    /// this is the storage-level uniqueness constraint that makes two
    /// overlapping scheduler passes safe.
    fn insert(&self, session: Session) -> DomainResult<SessionId>;

    /// Completed sessions for a studio whose start falls in `[range.0, range.1)`.
    fn list_completed(
        &self,
        studio_id: StudioId,
        range: (NaiveDateTime, NaiveDateTime),
    ) -> DomainResult<Vec<Session>>;
}
