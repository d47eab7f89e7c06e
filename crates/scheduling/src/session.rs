use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use studiobill_core::{DomainError, DomainResult, SessionId, StudioId, TemplateId};

use crate::template::RecurrenceTemplate;

/// How a session came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Entered by hand.
    Manual,
    /// Explicit "create from template" action by the user.
    FromTemplate,
    /// Inserted by the recurring scheduler.
    AutoGenerated,
}

/// Session lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// One concrete occurrence of work at a studio.
///
/// `(studio_id, start)` is the de-duplication key: at most one session may
/// occupy a given start slot at a given studio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub studio_id: StudioId,
    pub title: String,
    /// Naive local wall-clock, per the rest of the system.
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Computed once at creation (`end - start`); never re-derived later.
    pub duration_minutes: u32,
    pub status: SessionStatus,
    pub provenance: Provenance,
    /// Originating template, kept as a soft reference for audit display.
    /// The template may have been deleted since.
    pub template_id: Option<TemplateId>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// A manually entered session.
    pub fn manual(
        studio_id: StudioId,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("session title cannot be empty"));
        }
        if end <= start {
            return Err(DomainError::validation(
                "session end must be after session start",
            ));
        }

        Ok(Self {
            id: SessionId::new(),
            studio_id,
            title,
            start,
            end,
            duration_minutes: (end - start).num_minutes() as u32,
            status: SessionStatus::Scheduled,
            provenance: Provenance::Manual,
            template_id: None,
            notes: None,
            created_at: now,
        })
    }

    /// A session created by the user's explicit "create from template" action.
    pub fn from_template(
        template: &RecurrenceTemplate,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Self::of_template(template, date, Provenance::FromTemplate, now)
    }

    /// A session inserted by the recurring scheduler.
    pub fn auto_generated(
        template: &RecurrenceTemplate,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Self::of_template(template, date, Provenance::AutoGenerated, now)
    }

    fn of_template(
        template: &RecurrenceTemplate,
        date: NaiveDate,
        provenance: Provenance,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        template.validate_time_range()?;

        Ok(Self {
            id: SessionId::new(),
            studio_id: template.studio_id,
            title: template.title.clone(),
            start: date.and_time(template.start_time),
            end: date.and_time(template.end_time),
            duration_minutes: template.duration_minutes,
            status: SessionStatus::Scheduled,
            provenance,
            template_id: Some(template.id),
            notes: None,
            created_at: now,
        })
    }

    /// User marks the session as done. Terminal; only reachable from Scheduled.
    pub fn complete(&mut self) -> DomainResult<()> {
        self.transition_to(SessionStatus::Completed)
    }

    /// User cancels the session. Terminal; only reachable from Scheduled.
    pub fn cancel(&mut self) -> DomainResult<()> {
        self.transition_to(SessionStatus::Cancelled)
    }

    fn transition_to(&mut self, status: SessionStatus) -> DomainResult<()> {
        if self.status != SessionStatus::Scheduled {
            return Err(DomainError::conflict(format!(
                "session is already {:?}, cannot change to {:?}",
                self.status, status
            )));
        }
        self.status = status;
        Ok(())
    }

    /// Notes are the one field that stays mutable after the terminal states.
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }

    pub fn duration_hours(&self) -> f64 {
        f64::from(self.duration_minutes) / 60.0
    }
}
