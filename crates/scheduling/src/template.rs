use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use studiobill_core::{DomainError, DomainResult, StudioId, TemplateId};

/// A recipe for generating sessions: one weekday + time range at a studio.
///
/// Templates are created and edited by the user; the scheduler reads the
/// active, auto-enabled ones and materializes sessions from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceTemplate {
    pub id: TemplateId,
    pub studio_id: StudioId,
    pub title: String,
    pub weekday: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Stored at creation for display; equals `end_time - start_time`.
    pub duration_minutes: u32,
    pub active: bool,
    /// Whether the scheduler may generate sessions from this template.
    /// Turning this on triggers a catch-up pass over the window.
    pub auto_generate: bool,
    /// Most recent calendar date for which this template produced a session.
    ///
    /// Bookkeeping only. The session store's `(studio, start)` uniqueness key
    /// is the source of truth; this field just saves an existence lookup.
    pub last_generated_date: Option<NaiveDate>,
}

impl RecurrenceTemplate {
    pub fn new(
        studio_id: StudioId,
        title: impl Into<String>,
        weekday: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> DomainResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("template title cannot be empty"));
        }
        check_time_range(start_time, end_time)?;

        let duration_minutes = (end_time - start_time).num_minutes() as u32;

        Ok(Self {
            id: TemplateId::new(),
            studio_id,
            title,
            weekday,
            start_time,
            end_time,
            duration_minutes,
            active: true,
            auto_generate: false,
            last_generated_date: None,
        })
    }

    /// Re-check the stored time range.
    ///
    /// Templates can be edited in storage after creation, so the scheduler
    /// validates before generating and reports a malformed template as a
    /// per-template failure instead of trusting the constructor.
    pub fn validate_time_range(&self) -> DomainResult<()> {
        check_time_range(self.start_time, self.end_time)
    }
}

fn check_time_range(start: NaiveTime, end: NaiveTime) -> DomainResult<()> {
    // Same calendar day only; cross-midnight recurring sessions are not a thing.
    if end <= start {
        return Err(DomainError::validation(
            "template end time must be after start time",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn new_template_stores_derived_duration() {
        let template =
            RecurrenceTemplate::new(StudioId::new(), "Band practice", Weekday::Mon, t(9, 0), t(10, 15))
                .unwrap();
        assert_eq!(template.duration_minutes, 75);
        assert!(template.active);
        assert!(!template.auto_generate);
        assert_eq!(template.last_generated_date, None);
    }

    #[test]
    fn rejects_inverted_or_empty_time_range() {
        let err = RecurrenceTemplate::new(StudioId::new(), "X", Weekday::Tue, t(10, 0), t(9, 0))
            .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for inverted range"),
        }

        assert!(
            RecurrenceTemplate::new(StudioId::new(), "X", Weekday::Tue, t(10, 0), t(10, 0)).is_err()
        );
    }

    #[test]
    fn rejects_empty_title() {
        let err = RecurrenceTemplate::new(StudioId::new(), "  ", Weekday::Wed, t(9, 0), t(10, 0))
            .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for empty title"),
        }
    }
}
