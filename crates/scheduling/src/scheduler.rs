//! Recurring-session auto-scheduler.
//!
//! Reads active, auto-enabled templates and inserts the sessions that are due
//! inside a bounded look-ahead window. Runs on app start, on a periodic
//! trigger, and when a template's auto flag is switched on; every pass is
//! idempotent, so overlapping triggers converge on the same session set.

use chrono::{Datelike, Days, NaiveDate, Utc};
use tracing::{debug, info, warn};

use studiobill_core::{DomainError, DomainResult, StudioId, TemplateId};

use crate::session::Session;
use crate::store::{SessionStore, TemplateStore};
use crate::template::RecurrenceTemplate;

/// Number of future days (starting at "today") the scheduler may populate.
pub const LOOK_AHEAD_DAYS: u64 = 7;

/// One session the pass actually inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledOccurrence {
    pub template_id: TemplateId,
    pub studio_id: StudioId,
    pub date: NaiveDate,
}

/// A template whose processing failed; the pass continues past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFailure {
    pub template_id: TemplateId,
    pub error: DomainError,
}

/// Outcome of one scheduling pass.
#[derive(Debug, Default)]
pub struct SchedulerReport {
    pub created: Vec<ScheduledOccurrence>,
    /// Occurrences that were already covered (bookkeeping, existing session,
    /// or a concurrent pass winning the insert race).
    pub skipped: usize,
    pub failures: Vec<TemplateFailure>,
}

/// The recurring scheduler. Pure decision logic over the two storage ports;
/// holds no state of its own, so instances are cheap and disposable.
pub struct RecurringScheduler<'a> {
    templates: &'a dyn TemplateStore,
    sessions: &'a dyn SessionStore,
}

impl<'a> RecurringScheduler<'a> {
    pub fn new(templates: &'a dyn TemplateStore, sessions: &'a dyn SessionStore) -> Self {
        Self {
            templates,
            sessions,
        }
    }

    /// Weekly pass (periodic trigger).
    ///
    /// For each template: the occurrence in the current calendar week (weeks
    /// start Monday), plus the following week's occurrence when the window
    /// spans the week boundary. Past dates are never backfilled.
    pub fn run_weekly_pass(&self, today: NaiveDate) -> DomainResult<SchedulerReport> {
        let mut report = SchedulerReport::default();
        for template in self.templates.list_active_auto()? {
            let dates = weekly_occurrences(&template, today);
            self.process_template(&template, &dates, &mut report);
        }
        info!(
            %today,
            created = report.created.len(),
            skipped = report.skipped,
            failures = report.failures.len(),
            "weekly scheduling pass finished"
        );
        Ok(report)
    }

    /// Catch-up pass: walk every date in the window.
    ///
    /// Used as a recovery sweep on app start. Self-heals after missed
    /// periodic triggers (app not opened for days) without gaps or
    /// duplicates.
    pub fn run_catch_up(&self, today: NaiveDate) -> DomainResult<SchedulerReport> {
        let mut report = SchedulerReport::default();
        for template in self.templates.list_active_auto()? {
            let dates = catch_up_dates(&template, today);
            self.process_template(&template, &dates, &mut report);
        }
        info!(
            %today,
            created = report.created.len(),
            skipped = report.skipped,
            failures = report.failures.len(),
            "catch-up scheduling pass finished"
        );
        Ok(report)
    }

    /// Catch-up for a single template, for when its auto flag has just been
    /// switched on mid-window.
    pub fn catch_up_template(
        &self,
        template: &RecurrenceTemplate,
        today: NaiveDate,
    ) -> SchedulerReport {
        let mut report = SchedulerReport::default();
        let dates = catch_up_dates(template, today);
        self.process_template(template, &dates, &mut report);
        report
    }

    /// Run the per-occurrence steps for one template, collecting its failure
    /// (if any) instead of aborting the pass.
    fn process_template(
        &self,
        template: &RecurrenceTemplate,
        dates: &[NaiveDate],
        report: &mut SchedulerReport,
    ) {
        if let Err(error) = template.validate_time_range() {
            warn!(template_id = %template.id, %error, "skipping malformed template");
            report.failures.push(TemplateFailure {
                template_id: template.id,
                error,
            });
            return;
        }

        for &date in dates {
            match self.schedule_occurrence(template, date) {
                Ok(Some(occurrence)) => report.created.push(occurrence),
                Ok(None) => report.skipped += 1,
                Err(error) => {
                    warn!(template_id = %template.id, %date, %error, "template processing failed");
                    report.failures.push(TemplateFailure {
                        template_id: template.id,
                        error,
                    });
                    return;
                }
            }
        }
    }

    /// Insert the session for one (template, date) occurrence unless it is
    /// already covered.
    ///
    /// Two independent checks: the template's `last_generated_date`
    /// bookkeeping, then existence-by-key. The existence check is
    /// load-bearing — if a previous run inserted the session but failed to
    /// update the bookkeeping, this is what prevents a duplicate.
    fn schedule_occurrence(
        &self,
        template: &RecurrenceTemplate,
        date: NaiveDate,
    ) -> DomainResult<Option<ScheduledOccurrence>> {
        if template.last_generated_date == Some(date) {
            return Ok(None);
        }

        let start = date.and_time(template.start_time);
        if self.sessions.exists(template.studio_id, start)? {
            return Ok(None);
        }

        let session = Session::auto_generated(template, date, Utc::now())?;
        match self.sessions.insert(session) {
            Ok(_) => {}
            // A concurrent pass won the insert race; the occurrence exists.
            Err(e) if e.is_conflict() => return Ok(None),
            Err(e) => return Err(e),
        }

        // The session is inserted even if this bookkeeping write fails; the
        // existence check above makes the next run converge regardless.
        self.templates.update_last_generated(template.id, date)?;

        debug!(template_id = %template.id, studio_id = %template.studio_id, %date, "scheduled session");
        Ok(Some(ScheduledOccurrence {
            template_id: template.id,
            studio_id: template.studio_id,
            date,
        }))
    }
}

/// `[today, today + LOOK_AHEAD_DAYS)` — today inclusive, never the past.
fn in_window(today: NaiveDate, date: NaiveDate) -> bool {
    date >= today && date < today + Days::new(LOOK_AHEAD_DAYS)
}

/// The occurrence in the current calendar week, and the next week's when the
/// window reaches it. Dates outside the window (including this week's
/// occurrence when it already passed) are dropped.
fn weekly_occurrences(template: &RecurrenceTemplate, today: NaiveDate) -> Vec<NaiveDate> {
    let monday = today - Days::new(u64::from(today.weekday().num_days_from_monday()));
    let this_week = monday + Days::new(u64::from(template.weekday.num_days_from_monday()));

    [this_week, this_week + Days::new(7)]
        .into_iter()
        .filter(|&d| in_window(today, d))
        .collect()
}

/// Every window date whose weekday matches the template. With a 7-day window
/// this is always exactly one date.
fn catch_up_dates(template: &RecurrenceTemplate, today: NaiveDate) -> Vec<NaiveDate> {
    (0..LOOK_AHEAD_DAYS)
        .map(|offset| today + Days::new(offset))
        .filter(|d| d.weekday() == template.weekday)
        .collect()
}
