//! Progress service: the rules the progress repository runs inside its
//! transaction, after reading the latest active log of the activity.

use chrono::NaiveDate;

use super::error::ProgressError;
use super::status::ActivityProgress;
use super::types::{LogCandidate, LogEntry};
use super::validation::validate_log;

/// Progress service for activities.
///
/// This service contains pure business logic with no database dependencies.
pub struct ProgressService;

impl ProgressService {
    /// Validates a log against the prior active log and returns the activity
    /// state it leads to.
    ///
    /// `prior` is the latest active log of the activity by (date DESC, id DESC),
    /// excluding the log being written.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the log breaks an ordering rule.
    pub fn evaluate(
        current: &ActivityProgress,
        planned_end: Option<NaiveDate>,
        candidate: &LogCandidate,
        prior: Option<&LogEntry>,
    ) -> Result<ActivityProgress, ProgressError> {
        validate_log(candidate, prior)?;
        Ok(current.apply(candidate.date, candidate.progress_percent, planned_end))
    }

    /// Decides whether a log may be soft-deleted.
    ///
    /// A log at 100 that is the latest active log of its activity, or ties
    /// with it (the latest is also at 100 on the same date), holds the
    /// activity's completion.
    ///
    /// # Errors
    ///
    /// Returns `CompletedLogDelete` for such a log.
    pub fn check_delete(log: &LogEntry, latest: Option<&LogEntry>) -> Result<(), ProgressError> {
        if log.progress_percent != 100 {
            return Ok(());
        }

        if latest.is_some_and(|latest| latest.progress_percent == 100 && latest.date == log.date) {
            return Err(ProgressError::CompletedLogDelete);
        }
        Ok(())
    }

    /// Returns the latest log of a chain: the entry with the greatest (date, id).
    #[must_use]
    pub fn latest(logs: &[LogEntry]) -> Option<&LogEntry> {
        logs.iter().max_by_key(|log| log.order_key())
    }

    /// Returns the latest log of a chain other than `exclude`.
    #[must_use]
    pub fn latest_excluding(logs: &[LogEntry], exclude: i32) -> Option<&LogEntry> {
        logs.iter()
            .filter(|log| log.id != exclude)
            .max_by_key(|log| log.order_key())
    }
}
