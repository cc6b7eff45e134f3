//! Validation rules for activities and progress logs.

use chrono::NaiveDate;

use super::error::ProgressError;
use super::types::{LogCandidate, LogEntry};

/// Validates that the planned window is not inverted.
///
/// Either bound may be missing.
///
/// # Errors
///
/// Returns `PlannedEndBeforeStart` if both are set and end < start.
pub fn validate_planned_window(
    planned_start: Option<NaiveDate>,
    planned_end: Option<NaiveDate>,
) -> Result<(), ProgressError> {
    match (planned_start, planned_end) {
        (Some(start), Some(end)) if end < start => Err(ProgressError::PlannedEndBeforeStart),
        _ => Ok(()),
    }
}

/// Validates an activity name.
///
/// # Errors
///
/// Returns `BlankName` if the name is empty or whitespace.
pub fn validate_name(name: &str) -> Result<(), ProgressError> {
    if name.trim().is_empty() {
        return Err(ProgressError::BlankName);
    }
    Ok(())
}

/// Validates a log against the latest other active log of its activity.
///
/// Checks run in order: range, decrease, date regression, return to zero.
///
/// # Errors
///
/// Returns the first rule the candidate breaks.
pub fn validate_log(candidate: &LogCandidate, prior: Option<&LogEntry>) -> Result<(), ProgressError> {
    let percent = candidate.progress_percent;
    if !(0..=100).contains(&percent) {
        return Err(ProgressError::PercentOutOfRange(percent));
    }

    let Some(prior) = prior else {
        return Ok(());
    };

    if percent < prior.progress_percent {
        return Err(ProgressError::ProgressDecreased {
            previous: prior.progress_percent,
            attempted: percent,
        });
    }

    if candidate.date < prior.date {
        return Err(ProgressError::DateRegressed {
            previous: prior.date,
            attempted: candidate.date,
        });
    }

    if percent == 0 {
        return Err(ProgressError::ZeroAfterStart);
    }

    Ok(())
}
