//! Domain types for activities and their progress logs.

use buildtrack_shared::types::{ActivityId, ProjectId, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Input for creating a planned activity.
///
/// Progress, status and actual dates are not part of the input: they are
/// derived from progress logs only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateActivityInput {
    /// Owning project.
    pub project_id: ProjectId,
    /// Optional work category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Activity name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Planned start date.
    pub planned_start: Option<NaiveDate>,
    /// Planned end date.
    pub planned_end: Option<NaiveDate>,
    /// User creating the activity.
    pub created_by: Option<UserId>,
}

/// Partial update of an activity's planning fields. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateActivityInput {
    /// New category label.
    pub category: Option<String>,
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New planned start.
    pub planned_start: Option<NaiveDate>,
    /// New planned end.
    pub planned_end: Option<NaiveDate>,
}

/// Input for appending a progress log to an activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddLogInput {
    /// Activity the log reports on.
    pub activity_id: ActivityId,
    /// Date of the observation.
    pub date: NaiveDate,
    /// Cumulative completion percentage.
    pub progress_percent: i16,
    /// Free-text remarks.
    #[serde(default)]
    pub remarks: String,
    /// User reporting the progress.
    pub created_by: Option<UserId>,
}

/// Partial update of a progress log. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLogInput {
    /// New observation date.
    pub date: Option<NaiveDate>,
    /// New percentage.
    pub progress_percent: Option<i16>,
    /// New remarks.
    pub remarks: Option<String>,
}

/// The ordering-relevant fields of a log about to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogCandidate {
    /// Observation date.
    pub date: NaiveDate,
    /// Cumulative percentage.
    pub progress_percent: i16,
}

impl LogCandidate {
    /// Candidate for a new log.
    #[must_use]
    pub fn from_add(input: &AddLogInput) -> Self {
        Self {
            date: input.date,
            progress_percent: input.progress_percent,
        }
    }

    /// Candidate for an edited log: the stored fields overlaid with the update.
    #[must_use]
    pub fn merged(stored: &LogEntry, update: &UpdateLogInput) -> Self {
        Self {
            date: update.date.unwrap_or(stored.date),
            progress_percent: update.progress_percent.unwrap_or(stored.progress_percent),
        }
    }
}

/// One active progress log as seen by the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Insertion sequence, the tie-break within a date.
    pub id: i32,
    /// Observation date.
    pub date: NaiveDate,
    /// Cumulative percentage.
    pub progress_percent: i16,
}

impl LogEntry {
    /// Chain order key: (date, id).
    #[must_use]
    pub fn order_key(&self) -> (NaiveDate, i32) {
        (self.date, self.id)
    }
}
