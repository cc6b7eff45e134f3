//! Activity status and the state derived from progress logs.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::LogEntry;

/// Lifecycle status of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityStatus {
    /// No progress reported yet.
    Pending,
    /// Work has started.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Reached 100%.
    Completed,
    /// Past the planned end without reaching 100%.
    Delayed,
}

impl ActivityStatus {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Delayed => "Delayed",
        }
    }

    /// All statuses in lifecycle order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Pending, Self::InProgress, Self::Completed, Self::Delayed]
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in progress" | "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "delayed" => Ok(Self::Delayed),
            other => Err(format!("Unknown activity status: {other}")),
        }
    }
}

/// The part of an activity that only progress logs may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityProgress {
    /// Percentage of the latest accepted log.
    pub progress_percent: i16,
    /// Derived status.
    pub status: ActivityStatus,
    /// Date of the first log above zero.
    pub actual_start: Option<NaiveDate>,
    /// Date of the log that reached 100.
    pub actual_end: Option<NaiveDate>,
}

impl Default for ActivityProgress {
    fn default() -> Self {
        Self::pending()
    }
}

impl ActivityProgress {
    /// State of an activity with no logs.
    #[must_use]
    pub const fn pending() -> Self {
        Self {
            progress_percent: 0,
            status: ActivityStatus::Pending,
            actual_start: None,
            actual_end: None,
        }
    }

    /// Applies an accepted log.
    ///
    /// At 100 the activity completes on the log date; above zero it is in
    /// progress and keeps the first start date. A log dated after the
    /// planned end that has not reached 100 marks the activity delayed.
    #[must_use]
    pub fn apply(&self, date: NaiveDate, percent: i16, planned_end: Option<NaiveDate>) -> Self {
        let mut next = Self {
            progress_percent: percent,
            ..*self
        };

        if percent == 100 {
            next.status = ActivityStatus::Completed;
            next.actual_end = Some(date);
        } else if percent > 0 {
            next.status = ActivityStatus::InProgress;
            if next.actual_start.is_none() {
                next.actual_start = Some(date);
            }
        }

        if percent < 100 && planned_end.is_some_and(|end| date > end) {
            next.status = ActivityStatus::Delayed;
        }

        next
    }

    /// Rebuilds the derived state from an activity's active logs.
    ///
    /// Logs may be passed in any order; they are replayed in (date, id) order.
    #[must_use]
    pub fn replay(logs: &[LogEntry], planned_end: Option<NaiveDate>) -> Self {
        let mut ordered: Vec<&LogEntry> = logs.iter().collect();
        ordered.sort_by_key(|log| log.order_key());

        ordered.into_iter().fold(Self::pending(), |state, log| {
            state.apply(log.date, log.progress_percent, planned_end)
        })
    }

    /// Returns true once the activity has reached 100%.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == ActivityStatus::Completed
    }
}
