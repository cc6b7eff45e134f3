//! Project-level progress rollups.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::ActivityStatus;

/// Activity counts by status and the mean completion of a project.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressOverview {
    /// Active activities.
    pub total_activities: u64,
    /// Activities still pending.
    pub pending: u64,
    /// Activities in progress.
    pub in_progress: u64,
    /// Completed activities.
    pub completed: u64,
    /// Delayed activities.
    pub delayed: u64,
    /// Mean progress percent, one decimal place.
    pub overall_progress: Decimal,
    /// Most recent change to any active activity.
    pub last_activity_update: Option<DateTime<Utc>>,
}

impl ProgressOverview {
    /// Builds the overview from each active activity's status and percent.
    #[must_use]
    pub fn from_activities<I>(activities: I) -> Self
    where
        I: IntoIterator<Item = (ActivityStatus, i16)>,
    {
        let mut overview = Self::default();
        let mut percent_total = Decimal::ZERO;

        for (status, percent) in activities {
            overview.total_activities += 1;
            percent_total += Decimal::from(percent);
            match status {
                ActivityStatus::Pending => overview.pending += 1,
                ActivityStatus::InProgress => overview.in_progress += 1,
                ActivityStatus::Completed => overview.completed += 1,
                ActivityStatus::Delayed => overview.delayed += 1,
            }
        }

        if overview.total_activities > 0 {
            overview.overall_progress =
                (percent_total / Decimal::from(overview.total_activities)).round_dp(1);
        }

        overview
    }

    /// Records the latest of the given activity update times.
    #[must_use]
    pub fn with_last_update<I>(mut self, updated_at: I) -> Self
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        self.last_activity_update = updated_at.into_iter().max();
        self
    }
}

/// Highest progress reported in one week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyProgress {
    /// Monday of the week.
    pub week_start: NaiveDate,
    /// Maximum percent logged that week.
    pub progress: i16,
}

/// Monday of the ISO week containing `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Groups logs by week and keeps the highest percent of each, oldest week first.
#[must_use]
pub fn weekly_trend<I>(logs: I) -> Vec<WeeklyProgress>
where
    I: IntoIterator<Item = (NaiveDate, i16)>,
{
    let mut weeks: BTreeMap<NaiveDate, i16> = BTreeMap::new();
    for (date, percent) in logs {
        weeks
            .entry(week_start(date))
            .and_modify(|max| *max = (*max).max(percent))
            .or_insert(percent);
    }

    weeks
        .into_iter()
        .map(|(week_start, progress)| WeeklyProgress {
            week_start,
            progress,
        })
        .collect()
}
