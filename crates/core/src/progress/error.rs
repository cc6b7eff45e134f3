//! Progress tracking error types.

use buildtrack_shared::AppError;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while planning activities or logging progress.
#[derive(Debug, Error)]
pub enum ProgressError {
    // ========== Validation Errors ==========
    /// Percentage outside 0..=100.
    #[error("Progress must be between 0 and 100.")]
    PercentOutOfRange(i16),

    /// Percentage below the latest active log.
    #[error("Progress cannot decrease.")]
    ProgressDecreased {
        /// Latest accepted percentage.
        previous: i16,
        /// Rejected percentage.
        attempted: i16,
    },

    /// Date before the latest active log.
    #[error("Progress date cannot go backwards.")]
    DateRegressed {
        /// Latest accepted date.
        previous: NaiveDate,
        /// Rejected date.
        attempted: NaiveDate,
    },

    /// Zero after progress has been logged.
    #[error("Progress cannot return to 0.")]
    ZeroAfterStart,

    /// Planned end before planned start.
    #[error("Planned end date cannot be before planned start date.")]
    PlannedEndBeforeStart,

    /// Activity name is required.
    #[error("Activity name is required.")]
    BlankName,

    // ========== Business Rule Errors ==========
    /// The log holds the activity's completion.
    #[error("Completed activities cannot be deleted.")]
    CompletedLogDelete,

    // ========== Referential Errors ==========
    /// Project not found.
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    /// Project is inactive.
    #[error("Project {0} is inactive")]
    ProjectInactive(Uuid),

    /// Activity not found or soft-deleted.
    #[error("Activity not found: {0}")]
    ActivityNotFound(Uuid),

    /// Progress log not found or soft-deleted.
    #[error("Progress log not found: {0}")]
    LogNotFound(i32),

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProgressError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PercentOutOfRange(_) => "PERCENT_OUT_OF_RANGE",
            Self::ProgressDecreased { .. } => "PROGRESS_DECREASED",
            Self::DateRegressed { .. } => "DATE_REGRESSED",
            Self::ZeroAfterStart => "ZERO_AFTER_START",
            Self::PlannedEndBeforeStart => "PLANNED_END_BEFORE_START",
            Self::BlankName => "BLANK_NAME",
            Self::CompletedLogDelete => "COMPLETED_LOG_DELETE",
            Self::ProjectNotFound(_) => "PROJECT_NOT_FOUND",
            Self::ProjectInactive(_) => "PROJECT_INACTIVE",
            Self::ActivityNotFound(_) => "ACTIVITY_NOT_FOUND",
            Self::LogNotFound(_) => "LOG_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::PercentOutOfRange(_)
            | Self::ProgressDecreased { .. }
            | Self::DateRegressed { .. }
            | Self::ZeroAfterStart
            | Self::PlannedEndBeforeStart
            | Self::BlankName => 400,

            Self::CompletedLogDelete => 422,

            Self::ProjectNotFound(_)
            | Self::ProjectInactive(_)
            | Self::ActivityNotFound(_)
            | Self::LogNotFound(_) => 404,

            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the input field a validation error refers to.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::PercentOutOfRange(_) | Self::ProgressDecreased { .. } | Self::ZeroAfterStart => {
                Some("progress_percent")
            }
            Self::DateRegressed { .. } => Some("date"),
            Self::PlannedEndBeforeStart => Some("planned_end"),
            Self::BlankName => Some("name"),
            _ => None,
        }
    }
}

impl From<ProgressError> for AppError {
    fn from(err: ProgressError) -> Self {
        let message = err.to_string();
        match err.http_status_code() {
            400 => Self::Validation {
                field: err.field().map(str::to_string),
                message,
            },
            422 => Self::BusinessRule(message),
            404 => Self::NotFound(message),
            _ => match err {
                ProgressError::Database(e) => Self::Database(e),
                ProgressError::Internal(e) => Self::Internal(e),
                _ => Self::Internal(message),
            },
        }
    }
}
