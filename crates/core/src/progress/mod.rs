//! Activity progress tracking.
//!
//! Progress logs form a chain per activity that may never move backwards in
//! percent or date. Each accepted log drives the activity's derived state:
//! - `status`: the Pending / In Progress / Completed / Delayed state machine
//! - `types`: activity and log inputs, chain entries
//! - `validation`: planned window and log ordering rules
//! - `service`: log evaluation, the delete guard, and chain replay
//! - `overview`: project-level rollups of activity progress

pub mod error;
pub mod overview;
pub mod service;
pub mod status;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;

pub use error::ProgressError;
pub use overview::{ProgressOverview, WeeklyProgress};
pub use service::ProgressService;
pub use status::{ActivityProgress, ActivityStatus};
pub use types::{
    AddLogInput, CreateActivityInput, LogCandidate, LogEntry, UpdateActivityInput, UpdateLogInput,
};
