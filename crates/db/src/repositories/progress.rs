//! Progress log repository: the persistence side of the progress tracker.
//!
//! Log writes run under the activity's chain lock and inside one database
//! transaction that locks the activity row, reads the prior log with
//! `chain::latest_active_log`, validates, writes the log and the derived
//! activity fields, then commits. A failed write leaves neither behind.

use buildtrack_core::progress::overview;
use buildtrack_core::progress::validation::validate_log;
use buildtrack_core::progress::{
    ActivityProgress, AddLogInput, LogCandidate, ProgressError, ProgressOverview,
    ProgressService, UpdateLogInput, WeeklyProgress,
};
use buildtrack_shared::types::UserId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::activity::TrackingError;
use crate::chain;
use crate::entities::{activities, progress_logs, projects};
use crate::locks::ChainLocks;

/// Progress log repository.
#[derive(Debug, Clone)]
pub struct ProgressRepository {
    db: DatabaseConnection,
    locks: ChainLocks,
}

impl ProgressRepository {
    /// Creates a new progress repository.
    ///
    /// Repositories that write the same activities must share `locks`.
    #[must_use]
    pub const fn new(db: DatabaseConnection, locks: ChainLocks) -> Self {
        Self { db, locks }
    }

    /// Appends a progress log and updates the activity's derived state.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the percent is outside 0..=100, below the prior log, or 0 after a prior log
    /// - the date is before the prior log's date
    /// - the activity or its project is missing or inactive
    /// - the database operation fails (nothing is written)
    pub async fn add_progress_log(
        &self,
        input: AddLogInput,
    ) -> Result<(progress_logs::Model, activities::Model), TrackingError> {
        let candidate = LogCandidate::from_add(&input);
        validate_log(&candidate, None)?;

        let activity_id = input.activity_id.into_inner();
        let _guard = self.locks.acquire(activity_id).await;
        let txn = self.db.begin().await?;

        let activity = lock_active_activity(&txn, activity_id).await?;
        ensure_project_active(&txn, activity.project_id).await?;

        let prior = chain::latest_active_log(&txn, activity_id, None)
            .await?
            .as_ref()
            .map(chain::log_entry);
        let next = ProgressService::evaluate(
            &chain::activity_progress(&activity),
            activity.planned_end,
            &candidate,
            prior.as_ref(),
        )?;

        let now = chrono::Utc::now().into();
        let log = progress_logs::ActiveModel {
            activity_id: Set(activity_id),
            date: Set(candidate.date),
            progress_percent: Set(candidate.progress_percent),
            remarks: Set(input.remarks),
            is_active: Set(true),
            created_by: Set(input.created_by.map(UserId::into_inner)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let activity = store_progress(&txn, activity, next).await?;
        txn.commit().await?;

        info!(
            %activity_id,
            log_id = log.id,
            progress_percent = log.progress_percent,
            status = ?activity.status,
            "Progress logged"
        );
        Ok((log, activity))
    }

    /// Edits a progress log, re-validating it against the latest other
    /// active log and re-deriving the activity state from the chain.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::add_progress_log`], or
    /// `LogNotFound` if the log is missing or soft-deleted.
    pub async fn update_progress_log(
        &self,
        log_id: i32,
        input: UpdateLogInput,
    ) -> Result<(progress_logs::Model, activities::Model), TrackingError> {
        let activity_id = self.get_progress_log(log_id).await?.activity_id;

        let _guard = self.locks.acquire(activity_id).await;
        let txn = self.db.begin().await?;

        let activity = lock_active_activity(&txn, activity_id).await?;
        ensure_project_active(&txn, activity.project_id).await?;

        let stored = find_active_log(&txn, log_id).await?;
        let candidate = LogCandidate::merged(&chain::log_entry(&stored), &input);
        let prior = chain::latest_active_log(&txn, activity_id, Some(log_id))
            .await?
            .as_ref()
            .map(chain::log_entry);
        ProgressService::evaluate(
            &chain::activity_progress(&activity),
            activity.planned_end,
            &candidate,
            prior.as_ref(),
        )?;

        let mut active: progress_logs::ActiveModel = stored.into();
        active.date = Set(candidate.date);
        active.progress_percent = Set(candidate.progress_percent);
        if let Some(remarks) = input.remarks {
            active.remarks = Set(remarks);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        let log = active.update(&txn).await?;

        let next = replay_chain(&txn, &activity).await?;
        let activity = store_progress(&txn, activity, next).await?;
        txn.commit().await?;

        info!(%activity_id, log_id, progress_percent = log.progress_percent, "Progress log updated");
        Ok((log, activity))
    }

    /// Soft-deletes a progress log.
    ///
    /// The latest active log of a completed activity cannot be deleted. Other
    /// deletions leave the activity's derived fields as they are; call
    /// [`Self::resync_activity`] to re-derive them.
    ///
    /// # Errors
    ///
    /// Returns `CompletedLogDelete` for the completing log, or `LogNotFound`.
    pub async fn soft_delete_progress_log(&self, log_id: i32) -> Result<(), TrackingError> {
        let activity_id = self.get_progress_log(log_id).await?.activity_id;

        let _guard = self.locks.acquire(activity_id).await;
        let txn = self.db.begin().await?;

        chain::lock_activity(&txn, activity_id).await?;
        let stored = find_active_log(&txn, log_id).await?;
        let latest = chain::latest_active_log(&txn, activity_id, None)
            .await?
            .as_ref()
            .map(chain::log_entry);

        if let Err(e) = ProgressService::check_delete(&chain::log_entry(&stored), latest.as_ref()) {
            warn!(%activity_id, log_id, "Refusing to delete completing progress log");
            return Err(e.into());
        }

        let mut active: progress_logs::ActiveModel = stored.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&txn).await?;

        txn.commit().await?;

        info!(%activity_id, log_id, "Progress log soft-deleted");
        Ok(())
    }

    /// Gets an active progress log by ID.
    ///
    /// # Errors
    ///
    /// Returns `LogNotFound` if the log is missing or soft-deleted.
    pub async fn get_progress_log(&self, log_id: i32) -> Result<progress_logs::Model, TrackingError> {
        find_active_log(&self.db, log_id).await
    }

    /// Lists an activity's active logs in chain order.
    ///
    /// # Errors
    ///
    /// Returns `ActivityNotFound` if the activity is missing or soft-deleted.
    pub async fn list_progress_logs(
        &self,
        activity_id: Uuid,
    ) -> Result<Vec<progress_logs::Model>, TrackingError> {
        find_active_activity(&self.db, activity_id).await?;
        let logs = chain::active_logs(activity_id).all(&self.db).await?;
        Ok(logs)
    }

    /// Derived progress state of an activity. Takes no locks.
    ///
    /// # Errors
    ///
    /// Returns `ActivityNotFound` if the activity is missing or soft-deleted.
    pub async fn current_status(&self, activity_id: Uuid) -> Result<ActivityProgress, TrackingError> {
        let activity = find_active_activity(&self.db, activity_id).await?;
        Ok(chain::activity_progress(&activity))
    }

    /// Replays the activity's active log chain from Pending and stores the result.
    ///
    /// # Errors
    ///
    /// Returns `ActivityNotFound` if the activity is missing or soft-deleted.
    pub async fn resync_activity(&self, activity_id: Uuid) -> Result<activities::Model, TrackingError> {
        let _guard = self.locks.acquire(activity_id).await;
        let txn = self.db.begin().await?;

        let activity = lock_active_activity(&txn, activity_id).await?;
        let before = chain::activity_progress(&activity);
        let next = replay_chain(&txn, &activity).await?;
        let activity = store_progress(&txn, activity, next).await?;

        txn.commit().await?;

        if before == next {
            info!(%activity_id, "Activity already in sync");
        } else {
            info!(
                %activity_id,
                from = before.progress_percent,
                to = next.progress_percent,
                status = %next.status,
                "Activity resynced"
            );
        }
        Ok(activity)
    }

    /// Activity counts by status and mean progress for a project.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` if the project does not exist.
    pub async fn progress_overview(&self, project_id: Uuid) -> Result<ProgressOverview, TrackingError> {
        let rows = self.project_activities(project_id).await?;
        Ok(
            ProgressOverview::from_activities(
                rows.iter().map(|a| (a.status.into(), a.progress_percent)),
            )
            .with_last_update(rows.iter().map(|a| a.updated_at.with_timezone(&chrono::Utc))),
        )
    }

    /// Highest progress logged per week across a project's active activities.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` if the project does not exist.
    pub async fn weekly_trend(&self, project_id: Uuid) -> Result<Vec<WeeklyProgress>, TrackingError> {
        let activity_ids: Vec<Uuid> = self
            .project_activities(project_id)
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect();
        if activity_ids.is_empty() {
            return Ok(Vec::new());
        }

        let logs = progress_logs::Entity::find()
            .filter(progress_logs::Column::ActivityId.is_in(activity_ids))
            .filter(progress_logs::Column::IsActive.eq(true))
            .all(&self.db)
            .await?;

        Ok(overview::weekly_trend(
            logs.iter().map(|l| (l.date, l.progress_percent)),
        ))
    }

    async fn project_activities(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<activities::Model>, TrackingError> {
        projects::Entity::find_by_id(project_id)
            .one(&self.db)
            .await?
            .ok_or(ProgressError::ProjectNotFound(project_id))?;

        let rows = activities::Entity::find()
            .filter(activities::Column::ProjectId.eq(project_id))
            .filter(activities::Column::IsActive.eq(true))
            .all(&self.db)
            .await?;
        Ok(rows)
    }
}

async fn find_active_activity<C: ConnectionTrait>(
    conn: &C,
    activity_id: Uuid,
) -> Result<activities::Model, TrackingError> {
    let activity = activities::Entity::find_by_id(activity_id)
        .filter(activities::Column::IsActive.eq(true))
        .one(conn)
        .await?
        .ok_or(ProgressError::ActivityNotFound(activity_id))?;
    Ok(activity)
}

async fn lock_active_activity(
    txn: &DatabaseTransaction,
    activity_id: Uuid,
) -> Result<activities::Model, TrackingError> {
    let activity = chain::lock_activity(txn, activity_id)
        .await?
        .filter(|a| a.is_active)
        .ok_or(ProgressError::ActivityNotFound(activity_id))?;
    Ok(activity)
}

async fn ensure_project_active(
    txn: &DatabaseTransaction,
    project_id: Uuid,
) -> Result<(), TrackingError> {
    let project = projects::Entity::find_by_id(project_id)
        .one(txn)
        .await?
        .ok_or(ProgressError::ProjectNotFound(project_id))?;
    if !project.is_active {
        return Err(ProgressError::ProjectInactive(project_id).into());
    }
    Ok(())
}

async fn find_active_log<C: ConnectionTrait>(
    conn: &C,
    log_id: i32,
) -> Result<progress_logs::Model, TrackingError> {
    let log = progress_logs::Entity::find_by_id(log_id)
        .filter(progress_logs::Column::IsActive.eq(true))
        .one(conn)
        .await?
        .ok_or(ProgressError::LogNotFound(log_id))?;
    Ok(log)
}

async fn replay_chain(
    txn: &DatabaseTransaction,
    activity: &activities::Model,
) -> Result<ActivityProgress, TrackingError> {
    let logs: Vec<_> = chain::active_logs(activity.id)
        .all(txn)
        .await?
        .iter()
        .map(chain::log_entry)
        .collect();
    Ok(ActivityProgress::replay(&logs, activity.planned_end))
}

/// Writes the derived progress fields, and only those.
async fn store_progress(
    txn: &DatabaseTransaction,
    activity: activities::Model,
    state: ActivityProgress,
) -> Result<activities::Model, TrackingError> {
    let mut active: activities::ActiveModel = activity.into();
    active.progress_percent = Set(state.progress_percent);
    active.status = Set(state.status.into());
    active.actual_start = Set(state.actual_start);
    active.actual_end = Set(state.actual_end);
    active.updated_at = Set(chrono::Utc::now().into());
    Ok(active.update(txn).await?)
}
