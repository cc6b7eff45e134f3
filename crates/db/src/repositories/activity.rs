//! Activity repository for planning data.
//!
//! This repository owns the planning fields of an activity only. Progress,
//! status and actual dates are written by [`super::ProgressRepository`].

use buildtrack_core::progress::validation::{validate_name, validate_planned_window};
use buildtrack_core::progress::{
    ActivityStatus as CoreActivityStatus, CreateActivityInput, ProgressError, UpdateActivityInput,
};
use buildtrack_shared::AppError;
use buildtrack_shared::types::{ActivityId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{activities, projects};

/// Error types for activity and progress operations.
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    /// Validation, business rule or referential failure.
    #[error(transparent)]
    Progress(#[from] ProgressError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TrackingError> for AppError {
    fn from(err: TrackingError) -> Self {
        match err {
            TrackingError::Progress(e) => e.into(),
            TrackingError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Activity repository.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    db: DatabaseConnection,
}

impl ActivityRepository {
    /// Creates a new activity repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a pending activity under an active project.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the planned window is
    /// inverted, or the project is missing or inactive.
    pub async fn create_activity(
        &self,
        input: CreateActivityInput,
    ) -> Result<activities::Model, TrackingError> {
        validate_name(&input.name)?;
        validate_planned_window(input.planned_start, input.planned_end)?;

        let project_id = input.project_id.into_inner();
        let project = projects::Entity::find_by_id(project_id)
            .one(&self.db)
            .await?
            .ok_or(ProgressError::ProjectNotFound(project_id))?;
        if !project.is_active {
            return Err(ProgressError::ProjectInactive(project_id).into());
        }

        let now = chrono::Utc::now().into();
        let created_by = input.created_by.map(UserId::into_inner);
        let activity = activities::ActiveModel {
            id: Set(ActivityId::new().into_inner()),
            project_id: Set(project_id),
            category: Set(input.category),
            name: Set(input.name),
            description: Set(input.description),
            planned_start: Set(input.planned_start),
            planned_end: Set(input.planned_end),
            actual_start: Set(None),
            actual_end: Set(None),
            progress_percent: Set(0),
            status: Set(CoreActivityStatus::Pending.into()),
            is_active: Set(true),
            created_by: Set(created_by),
            updated_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(activity_id = %activity.id, %project_id, "Activity created");
        Ok(activity)
    }

    /// Gets an active activity by ID.
    ///
    /// # Errors
    ///
    /// Returns `ActivityNotFound` if it is missing or soft-deleted.
    pub async fn get_activity(&self, activity_id: Uuid) -> Result<activities::Model, TrackingError> {
        let activity = activities::Entity::find_by_id(activity_id)
            .filter(activities::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .ok_or(ProgressError::ActivityNotFound(activity_id))?;
        Ok(activity)
    }

    /// Lists a project's active activities by planned start, then name.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` if the project does not exist.
    pub async fn list_activities(
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
            .order_by_asc(activities::Column::PlannedStart)
            .order_by_asc(activities::Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Updates planning fields. The merged planned window is re-validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the activity is missing, the name is blank, or
    /// the planned window is inverted.
    pub async fn update_activity(
        &self,
        activity_id: Uuid,
        input: UpdateActivityInput,
        updated_by: Option<UserId>,
    ) -> Result<activities::Model, TrackingError> {
        let stored = self.get_activity(activity_id).await?;

        if let Some(name) = &input.name {
            validate_name(name)?;
        }
        let planned_start = input.planned_start.or(stored.planned_start);
        let planned_end = input.planned_end.or(stored.planned_end);
        validate_planned_window(planned_start, planned_end)?;

        let mut active: activities::ActiveModel = stored.into();
        if let Some(category) = input.category {
            active.category = Set(Some(category));
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        active.planned_start = Set(planned_start);
        active.planned_end = Set(planned_end);
        active.updated_by = Set(updated_by.map(UserId::into_inner));
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(&self.db).await?;
        info!(%activity_id, "Activity updated");
        Ok(updated)
    }

    /// Soft-deletes an activity.
    ///
    /// # Errors
    ///
    /// Returns `ActivityNotFound` if it is missing or already deleted.
    pub async fn soft_delete_activity(
        &self,
        activity_id: Uuid,
        updated_by: Option<UserId>,
    ) -> Result<(), TrackingError> {
        let stored = self.get_activity(activity_id).await?;

        let mut active: activities::ActiveModel = stored.into();
        active.is_active = Set(false);
        active.updated_by = Set(updated_by.map(UserId::into_inner));
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&self.db).await?;

        info!(%activity_id, "Activity soft-deleted");
        Ok(())
    }
}
