//! Project repository for database operations.
//!
//! Projects are the parents of fund ledgers and activities. They are never
//! hard-deleted; deactivating a project closes it to new ledger writes and
//! new activities.

use buildtrack_shared::AppError;
use buildtrack_shared::types::{ProjectId, UserId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::entities::projects;

/// Error types for project operations.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// Project code is required.
    #[error("Project code is required")]
    BlankCode,

    /// Project name is required.
    #[error("Project name is required")]
    BlankName,

    /// Contract sum cannot be negative.
    #[error("Contract sum cannot be negative, got {0}")]
    NegativeContractSum(Decimal),

    /// Another project already uses the code.
    #[error("Project code already exists: {0}")]
    DuplicateCode(String),

    /// Project not found.
    #[error("Project not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ProjectError> for AppError {
    fn from(err: ProjectError) -> Self {
        let message = err.to_string();
        match err {
            ProjectError::BlankCode => Self::validation("code", message),
            ProjectError::BlankName => Self::validation("name", message),
            ProjectError::NegativeContractSum(_) => Self::validation("contract_sum", message),
            ProjectError::DuplicateCode(_) => Self::Conflict(message),
            ProjectError::NotFound(_) => Self::NotFound(message),
            ProjectError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectInput {
    /// Unique project code.
    pub code: String,
    /// Project name.
    pub name: String,
    /// Site location.
    #[serde(default)]
    pub location: String,
    /// Contract sum.
    #[serde(default)]
    pub contract_sum: Decimal,
    /// User creating the project.
    #[serde(skip)]
    pub created_by: Option<UserId>,
}

/// Project repository.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    db: DatabaseConnection,
}

impl ProjectRepository {
    /// Creates a new project repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid, the code is taken, or the
    /// insert fails.
    pub async fn create_project(
        &self,
        input: CreateProjectInput,
    ) -> Result<projects::Model, ProjectError> {
        let code = input.code.trim().to_string();
        if code.is_empty() {
            return Err(ProjectError::BlankCode);
        }
        if input.name.trim().is_empty() {
            return Err(ProjectError::BlankName);
        }
        if input.contract_sum < Decimal::ZERO {
            return Err(ProjectError::NegativeContractSum(input.contract_sum));
        }

        let taken = projects::Entity::find()
            .filter(projects::Column::Code.eq(code.as_str()))
            .count(&self.db)
            .await?;
        if taken > 0 {
            return Err(ProjectError::DuplicateCode(code));
        }

        let now = chrono::Utc::now().into();
        let project = projects::ActiveModel {
            id: Set(ProjectId::new().into_inner()),
            code: Set(code),
            name: Set(input.name),
            location: Set(input.location),
            contract_sum: Set(input.contract_sum),
            is_active: Set(true),
            created_by: Set(input.created_by.map(UserId::into_inner)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(project_id = %project.id, code = %project.code, "Project created");
        Ok(project)
    }

    /// Gets a project by ID, active or not.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such project exists.
    pub async fn get_project(&self, project_id: Uuid) -> Result<projects::Model, ProjectError> {
        projects::Entity::find_by_id(project_id)
            .one(&self.db)
            .await?
            .ok_or(ProjectError::NotFound(project_id))
    }

    /// Deactivates a project. Its ledger and activities stay readable.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such project exists.
    pub async fn deactivate_project(
        &self,
        project_id: Uuid,
    ) -> Result<projects::Model, ProjectError> {
        let project = self.get_project(project_id).await?;
        if !project.is_active {
            return Ok(project);
        }

        let mut active: projects::ActiveModel = project.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now().into());
        let project = active.update(&self.db).await?;

        info!(project_id = %project.id, "Project deactivated");
        Ok(project)
    }
}
