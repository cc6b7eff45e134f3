//! Activity planning and progress read-model routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use buildtrack_core::progress::{CreateActivityInput, UpdateActivityInput};
use buildtrack_shared::types::ProjectId;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use crate::error::error_response;
use crate::extractors::Actor;

/// Creates the activity routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{project_id}/activities",
            get(list_activities).post(create_activity),
        )
        .route("/projects/{project_id}/progress-overview", get(progress_overview))
        .route("/projects/{project_id}/progress-trend", get(progress_trend))
        .route(
            "/activities/{activity_id}",
            get(get_activity)
                .patch(update_activity)
                .delete(delete_activity),
        )
        .route("/activities/{activity_id}/status", get(activity_status))
        .route("/activities/{activity_id}/resync", post(resync_activity))
}

/// Request body for creating an activity.
#[derive(Debug, Deserialize)]
pub struct CreateActivityRequest {
    /// Optional work category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Activity name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Planned start (YYYY-MM-DD).
    pub planned_start: Option<NaiveDate>,
    /// Planned end (YYYY-MM-DD).
    pub planned_end: Option<NaiveDate>,
}

/// GET `/projects/{project_id}/activities` - List active activities.
async fn list_activities(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.activities().list_activities(project_id).await {
        Ok(activities) => {
            (StatusCode::OK, Json(json!({ "activities": activities }))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST `/projects/{project_id}/activities` - Create a pending activity.
async fn create_activity(
    State(state): State<AppState>,
    actor: Actor,
    Path(project_id): Path<Uuid>,
    Json(request): Json<CreateActivityRequest>,
) -> impl IntoResponse {
    let input = CreateActivityInput {
        project_id: ProjectId::from_uuid(project_id),
        category: request.category,
        name: request.name,
        description: request.description,
        planned_start: request.planned_start,
        planned_end: request.planned_end,
        created_by: actor.user_id(),
    };

    match state.activities().create_activity(input).await {
        Ok(activity) => (StatusCode::CREATED, Json(activity)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/projects/{project_id}/progress-overview` - Status counts and mean progress.
async fn progress_overview(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.progress().progress_overview(project_id).await {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/projects/{project_id}/progress-trend` - Highest progress per week.
async fn progress_trend(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.progress().weekly_trend(project_id).await {
        Ok(weeks) => (StatusCode::OK, Json(json!({ "weeks": weeks }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/activities/{activity_id}` - Get an active activity.
async fn get_activity(
    State(state): State<AppState>,
    Path(activity_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.activities().get_activity(activity_id).await {
        Ok(activity) => (StatusCode::OK, Json(activity)).into_response(),
        Err(e) => error_response(e),
    }
}

/// PATCH `/activities/{activity_id}` - Edit planning fields.
async fn update_activity(
    State(state): State<AppState>,
    actor: Actor,
    Path(activity_id): Path<Uuid>,
    Json(input): Json<UpdateActivityInput>,
) -> impl IntoResponse {
    match state
        .activities()
        .update_activity(activity_id, input, actor.user_id())
        .await
    {
        Ok(activity) => (StatusCode::OK, Json(activity)).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE `/activities/{activity_id}` - Soft-delete an activity.
async fn delete_activity(
    State(state): State<AppState>,
    actor: Actor,
    Path(activity_id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .activities()
        .soft_delete_activity(activity_id, actor.user_id())
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/activities/{activity_id}/status` - Current derived progress state.
async fn activity_status(
    State(state): State<AppState>,
    Path(activity_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.progress().current_status(activity_id).await {
        Ok(progress) => (StatusCode::OK, Json(progress)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/activities/{activity_id}/resync` - Replay the log chain into the activity.
async fn resync_activity(
    State(state): State<AppState>,
    Path(activity_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.progress().resync_activity(activity_id).await {
        Ok(activity) => (StatusCode::OK, Json(activity)).into_response(),
        Err(e) => error_response(e),
    }
}
