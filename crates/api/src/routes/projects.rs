//! Project registry routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use buildtrack_db::repositories::CreateProjectInput;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::error_response;
use crate::extractors::Actor;

/// Creates the project routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects", post(create_project))
        .route("/projects/{project_id}", get(get_project).delete(deactivate_project))
}

/// POST `/projects` - Create a project.
async fn create_project(
    State(state): State<AppState>,
    actor: Actor,
    Json(mut input): Json<CreateProjectInput>,
) -> impl IntoResponse {
    input.created_by = actor.user_id();

    match state.projects().create_project(input).await {
        Ok(project) => (StatusCode::CREATED, Json(project)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/projects/{project_id}` - Get a project, active or not.
async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.projects().get_project(project_id).await {
        Ok(project) => (StatusCode::OK, Json(project)).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE `/projects/{project_id}` - Deactivate a project.
async fn deactivate_project(
    State(state): State<AppState>,
    actor: Actor,
    Path(project_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.projects().deactivate_project(project_id).await {
        Ok(project) => {
            info!(%project_id, actor = ?actor.user_id(), "Project deactivated via API");
            (StatusCode::OK, Json(project)).into_response()
        }
        Err(e) => error_response(e),
    }
}
