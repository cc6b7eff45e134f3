//! Progress log routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use buildtrack_core::progress::{AddLogInput, UpdateLogInput};
use buildtrack_shared::types::ActivityId;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use crate::error::error_response;
use crate::extractors::Actor;

/// Creates the progress log routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/activities/{activity_id}/progress-logs",
            get(list_logs).post(add_log),
        )
        .route(
            "/progress-logs/{log_id}",
            get(get_log).patch(update_log).delete(delete_log),
        )
}

/// Request body for adding a progress log.
#[derive(Debug, Deserialize)]
pub struct AddLogRequest {
    /// Observation date (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Cumulative percentage, 0 to 100.
    pub progress_percent: i32,
    /// Free-text remarks.
    #[serde(default)]
    pub remarks: String,
}

/// Request body for editing a progress log.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLogRequest {
    /// New observation date.
    pub date: Option<NaiveDate>,
    /// New percentage.
    pub progress_percent: Option<i32>,
    /// New remarks.
    pub remarks: Option<String>,
}

/// Narrows a requested percent. Values outside `i16` saturate, so the range
/// check still reports them as out of range.
fn narrow_percent(percent: i32) -> i16 {
    i16::try_from(percent).unwrap_or(if percent < 0 { i16::MIN } else { i16::MAX })
}

/// GET `/activities/{activity_id}/progress-logs` - List active logs in chain order.
async fn list_logs(
    State(state): State<AppState>,
    Path(activity_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.progress().list_progress_logs(activity_id).await {
        Ok(logs) => (StatusCode::OK, Json(json!({ "logs": logs }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/activities/{activity_id}/progress-logs` - Append a log.
async fn add_log(
    State(state): State<AppState>,
    actor: Actor,
    Path(activity_id): Path<Uuid>,
    Json(request): Json<AddLogRequest>,
) -> impl IntoResponse {
    let input = AddLogInput {
        activity_id: ActivityId::from_uuid(activity_id),
        date: request.date,
        progress_percent: narrow_percent(request.progress_percent),
        remarks: request.remarks,
        created_by: actor.user_id(),
    };

    match state.progress().add_progress_log(input).await {
        Ok((log, activity)) => (
            StatusCode::CREATED,
            Json(json!({ "log": log, "activity": activity })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/progress-logs/{log_id}` - Get an active log.
async fn get_log(State(state): State<AppState>, Path(log_id): Path<i32>) -> impl IntoResponse {
    match state.progress().get_progress_log(log_id).await {
        Ok(log) => (StatusCode::OK, Json(log)).into_response(),
        Err(e) => error_response(e),
    }
}

/// PATCH `/progress-logs/{log_id}` - Edit a log and re-derive the activity.
async fn update_log(
    State(state): State<AppState>,
    Path(log_id): Path<i32>,
    Json(request): Json<UpdateLogRequest>,
) -> impl IntoResponse {
    let input = UpdateLogInput {
        date: request.date,
        progress_percent: request.progress_percent.map(narrow_percent),
        remarks: request.remarks,
    };

    match state.progress().update_progress_log(log_id, input).await {
        Ok((log, activity)) => {
            (StatusCode::OK, Json(json!({ "log": log, "activity": activity }))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// DELETE `/progress-logs/{log_id}` - Soft-delete a log.
async fn delete_log(State(state): State<AppState>, Path(log_id): Path<i32>) -> impl IntoResponse {
    match state.progress().soft_delete_progress_log(log_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::narrow_percent;
    use crate::AppState;
    use crate::test_support::{create_project, send, test_state};

    async fn activity(state: &AppState, code: &str, planned_end: &str) -> String {
        let project = create_project(state, code).await;
        let (status, body) = send(
            state,
            "POST",
            &format!("/api/v1/projects/{project}/activities"),
            Some(json!({
                "name": "Blockwork",
                "planned_start": "2024-03-01",
                "planned_end": planned_end,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    async fn add(state: &AppState, activity: &str, date: &str, percent: i32) -> (StatusCode, Value) {
        send(
            state,
            "POST",
            &format!("/api/v1/activities/{activity}/progress-logs"),
            Some(json!({ "date": date, "progress_percent": percent })),
        )
        .await
    }

    #[tokio::test]
    async fn test_decrease_rejected_and_state_kept() {
        let state = test_state().await;
        let activity = activity(&state, "LOG-1", "2024-04-30").await;

        let (status, body) = add(&state, &activity, "2024-03-01", 40).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["activity"]["status"], "In Progress");

        let (status, body) = add(&state, &activity, "2024-03-02", 30).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["field"], "progress_percent");

        let (_, body) =
            send(&state, "GET", &format!("/api/v1/activities/{activity}/status"), None).await;
        assert_eq!(body["progress_percent"], 40);
    }

    #[rstest]
    #[case(-1)]
    #[case(101)]
    #[case(40_000)]
    #[case(-70_000)]
    #[tokio::test]
    async fn test_out_of_range_percent_is_validation_error(#[case] percent: i32) {
        let state = test_state().await;
        let activity = activity(&state, "LOG-5", "2024-04-30").await;

        let (status, body) = add(&state, &activity, "2024-03-01", percent).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["field"], "progress_percent");
    }

    #[rstest]
    #[case(0, 0)]
    #[case(100, 100)]
    #[case(40_000, i16::MAX)]
    #[case(-40_000, i16::MIN)]
    fn test_narrow_percent(#[case] requested: i32, #[case] narrowed: i16) {
        assert_eq!(narrow_percent(requested), narrowed);
    }

    #[rstest]
    #[case("2024-04-05", 50, "Delayed")]
    #[case("2024-03-15", 50, "In Progress")]
    #[case("2024-04-05", 100, "Completed")]
    #[case("2024-03-15", 0, "Pending")]
    #[tokio::test]
    async fn test_first_log_derives_status(
        #[case] date: &str,
        #[case] percent: i32,
        #[case] expected: &str,
    ) {
        let state = test_state().await;
        let activity = activity(&state, "LOG-6", "2024-03-31").await;

        let (status, body) = add(&state, &activity, date, percent).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["activity"]["status"], expected);
    }

    #[tokio::test]
    async fn test_completed_log_delete_guard() {
        let state = test_state().await;
        let activity = activity(&state, "LOG-3", "2024-04-30").await;

        add(&state, &activity, "2024-03-01", 50).await;
        let (_, body) = add(&state, &activity, "2024-03-20", 100).await;
        assert_eq!(body["activity"]["status"], "Completed");
        assert_eq!(body["activity"]["actual_end"], "2024-03-20");

        let log_id = body["log"]["id"].as_i64().unwrap();
        let (status, body) =
            send(&state, "DELETE", &format!("/api/v1/progress-logs/{log_id}"), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "BUSINESS_RULE_VIOLATION");

        let (_, body) =
            send(&state, "GET", &format!("/api/v1/activities/{activity}/progress-logs"), None)
                .await;
        assert_eq!(body["logs"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_log() {
        let state = test_state().await;
        let activity = activity(&state, "LOG-4", "2024-04-30").await;

        let (_, body) = add(&state, &activity, "2024-03-01", 20).await;
        let log_id = body["log"]["id"].as_i64().unwrap();

        let (status, body) = send(
            &state,
            "PATCH",
            &format!("/api/v1/progress-logs/{log_id}"),
            Some(json!({ "progress_percent": 35 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["log"]["progress_percent"], 35);
        assert_eq!(body["activity"]["progress_percent"], 35);

        let (status, _) = send(
            &state,
            "PATCH",
            &format!("/api/v1/progress-logs/{log_id}"),
            Some(json!({ "progress_percent": 40_000 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
