//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod activities;
pub mod fund_transactions;
pub mod health;
pub mod progress_logs;
pub mod projects;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(projects::routes())
        .merge(fund_transactions::routes())
        .merge(activities::routes())
        .merge(progress_logs::routes())
}
