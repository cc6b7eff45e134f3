//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes over the ledger and progress repositories
//! - Request extractors
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use buildtrack_db::{
    ActivityRepository, ChainLocks, FundTransactionRepository, ProgressRepository,
    ProjectRepository,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Chain locks shared by every ledger and progress writer in this process.
    pub locks: ChainLocks,
    /// Upper bound on request handling time.
    pub request_timeout: Duration,
}

impl AppState {
    /// Creates state with fresh chain locks.
    #[must_use]
    pub fn new(db: DatabaseConnection, request_timeout: Duration) -> Self {
        Self {
            db: Arc::new(db),
            locks: ChainLocks::new(),
            request_timeout,
        }
    }

    /// Project repository.
    #[must_use]
    pub fn projects(&self) -> ProjectRepository {
        ProjectRepository::new((*self.db).clone())
    }

    /// Fund transaction repository sharing this state's chain locks.
    #[must_use]
    pub fn ledger(&self) -> FundTransactionRepository {
        FundTransactionRepository::new((*self.db).clone(), self.locks.clone())
    }

    /// Activity repository.
    #[must_use]
    pub fn activities(&self) -> ActivityRepository {
        ActivityRepository::new((*self.db).clone())
    }

    /// Progress repository sharing this state's chain locks.
    #[must_use]
    pub fn progress(&self) -> ProgressRepository {
        ProgressRepository::new((*self.db).clone(), self.locks.clone())
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let timeout = state.request_timeout;

    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
