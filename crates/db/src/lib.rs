//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Chain views (`chain`) and per-chain write locks (`locks`)
//! - Repository abstractions for data access
//! - Database migrations

pub mod chain;
pub mod entities;
pub mod locks;
pub mod migration;
pub mod repositories;

pub use locks::{ChainGuard, ChainLocks};
pub use repositories::{
    ActivityRepository, FundTransactionRepository, ProgressRepository, ProjectRepository,
};

use std::time::Duration;

use buildtrack_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool sized from the database configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(config.sqlx_logging);

    Database::connect(options).await
}
