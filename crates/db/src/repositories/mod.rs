//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod activity;
pub mod fund_transaction;
pub mod progress;
pub mod project;

pub use activity::{ActivityRepository, TrackingError};
pub use fund_transaction::{FundError, FundTransactionRepository, LedgerFilter};
pub use progress::ProgressRepository;
pub use project::{CreateProjectInput, ProjectError, ProjectRepository};
