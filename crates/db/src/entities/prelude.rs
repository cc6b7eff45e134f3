//! Entity re-exports.

pub use super::activities::Entity as Activities;
pub use super::fund_transactions::Entity as FundTransactions;
pub use super::progress_logs::Entity as ProgressLogs;
pub use super::projects::Entity as Projects;
