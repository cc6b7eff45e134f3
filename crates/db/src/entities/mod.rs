//! `SeaORM` entity definitions.

pub mod prelude;

pub mod activities;
pub mod fund_transactions;
pub mod progress_logs;
pub mod projects;
pub mod sea_orm_active_enums;
