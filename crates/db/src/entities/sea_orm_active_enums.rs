//! Enums stored as strings.

use buildtrack_core::ledger::TransactionType as CoreTransactionType;
use buildtrack_core::progress::ActivityStatus as CoreActivityStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of a fund transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum TransactionType {
    /// Money in.
    #[sea_orm(string_value = "Credit")]
    Credit,
    /// Money out.
    #[sea_orm(string_value = "Debit")]
    Debit,
}

/// Derived lifecycle status of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ActivityStatus {
    /// No progress yet.
    #[sea_orm(string_value = "Pending")]
    Pending,
    /// Started.
    #[sea_orm(string_value = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    /// Reached 100%.
    #[sea_orm(string_value = "Completed")]
    Completed,
    /// Past planned end.
    #[sea_orm(string_value = "Delayed")]
    Delayed,
}

impl From<CoreTransactionType> for TransactionType {
    fn from(value: CoreTransactionType) -> Self {
        match value {
            CoreTransactionType::Credit => Self::Credit,
            CoreTransactionType::Debit => Self::Debit,
        }
    }
}

impl From<TransactionType> for CoreTransactionType {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Credit => Self::Credit,
            TransactionType::Debit => Self::Debit,
        }
    }
}

impl From<CoreActivityStatus> for ActivityStatus {
    fn from(value: CoreActivityStatus) -> Self {
        match value {
            CoreActivityStatus::Pending => Self::Pending,
            CoreActivityStatus::InProgress => Self::InProgress,
            CoreActivityStatus::Completed => Self::Completed,
            CoreActivityStatus::Delayed => Self::Delayed,
        }
    }
}

impl From<ActivityStatus> for CoreActivityStatus {
    fn from(value: ActivityStatus) -> Self {
        match value {
            ActivityStatus::Pending => Self::Pending,
            ActivityStatus::InProgress => Self::InProgress,
            ActivityStatus::Completed => Self::Completed,
            ActivityStatus::Delayed => Self::Delayed,
        }
    }
}
