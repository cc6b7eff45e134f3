//! Shared fixtures for repository integration tests.
//!
//! Each test gets its own in-memory SQLite database, migrated from scratch.
//! The pool holds exactly one connection: every connection to
//! `sqlite::memory:` opens a separate database.

#![allow(dead_code)]

use buildtrack_core::ledger::{RecordTransactionInput, TransactionType};
use buildtrack_core::progress::{AddLogInput, CreateActivityInput};
use buildtrack_db::entities::{activities, fund_transactions, projects};
use buildtrack_db::migration::{Migrator, MigratorTrait};
use buildtrack_db::{
    ActivityRepository, ChainLocks, FundTransactionRepository, ProgressRepository,
    ProjectRepository, repositories::CreateProjectInput,
};
use buildtrack_shared::types::{ActivityId, ProjectId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

pub struct TestContext {
    pub db: DatabaseConnection,
    pub locks: ChainLocks,
}

impl TestContext {
    pub async fn new() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        Self {
            db,
            locks: ChainLocks::new(),
        }
    }

    pub fn projects(&self) -> ProjectRepository {
        ProjectRepository::new(self.db.clone())
    }

    pub fn ledger(&self) -> FundTransactionRepository {
        FundTransactionRepository::new(self.db.clone(), self.locks.clone())
    }

    pub fn activities(&self) -> ActivityRepository {
        ActivityRepository::new(self.db.clone())
    }

    pub fn progress(&self) -> ProgressRepository {
        ProgressRepository::new(self.db.clone(), self.locks.clone())
    }

    pub async fn project(&self, code: &str) -> projects::Model {
        self.projects()
            .create_project(CreateProjectInput {
                code: code.to_string(),
                name: format!("Project {code}"),
                location: "Site A".to_string(),
                contract_sum: Decimal::new(5_000_000, 0),
                created_by: None,
            })
            .await
            .unwrap()
    }

    pub async fn record(
        &self,
        project_id: Uuid,
        day: NaiveDate,
        transaction_type: TransactionType,
        amount: Decimal,
    ) -> fund_transactions::Model {
        self.ledger()
            .record_transaction(transaction(project_id, day, transaction_type, amount))
            .await
            .unwrap()
    }

    pub async fn activity(
        &self,
        project_id: Uuid,
        planned_start: Option<NaiveDate>,
        planned_end: Option<NaiveDate>,
    ) -> activities::Model {
        self.activities()
            .create_activity(CreateActivityInput {
                project_id: ProjectId::from_uuid(project_id),
                category: Some("Structural".to_string()),
                name: "Foundation works".to_string(),
                description: String::new(),
                planned_start,
                planned_end,
                created_by: None,
            })
            .await
            .unwrap()
    }
}

pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

pub fn transaction(
    project_id: Uuid,
    day: NaiveDate,
    transaction_type: TransactionType,
    amount: Decimal,
) -> RecordTransactionInput {
    RecordTransactionInput {
        project_id: ProjectId::from_uuid(project_id),
        date: day,
        payee: "Main contractor".to_string(),
        transaction_type,
        amount,
        description: String::new(),
        pv_or_receipt_no: "PV-0001".to_string(),
        remarks: String::new(),
        created_by: None,
    }
}

pub fn log(activity_id: Uuid, day: NaiveDate, progress_percent: i16) -> AddLogInput {
    AddLogInput {
        activity_id: ActivityId::from_uuid(activity_id),
        date: day,
        progress_percent,
        remarks: String::new(),
        created_by: None,
    }
}
