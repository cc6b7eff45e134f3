//! Database seeder for Buildtrack development and testing.
//!
//! Seeds a demo project with a three-entry fund ledger and one activity
//! whose progress logs run it to completion. Running it twice is a no-op.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use buildtrack_core::ledger::{RecordTransactionInput, TransactionType};
use buildtrack_core::progress::{AddLogInput, CreateActivityInput};
use buildtrack_db::entities::projects;
use buildtrack_db::repositories::CreateProjectInput;
use buildtrack_db::{
    ActivityRepository, ChainLocks, FundTransactionRepository, ProgressRepository,
    ProjectRepository,
};
use buildtrack_shared::AppConfig;
use buildtrack_shared::types::{ActivityId, ProjectId, UserId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

/// Demo project code (consistent for all seeds).
const DEMO_PROJECT_CODE: &str = "DEMO-001";
/// Seed user recorded as creator.
const SEED_USER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0002);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = buildtrack_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    let locks = ChainLocks::new();

    if projects::Entity::find()
        .filter(projects::Column::Code.eq(DEMO_PROJECT_CODE))
        .one(&db)
        .await?
        .is_some()
    {
        println!("  Demo project already exists, skipping...");
        return Ok(());
    }

    println!("Seeding demo project...");
    let project_id = seed_project(&db).await?;

    println!("Seeding fund ledger...");
    seed_ledger(&db, &locks, project_id).await?;

    println!("Seeding activity progress...");
    seed_progress(&db, &locks, project_id).await?;

    println!("Seeding complete!");
    Ok(())
}

fn seed_user() -> Option<UserId> {
    Some(UserId::from_uuid(SEED_USER_ID))
}

fn day(month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, month, day).context("invalid seed date")
}

/// Seeds the demo project.
async fn seed_project(db: &DatabaseConnection) -> anyhow::Result<Uuid> {
    let project = ProjectRepository::new(db.clone())
        .create_project(CreateProjectInput {
            code: DEMO_PROJECT_CODE.to_string(),
            name: "Community Health Centre".to_string(),
            location: "Lot 12, Riverside".to_string(),
            contract_sum: Decimal::new(250_000_000, 2),
            created_by: seed_user(),
        })
        .await?;

    println!("  Created project: {} ({})", project.code, project.id);
    Ok(project.id)
}

/// Seeds Credit 1000, Debit 300, Credit 200 for a closing balance of 900.
async fn seed_ledger(
    db: &DatabaseConnection,
    locks: &ChainLocks,
    project_id: Uuid,
) -> anyhow::Result<()> {
    let ledger = FundTransactionRepository::new(db.clone(), locks.clone());

    let entries = [
        (day(1, 1)?, "Client advance", TransactionType::Credit, 1000, "RC-0001"),
        (day(1, 5)?, "Cement supplier", TransactionType::Debit, 300, "PV-0001"),
        (day(1, 10)?, "Interim payment", TransactionType::Credit, 200, "RC-0002"),
    ];

    for (date, payee, transaction_type, amount, voucher) in entries {
        let row = ledger
            .record_transaction(RecordTransactionInput {
                project_id: ProjectId::from_uuid(project_id),
                date,
                payee: payee.to_string(),
                transaction_type,
                amount: Decimal::from(amount),
                description: String::new(),
                pv_or_receipt_no: voucher.to_string(),
                remarks: String::new(),
                created_by: seed_user(),
            })
            .await?;
        println!(
            "  {} {} {} -> balance {}",
            row.date, transaction_type, amount, row.balance_after
        );
    }

    Ok(())
}

/// Seeds one activity whose logs run from 30% to completion.
async fn seed_progress(
    db: &DatabaseConnection,
    locks: &ChainLocks,
    project_id: Uuid,
) -> anyhow::Result<()> {
    let activity = ActivityRepository::new(db.clone())
        .create_activity(CreateActivityInput {
            project_id: ProjectId::from_uuid(project_id),
            category: Some("Substructure".to_string()),
            name: "Foundation".to_string(),
            description: "Excavation, blinding and footings".to_string(),
            planned_start: Some(day(3, 1)?),
            planned_end: Some(day(4, 30)?),
            created_by: seed_user(),
        })
        .await?;

    let progress = ProgressRepository::new(db.clone(), locks.clone());
    for (date, percent) in [(day(3, 1)?, 30), (day(3, 10)?, 60), (day(3, 20)?, 100)] {
        let (_, activity) = progress
            .add_progress_log(AddLogInput {
                activity_id: ActivityId::from_uuid(activity.id),
                date,
                progress_percent: percent,
                remarks: String::new(),
                created_by: seed_user(),
            })
            .await?;
        println!("  {date} {percent}% -> {:?}", activity.status);
    }

    Ok(())
}
