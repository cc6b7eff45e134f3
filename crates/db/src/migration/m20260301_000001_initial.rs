//! Initial schema: projects, fund transactions, activities and progress logs.
//!
//! Fund transactions and progress logs use integer auto-increment keys; the
//! key is the insertion sequence that breaks ties between rows of one date.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Projects::Code).string_len(50).not_null().unique_key())
                    .col(ColumnDef::new(Projects::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Projects::Location).string_len(255).not_null().default(""))
                    .col(
                        ColumnDef::new(Projects::ContractSum)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Projects::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Projects::CreatedBy).uuid().null())
                    .col(timestamp(Projects::CreatedAt))
                    .col(timestamp(Projects::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FundTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FundTransactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FundTransactions::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(FundTransactions::Date).date().not_null())
                    .col(ColumnDef::new(FundTransactions::Payee).string_len(255).not_null())
                    .col(
                        ColumnDef::new(FundTransactions::TransactionType)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(FundTransactions::Amount).decimal_len(15, 2).not_null())
                    .col(
                        ColumnDef::new(FundTransactions::BalanceAfter)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(FundTransactions::Description).text().not_null().default(""))
                    .col(
                        ColumnDef::new(FundTransactions::PvOrReceiptNo)
                            .string_len(100)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(FundTransactions::Remarks).text().not_null().default(""))
                    .col(
                        ColumnDef::new(FundTransactions::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(FundTransactions::CreatedBy).uuid().null())
                    .col(timestamp(FundTransactions::CreatedAt))
                    .col(timestamp(FundTransactions::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fund_transactions_project")
                            .from(FundTransactions::Table, FundTransactions::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fund_transactions_chain")
                    .table(FundTransactions::Table)
                    .col(FundTransactions::ProjectId)
                    .col(FundTransactions::IsActive)
                    .col(FundTransactions::Date)
                    .col(FundTransactions::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Activities::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Activities::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(Activities::Category).string_len(100).null())
                    .col(ColumnDef::new(Activities::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Activities::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Activities::PlannedStart).date().null())
                    .col(ColumnDef::new(Activities::PlannedEnd).date().null())
                    .col(ColumnDef::new(Activities::ActualStart).date().null())
                    .col(ColumnDef::new(Activities::ActualEnd).date().null())
                    .col(
                        ColumnDef::new(Activities::ProgressPercent)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Activities::Status)
                            .string_len(20)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(Activities::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Activities::CreatedBy).uuid().null())
                    .col(ColumnDef::new(Activities::UpdatedBy).uuid().null())
                    .col(timestamp(Activities::CreatedAt))
                    .col(timestamp(Activities::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activities_project")
                            .from(Activities::Table, Activities::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activities_project")
                    .table(Activities::Table)
                    .col(Activities::ProjectId)
                    .col(Activities::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProgressLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProgressLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProgressLogs::ActivityId).uuid().not_null())
                    .col(ColumnDef::new(ProgressLogs::Date).date().not_null())
                    .col(ColumnDef::new(ProgressLogs::ProgressPercent).small_integer().not_null())
                    .col(ColumnDef::new(ProgressLogs::Remarks).text().not_null().default(""))
                    .col(ColumnDef::new(ProgressLogs::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(ProgressLogs::CreatedBy).uuid().null())
                    .col(timestamp(ProgressLogs::CreatedAt))
                    .col(timestamp(ProgressLogs::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_progress_logs_activity")
                            .from(ProgressLogs::Table, ProgressLogs::ActivityId)
                            .to(Activities::Table, Activities::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_progress_logs_chain")
                    .table(ProgressLogs::Table)
                    .col(ProgressLogs::ActivityId)
                    .col(ProgressLogs::IsActive)
                    .col(ProgressLogs::Date)
                    .col(ProgressLogs::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProgressLogs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Activities::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FundTransactions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

fn timestamp<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    Code,
    Name,
    Location,
    ContractSum,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FundTransactions {
    Table,
    Id,
    ProjectId,
    Date,
    Payee,
    TransactionType,
    Amount,
    BalanceAfter,
    Description,
    PvOrReceiptNo,
    Remarks,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Activities {
    Table,
    Id,
    ProjectId,
    Category,
    Name,
    Description,
    PlannedStart,
    PlannedEnd,
    ActualStart,
    ActualEnd,
    ProgressPercent,
    Status,
    IsActive,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProgressLogs {
    Table,
    Id,
    ActivityId,
    Date,
    ProgressPercent,
    Remarks,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
