//! Chain views over fund transactions and progress logs.
//!
//! These are the only places that build the active-only, chain-ordered
//! selects. Chain order is (date, id); the latest row of a chain is the
//! first row in (date DESC, id DESC) order.

use buildtrack_core::ledger::ChainEntry;
use buildtrack_core::progress::{ActivityProgress, LogEntry};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Select,
};
use uuid::Uuid;

use crate::entities::{activities, fund_transactions, progress_logs, projects};

/// Active fund transactions of a project in chain order.
#[must_use]
pub fn active_transactions(project_id: Uuid) -> Select<fund_transactions::Entity> {
    fund_transactions::Entity::find()
        .filter(fund_transactions::Column::ProjectId.eq(project_id))
        .filter(fund_transactions::Column::IsActive.eq(true))
        .order_by_asc(fund_transactions::Column::Date)
        .order_by_asc(fund_transactions::Column::Id)
}

/// Latest active fund transaction of a project, optionally skipping one row.
///
/// Writers call this under the project's chain lock.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn latest_active_transaction<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
    exclude: Option<i32>,
) -> Result<Option<fund_transactions::Model>, DbErr> {
    let mut query = fund_transactions::Entity::find()
        .filter(fund_transactions::Column::ProjectId.eq(project_id))
        .filter(fund_transactions::Column::IsActive.eq(true));

    if let Some(id) = exclude {
        query = query.filter(fund_transactions::Column::Id.ne(id));
    }

    query
        .order_by_desc(fund_transactions::Column::Date)
        .order_by_desc(fund_transactions::Column::Id)
        .limit(1)
        .one(conn)
        .await
}

/// Active progress logs of an activity in chain order.
#[must_use]
pub fn active_logs(activity_id: Uuid) -> Select<progress_logs::Entity> {
    progress_logs::Entity::find()
        .filter(progress_logs::Column::ActivityId.eq(activity_id))
        .filter(progress_logs::Column::IsActive.eq(true))
        .order_by_asc(progress_logs::Column::Date)
        .order_by_asc(progress_logs::Column::Id)
}

/// Latest active progress log of an activity, optionally skipping one row.
///
/// Writers call this under the activity's chain lock.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn latest_active_log<C: ConnectionTrait>(
    conn: &C,
    activity_id: Uuid,
    exclude: Option<i32>,
) -> Result<Option<progress_logs::Model>, DbErr> {
    let mut query = progress_logs::Entity::find()
        .filter(progress_logs::Column::ActivityId.eq(activity_id))
        .filter(progress_logs::Column::IsActive.eq(true));

    if let Some(id) = exclude {
        query = query.filter(progress_logs::Column::Id.ne(id));
    }

    query
        .order_by_desc(progress_logs::Column::Date)
        .order_by_desc(progress_logs::Column::Id)
        .limit(1)
        .one(conn)
        .await
}

/// Reads a project row with `FOR UPDATE`, serialising writers to its ledger.
///
/// SQLite has no row locks; there the write transaction itself serialises.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn lock_project<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
) -> Result<Option<projects::Model>, DbErr> {
    projects::Entity::find_by_id(project_id)
        .lock_exclusive()
        .one(conn)
        .await
}

/// Reads an activity row with `FOR UPDATE`, serialising writers to its log chain.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn lock_activity<C: ConnectionTrait>(
    conn: &C,
    activity_id: Uuid,
) -> Result<Option<activities::Model>, DbErr> {
    activities::Entity::find_by_id(activity_id)
        .lock_exclusive()
        .one(conn)
        .await
}

/// The chain view of a stored fund transaction.
#[must_use]
pub fn chain_entry(model: &fund_transactions::Model) -> ChainEntry {
    ChainEntry {
        id: model.id,
        date: model.date,
        transaction_type: model.transaction_type.into(),
        amount: model.amount,
        balance_after: model.balance_after,
    }
}

/// The chain view of a stored progress log.
#[must_use]
pub fn log_entry(model: &progress_logs::Model) -> LogEntry {
    LogEntry {
        id: model.id,
        date: model.date,
        progress_percent: model.progress_percent,
    }
}

/// The derived progress state currently stored on an activity.
#[must_use]
pub fn activity_progress(model: &activities::Model) -> ActivityProgress {
    ActivityProgress {
        progress_percent: model.progress_percent,
        status: model.status.into(),
        actual_start: model.actual_start,
        actual_end: model.actual_end,
    }
}
