//! Fund transaction repository: the persistence side of the project ledger.
//!
//! Every write runs under the project's chain lock and inside one database
//! transaction that first locks the project row, then reads the chain tail
//! with `chain::latest_active_transaction`, chains onto it, and commits.

use buildtrack_core::ledger::validation::validate_draft;
use buildtrack_core::ledger::{
    BalanceCorrection, LedgerError, LedgerService, LedgerSummary, RecordTransactionInput,
    TransactionDraft, UpdateTransactionInput,
};
use buildtrack_shared::AppError;
use buildtrack_shared::types::{PageRequest, PageResponse, UserId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::chain;
use crate::entities::{fund_transactions, projects};
use crate::locks::ChainLocks;

/// Error types for fund transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum FundError {
    /// Validation or referential failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<FundError> for AppError {
    fn from(err: FundError) -> Self {
        match err {
            FundError::Ledger(e) => e.into(),
            FundError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Optional date range for ledger listings. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LedgerFilter {
    /// Earliest date.
    pub date_from: Option<NaiveDate>,
    /// Latest date.
    pub date_to: Option<NaiveDate>,
}

/// Fund transaction repository.
#[derive(Debug, Clone)]
pub struct FundTransactionRepository {
    db: DatabaseConnection,
    locks: ChainLocks,
}

impl FundTransactionRepository {
    /// Creates a new fund transaction repository.
    ///
    /// Repositories that write the same ledgers must share `locks`.
    #[must_use]
    pub const fn new(db: DatabaseConnection, locks: ChainLocks) -> Self {
        Self { db, locks }
    }

    /// Records a transaction at the end of its project's chain.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - amount is not positive or payee is blank
    /// - the project is missing or inactive
    /// - the database operation fails (nothing is written)
    pub async fn record_transaction(
        &self,
        input: RecordTransactionInput,
    ) -> Result<fund_transactions::Model, FundError> {
        let draft = TransactionDraft::from_record(&input);
        // Reject bad input before taking any lock.
        validate_draft(&draft)?;

        let project_id = input.project_id.into_inner();
        let _guard = self.locks.acquire(project_id).await;
        let txn = self.db.begin().await?;

        let project = chain::lock_project(&txn, project_id)
            .await?
            .ok_or(LedgerError::ProjectNotFound(project_id))?;
        if !project.is_active {
            return Err(LedgerError::ProjectInactive(project_id).into());
        }

        let tail = chain::latest_active_transaction(&txn, project_id, None)
            .await?
            .as_ref()
            .map(chain::chain_entry);
        let balance = LedgerService::chain_onto(&draft, tail.as_ref())?;

        let now = chrono::Utc::now().into();
        let transaction = fund_transactions::ActiveModel {
            project_id: Set(project_id),
            date: Set(draft.date),
            payee: Set(draft.payee),
            transaction_type: Set(draft.transaction_type.into()),
            amount: Set(draft.amount),
            balance_after: Set(balance.balance_after),
            description: Set(input.description),
            pv_or_receipt_no: Set(input.pv_or_receipt_no),
            remarks: Set(input.remarks),
            is_active: Set(true),
            created_by: Set(input.created_by.map(UserId::into_inner)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            %project_id,
            transaction_id = transaction.id,
            previous_balance = %balance.previous_balance,
            balance_after = %transaction.balance_after,
            "Fund transaction recorded"
        );
        Ok(transaction)
    }

    /// Updates a transaction and recomputes its own balance.
    ///
    /// The balance is chained onto the latest other active transaction of
    /// the project. Later transactions keep their stored balances; use
    /// [`Self::rebalance`] to refresh them.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or its project is missing or
    /// inactive, the merged values are invalid, or the database fails.
    pub async fn update_transaction(
        &self,
        transaction_id: i32,
        input: UpdateTransactionInput,
    ) -> Result<fund_transactions::Model, FundError> {
        let project_id = self.get_transaction(transaction_id).await?.project_id;

        let _guard = self.locks.acquire(project_id).await;
        let txn = self.db.begin().await?;

        let project = chain::lock_project(&txn, project_id)
            .await?
            .ok_or(LedgerError::ProjectNotFound(project_id))?;
        if !project.is_active {
            return Err(LedgerError::ProjectInactive(project_id).into());
        }

        let stored = fund_transactions::Entity::find_by_id(transaction_id)
            .filter(fund_transactions::Column::IsActive.eq(true))
            .one(&txn)
            .await?
            .ok_or(LedgerError::TransactionNotFound(transaction_id))?;

        let stored_draft = TransactionDraft {
            date: stored.date,
            payee: stored.payee.clone(),
            transaction_type: stored.transaction_type.into(),
            amount: stored.amount,
        };
        let draft = TransactionDraft::merged(&stored_draft, &input);

        let tail = chain::latest_active_transaction(&txn, project_id, Some(transaction_id))
            .await?
            .as_ref()
            .map(chain::chain_entry);
        let balance = LedgerService::chain_onto(&draft, tail.as_ref())?;

        let was_tail = tail
            .as_ref()
            .is_none_or(|t| t.order_key() < (stored.date, stored.id));

        let mut active: fund_transactions::ActiveModel = stored.into();
        active.date = Set(draft.date);
        active.payee = Set(draft.payee);
        active.transaction_type = Set(draft.transaction_type.into());
        active.amount = Set(draft.amount);
        active.balance_after = Set(balance.balance_after);
        if let Some(description) = input.description.clone() {
            active.description = Set(description);
        }
        if let Some(pv_or_receipt_no) = input.pv_or_receipt_no.clone() {
            active.pv_or_receipt_no = Set(pv_or_receipt_no);
        }
        if let Some(remarks) = input.remarks.clone() {
            active.remarks = Set(remarks);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        if !was_tail && input.affects_balance() {
            warn!(
                %project_id,
                transaction_id,
                "Edited transaction is not the chain tail; later balances are stale until rebalance"
            );
        }
        info!(
            %project_id,
            transaction_id,
            balance_after = %updated.balance_after,
            "Fund transaction updated"
        );
        Ok(updated)
    }

    /// Soft-deletes a transaction. Stored balances are left as they are.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if the transaction is missing or already deleted.
    pub async fn soft_delete_transaction(&self, transaction_id: i32) -> Result<(), FundError> {
        let project_id = self.get_transaction(transaction_id).await?.project_id;

        let _guard = self.locks.acquire(project_id).await;
        let txn = self.db.begin().await?;

        chain::lock_project(&txn, project_id).await?;
        let stored = fund_transactions::Entity::find_by_id(transaction_id)
            .filter(fund_transactions::Column::IsActive.eq(true))
            .one(&txn)
            .await?
            .ok_or(LedgerError::TransactionNotFound(transaction_id))?;

        let mut active: fund_transactions::ActiveModel = stored.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&txn).await?;

        txn.commit().await?;

        info!(%project_id, transaction_id, "Fund transaction soft-deleted");
        Ok(())
    }

    /// Gets an active transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if the transaction is missing or soft-deleted.
    pub async fn get_transaction(
        &self,
        transaction_id: i32,
    ) -> Result<fund_transactions::Model, FundError> {
        let transaction = fund_transactions::Entity::find_by_id(transaction_id)
            .filter(fund_transactions::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .ok_or(LedgerError::TransactionNotFound(transaction_id))?;
        Ok(transaction)
    }

    /// Lists a project's active transactions in chain order, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` if the project does not exist.
    pub async fn list_transactions(
        &self,
        project_id: Uuid,
        filter: LedgerFilter,
        page: PageRequest,
    ) -> Result<PageResponse<fund_transactions::Model>, FundError> {
        self.ensure_project(project_id).await?;
        let page = page.clamped();

        let mut query = chain::active_transactions(project_id);
        if let Some(date_from) = filter.date_from {
            query = query.filter(fund_transactions::Column::Date.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(fund_transactions::Column::Date.lte(date_to));
        }

        let total = query.clone().count(&self.db).await?;
        let data = query
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page, total))
    }

    /// Current balance of a project: the latest active transaction's
    /// balance_after, or zero for an empty ledger. Takes no locks.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` if the project does not exist.
    pub async fn current_balance(&self, project_id: Uuid) -> Result<Decimal, FundError> {
        self.ensure_project(project_id).await?;
        let latest = chain::latest_active_transaction(&self.db, project_id, None).await?;
        Ok(latest.map_or(Decimal::ZERO, |t| t.balance_after))
    }

    /// Totals over a project's active chain.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` if the project does not exist.
    pub async fn summary(&self, project_id: Uuid) -> Result<LedgerSummary, FundError> {
        self.ensure_project(project_id).await?;
        let entries: Vec<_> = chain::active_transactions(project_id)
            .all(&self.db)
            .await?
            .iter()
            .map(chain::chain_entry)
            .collect();
        Ok(LedgerService::summarize(&entries))
    }

    /// Recomputes every active balance of a project in chain order and
    /// stores the ones that changed.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` if the project does not exist, or a database
    /// error (nothing is written).
    pub async fn rebalance(&self, project_id: Uuid) -> Result<Vec<BalanceCorrection>, FundError> {
        let _guard = self.locks.acquire(project_id).await;
        let txn = self.db.begin().await?;

        chain::lock_project(&txn, project_id)
            .await?
            .ok_or(LedgerError::ProjectNotFound(project_id))?;

        let entries: Vec<_> = chain::active_transactions(project_id)
            .all(&txn)
            .await?
            .iter()
            .map(chain::chain_entry)
            .collect();
        let corrections = LedgerService::rebalance(&entries);

        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        for correction in &corrections {
            debug!(
                transaction_id = correction.id,
                stored = %correction.stored,
                expected = %correction.expected,
                "Correcting balance"
            );
            fund_transactions::Entity::update_many()
                .col_expr(
                    fund_transactions::Column::BalanceAfter,
                    Expr::value(correction.expected),
                )
                .col_expr(fund_transactions::Column::UpdatedAt, Expr::value(now))
                .filter(fund_transactions::Column::Id.eq(correction.id))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;

        info!(%project_id, corrected = corrections.len(), "Ledger rebalanced");
        Ok(corrections)
    }

    async fn ensure_project(&self, project_id: Uuid) -> Result<projects::Model, FundError> {
        let project = projects::Entity::find_by_id(project_id)
            .one(&self.db)
            .await?
            .ok_or(LedgerError::ProjectNotFound(project_id))?;
        Ok(project)
    }
}
