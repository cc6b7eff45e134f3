//! Fund ledger routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use buildtrack_core::ledger::{
    RecordTransactionInput, TransactionType, UpdateTransactionInput,
};
use buildtrack_db::repositories::LedgerFilter;
use buildtrack_shared::types::{PageRequest, ProjectId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::error_response;
use crate::extractors::Actor;

/// Creates the fund ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{project_id}/fund-transactions",
            get(list_transactions).post(record_transaction),
        )
        .route("/projects/{project_id}/balance", get(get_balance))
        .route("/projects/{project_id}/balance/rebalance", post(rebalance))
        .route(
            "/fund-transactions/{transaction_id}",
            get(get_transaction)
                .patch(update_transaction)
                .delete(delete_transaction),
        )
}

/// Query parameters for listing a project's ledger.
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
    /// Earliest value date, inclusive.
    pub date_from: Option<NaiveDate>,
    /// Latest value date, inclusive.
    pub date_to: Option<NaiveDate>,
}

impl ListTransactionsQuery {
    fn page(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }

    const fn filter(&self) -> LedgerFilter {
        LedgerFilter {
            date_from: self.date_from,
            date_to: self.date_to,
        }
    }
}

/// Request body for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct RecordTransactionRequest {
    /// Value date (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Who was paid, or who paid in.
    pub payee: String,
    /// "Credit" or "Debit".
    pub transaction_type: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Payment voucher or receipt number.
    #[serde(default)]
    pub pv_or_receipt_no: String,
    /// Free-text remarks.
    #[serde(default)]
    pub remarks: String,
}

/// Request body for editing a transaction.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransactionRequest {
    /// New value date.
    pub date: Option<NaiveDate>,
    /// New payee.
    pub payee: Option<String>,
    /// New direction.
    pub transaction_type: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New description.
    pub description: Option<String>,
    /// New voucher or receipt number.
    pub pv_or_receipt_no: Option<String>,
    /// New remarks.
    pub remarks: Option<String>,
}

/// GET `/projects/{project_id}/fund-transactions` - List the active chain.
async fn list_transactions(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    match state
        .ledger()
        .list_transactions(project_id, query.filter(), query.page())
        .await
    {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/projects/{project_id}/fund-transactions` - Record a transaction.
async fn record_transaction(
    State(state): State<AppState>,
    actor: Actor,
    Path(project_id): Path<Uuid>,
    Json(request): Json<RecordTransactionRequest>,
) -> impl IntoResponse {
    let transaction_type = match request.transaction_type.parse::<TransactionType>() {
        Ok(t) => t,
        Err(e) => return error_response(e),
    };

    let input = RecordTransactionInput {
        project_id: ProjectId::from_uuid(project_id),
        date: request.date,
        payee: request.payee,
        transaction_type,
        amount: request.amount,
        description: request.description,
        pv_or_receipt_no: request.pv_or_receipt_no,
        remarks: request.remarks,
        created_by: actor.user_id(),
    };

    match state.ledger().record_transaction(input).await {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/projects/{project_id}/balance` - Current balance with ledger totals.
async fn get_balance(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.ledger().summary(project_id).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/projects/{project_id}/balance/rebalance` - Recompute stored balances.
async fn rebalance(
    State(state): State<AppState>,
    actor: Actor,
    Path(project_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.ledger().rebalance(project_id).await {
        Ok(corrections) => {
            info!(
                %project_id,
                changed = corrections.len(),
                actor = ?actor.user_id(),
                "Rebalance requested"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "changed": corrections.len(),
                    "corrections": corrections,
                })),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET `/fund-transactions/{transaction_id}` - Get an active transaction.
async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<i32>,
) -> impl IntoResponse {
    match state.ledger().get_transaction(transaction_id).await {
        Ok(transaction) => (StatusCode::OK, Json(transaction)).into_response(),
        Err(e) => error_response(e),
    }
}

/// PATCH `/fund-transactions/{transaction_id}` - Edit a transaction.
async fn update_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<i32>,
    Json(request): Json<UpdateTransactionRequest>,
) -> impl IntoResponse {
    let parsed = request
        .transaction_type
        .as_deref()
        .map(str::parse::<TransactionType>)
        .transpose();
    let transaction_type = match parsed {
        Ok(t) => t,
        Err(e) => return error_response(e),
    };

    let input = UpdateTransactionInput {
        date: request.date,
        payee: request.payee,
        transaction_type,
        amount: request.amount,
        description: request.description,
        pv_or_receipt_no: request.pv_or_receipt_no,
        remarks: request.remarks,
    };

    match state.ledger().update_transaction(transaction_id, input).await {
        Ok(transaction) => (StatusCode::OK, Json(transaction)).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE `/fund-transactions/{transaction_id}` - Soft-delete a transaction.
async fn delete_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<i32>,
) -> impl IntoResponse {
    match state.ledger().soft_delete_transaction(transaction_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
