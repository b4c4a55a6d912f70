use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::database::models::{NewTransaction, Transaction, TransactionPatch};
use crate::handlers::RecordId;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::server::AppState;

/// GET /api/transactions/:id
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    RecordId(id): RecordId,
) -> ApiResult<Transaction> {
    let transaction = state.repository.get_transaction(id, &auth.user_id).await?;
    Ok(ApiResponse::success(transaction))
}

/// POST /api/transactions
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<NewTransaction>, JsonRejection>,
) -> ApiResult<Transaction> {
    let Json(input) = payload?;
    let transaction = state.repository.create_transaction(&auth.user_id, input).await?;
    Ok(ApiResponse::created(transaction))
}

/// PUT /api/transactions/:id
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    RecordId(id): RecordId,
    payload: Result<Json<TransactionPatch>, JsonRejection>,
) -> ApiResult<Transaction> {
    let Json(patch) = payload?;
    let transaction = state.repository.update_transaction(id, &auth.user_id, patch).await?;
    Ok(ApiResponse::success(transaction))
}

/// DELETE /api/transactions/:id
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    RecordId(id): RecordId,
) -> ApiResult<()> {
    state.repository.delete_transaction(id, &auth.user_id).await?;
    Ok(ApiResponse::no_content())
}
