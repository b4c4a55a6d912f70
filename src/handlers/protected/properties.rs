// handlers/protected/properties.rs - /api/properties

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::Utc;

use crate::database::models::{
    MaintenanceRequest, NewProperty, Property, PropertyPatch, Transaction,
};
use crate::error::ApiError;
use crate::handlers::RecordId;
use crate::lease::LeasedTenant;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::server::AppState;

/// GET /api/properties - newest first
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Vec<Property>> {
    let properties = state.repository.list_properties(&auth.user_id).await?;
    Ok(ApiResponse::success(properties))
}

/// GET /api/properties/:id
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    RecordId(id): RecordId,
) -> ApiResult<Property> {
    let property = state.repository.get_property(id, &auth.user_id).await?;
    Ok(ApiResponse::success(property))
}

/// POST /api/properties
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<NewProperty>, JsonRejection>,
) -> ApiResult<Property> {
    let Json(input) = payload?;
    let property = state.repository.create_property(&auth.user_id, input).await?;
    Ok(ApiResponse::created(property))
}

/// PUT /api/properties/:id - partial update
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    RecordId(id): RecordId,
    payload: Result<Json<PropertyPatch>, JsonRejection>,
) -> ApiResult<Property> {
    let Json(patch) = payload?;
    let property = state.repository.update_property(id, &auth.user_id, patch).await?;
    Ok(ApiResponse::success(property))
}

/// DELETE /api/properties/:id
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    RecordId(id): RecordId,
) -> ApiResult<()> {
    if state.repository.delete_property(id, &auth.user_id).await? {
        Ok(ApiResponse::no_content())
    } else {
        Err(ApiError::not_found("Property not found"))
    }
}

/// GET /api/properties/:id/tenants
pub async fn tenants(
    State(state): State<AppState>,
    auth: AuthUser,
    RecordId(id): RecordId,
) -> ApiResult<Vec<LeasedTenant>> {
    let tenants = state.repository.list_tenants(id, &auth.user_id).await?;
    Ok(ApiResponse::success(LeasedTenant::all(tenants, Utc::now())))
}

/// GET /api/properties/:id/maintenance
pub async fn maintenance(
    State(state): State<AppState>,
    auth: AuthUser,
    RecordId(id): RecordId,
) -> ApiResult<Vec<MaintenanceRequest>> {
    let requests = state.repository.list_maintenance(id, &auth.user_id).await?;
    Ok(ApiResponse::success(requests))
}

/// GET /api/properties/:id/transactions
pub async fn transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    RecordId(id): RecordId,
) -> ApiResult<Vec<Transaction>> {
    let transactions = state.repository.list_transactions(id, &auth.user_id).await?;
    Ok(ApiResponse::success(transactions))
}
