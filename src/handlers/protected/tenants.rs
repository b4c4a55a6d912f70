// handlers/protected/tenants.rs - /api/tenants

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::Utc;

use crate::database::models::{NewTenant, TenantPatch};
use crate::handlers::{RecordId, TenantListQuery};
use crate::lease::{LeaseAlerts, LeasedTenant};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::server::AppState;

/// GET /api/tenants[?propertyId=] - one property's tenants, or all of the caller's
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    query: TenantListQuery,
) -> ApiResult<Vec<LeasedTenant>> {
    let tenants = match query.property_id {
        Some(property_id) => state.repository.list_tenants(property_id, &auth.user_id).await?,
        None => state.repository.list_all_tenants(&auth.user_id).await?,
    };
    Ok(ApiResponse::success(LeasedTenant::all(tenants, Utc::now())))
}

/// GET /api/tenants/lease-alerts
pub async fn lease_alerts(State(state): State<AppState>, auth: AuthUser) -> ApiResult<LeaseAlerts> {
    let tenants = state.repository.list_all_tenants(&auth.user_id).await?;
    Ok(ApiResponse::success(LeaseAlerts::collect(tenants, Utc::now())))
}

/// GET /api/tenants/:id
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    RecordId(id): RecordId,
) -> ApiResult<LeasedTenant> {
    let tenant = state.repository.get_tenant(id, &auth.user_id).await?;
    Ok(ApiResponse::success(LeasedTenant::at(tenant, Utc::now())))
}

/// POST /api/tenants
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<NewTenant>, JsonRejection>,
) -> ApiResult<LeasedTenant> {
    let Json(input) = payload?;
    let tenant = state.repository.create_tenant(&auth.user_id, input).await?;
    Ok(ApiResponse::created(LeasedTenant::at(tenant, Utc::now())))
}

/// PUT /api/tenants/:id
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    RecordId(id): RecordId,
    payload: Result<Json<TenantPatch>, JsonRejection>,
) -> ApiResult<LeasedTenant> {
    let Json(patch) = payload?;
    let tenant = state.repository.update_tenant(id, &auth.user_id, patch).await?;
    Ok(ApiResponse::success(LeasedTenant::at(tenant, Utc::now())))
}

/// DELETE /api/tenants/:id
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    RecordId(id): RecordId,
) -> ApiResult<()> {
    state.repository.delete_tenant(id, &auth.user_id).await?;
    Ok(ApiResponse::no_content())
}
