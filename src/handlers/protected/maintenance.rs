use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::database::models::{MaintenancePatch, MaintenanceRequest, NewMaintenanceRequest};
use crate::handlers::RecordId;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::server::AppState;

/// GET /api/maintenance/:id
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    RecordId(id): RecordId,
) -> ApiResult<MaintenanceRequest> {
    let request = state.repository.get_maintenance(id, &auth.user_id).await?;
    Ok(ApiResponse::success(request))
}

/// POST /api/maintenance
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<NewMaintenanceRequest>, JsonRejection>,
) -> ApiResult<MaintenanceRequest> {
    let Json(input) = payload?;
    let request = state.repository.create_maintenance(&auth.user_id, input).await?;
    Ok(ApiResponse::created(request))
}

/// PUT /api/maintenance/:id
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    RecordId(id): RecordId,
    payload: Result<Json<MaintenancePatch>, JsonRejection>,
) -> ApiResult<MaintenanceRequest> {
    let Json(patch) = payload?;
    let request = state.repository.update_maintenance(id, &auth.user_id, patch).await?;
    Ok(ApiResponse::success(request))
}

/// DELETE /api/maintenance/:id
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    RecordId(id): RecordId,
) -> ApiResult<()> {
    state.repository.delete_maintenance(id, &auth.user_id).await?;
    Ok(ApiResponse::no_content())
}
