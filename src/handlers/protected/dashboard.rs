use axum::extract::State;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::server::AppState;
use crate::services::DashboardStats;

/// GET /api/dashboard/stats
pub async fn stats(State(state): State<AppState>, auth: AuthUser) -> ApiResult<DashboardStats> {
    let stats = state.dashboard.stats(&auth.user_id).await?;
    Ok(ApiResponse::success(stats))
}
