use axum::extract::State;

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::server::AppState;

/// GET /api/auth/user - the caller's synced profile
pub async fn current_user(State(state): State<AppState>, auth: AuthUser) -> ApiResult<User> {
    let user = state.repository.get_user(&auth.user_id).await?;
    Ok(ApiResponse::success(user))
}
