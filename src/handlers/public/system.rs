use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::server::AppState;

/// GET / - service info and route overview
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Landlord API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Property management API for landlords",
            "endpoints": {
                "health": "/health (public)",
                "auth": "/api/auth/user (protected)",
                "dashboard": "/api/dashboard/stats (protected)",
                "properties": "/api/properties[/:id[/tenants|/maintenance|/transactions]] (protected)",
                "tenants": "/api/tenants[/:id|/lease-alerts] (protected)",
                "maintenance": "/api/maintenance[/:id] (protected)",
                "transactions": "/api/transactions[/:id] (protected)",
            }
        }
    }))
}

/// GET /health - store liveness
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.repository.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": true,
                    "message": "Store unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
