use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::infra::app_state::AppState;

/// `GET /api/health` — liveness plus a database probe, for monitoring.
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<Value>) {
    let mut health = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {}
    });

    match state.users.count_users().await {
        Ok(users_count) => {
            health["checks"]["database"] = json!({
                "status": "healthy",
                "users_count": users_count,
            });
            (StatusCode::OK, Json(health))
        }
        Err(e) => {
            health["status"] = json!("unhealthy");
            health["checks"]["database"] = json!({
                "status": "unhealthy",
                "error": e.message(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(health))
        }
    }
}

/// `GET /api/ready` — readiness probe for orchestrators.
pub async fn readiness_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<Value>) {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not ready" })),
        ),
    }
}
