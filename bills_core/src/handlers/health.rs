//! Health check endpoint

use axum::{extract::State, response::IntoResponse, Json};
use tracing::warn;

use crate::AppState;

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let database_status = match state.db_manager.health_check().await {
        Ok(()) => "healthy",
        Err(e) => {
            warn!("Database health check failed: {}", e);
            "unhealthy"
        }
    };

    let status = if database_status == "healthy" {
        "healthy"
    } else {
        "degraded"
    };

    Json(serde_json::json!({
        "status": status,
        "timestamp": chrono::Utc::now().timestamp(),
        "version": state.version,
        "database": database_status,
    }))
}
