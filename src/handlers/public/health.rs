// handlers/public/health.rs - GET /health handler

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::context::AppContext;
use crate::middleware::ApiResponse;

pub async fn health_get(State(ctx): State<AppContext>) -> Response {
    let now = chrono::Utc::now();

    match ctx.store.health_check().await {
        Ok(()) => ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "store": "ok"
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            ApiResponse::with_status(
                json!({
                    "status": "degraded",
                    "timestamp": now,
                    "store_error": e.to_string()
                }),
                StatusCode::SERVICE_UNAVAILABLE,
            )
            .into_response()
        }
    }
}
