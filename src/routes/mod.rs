//! API route handlers
//!
//! - `health`: liveness and readiness probes
//! - `analysis`: the webpage-analysis endpoint (validation → prompt →
//!   backend call → schema validation)

pub mod analysis;
pub mod health;

use crate::error::{ApiError, ApiResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info
///
/// Root endpoint (GET /), no authentication.
pub async fn api_info() -> ApiResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "Pagelens",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/webpage-analysis",
            "/health",
            "/ready"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
