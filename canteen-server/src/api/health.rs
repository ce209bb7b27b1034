//! Health check endpoint

use crate::error::{ok, ApiResult};

/// GET /health
pub async fn health_check() -> ApiResult<serde_json::Value> {
    Ok(ok(serde_json::json!({
        "status": "ok",
        "timestamp": shared::util::now_millis(),
    })))
}
