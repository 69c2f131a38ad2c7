use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::SERVICE_NAME;

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "match_orders": "/match-orders",
            "config": "/config",
            "health": "/health",
        },
    }))
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
