//! Unauthenticated liveness endpoints.

use axum::Json;
use chrono::Utc;
use serde_json::{Value, json};

/// `GET /`
pub async fn root() -> Json<Value> {
  Json(json!({ "message": "Habit Tracker API is running!" }))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
  Json(json!({ "status": "healthy", "timestamp": Utc::now().to_rfc3339() }))
}
