//! 健康检查

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use super::AppState;
use crate::core::error::AppResult;

/// GET /health，不访问存储
pub async fn health_check() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// GET /health/db
pub async fn database_check(State(state): State<AppState>) -> AppResult<Json<Value>> {
    state.users.ping().await?;
    Ok(Json(json!({ "ok": true })))
}
