use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use serde_json::json;
use std::sync::Arc;

use crate::AppState;

/// Health check (GET /health)
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": state.config.storage.backend.as_str(),
    }))
}
