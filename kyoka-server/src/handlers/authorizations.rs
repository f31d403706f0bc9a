use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use kyoka_core::{AuthorizationFilter, AuthorizationRequest, NewAuthorization};
use std::sync::Arc;

use super::run_blocking;
use crate::AppState;
use crate::error::ApiError;

/// File an authorization request (POST /api/authorization)
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewAuthorization>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthorizationRequest>), ApiError> {
    let Json(input) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request = run_blocking(&state, move |s| s.authorizations.create(input)).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// List authorization requests (GET /api/authorizations?patientId=)
pub async fn list(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<AuthorizationFilter>, QueryRejection>,
) -> Result<Json<Vec<AuthorizationRequest>>, ApiError> {
    let Query(filter) = filter.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let requests = run_blocking(&state, move |s| s.authorizations.list_all(filter)).await?;
    Ok(Json(requests))
}

/// Approve (PATCH /api/authorizations/{id}/approve)
pub async fn approve(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AuthorizationRequest>, ApiError> {
    let request = run_blocking(&state, move |s| s.authorizations.approve(&id)).await?;
    Ok(Json(request))
}

/// Reject (PATCH /api/authorizations/{id}/reject)
pub async fn reject(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AuthorizationRequest>, ApiError> {
    let request = run_blocking(&state, move |s| s.authorizations.reject(&id)).await?;
    Ok(Json(request))
}
