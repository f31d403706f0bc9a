use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use kyoka_core::{NewPatient, Patient};
use std::sync::Arc;

use super::run_blocking;
use crate::AppState;
use crate::error::ApiError;

/// List patients (GET /api/patients)
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Patient>>, ApiError> {
    let patients = run_blocking(&state, |s| s.patients.get_all()).await?;
    Ok(Json(patients))
}

/// Register a patient (POST /api/patientdetails)
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewPatient>, JsonRejection>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let Json(input) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let patient = run_blocking(&state, move |s| s.patients.create(input)).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// Read a patient (GET /api/patients/{id})
pub async fn read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    let patient = run_blocking(&state, move |s| s.patients.get_by_id(&id)).await?;
    Ok(Json(patient))
}
