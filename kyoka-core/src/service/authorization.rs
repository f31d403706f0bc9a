use chrono::Utc;
use std::sync::Arc;

use crate::authorization::{
    AuthorizationDraft, AuthorizationFilter, AuthorizationRequest, NewAuthorization,
    RequestStatus,
};
use crate::error::{KyokaError, Result};
use crate::id::RecordId;
use crate::repository::{AuthorizationRepository, PatientRepository};
use crate::validation::required_text;

/// Authorization request lifecycle.
///
/// Resolving the patient and writing the request are separate store calls; a
/// concurrent change between them is tolerated rather than rolled back.
#[derive(Clone)]
pub struct AuthorizationService {
    patients: Arc<dyn PatientRepository>,
    authorizations: Arc<dyn AuthorizationRepository>,
}

impl AuthorizationService {
    pub fn new(
        patients: Arc<dyn PatientRepository>,
        authorizations: Arc<dyn AuthorizationRepository>,
    ) -> Self {
        Self {
            patients,
            authorizations,
        }
    }

    /// File a new request against an existing patient.
    ///
    /// The patient name and age are always snapshotted from the stored
    /// patient; caller-supplied values are ignored.
    pub fn create(&self, input: NewAuthorization) -> Result<AuthorizationRequest> {
        let patient_id = RecordId::parse(&required_text("patientId", input.patient_id)?)?;
        let treatment_details = required_text("treatmentDetails", input.treatment_details)?;
        let request_status = match input.request_status {
            Some(status) => status.parse::<RequestStatus>()?,
            None => RequestStatus::Pending,
        };

        let patient = self
            .patients
            .find_patient(&patient_id)?
            .ok_or_else(|| KyokaError::not_found("Patient", patient_id))?;

        if input
            .patient_name
            .as_ref()
            .is_some_and(|n| n.as_str() != Some(patient.name.as_str()))
            || input
                .patient_age
                .as_ref()
                .is_some_and(|a| a.as_u64() != Some(u64::from(patient.age)))
        {
            tracing::debug!(
                patient_id = %patient_id,
                "Ignoring caller-supplied patient snapshot that differs from the stored patient"
            );
        }

        let draft = AuthorizationDraft {
            patient_id,
            patient_name: patient.name,
            patient_age: patient.age,
            treatment_details,
            request_status,
            created_at: Utc::now(),
        };

        let request = self.authorizations.insert_authorization(draft)?;
        tracing::info!(
            authorization_id = %request.id,
            patient_id = %request.patient_id,
            status = %request.request_status,
            "Authorization request created"
        );
        Ok(request)
    }

    /// All requests, or those for exactly one patient
    pub fn list_all(&self, filter: AuthorizationFilter) -> Result<Vec<AuthorizationRequest>> {
        let patient_id = filter
            .patient_id
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(RecordId::parse)
            .transpose()?;
        self.authorizations.list_authorizations(patient_id.as_ref())
    }

    pub fn approve(&self, id: &str) -> Result<AuthorizationRequest> {
        self.transition(id, RequestStatus::Approved)
    }

    pub fn reject(&self, id: &str) -> Result<AuthorizationRequest> {
        self.transition(id, RequestStatus::Denied)
    }

    // No guard on the current status: any state can be overwritten.
    fn transition(&self, id: &str, status: RequestStatus) -> Result<AuthorizationRequest> {
        let id = RecordId::parse(id)?;
        let request = self
            .authorizations
            .set_status(&id, status)?
            .ok_or_else(|| KyokaError::not_found("AuthorizationRequest", id))?;
        tracing::info!(authorization_id = %id, status = %status, "Authorization status changed");
        Ok(request)
    }
}
