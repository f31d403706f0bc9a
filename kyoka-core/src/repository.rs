//! Storage contracts consumed by the services.
//!
//! Backends are document stores: each record is addressed by an opaque id and
//! per-document writes are serialized by the store. Nothing here is
//! transactional across documents.

use crate::authorization::{AuthorizationDraft, AuthorizationRequest, RequestStatus};
use crate::error::Result;
use crate::id::RecordId;
use crate::patient::{Patient, PatientFields};

pub trait PatientRepository: Send + Sync {
    /// Persist a new patient; the store assigns its id
    fn insert_patient(&self, fields: PatientFields) -> Result<Patient>;

    fn find_patient(&self, id: &RecordId) -> Result<Option<Patient>>;

    /// Every stored patient, in store order
    fn list_patients(&self) -> Result<Vec<Patient>>;
}

pub trait AuthorizationRepository: Send + Sync {
    /// Persist a new request; the store assigns its id
    fn insert_authorization(&self, draft: AuthorizationDraft) -> Result<AuthorizationRequest>;

    /// All requests, or only those whose `patient_id` equals the filter
    fn list_authorizations(&self, patient_id: Option<&RecordId>)
    -> Result<Vec<AuthorizationRequest>>;

    /// Overwrite the status and return the updated document.
    ///
    /// Returns `None` when no request has this id.
    fn set_status(
        &self,
        id: &RecordId,
        status: RequestStatus,
    ) -> Result<Option<AuthorizationRequest>>;
}
