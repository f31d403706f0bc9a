//! In-memory repository used by the service tests

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::authorization::{AuthorizationDraft, AuthorizationRequest, RequestStatus};
use crate::error::{KyokaError, Result};
use crate::id::RecordId;
use crate::patient::{Patient, PatientFields};
use crate::repository::{AuthorizationRepository, PatientRepository};

#[derive(Default)]
pub struct MemoryRepository {
    patients: Mutex<Vec<Patient>>,
    authorizations: Mutex<Vec<AuthorizationRequest>>,
    writes: AtomicUsize,
    failure: Mutex<Option<String>>,
}

impl MemoryRepository {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail with a storage error
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Mutate a patient in place, bypassing the services
    pub fn rename_patient(&self, id: &RecordId, name: &str, age: u32) {
        let mut patients = self.patients.lock().unwrap();
        let patient = patients.iter_mut().find(|p| p.id == *id).unwrap();
        patient.name = name.to_string();
        patient.age = age;
    }

    fn check(&self) -> Result<()> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(KyokaError::Storage(message.clone())),
            None => Ok(()),
        }
    }
}

impl PatientRepository for MemoryRepository {
    fn insert_patient(&self, fields: PatientFields) -> Result<Patient> {
        self.check()?;
        let patient = fields.into_patient(RecordId::generate());
        self.patients.lock().unwrap().push(patient.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(patient)
    }

    fn find_patient(&self, id: &RecordId) -> Result<Option<Patient>> {
        self.check()?;
        Ok(self.patients.lock().unwrap().iter().find(|p| p.id == *id).cloned())
    }

    fn list_patients(&self) -> Result<Vec<Patient>> {
        self.check()?;
        Ok(self.patients.lock().unwrap().clone())
    }
}

impl AuthorizationRepository for MemoryRepository {
    fn insert_authorization(&self, draft: AuthorizationDraft) -> Result<AuthorizationRequest> {
        self.check()?;
        let request = draft.into_request(RecordId::generate());
        self.authorizations.lock().unwrap().push(request.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(request)
    }

    fn list_authorizations(
        &self,
        patient_id: Option<&RecordId>,
    ) -> Result<Vec<AuthorizationRequest>> {
        self.check()?;
        Ok(self
            .authorizations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| patient_id.is_none_or(|p| r.patient_id == *p))
            .cloned()
            .collect())
    }

    fn set_status(
        &self,
        id: &RecordId,
        status: RequestStatus,
    ) -> Result<Option<AuthorizationRequest>> {
        self.check()?;
        let mut authorizations = self.authorizations.lock().unwrap();
        Ok(authorizations.iter_mut().find(|r| r.id == *id).map(|r| {
            r.request_status = status;
            r.clone()
        }))
    }
}
