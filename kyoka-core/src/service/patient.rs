use std::sync::Arc;

use crate::error::{KyokaError, Result};
use crate::id::RecordId;
use crate::patient::{NewPatient, Patient};
use crate::repository::PatientRepository;

/// Patient registration and lookup
#[derive(Clone)]
pub struct PatientService {
    patients: Arc<dyn PatientRepository>,
}

impl PatientService {
    pub fn new(patients: Arc<dyn PatientRepository>) -> Self {
        Self { patients }
    }

    /// Validate and store a new patient.
    ///
    /// Nothing is written when validation fails.
    pub fn create(&self, input: NewPatient) -> Result<Patient> {
        let fields = input.validate()?;
        let patient = self.patients.insert_patient(fields)?;
        tracing::info!(patient_id = %patient.id, "Patient created");
        Ok(patient)
    }

    pub fn get_all(&self) -> Result<Vec<Patient>> {
        self.patients.list_patients()
    }

    pub fn get_by_id(&self, id: &str) -> Result<Patient> {
        let id = RecordId::parse(id)?;
        tracing::debug!(patient_id = %id, "Looking up patient");
        self.patients
            .find_patient(&id)?
            .ok_or_else(|| KyokaError::not_found("Patient", id))
    }
}
