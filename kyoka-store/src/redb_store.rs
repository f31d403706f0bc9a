//! ReDB-based document storage
//!
//! Tables:
//!   - patients: {id} -> JSON document
//!   - authorizations: {id} -> JSON document
//!   - authorizations_by_patient: {patient_id}/{id} -> ()
//!
//! Listing returns documents in key order.

use crate::error::Result;
use kyoka_core::{
    AuthorizationDraft, AuthorizationRepository, AuthorizationRequest, Patient, PatientFields,
    PatientRepository, RecordId, RequestStatus,
};
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;

const PATIENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("patients");
const AUTHORIZATIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("authorizations");
const BY_PATIENT: TableDefinition<&str, ()> = TableDefinition::new("authorizations_by_patient");

/// ReDB-backed patient and authorization store
pub struct RedbStore {
    db: Database,
}

#[allow(clippy::result_large_err)]
impl RedbStore {
    /// Open the store (create if not exists)
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = Database::create(path)?;

        // Initialize tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PATIENTS)?;
            let _ = write_txn.open_table(AUTHORIZATIONS)?;
            let _ = write_txn.open_table(BY_PATIENT)?;
        }
        write_txn.commit()?;

        tracing::debug!(path = %path.display(), "Opened redb store");
        Ok(Self { db })
    }

    /// Store a new patient under a fresh id
    pub fn save_patient(&self, fields: PatientFields) -> Result<Patient> {
        let patient = fields.into_patient(RecordId::generate());
        let key = patient.id.to_string();
        let data = serde_json::to_vec(&patient)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(PATIENTS)?;
            table.insert(key.as_str(), data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(patient)
    }

    /// Get a patient
    pub fn load_patient(&self, id: &RecordId) -> Result<Option<Patient>> {
        let key = id.to_string();
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PATIENTS)?;

        match table.get(key.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// List all patients
    pub fn patients(&self) -> Result<Vec<Patient>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PATIENTS)?;

        let mut patients = Vec::new();
        for entry in table.range::<&str>(..)? {
            let (_, value) = entry?;
            patients.push(serde_json::from_slice(value.value())?);
        }

        Ok(patients)
    }

    /// Store a new authorization request and its patient index entry
    pub fn save_authorization(&self, draft: AuthorizationDraft) -> Result<AuthorizationRequest> {
        let request = draft.into_request(RecordId::generate());
        let key = request.id.to_string();
        let index_key = format!("{}/{}", request.patient_id, request.id);
        let data = serde_json::to_vec(&request)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(AUTHORIZATIONS)?;
            table.insert(key.as_str(), data.as_slice())?;

            let mut index = write_txn.open_table(BY_PATIENT)?;
            index.insert(index_key.as_str(), ())?;
        }
        write_txn.commit()?;
        Ok(request)
    }

    /// List authorization requests, optionally only those for one patient
    pub fn authorizations(
        &self,
        patient_id: Option<&RecordId>,
    ) -> Result<Vec<AuthorizationRequest>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(AUTHORIZATIONS)?;

        let mut requests = Vec::new();
        let Some(pid) = patient_id else {
            for entry in table.range::<&str>(..)? {
                let (_, value) = entry?;
                requests.push(serde_json::from_slice(value.value())?);
            }
            return Ok(requests);
        };

        let prefix = format!("{}/", pid);
        let index = read_txn.open_table(BY_PATIENT)?;
        for entry in index.range::<&str>(prefix.as_str()..)? {
            let (key, _) = entry?;
            let Some(id) = key.value().strip_prefix(prefix.as_str()) else {
                break;
            };
            // Index entries without a document are skipped
            if let Some(value) = table.get(id)? {
                requests.push(serde_json::from_slice(value.value())?);
            }
        }

        Ok(requests)
    }

    /// Find-and-update the status of a request, returning the new document
    pub fn update_status(
        &self,
        id: &RecordId,
        status: RequestStatus,
    ) -> Result<Option<AuthorizationRequest>> {
        let key = id.to_string();
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(AUTHORIZATIONS)?;
            let existing = table.get(key.as_str())?.map(|v| v.value().to_vec());

            match existing {
                Some(data) => {
                    let mut request: AuthorizationRequest = serde_json::from_slice(&data)?;
                    request.request_status = status;
                    let data = serde_json::to_vec(&request)?;
                    table.insert(key.as_str(), data.as_slice())?;
                    Some(request)
                }
                None => None,
            }
        };
        write_txn.commit()?;
        Ok(updated)
    }
}

impl PatientRepository for RedbStore {
    fn insert_patient(&self, fields: PatientFields) -> kyoka_core::Result<Patient> {
        Ok(self.save_patient(fields)?)
    }

    fn find_patient(&self, id: &RecordId) -> kyoka_core::Result<Option<Patient>> {
        Ok(self.load_patient(id)?)
    }

    fn list_patients(&self) -> kyoka_core::Result<Vec<Patient>> {
        Ok(self.patients()?)
    }
}

impl AuthorizationRepository for RedbStore {
    fn insert_authorization(
        &self,
        draft: AuthorizationDraft,
    ) -> kyoka_core::Result<AuthorizationRequest> {
        Ok(self.save_authorization(draft)?)
    }

    fn list_authorizations(
        &self,
        patient_id: Option<&RecordId>,
    ) -> kyoka_core::Result<Vec<AuthorizationRequest>> {
        Ok(self.authorizations(patient_id)?)
    }

    fn set_status(
        &self,
        id: &RecordId,
        status: RequestStatus,
    ) -> kyoka_core::Result<Option<AuthorizationRequest>> {
        Ok(self.update_status(id, status)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn open_temp() -> (RedbStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RedbStore::open(dir.path().join("kyoka.redb")).unwrap();
        (store, dir)
    }

    fn fields(name: &str, age: u32) -> PatientFields {
        PatientFields {
            name: name.to_string(),
            age,
            medical_history: "None".to_string(),
            treatment_plan: "Regular checkup".to_string(),
        }
    }

    fn draft(patient: &Patient) -> AuthorizationDraft {
        AuthorizationDraft {
            patient_id: patient.id,
            patient_name: patient.name.clone(),
            patient_age: patient.age,
            treatment_details: "Surgery required".to_string(),
            request_status: RequestStatus::Pending,
            created_at: Utc::now(),
        }
    }

    fn sorted_ids(requests: Vec<AuthorizationRequest>) -> Vec<RecordId> {
        let mut ids: Vec<RecordId> = requests.into_iter().map(|r| r.id).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_patient_insert_and_load() {
        let (store, _dir) = open_temp();

        let patient = store.save_patient(fields("John Doe", 30)).unwrap();
        assert_eq!(store.load_patient(&patient.id).unwrap(), Some(patient.clone()));
        assert_eq!(store.load_patient(&RecordId::generate()).unwrap(), None);
        assert_eq!(store.patients().unwrap(), vec![patient]);
    }

    #[test]
    fn test_authorizations_filtered_by_patient() {
        let (store, _dir) = open_temp();
        let john = store.save_patient(fields("John Doe", 30)).unwrap();
        let jane = store.save_patient(fields("Jane Roe", 52)).unwrap();

        let mut johns = vec![
            store.save_authorization(draft(&john)).unwrap().id,
            store.save_authorization(draft(&john)).unwrap().id,
        ];
        johns.sort();
        let janes = vec![store.save_authorization(draft(&jane)).unwrap().id];

        assert_eq!(store.authorizations(None).unwrap().len(), 3);
        assert_eq!(sorted_ids(store.authorizations(Some(&john.id)).unwrap()), johns);
        assert_eq!(sorted_ids(store.authorizations(Some(&jane.id)).unwrap()), janes);
        assert!(store.authorizations(Some(&RecordId::generate())).unwrap().is_empty());
    }

    #[test]
    fn test_update_status() {
        let (store, _dir) = open_temp();
        let john = store.save_patient(fields("John Doe", 30)).unwrap();
        let request = store.save_authorization(draft(&john)).unwrap();

        let denied = store.update_status(&request.id, RequestStatus::Denied).unwrap().unwrap();
        assert_eq!(denied.request_status, RequestStatus::Denied);
        assert_eq!(denied.patient_name, "John Doe");

        let approved = store.update_status(&request.id, RequestStatus::Approved).unwrap().unwrap();
        assert_eq!(approved.request_status, RequestStatus::Approved);

        let stored = store.authorizations(Some(&john.id)).unwrap();
        assert_eq!(stored, vec![approved]);

        let missing = store.update_status(&RecordId::generate(), RequestStatus::Denied);
        assert_eq!(missing.unwrap(), None);
    }
}
