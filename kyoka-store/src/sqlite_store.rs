//! SQLite-based document storage
//!
//! Schema:
//!   - patients: one JSON document per patient, keyed by id
//!   - authorizations: one JSON document per request, keyed by id, with the
//!     patient reference mirrored into an indexed column for filtering
//!
//! Listing returns documents in insertion (rowid) order.

use crate::error::{Result, StoreError};
use kyoka_core::{
    AuthorizationDraft, AuthorizationRepository, AuthorizationRequest, Patient, PatientFields,
    PatientRepository, RecordId, RequestStatus,
};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed patient and authorization store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

#[allow(clippy::result_large_err)]
impl SqliteStore {
    /// Open the store (create if not exists)
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;

        // Enable WAL mode for read-write concurrency
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS patients (
                id TEXT NOT NULL PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS authorizations (
                id TEXT NOT NULL PRIMARY KEY,
                patient_id TEXT NOT NULL,
                value TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_authorizations_patient ON authorizations(patient_id)",
            [],
        )?;

        tracing::debug!(path = %path.display(), "Opened SQLite store");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Other("SQLite connection lock poisoned".to_string()))
    }

    /// Store a new patient under a fresh id
    pub fn save_patient(&self, fields: PatientFields) -> Result<Patient> {
        let patient = fields.into_patient(RecordId::generate());
        let value = serde_json::to_string(&patient)?;
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO patients (id, value) VALUES (?, ?)",
            params![patient.id.to_string(), value],
        )?;

        Ok(patient)
    }

    /// Get a patient
    pub fn load_patient(&self, id: &RecordId) -> Result<Option<Patient>> {
        let conn = self.lock()?;

        let result = conn.query_row(
            "SELECT value FROM patients WHERE id = ?",
            params![id.to_string()],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(serde_json::from_str(&value)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all patients
    pub fn patients(&self) -> Result<Vec<Patient>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare("SELECT value FROM patients ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut patients = Vec::new();
        for value in rows {
            patients.push(serde_json::from_str(&value?)?);
        }

        Ok(patients)
    }

    /// Store a new authorization request under a fresh id
    pub fn save_authorization(&self, draft: AuthorizationDraft) -> Result<AuthorizationRequest> {
        let request = draft.into_request(RecordId::generate());
        let value = serde_json::to_string(&request)?;
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO authorizations (id, patient_id, value) VALUES (?, ?, ?)",
            params![request.id.to_string(), request.patient_id.to_string(), value],
        )?;

        Ok(request)
    }

    /// List authorization requests, optionally only those for one patient
    pub fn authorizations(
        &self,
        patient_id: Option<&RecordId>,
    ) -> Result<Vec<AuthorizationRequest>> {
        let conn = self.lock()?;

        let mut values = Vec::new();
        if let Some(pid) = patient_id {
            let mut stmt = conn.prepare(
                "SELECT value FROM authorizations WHERE patient_id = ? ORDER BY rowid",
            )?;
            let rows = stmt.query_map(params![pid.to_string()], |row| row.get::<_, String>(0))?;
            for value in rows {
                values.push(value?);
            }
        } else {
            let mut stmt = conn.prepare("SELECT value FROM authorizations ORDER BY rowid")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            for value in rows {
                values.push(value?);
            }
        }

        values
            .iter()
            .map(|v| serde_json::from_str(v).map_err(StoreError::from))
            .collect()
    }

    /// Find-and-update the status of a request, returning the new document
    pub fn update_status(
        &self,
        id: &RecordId,
        status: RequestStatus,
    ) -> Result<Option<AuthorizationRequest>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let result = tx.query_row(
            "SELECT value FROM authorizations WHERE id = ?",
            params![id.to_string()],
            |row| row.get::<_, String>(0),
        );

        let mut request: AuthorizationRequest = match result {
            Ok(value) => serde_json::from_str(&value)?,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        request.request_status = status;
        tx.execute(
            "UPDATE authorizations SET value = ? WHERE id = ?",
            params![serde_json::to_string(&request)?, id.to_string()],
        )?;
        tx.commit()?;

        Ok(Some(request))
    }
}

impl PatientRepository for SqliteStore {
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

impl AuthorizationRepository for SqliteStore {
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

    fn open_temp() -> (SqliteStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(dir.path().join("kyoka.sqlite")).unwrap();
        (store, dir)
    }

    fn fields(name: &str) -> PatientFields {
        PatientFields {
            name: name.to_string(),
            age: 30,
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

    #[test]
    fn test_patient_insert_and_load() {
        let (store, _dir) = open_temp();

        let patient = store.save_patient(fields("John Doe")).unwrap();
        let loaded = store.load_patient(&patient.id).unwrap();
        assert_eq!(loaded, Some(patient));

        assert_eq!(store.load_patient(&RecordId::generate()).unwrap(), None);
    }

    #[test]
    fn test_patients_in_insertion_order() {
        let (store, _dir) = open_temp();

        let names = ["Carol", "Alice", "Bob"];
        for name in names {
            store.save_patient(fields(name)).unwrap();
        }

        let listed: Vec<String> = store.patients().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(listed, names);
    }

    #[test]
    fn test_authorizations_filtered_by_patient() {
        let (store, _dir) = open_temp();
        let john = store.save_patient(fields("John Doe")).unwrap();
        let jane = store.save_patient(fields("Jane Roe")).unwrap();

        let a1 = store.save_authorization(draft(&john)).unwrap();
        let b1 = store.save_authorization(draft(&jane)).unwrap();
        let a2 = store.save_authorization(draft(&john)).unwrap();

        assert_eq!(store.authorizations(None).unwrap(), vec![a1.clone(), b1.clone(), a2.clone()]);
        assert_eq!(store.authorizations(Some(&john.id)).unwrap(), vec![a1, a2]);
        assert_eq!(store.authorizations(Some(&jane.id)).unwrap(), vec![b1]);
        assert!(store.authorizations(Some(&RecordId::generate())).unwrap().is_empty());
    }

    #[test]
    fn test_update_status() {
        let (store, _dir) = open_temp();
        let john = store.save_patient(fields("John Doe")).unwrap();
        let request = store.save_authorization(draft(&john)).unwrap();

        let approved = store.update_status(&request.id, RequestStatus::Approved).unwrap().unwrap();
        assert_eq!(approved.request_status, RequestStatus::Approved);
        assert_eq!(approved.updated_at, request.updated_at);

        let denied = store.update_status(&request.id, RequestStatus::Denied).unwrap().unwrap();
        assert_eq!(denied.request_status, RequestStatus::Denied);

        let stored = store.authorizations(Some(&john.id)).unwrap();
        assert_eq!(stored[0].request_status, RequestStatus::Denied);

        let missing = store.update_status(&RecordId::generate(), RequestStatus::Approved);
        assert_eq!(missing.unwrap(), None);
    }

    #[test]
    fn test_reopen_keeps_documents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kyoka.sqlite");

        let patient = {
            let store = SqliteStore::open(&path).unwrap();
            store.save_patient(fields("John Doe")).unwrap()
        };

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.load_patient(&patient.id).unwrap(), Some(patient));
    }
}
