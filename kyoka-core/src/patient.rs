use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::id::RecordId;
use crate::validation::{required_age, required_text};

/// Stored patient record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: RecordId,
    pub name: String,
    pub age: u32,
    pub medical_history: String,
    pub treatment_plan: String,
}

/// Validated patient fields, ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientFields {
    pub name: String,
    pub age: u32,
    pub medical_history: String,
    pub treatment_plan: String,
}

impl PatientFields {
    /// Attach the store-assigned id
    pub fn into_patient(self, id: RecordId) -> Patient {
        Patient {
            id,
            name: self.name,
            age: self.age,
            medical_history: self.medical_history,
            treatment_plan: self.treatment_plan,
        }
    }
}

/// Patient registration payload as received from a caller
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub name: Option<String>,
    pub age: Option<Value>,
    pub medical_history: Option<String>,
    pub treatment_plan: Option<String>,
}

impl NewPatient {
    pub fn validate(self) -> Result<PatientFields> {
        Ok(PatientFields {
            name: required_text("name", self.name)?,
            age: required_age("age", self.age.as_ref())?,
            medical_history: required_text("medicalHistory", self.medical_history)?,
            treatment_plan: required_text("treatmentPlan", self.treatment_plan)?,
        })
    }
}
