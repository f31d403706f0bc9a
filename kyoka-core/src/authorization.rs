use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::KyokaError;
use crate::id::RecordId;

/// Lifecycle state of an authorization request.
///
/// Any state may be entered from any other; approve and reject carry no guard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Denied,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }
}

impl FromStr for RequestStatus {
    type Err = KyokaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "denied" => Ok(Self::Denied),
            other => Err(KyokaError::validation(format!(
                "requestStatus must be one of pending, approved, denied (got {:?})",
                other
            ))),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored treatment-authorization request.
///
/// `patient_name` and `patient_age` are a snapshot taken when the request was
/// filed and are never resynchronized with the patient record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationRequest {
    pub id: RecordId,
    pub patient_id: RecordId,
    pub patient_name: String,
    pub patient_age: u32,
    pub treatment_details: String,
    pub request_status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request contents assembled by the service, before the store assigns an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationDraft {
    pub patient_id: RecordId,
    pub patient_name: String,
    pub patient_age: u32,
    pub treatment_details: String,
    pub request_status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl AuthorizationDraft {
    pub fn into_request(self, id: RecordId) -> AuthorizationRequest {
        AuthorizationRequest {
            id,
            patient_id: self.patient_id,
            patient_name: self.patient_name,
            patient_age: self.patient_age,
            treatment_details: self.treatment_details,
            request_status: self.request_status,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Authorization payload as received from a caller.
///
/// `patient_name` and `patient_age` are accepted for compatibility but the
/// stored snapshot always comes from the resolved patient.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAuthorization {
    pub patient_id: Option<String>,
    pub treatment_details: Option<String>,
    pub request_status: Option<String>,
    pub patient_name: Option<Value>,
    pub patient_age: Option<Value>,
}

/// Listing filter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationFilter {
    pub patient_id: Option<String>,
}
