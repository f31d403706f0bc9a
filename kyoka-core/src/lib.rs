//! kyoka - patient registry and treatment-authorization workflow
//!
//! Domain model, validation, repository contracts and the services that
//! enforce referential and status-transition rules.

pub mod authorization;
pub mod error;
pub mod id;
pub mod patient;
pub mod repository;
pub mod service;
pub mod validation;

pub use authorization::{
    AuthorizationDraft, AuthorizationFilter, AuthorizationRequest, NewAuthorization,
    RequestStatus,
};
pub use error::{KyokaError, Result};
pub use id::RecordId;
pub use patient::{NewPatient, Patient, PatientFields};
pub use repository::{AuthorizationRepository, PatientRepository};
pub use service::{AuthorizationService, PatientService};
