mod authorization;
mod patient;

pub use authorization::AuthorizationService;
pub use patient::PatientService;

#[cfg(test)]
pub(crate) mod memory;
