use thiserror::Error;

#[derive(Error, Debug)]
pub enum KyokaError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl KyokaError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, KyokaError>;
