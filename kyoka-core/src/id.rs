use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{KyokaError, Result};

/// Opaque record identifier assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier token.
    ///
    /// A malformed token is an `InvalidId` error, never `NotFound`.
    pub fn parse(token: &str) -> Result<Self> {
        Uuid::parse_str(token.trim())
            .map(Self)
            .map_err(|_| KyokaError::InvalidId(token.to_string()))
    }
}

impl FromStr for RecordId {
    type Err = KyokaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
