use thiserror::Error;

use crate::core::services::ServiceError;
use crate::ledger::UnknownCategory;

/// Error type surfaced by the tracker, storage, and configuration layers.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

impl From<UnknownCategory> for TrackerError {
    fn from(err: UnknownCategory) -> Self {
        TrackerError::Validation(err.to_string())
    }
}

impl TrackerError {
    pub fn is_validation(&self) -> bool {
        matches!(self, TrackerError::Validation(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            TrackerError::Persistence(_) | TrackerError::Io(_) | TrackerError::Serde(_)
        )
    }
}
