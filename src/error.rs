//! Error types for registry operations

use thiserror::Error;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Registry errors. Each variant keeps the user-facing reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Input or policy check failed.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No available address: {0}")]
    NoAvailableAddress(String),
}

impl RegistryError {
    /// The reason without the category prefix.
    pub fn reason(&self) -> &str {
        match self {
            RegistryError::Validation(reason)
            | RegistryError::NotFound(reason)
            | RegistryError::NoAvailableAddress(reason) => reason,
        }
    }
}
