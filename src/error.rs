//! Error types for the hello-qmi crate.

use thiserror::Error;

use crate::program::ProgramError;

/// Result type for hello-qmi operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a quantum computing service.
///
/// Only the active-lattice probe swallows errors (it returns `Option`
/// instead of `Result`); everything else propagates to the caller and is
/// fatal for the binary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Device name could not be resolved to any target.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// The lattice registry returned an unusable response.
    #[error("Registry error: {0}")]
    Registry(String),

    /// Compilation for the target failed.
    #[error("Compilation failed: {0}")]
    Compilation(String),

    /// Execution on the target failed.
    #[error("Execution failed: {0}")]
    Execution(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Program construction error.
    #[error(transparent)]
    Program(#[from] ProgramError),
}
