//! Error types for device descriptor operations.

use std::path::PathBuf;

/// Errors that can occur while loading or validating device descriptors.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error reading descriptor files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Descriptor file not found.
    #[error("device file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Validation error in a descriptor.
    #[error("validation error: {detail}")]
    Validation {
        /// Description of the validation failure.
        detail: String,
    },
}

/// Result type for descriptor operations.
pub type Result<T> = std::result::Result<T, TargetError>;
