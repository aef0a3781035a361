//! Provisioning errors.

use std::path::PathBuf;

use sip_core::SipKernelType;
use sip_targets::{DeviceId, TargetError};
use thiserror::Error;

use crate::compiler::BuildError;

/// Errors that can occur while provisioning a SIP kernel.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("'{kind}' is not a buildable SIP kernel type")]
    InvalidKind { kind: SipKernelType },

    #[error("building {kind} SIP kernel for device {device} failed: {source}")]
    Build {
        kind: SipKernelType,
        device: DeviceId,
        #[source]
        source: BuildError,
    },

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("device descriptor error: {0}")]
    Device(#[from] TargetError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisionError>;
