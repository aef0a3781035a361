//! TOML parsing and validation for device descriptors.

use std::path::Path;

use crate::device::DeviceDescriptor;
use crate::error::{Result, TargetError};

/// A validation issue found in a device descriptor.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity: "error" or "warning".
    pub severity: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// Read and parse a descriptor file.
pub fn load_device_toml(path: &Path) -> Result<DeviceDescriptor> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => TargetError::NotFound {
            path: path.to_path_buf(),
        },
        _ => TargetError::Io(e),
    })?;
    parse_device_toml(&content)
}

/// Parse a descriptor and reject it if validation reports errors.
///
/// Warnings are logged and the descriptor is accepted.
pub fn parse_device_toml(toml_str: &str) -> Result<DeviceDescriptor> {
    let device: DeviceDescriptor = toml::from_str(toml_str)?;
    let Err(issues) = validate_device(&device) else {
        return Ok(device);
    };
    let (errors, warnings): (Vec<_>, Vec<_>) =
        issues.into_iter().partition(|i| i.severity == "error");
    if !errors.is_empty() {
        let detail = errors
            .into_iter()
            .map(|i| i.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(TargetError::Validation { detail });
    }
    for issue in warnings {
        tracing::warn!(device = %device.name, "{}", issue.message);
    }
    Ok(device)
}

/// Validate a descriptor.
///
/// Unusual addressing widths are warnings: SIP provisioning falls back to a
/// 64-bit module for them rather than refusing the device.
pub fn validate_device(device: &DeviceDescriptor) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    if device.product_abbrev.is_empty() {
        issues.push(ValidationIssue {
            severity: "error",
            message: "product-abbrev is empty".into(),
        });
    }

    if !device
        .product_abbrev
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        issues.push(ValidationIssue {
            severity: "error",
            message: format!(
                "product-abbrev '{}' must be lowercase alphanumeric",
                device.product_abbrev
            ),
        });
    }

    if !matches!(device.addressing_bits, 32 | 64) {
        issues.push(ValidationIssue {
            severity: "warning",
            message: format!(
                "addressing-bits {} is neither 32 nor 64",
                device.addressing_bits
            ),
        });
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
