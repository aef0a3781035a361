//! Provisioning configuration and SIP variant selection.
//!
//! Read from a `sip.toml` file:
//! ```toml
//! debugging-enabled = true
//! local-memory-debug-surface = false
//! force-32bit-addressing = true   # optional device override
//! device-file = "skl.device.toml" # optional, relative to this file
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sip_core::SipKernelType;
use sip_targets::DeviceDescriptor;

use crate::error::{ProvisionError, Result};

/// Kernel debugging mode of a device session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DebugMode {
    #[default]
    Disabled,
    Enabled,
    /// Debugging with the debug surface in local memory.
    EnabledLocalMemory,
}

/// SIP variant required for a debugging mode.
pub fn select_sip_kernel_type(mode: DebugMode) -> SipKernelType {
    match mode {
        DebugMode::Disabled => SipKernelType::Csr,
        DebugMode::Enabled => SipKernelType::DbgCsr,
        DebugMode::EnabledLocalMemory => SipKernelType::DbgCsrLocal,
    }
}

/// Contents of a `sip.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProvisionConfig {
    #[serde(default)]
    pub debugging_enabled: bool,
    /// Only meaningful with debugging enabled.
    #[serde(default)]
    pub local_memory_debug_surface: bool,
    /// Overrides the device's own 32-bit forcing when set.
    #[serde(default)]
    pub force_32bit_addressing: Option<bool>,
    /// Descriptor of the device to provision for.
    #[serde(default)]
    pub device_file: Option<PathBuf>,
}

impl ProvisionConfig {
    /// Parse a config from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load a config file; a relative `device-file` is resolved against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ProvisionError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        if let (Some(file), Some(dir)) = (config.device_file.as_mut(), path.parent()) {
            if file.is_relative() {
                *file = dir.join(&*file);
            }
        }
        Ok(config)
    }

    /// Debugging mode this config asks for.
    pub fn debug_mode(&self) -> DebugMode {
        match (self.debugging_enabled, self.local_memory_debug_surface) {
            (false, local) => {
                if local {
                    tracing::debug!("local-memory-debug-surface ignored without debugging");
                }
                DebugMode::Disabled
            }
            (true, false) => DebugMode::Enabled,
            (true, true) => DebugMode::EnabledLocalMemory,
        }
    }

    /// SIP variant this config asks for.
    pub fn sip_kernel_type(&self) -> SipKernelType {
        select_sip_kernel_type(self.debug_mode())
    }

    /// Apply device overrides from this config.
    pub fn apply_to(&self, device: &mut DeviceDescriptor) {
        if let Some(force) = self.force_32bit_addressing {
            device.set_force_32bit_addressing(force);
        }
    }

    /// Load the configured device descriptor with overrides applied.
    ///
    /// `None` when no `device-file` is configured.
    pub fn load_device(&self) -> Result<Option<DeviceDescriptor>> {
        let Some(path) = &self.device_file else {
            return Ok(None);
        };
        let mut device = sip_targets::parse::load_device_toml(path)?;
        self.apply_to(&mut device);
        Ok(Some(device))
    }
}
