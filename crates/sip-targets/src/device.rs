//! Device descriptor model.

use std::fmt;

use serde::Deserialize;
use sip_core::{AddressingProfile, PointerWidth};
use uuid::Uuid;

/// Runtime identity of a device instance.
///
/// Two descriptors for the same product are still distinct devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub Uuid);

impl DeviceId {
    /// Allocate a fresh identity.
    pub fn new() -> Self {
        DeviceId(Uuid::new_v4())
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// GPU core family of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductFamily {
    Gen8,
    Gen9,
    Gen10,
    Gen11,
}

/// Everything the SIP policy needs to know about one device.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeviceDescriptor {
    /// Runtime identity; assigned fresh on every load.
    #[serde(skip)]
    pub id: DeviceId,
    /// Marketing name (e.g., "Skylake GT2").
    pub name: String,
    pub family: ProductFamily,
    /// Short product name used to suffix shipped binaries (e.g., "skl").
    pub product_abbrev: String,
    /// Address width the device file declares, in bits.
    ///
    /// Only checked for sanity: 32 and 64 are accepted, anything else makes
    /// SIP provisioning fall back to the 64-bit module. It does not select the
    /// width; that follows the host unless `force_32bit_addressing` is set.
    #[serde(default = "default_addressing_bits")]
    pub addressing_bits: u32,
    /// Run kernels with 32-bit addresses even on a 64-bit host.
    #[serde(default)]
    pub force_32bit_addressing: bool,
}

fn default_addressing_bits() -> u32 {
    64
}

impl DeviceDescriptor {
    /// Descriptor with 64-bit addressing and no forcing.
    pub fn new(name: impl Into<String>, family: ProductFamily, product_abbrev: impl Into<String>) -> Self {
        Self {
            id: DeviceId::new(),
            name: name.into(),
            family,
            product_abbrev: product_abbrev.into(),
            addressing_bits: default_addressing_bits(),
            force_32bit_addressing: false,
        }
    }

    /// Force 32-bit addressing on or off.
    pub fn set_force_32bit_addressing(&mut self, force: bool) {
        self.force_32bit_addressing = force;
    }

    /// Pointer width SIP binaries for this device are built for.
    pub fn pointer_width(&self) -> PointerWidth {
        sip_core::effective_pointer_width(self)
    }

    /// Construct a Broadwell GT2 descriptor.
    pub fn broadwell() -> Self {
        Self::new("Broadwell GT2", ProductFamily::Gen8, "bdw")
    }

    /// Construct a Skylake GT2 descriptor.
    pub fn skylake() -> Self {
        Self::new("Skylake GT2", ProductFamily::Gen9, "skl")
    }

    /// Construct a Kaby Lake GT2 descriptor.
    pub fn kabylake() -> Self {
        Self::new("Kaby Lake GT2", ProductFamily::Gen9, "kbl")
    }

    /// Construct a Cannon Lake descriptor.
    pub fn cannonlake() -> Self {
        Self::new("Cannon Lake", ProductFamily::Gen10, "cnl")
    }

    /// Construct an Ice Lake LP descriptor.
    pub fn icelake_lp() -> Self {
        Self::new("Ice Lake LP", ProductFamily::Gen11, "icllp")
    }

    /// Look up a built-in descriptor by product abbreviation.
    pub fn builtin(product_abbrev: &str) -> Option<Self> {
        match product_abbrev {
            "bdw" => Some(Self::broadwell()),
            "skl" => Some(Self::skylake()),
            "kbl" => Some(Self::kabylake()),
            "cnl" => Some(Self::cannonlake()),
            "icllp" => Some(Self::icelake_lp()),
            _ => None,
        }
    }
}

impl AddressingProfile for DeviceDescriptor {
    fn is_forcing_32bit_addressing(&self) -> bool {
        self.force_32bit_addressing
    }

    fn addressing_bits(&self) -> Option<u32> {
        Some(self.addressing_bits)
    }
}
