//! Lookup of shipped SIP binaries.

use std::collections::HashMap;

use sip_core::{PointerWidth, SipKernelType};
use sip_targets::DeviceDescriptor;

/// Name of a shipped SIP binary: `<base>_<32|64>_<product>`.
pub fn precompiled_sip_name(base: &str, width: PointerWidth, product_abbrev: &str) -> String {
    format!("{base}_{}_{product_abbrev}", width.bits())
}

/// Base name of the shipped binary for `kind`.
fn base_name(kind: SipKernelType) -> String {
    format!("sip_{}", kind.name())
}

/// Source of shipped SIP binaries.
pub trait PrecompiledSips: Send + Sync {
    /// Shipped binary for `kind` on `device`, if there is one.
    fn lookup(&self, device: &DeviceDescriptor, kind: SipKernelType) -> Option<Vec<u8>>;
}

/// No shipped binaries; every request falls back to a build.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrecompiled;

impl PrecompiledSips for NoPrecompiled {
    fn lookup(&self, _device: &DeviceDescriptor, _kind: SipKernelType) -> Option<Vec<u8>> {
        None
    }
}

/// Shipped binaries held in memory, keyed by their file name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPrecompiled {
    binaries: HashMap<String, Vec<u8>>,
}

impl InMemoryPrecompiled {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the binary for `kind` on a product at a given width.
    pub fn insert(
        &mut self,
        kind: SipKernelType,
        width: PointerWidth,
        product_abbrev: &str,
        binary: Vec<u8>,
    ) {
        let name = precompiled_sip_name(&base_name(kind), width, product_abbrev);
        self.binaries.insert(name, binary);
    }

    /// Number of stored binaries.
    pub fn len(&self) -> usize {
        self.binaries.len()
    }

    /// Whether no binaries are stored.
    pub fn is_empty(&self) -> bool {
        self.binaries.is_empty()
    }
}

impl PrecompiledSips for InMemoryPrecompiled {
    fn lookup(&self, device: &DeviceDescriptor, kind: SipKernelType) -> Option<Vec<u8>> {
        let name = precompiled_sip_name(
            &base_name(kind),
            device.pointer_width(),
            &device.product_abbrev,
        );
        self.binaries.get(&name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_has_bitness_and_product_suffix() {
        assert_eq!(
            precompiled_sip_name("sip_dummy_kernel_debug", PointerWidth::Bits64, "skl"),
            "sip_dummy_kernel_debug_64_skl"
        );
        assert_eq!(
            precompiled_sip_name("sip_dummy_kernel_debug", PointerWidth::Bits32, "bdw"),
            "sip_dummy_kernel_debug_32_bdw"
        );
    }

    #[test]
    fn lookup_respects_width_and_kind() {
        let mut shipped = InMemoryPrecompiled::new();
        shipped.insert(SipKernelType::DbgCsr, PointerWidth::Bits32, "skl", vec![7]);
        assert_eq!(shipped.len(), 1);

        let mut device = DeviceDescriptor::skylake();
        assert!(shipped.lookup(&device, SipKernelType::Csr).is_none());
        device.set_force_32bit_addressing(true);
        assert_eq!(shipped.lookup(&device, SipKernelType::DbgCsr), Some(vec![7]));
        assert!(shipped.lookup(&device, SipKernelType::Csr).is_none());
    }

    #[test]
    fn no_precompiled_never_finds_anything() {
        let device = DeviceDescriptor::kabylake();
        for kind in SipKernelType::ALL {
            assert!(NoPrecompiled.lookup(&device, kind).is_none());
        }
    }
}
