//! Fallback LLVM IR source for building a SIP kernel from scratch.
//!
//! When no precompiled SIP binary ships for a device, the compiler is handed
//! a minimal kernel-bearing module together with the variant's internal
//! options; the options pull the real SIP code in. The module only has to
//! carry the right data layout and triple plus the metadata the compiler
//! uses to recognise kernels.

use std::fmt::Write;

/// Device-side pointer width of the fallback module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerWidth {
    Bits32,
    Bits64,
}

impl PointerWidth {
    /// Pointer width of the host application.
    pub fn host() -> Self {
        if cfg!(target_pointer_width = "32") {
            PointerWidth::Bits32
        } else {
            PointerWidth::Bits64
        }
    }

    /// Width from a raw bit count, if it is one the device can address with.
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            32 => Some(PointerWidth::Bits32),
            64 => Some(PointerWidth::Bits64),
            _ => None,
        }
    }

    /// Width in bits.
    pub fn bits(self) -> u32 {
        match self {
            PointerWidth::Bits32 => 32,
            PointerWidth::Bits64 => 64,
        }
    }

    /// `target datalayout` value for this width.
    pub fn data_layout(self) -> &'static str {
        match self {
            PointerWidth::Bits32 => "e-p:32:32:32",
            PointerWidth::Bits64 => "e-p:64:64:64",
        }
    }

    /// `target triple` value for this width.
    pub fn target_triple(self) -> &'static str {
        match self {
            PointerWidth::Bits32 => "spir",
            PointerWidth::Bits64 => "spir64",
        }
    }
}

/// What the fallback generator needs to know about a device.
pub trait AddressingProfile {
    /// Whether the device runs kernels with 32-bit addresses regardless of host.
    fn is_forcing_32bit_addressing(&self) -> bool;

    /// Address width the device reports, if it reports one.
    fn addressing_bits(&self) -> Option<u32> {
        None
    }
}

/// Effective pointer width for `device`.
///
/// Forced 32-bit addressing wins; otherwise the host width is used. A device
/// reporting a width that is neither 32 nor 64 falls back to 64-bit.
pub fn effective_pointer_width(device: &dyn AddressingProfile) -> PointerWidth {
    if device.is_forcing_32bit_addressing() {
        return PointerWidth::Bits32;
    }
    match device.addressing_bits() {
        None => PointerWidth::host(),
        Some(bits) if PointerWidth::from_bits(bits).is_some() => PointerWidth::host(),
        Some(bits) => {
            tracing::warn!(bits, "malformed device addressing width, using 64-bit fallback module");
            PointerWidth::Bits64
        }
    }
}

/// Fallback SIP source for `device`.
pub fn generate_fallback_source(device: &dyn AddressingProfile) -> String {
    fallback_source_for_width(effective_pointer_width(device))
}

/// Kernel argument info nodes the compiler expects on every kernel.
const KERNEL_ARG_INFO: [&str; 6] = [
    "kernel_arg_addr_space",
    "kernel_arg_access_qual",
    "kernel_arg_type",
    "kernel_arg_type_qual",
    "kernel_arg_base_type",
    "kernel_arg_name",
];

/// Fallback SIP source for an explicit pointer width.
pub fn fallback_source_for_width(width: PointerWidth) -> String {
    let mut src = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(src, "target datalayout = \"{}\"", width.data_layout());
    let _ = writeln!(src, "target triple = \"{}\"", width.target_triple());
    src.push_str("define void @f() {\n    ret void\n}\n");
    src.push_str("!opencl.compiler.options = !{!0}\n");
    src.push_str("!opencl.kernels = !{!1}\n");
    src.push_str("!0 = !{}\n");

    let refs: Vec<String> = (0..KERNEL_ARG_INFO.len()).map(|i| format!("!{}", i + 2)).collect();
    let _ = writeln!(src, "!1 = !{{void ()* @f, {}}}", refs.join(", "));
    for (i, name) in KERNEL_ARG_INFO.iter().enumerate() {
        let _ = writeln!(src, "!{} = !{{!\"{name}\"}}", i + 2);
    }
    src
}
