//! Debug surface geometry per SIP variant.
//!
//! The debug surface is a scratch buffer the debug SIP kernels use to hand
//! per-thread state to host tooling. Its binding table index is baked into
//! the kernel at build time, so the index here and the `-cl-set-bti:` option
//! come from the same literal.

use crate::kind::SipKernelType;

/// Binding table index literal shared with the compiler options.
macro_rules! debug_surface_bti {
    () => {
        0
    };
}
pub(crate) use debug_surface_bti;

/// Binding table index of the debug surface in debug SIP kernels.
pub const DEBUG_SURFACE_BTI: u32 = debug_surface_bti!();

/// Upper bound on any debug surface, one record per resident thread context.
pub const MAX_DEBUG_SURFACE_SIZE: u32 = 0x49_C000;

/// Where a SIP kernel expects its debug surface to be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingLocation {
    /// No debug surface.
    Unbound,
    /// A binding table slot.
    Slot(u32),
}

impl BindingLocation {
    /// Raw form used by the device interface: `-1` when unbound.
    pub fn as_raw(self) -> i32 {
        match self {
            BindingLocation::Unbound => -1,
            BindingLocation::Slot(index) => i32::try_from(index).unwrap_or(i32::MAX),
        }
    }

    /// The slot index, if bound.
    pub fn slot(self) -> Option<u32> {
        match self {
            BindingLocation::Unbound => None,
            BindingLocation::Slot(index) => Some(index),
        }
    }
}

/// Binding location and byte size of a debug surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebugSurfaceGeometry {
    pub binding: BindingLocation,
    pub size_bytes: u32,
}

impl DebugSurfaceGeometry {
    /// Geometry of a kernel without a debug surface.
    pub const NONE: DebugSurfaceGeometry = DebugSurfaceGeometry {
        binding: BindingLocation::Unbound,
        size_bytes: 0,
    };

    /// Whether a surface has to be allocated at all.
    pub fn is_present(&self) -> bool {
        self.size_bytes > 0
    }
}

/// Debug surface geometry for `kind`.
///
/// Sizes do not depend on the device; the sentinel has no surface.
pub fn debug_surface_geometry(kind: SipKernelType) -> DebugSurfaceGeometry {
    match kind {
        SipKernelType::DbgCsr | SipKernelType::DbgCsrLocal => DebugSurfaceGeometry {
            binding: BindingLocation::Slot(DEBUG_SURFACE_BTI),
            size_bytes: MAX_DEBUG_SURFACE_SIZE,
        },
        SipKernelType::Csr | SipKernelType::Count => DebugSurfaceGeometry::NONE,
    }
}
