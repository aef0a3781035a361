//! SIP kernel handle.

use std::sync::Arc;

use crate::debug_surface::{debug_surface_geometry, BindingLocation, DebugSurfaceGeometry};
use crate::kind::SipKernelType;
use crate::program::ProgramArtifact;

/// A SIP variant bound to the program that implements it.
///
/// Construction accepts every variant, the sentinel included. Debug surface
/// properties are derived from the variant on each call.
#[derive(Debug, Clone)]
pub struct SipKernel {
    kind: SipKernelType,
    program: Arc<ProgramArtifact>,
}

impl SipKernel {
    /// Bind `kind` to its backing program.
    pub fn new(kind: SipKernelType, program: Arc<ProgramArtifact>) -> Self {
        Self { kind, program }
    }

    /// The variant this kernel was constructed with.
    pub fn kind(&self) -> SipKernelType {
        self.kind
    }

    /// The backing program, shared with the cache.
    pub fn program(&self) -> &Arc<ProgramArtifact> {
        &self.program
    }

    /// The backing program's device binary.
    pub fn binary(&self) -> &[u8] {
        self.program.binary()
    }

    /// Debug surface geometry of this kernel's variant.
    pub fn debug_surface_geometry(&self) -> DebugSurfaceGeometry {
        debug_surface_geometry(self.kind)
    }

    /// Where the debug surface must be bound.
    pub fn debug_surface_binding(&self) -> BindingLocation {
        self.debug_surface_geometry().binding
    }

    /// Binding table index of the debug surface, `-1` without one.
    pub fn debug_surface_bti(&self) -> i32 {
        self.debug_surface_binding().as_raw()
    }

    /// Debug surface size in bytes, `0` without one.
    pub fn debug_surface_size(&self) -> u32 {
        self.debug_surface_geometry().size_bytes
    }
}

impl PartialEq for SipKernel {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && Arc::ptr_eq(&self.program, &other.program)
    }
}

impl Eq for SipKernel {}
