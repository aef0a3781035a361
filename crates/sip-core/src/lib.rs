//! System interrupt program (SIP) policy for the compute runtime.
//!
//! The hardware traps into a SIP kernel for context save/restore and for
//! kernel debugging. This crate holds the pure, total policy behind that:
//! - **Variants:** the closed set of SIP kernel types
//! - **Options:** internal compiler options that build each variant
//! - **Debug surface:** binding table index and size per variant
//! - **Fallback source:** LLVM IR module compiled when no binary ships
//! - **Handle:** a variant bound to its compiled program artifact
//!
//! Nothing here performs I/O or holds mutable state.

pub mod debug_surface;
pub mod kernel;
pub mod kind;
pub mod ll_source;
pub mod options;
pub mod program;

pub use debug_surface::{
    debug_surface_geometry, BindingLocation, DebugSurfaceGeometry, DEBUG_SURFACE_BTI,
    MAX_DEBUG_SURFACE_SIZE,
};
pub use kernel::SipKernel;
pub use kind::SipKernelType;
pub use ll_source::{
    effective_pointer_width, fallback_source_for_width, generate_fallback_source, AddressingProfile,
    PointerWidth,
};
pub use options::sip_kernel_compiler_internal_options;
pub use program::{ContentHash, ProgramArtifact, ProgramOrigin};
