//! SIP kernel provisioning.
//!
//! Resolves a SIP kernel for a (device, variant) pair: a shipped binary when
//! one exists, otherwise a build of the fallback source with the variant's
//! internal options. Results live in a caller-owned [`SipKernelCache`].

pub mod cache;
pub mod compiler;
pub mod config;
pub mod error;
pub mod precompiled;

pub use cache::{BuildInputs, CacheStats, SipKernelCache};
pub use compiler::{BuildError, SipCompiler};
pub use config::{select_sip_kernel_type, DebugMode, ProvisionConfig};
pub use error::{ProvisionError, Result};
pub use precompiled::{precompiled_sip_name, InMemoryPrecompiled, NoPrecompiled, PrecompiledSips};
