//! Internal compiler options for building each SIP variant from source.

use crate::debug_surface::debug_surface_bti;
use crate::kind::SipKernelType;

const CSR_OPTIONS: &str = "-cl-include-sip-csr";

const DBG_CSR_OPTIONS: &str = concat!(
    "-cl-include-sip-kernel-debug -cl-include-sip-csr -cl-set-bti:",
    debug_surface_bti!()
);

const DBG_CSR_LOCAL_OPTIONS: &str = concat!(
    "-cl-include-sip-kernel-local-debug -cl-include-sip-csr -cl-set-bti:",
    debug_surface_bti!()
);

/// Compiler internal options for `kind`. The sentinel yields an empty string.
pub fn sip_kernel_compiler_internal_options(kind: SipKernelType) -> &'static str {
    match kind {
        SipKernelType::Csr => CSR_OPTIONS,
        SipKernelType::DbgCsr => DBG_CSR_OPTIONS,
        SipKernelType::DbgCsrLocal => DBG_CSR_LOCAL_OPTIONS,
        SipKernelType::Count => "",
    }
}
