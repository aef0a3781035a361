//! The closed set of SIP kernel variants.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A SIP kernel variant.
///
/// `Count` is the sentinel that follows the real variants. It is never a
/// build target but every policy function accepts it and answers with the
/// "no SIP" result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum SipKernelType {
    /// Context save/restore only.
    Csr = 0,
    /// Debug-enabled context save/restore.
    DbgCsr = 1,
    /// Debug-enabled with a local-memory resident debug surface.
    DbgCsrLocal = 2,
    /// Sentinel: number of real variants.
    Count = 3,
}

impl SipKernelType {
    /// Number of real (buildable) variants.
    pub const COUNT: usize = 3;

    /// Every real variant, in raw index order.
    pub const ALL: [SipKernelType; Self::COUNT] = [
        SipKernelType::Csr,
        SipKernelType::DbgCsr,
        SipKernelType::DbgCsrLocal,
    ];

    /// Map a raw index onto a variant. Out-of-range values become `Count`.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => SipKernelType::Csr,
            1 => SipKernelType::DbgCsr,
            2 => SipKernelType::DbgCsrLocal,
            _ => {
                tracing::trace!(raw, "unknown SIP kernel index, treating as sentinel");
                SipKernelType::Count
            }
        }
    }

    /// Raw index of this variant.
    pub fn as_raw(self) -> u32 {
        self as u32
    }

    /// Whether this is a real variant rather than the sentinel.
    pub fn is_valid(self) -> bool {
        !matches!(self, SipKernelType::Count)
    }

    /// Whether this variant carries a debug surface.
    pub fn is_debug(self) -> bool {
        match self {
            SipKernelType::DbgCsr | SipKernelType::DbgCsrLocal => true,
            SipKernelType::Csr | SipKernelType::Count => false,
        }
    }

    /// Stable lowercase name, also used in binary file names.
    pub fn name(self) -> &'static str {
        match self {
            SipKernelType::Csr => "csr",
            SipKernelType::DbgCsr => "dbg_csr",
            SipKernelType::DbgCsrLocal => "dbg_csr_local",
            SipKernelType::Count => "invalid",
        }
    }
}

impl fmt::Display for SipKernelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
