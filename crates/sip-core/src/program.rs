//! Compiled program artifacts backing SIP kernels.

use sha2::{Digest, Sha256};

use crate::kind::SipKernelType;
use crate::options::sip_kernel_compiler_internal_options;

/// SHA-256 digest of a program binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash the given binary.
    pub fn of(binary: &[u8]) -> Self {
        ContentHash(Sha256::digest(binary).into())
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Leading hex digits, enough to tell binaries apart in logs.
    pub fn short(&self) -> String {
        self.0[..6].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.iter().try_for_each(|b| write!(f, "{b:02x}"))
    }
}

/// Where a program binary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramOrigin {
    /// Shipped binary for the device.
    Precompiled,
    /// Compiled from the fallback source.
    Built,
}

/// A compiled device program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramArtifact {
    binary: Vec<u8>,
    options: String,
    origin: ProgramOrigin,
    hash: ContentHash,
}

impl ProgramArtifact {
    /// Wrap a binary produced with the given internal options.
    pub fn new(binary: Vec<u8>, options: impl Into<String>, origin: ProgramOrigin) -> Self {
        let hash = ContentHash::of(&binary);
        Self {
            binary,
            options: options.into(),
            origin,
            hash,
        }
    }

    /// Wrap a shipped binary for `kind`.
    pub fn precompiled(kind: SipKernelType, binary: Vec<u8>) -> Self {
        Self::new(
            binary,
            sip_kernel_compiler_internal_options(kind),
            ProgramOrigin::Precompiled,
        )
    }

    /// The device binary.
    pub fn binary(&self) -> &[u8] {
        &self.binary
    }

    /// Internal options the binary was built with.
    pub fn options(&self) -> &str {
        &self.options
    }

    /// Whether the binary was shipped or built.
    pub fn origin(&self) -> ProgramOrigin {
        self.origin
    }

    /// Digest of the binary, computed once at construction.
    pub fn hash(&self) -> ContentHash {
        self.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_tracks_binary_contents() {
        let a = ContentHash::of(b"sip");
        assert_eq!(a, ContentHash::of(b"sip"));
        assert_ne!(a, ContentHash::of(b"pis"));
        assert_eq!(a.to_string().len(), 64);
        assert!(a.to_string().starts_with(&a.short()));
        assert_eq!(a.short().len(), 12);
    }

    #[test]
    fn precompiled_records_variant_options() {
        let artifact = ProgramArtifact::precompiled(SipKernelType::DbgCsr, vec![1, 2, 3]);
        assert_eq!(artifact.origin(), ProgramOrigin::Precompiled);
        assert_eq!(
            artifact.options(),
            "-cl-include-sip-kernel-debug -cl-include-sip-csr -cl-set-bti:0"
        );
        assert_eq!(artifact.binary(), &[1, 2, 3]);
        assert_eq!(artifact.hash(), ContentHash::of(&[1, 2, 3]));
    }
}
