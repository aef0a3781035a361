//! Interface to the device compiler.

use thiserror::Error;

/// A failed build reported by the device compiler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BuildError {
    pub message: String,
    /// Compiler build log, if any.
    pub log: Option<String>,
}

impl BuildError {
    /// Error with a message and no log.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            log: None,
        }
    }

    /// Attach the compiler build log.
    pub fn with_log(mut self, log: impl Into<String>) -> Self {
        self.log = Some(log.into());
        self
    }
}

/// Turns IR source plus internal options into a device binary.
///
/// Implementations may be slow; the provisioning cache calls them at most
/// once per key at a time.
pub trait SipCompiler: Send + Sync {
    /// Compile `source` with internal `options` into a device binary.
    fn build(&self, source: &str, options: &str) -> Result<Vec<u8>, BuildError>;
}

impl<F> SipCompiler for F
where
    F: Fn(&str, &str) -> Result<Vec<u8>, BuildError> + Send + Sync,
{
    fn build(&self, source: &str, options: &str) -> Result<Vec<u8>, BuildError> {
        self(source, options)
    }
}
