//! Device descriptors for SIP provisioning.
//!
//! A descriptor carries what the SIP policy reads from a device: its product
//! identity and how it addresses memory. Descriptors are built in code or
//! loaded from `.device.toml` files.

pub mod device;
pub mod error;
pub mod parse;

pub use device::{DeviceDescriptor, DeviceId, ProductFamily};
pub use error::{Result, TargetError};
