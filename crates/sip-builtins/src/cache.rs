//! Caller-owned SIP kernel cache.
//!
//! Holds at most one SIP kernel per (device, variant). Each key has its own
//! slot lock, so a slow build only blocks callers asking for the same key;
//! they wait and then share the built kernel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

use sip_core::{
    generate_fallback_source, sip_kernel_compiler_internal_options, ProgramArtifact, ProgramOrigin,
    SipKernel, SipKernelType,
};
use sip_targets::{DeviceDescriptor, DeviceId};

use crate::compiler::{BuildError, SipCompiler};
use crate::error::{ProvisionError, Result};
use crate::precompiled::PrecompiledSips;

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    /// Compiler invocations, successful or not.
    pub builds: usize,
    pub entries: usize,
}

/// What the compiler is asked to build for one (device, variant).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInputs {
    pub source: String,
    pub options: &'static str,
}

impl BuildInputs {
    pub fn for_device(device: &DeviceDescriptor, kind: SipKernelType) -> Self {
        Self {
            source: generate_fallback_source(device),
            options: sip_kernel_compiler_internal_options(kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    device: DeviceId,
    kind: SipKernelType,
}

type Slot = Arc<Mutex<Option<Arc<SipKernel>>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Whether `slot` holds a kernel. A slot with a build in flight is empty.
fn is_filled(slot: &Slot) -> bool {
    match slot.try_lock() {
        Ok(entry) => entry.is_some(),
        Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().is_some(),
        Err(TryLockError::WouldBlock) => false,
    }
}

/// SIP kernels keyed by (device, variant).
#[derive(Debug, Default)]
pub struct SipKernelCache {
    slots: Mutex<HashMap<CacheKey, Slot>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
    builds: AtomicUsize,
}

impl SipKernelCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the SIP kernel for (device, kind), provisioning it on first use.
    ///
    /// A shipped binary is preferred; otherwise the fallback source is built.
    /// A failed build leaves the key empty so the next request builds again.
    pub fn get_or_build(
        &self,
        device: &DeviceDescriptor,
        kind: SipKernelType,
        compiler: &dyn SipCompiler,
        precompiled: &dyn PrecompiledSips,
    ) -> Result<Arc<SipKernel>> {
        if !kind.is_valid() {
            return Err(ProvisionError::InvalidKind { kind });
        }
        let key = CacheKey {
            device: device.id,
            kind,
        };
        let slot = Arc::clone(lock(&self.slots).entry(key).or_default());

        let mut entry = lock(&slot);
        if let Some(sip) = entry.as_ref() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(device = %device.id, %kind, "SIP kernel cache hit");
            return Ok(Arc::clone(sip));
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let program = self.provision(device, kind, compiler, precompiled)?;
        let sip = Arc::new(SipKernel::new(kind, Arc::new(program)));
        *entry = Some(Arc::clone(&sip));
        Ok(sip)
    }

    /// Cached kernel for (device, kind), without provisioning.
    ///
    /// Waits if a build for that key is in flight.
    pub fn get(&self, device: DeviceId, kind: SipKernelType) -> Option<Arc<SipKernel>> {
        let slot = lock(&self.slots).get(&CacheKey { device, kind }).cloned()?;
        let entry = lock(&slot);
        entry.clone()
    }

    fn provision(
        &self,
        device: &DeviceDescriptor,
        kind: SipKernelType,
        compiler: &dyn SipCompiler,
        precompiled: &dyn PrecompiledSips,
    ) -> Result<ProgramArtifact> {
        if let Some(binary) = precompiled.lookup(device, kind) {
            let program = ProgramArtifact::precompiled(kind, binary);
            tracing::debug!(
                device = %device.id,
                product = %device.product_abbrev,
                %kind,
                hash = %program.hash().short(),
                "using shipped SIP binary"
            );
            return Ok(program);
        }

        let inputs = BuildInputs::for_device(device, kind);
        tracing::debug!(
            device = %device.id,
            %kind,
            options = inputs.options,
            width = device.pointer_width().bits(),
            "building SIP kernel from fallback source"
        );
        self.builds.fetch_add(1, Ordering::Relaxed);
        let binary = compiler
            .build(&inputs.source, inputs.options)
            .and_then(|binary| {
                if binary.is_empty() {
                    Err(BuildError::new("compiler returned an empty binary"))
                } else {
                    Ok(binary)
                }
            })
            .map_err(|source| {
                tracing::warn!(device = %device.id, %kind, error = %source, "SIP kernel build failed");
                ProvisionError::Build {
                    kind,
                    device: device.id,
                    source,
                }
            })?;
        let program = ProgramArtifact::new(binary, inputs.options, ProgramOrigin::Built);
        tracing::debug!(device = %device.id, %kind, hash = %program.hash().short(), "built SIP kernel");
        Ok(program)
    }

    /// Drop every kernel cached for `device`. Returns how many kernels were removed.
    pub fn evict_device(&self, device: DeviceId) -> usize {
        let removed: Vec<Slot> = {
            let mut slots = lock(&self.slots);
            let keys: Vec<CacheKey> = slots.keys().filter(|k| k.device == device).copied().collect();
            keys.iter().filter_map(|k| slots.remove(k)).collect()
        };
        removed.iter().filter(|slot| is_filled(slot)).count()
    }

    /// Drop every cached kernel.
    pub fn clear(&self) {
        lock(&self.slots).clear();
    }

    /// Return cache usage statistics.
    pub fn statistics(&self) -> CacheStats {
        let slots: Vec<Slot> = lock(&self.slots).values().cloned().collect();
        let entries = slots.iter().filter(|slot| is_filled(slot)).count();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            builds: self.builds.load(Ordering::Relaxed),
            entries,
        }
    }
}
