//! End-to-end SIP provisioning across threads and configurations.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::{Duration, Instant};

use sip_builtins::{
    BuildError, InMemoryPrecompiled, NoPrecompiled, ProvisionConfig, SipCompiler, SipKernelCache,
};
use sip_core::{PointerWidth, SipKernelType, MAX_DEBUG_SURFACE_SIZE};
use sip_targets::DeviceDescriptor;

/// Compiler that records every invocation and takes a while to answer.
#[derive(Default)]
struct SlowCompiler {
    calls: AtomicUsize,
}

impl SipCompiler for SlowCompiler {
    fn build(&self, source: &str, options: &str) -> Result<Vec<u8>, BuildError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(20));
        Ok(format!("{options}\n{source}").into_bytes())
    }
}

/// Compiler that reports when it starts, then waits to be released.
struct GatedCompiler {
    started: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl SipCompiler for GatedCompiler {
    fn build(&self, source: &str, options: &str) -> Result<Vec<u8>, BuildError> {
        let _ = self.started.lock().unwrap().send(());
        let _ = self
            .release
            .lock()
            .unwrap()
            .recv_timeout(Duration::from_secs(2));
        Ok(format!("{options}\n{source}").into_bytes())
    }
}

fn fast_compiler(source: &str, options: &str) -> Result<Vec<u8>, BuildError> {
    Ok(format!("{options}\n{source}").into_bytes())
}

#[test]
fn concurrent_requests_share_one_build() {
    let cache = SipKernelCache::new();
    let compiler = SlowCompiler::default();
    let device = DeviceDescriptor::skylake();

    let (cache_ref, compiler_ref, device_ref) = (&cache, &compiler, &device);
    let kernels: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(move || {
                    cache_ref
                        .get_or_build(device_ref, SipKernelType::DbgCsr, compiler_ref, &NoPrecompiled)
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(compiler.calls.load(Ordering::SeqCst), 1);
    assert!(kernels.iter().all(|k| Arc::ptr_eq(k, &kernels[0])));
    let stats = cache.statistics();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 7);
    assert_eq!(stats.entries, 1);
}

#[test]
fn build_in_flight_does_not_block_statistics_or_other_keys() {
    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let gated = GatedCompiler {
        started: Mutex::new(started_tx),
        release: Mutex::new(release_rx),
    };
    let cache = SipKernelCache::new();
    let skylake = DeviceDescriptor::skylake();
    let broadwell = DeviceDescriptor::broadwell();

    std::thread::scope(|s| {
        let builder = s.spawn(|| {
            cache
                .get_or_build(&skylake, SipKernelType::DbgCsr, &gated, &NoPrecompiled)
                .unwrap()
        });
        started_rx.recv().unwrap();

        let begin = Instant::now();
        let stats = cache.statistics();
        let other = cache
            .get_or_build(&broadwell, SipKernelType::Csr, &fast_compiler, &NoPrecompiled)
            .unwrap();
        let elapsed = begin.elapsed();
        release_tx.send(()).unwrap();

        assert!(elapsed < Duration::from_secs(1), "blocked for {elapsed:?}");
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.misses, 1);
        assert_eq!(other.kind(), SipKernelType::Csr);
        assert_eq!(builder.join().unwrap().kind(), SipKernelType::DbgCsr);
    });

    assert_eq!(cache.statistics().entries, 2);
}

#[test]
fn distinct_keys_build_separately() {
    let cache = SipKernelCache::new();
    let compiler = SlowCompiler::default();
    let devices = [DeviceDescriptor::skylake(), DeviceDescriptor::icelake_lp()];

    std::thread::scope(|s| {
        for device in &devices {
            for kind in SipKernelType::ALL {
                let cache = &cache;
                let compiler = &compiler;
                s.spawn(move || {
                    let sip = cache
                        .get_or_build(device, kind, compiler, &NoPrecompiled)
                        .unwrap();
                    assert_eq!(sip.kind(), kind);
                });
            }
        }
    });

    assert_eq!(compiler.calls.load(Ordering::SeqCst), 6);
    assert_eq!(cache.statistics().entries, 6);
}

#[test]
fn config_drives_variant_and_addressing() {
    let config = ProvisionConfig::parse(
        r#"
debugging-enabled = true
local-memory-debug-surface = true
force-32bit-addressing = true
"#,
    )
    .unwrap();

    let mut device = DeviceDescriptor::kabylake();
    config.apply_to(&mut device);
    let kind = config.sip_kernel_type();
    assert_eq!(kind, SipKernelType::DbgCsrLocal);

    let cache = SipKernelCache::new();
    let compiler = SlowCompiler::default();
    let sip = cache
        .get_or_build(&device, kind, &compiler, &NoPrecompiled)
        .unwrap();

    let built = String::from_utf8(sip.binary().to_vec()).unwrap();
    assert!(built.starts_with("-cl-include-sip-kernel-local-debug -cl-include-sip-csr -cl-set-bti:0"));
    assert!(built.contains("target datalayout = \"e-p:32:32:32\""));
    assert!(!built.contains("target triple = \"spir64\""));
    assert_eq!(sip.debug_surface_bti(), 0);
    assert_eq!(sip.debug_surface_size(), MAX_DEBUG_SURFACE_SIZE);
}

#[test]
fn shipped_binaries_are_matched_by_bitness() {
    let mut shipped = InMemoryPrecompiled::new();
    shipped.insert(SipKernelType::Csr, PointerWidth::Bits32, "bdw", b"csr32".to_vec());

    let cache = SipKernelCache::new();
    let compiler = SlowCompiler::default();

    let mut forced = DeviceDescriptor::broadwell();
    forced.set_force_32bit_addressing(true);
    let sip = cache
        .get_or_build(&forced, SipKernelType::Csr, &compiler, &shipped)
        .unwrap();
    assert_eq!(sip.binary(), b"csr32");
    assert_eq!(compiler.calls.load(Ordering::SeqCst), 0);

    if PointerWidth::host() == PointerWidth::Bits64 {
        let native = DeviceDescriptor::broadwell();
        cache
            .get_or_build(&native, SipKernelType::Csr, &compiler, &shipped)
            .unwrap();
        assert_eq!(compiler.calls.load(Ordering::SeqCst), 1);
    }
}
