//! The process-wide registry.
//!
//! Runtime code that is not handed an explicit [`HeapRegistry`] goes
//! through these free functions. The registry is created on first use
//! with [`HeapConfig::default`] unless [`init`] ran earlier.

use std::sync::{Arc, OnceLock};

use crate::config::HeapConfig;
use crate::descriptor::{CallSite, Descriptor};
use crate::error::LeakReport;
use crate::guard::ShutdownGuard;
use crate::ptr::{HeapPtr, RefCount};
use crate::registry::{Deallocator, HeapRegistry};
use crate::reporter::ErrorReporter;

static GLOBAL: OnceLock<HeapRegistry> = OnceLock::new();

/// The process-wide registry, created with default settings on first use.
pub fn global() -> &'static HeapRegistry {
    GLOBAL.get_or_init(HeapRegistry::default)
}

/// Create the process-wide registry with `config`.
///
/// Returns a guard that runs the leak report when dropped. If the registry
/// already exists (because `init` ran before, or because a counting call
/// created it first) `config` is ignored with a warning.
pub fn init(config: HeapConfig) -> ShutdownGuard {
    let mut fresh = false;
    let registry = GLOBAL.get_or_init(|| {
        fresh = true;
        HeapRegistry::new(config)
    });
    if fresh {
        log::debug!("holdfast: global heap registry initialised");
    } else {
        log::warn!("holdfast: global heap registry already initialised, config ignored");
    }
    registry.shutdown_guard()
}

/// [`HeapRegistry::register`] on the global registry.
pub fn register(ptr: HeapPtr, deallocate: Deallocator, descriptor: Descriptor) -> RefCount {
    global().register(ptr, deallocate, descriptor)
}

/// [`HeapRegistry::register_singleton`] on the global registry.
pub fn register_singleton(ptr: HeapPtr, descriptor: Descriptor) -> RefCount {
    global().register_singleton(ptr, descriptor)
}

/// [`HeapRegistry::retain`] on the global registry.
#[track_caller]
pub fn retain(ptr: HeapPtr) -> RefCount {
    global().retain(ptr)
}

/// [`HeapRegistry::retain_at`] on the global registry.
pub fn retain_at(ptr: HeapPtr, site: CallSite) -> RefCount {
    global().retain_at(ptr, site)
}

/// [`HeapRegistry::release`] on the global registry.
#[track_caller]
pub fn release(ptr: HeapPtr) -> RefCount {
    global().release(ptr)
}

/// [`HeapRegistry::release_at`] on the global registry.
pub fn release_at(ptr: HeapPtr, site: CallSite) -> RefCount {
    global().release_at(ptr, site)
}

/// [`HeapRegistry::describe`] on the global registry.
pub fn describe(ptr: HeapPtr) -> String {
    global().describe(ptr)
}

/// [`HeapRegistry::shutdown`] on the global registry.
pub fn shutdown() -> LeakReport {
    global().shutdown()
}

/// [`HeapRegistry::set_reporter`] on the global registry.
pub fn set_reporter(reporter: Arc<dyn ErrorReporter>) {
    global().set_reporter(reporter)
}

/// [`HeapRegistry::clear_reporter`] on the global registry.
pub fn clear_reporter() {
    global().clear_reporter()
}
