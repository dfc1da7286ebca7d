//! Test utilities and fixtures for Holdfast development.
//!
//! Provides isolated registries, a recording [`ErrorReporter`], a
//! deallocation counter, and a [`Marker`](fixtures::Marker) list element that
//! tallies every retain and release the list performs on it.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use holdfast_heap::{
    Deallocator, Descriptor, ErrorReporter, HeapConfig, HeapError, HeapPtr, HeapRegistry,
};

/// A fresh registry that lives for the rest of the process.
///
/// Tests use one per case so counts and leak reports never mix.
pub fn isolated_registry() -> &'static HeapRegistry {
    Box::leak(Box::new(HeapRegistry::new(HeapConfig::new().initial_capacity(64))))
}

/// An isolated registry with a [`RecordingReporter`] installed.
pub fn recorded_registry() -> (&'static HeapRegistry, Arc<RecordingReporter>) {
    let registry = isolated_registry();
    let reporter = RecordingReporter::install(registry);
    (registry, reporter)
}

/// Collects every diagnostic it receives.
#[derive(Default)]
pub struct RecordingReporter {
    errors: Mutex<Vec<HeapError>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reporter and install it on `registry`.
    pub fn install(registry: &HeapRegistry) -> Arc<Self> {
        let reporter = Arc::new(Self::new());
        registry.set_reporter(reporter.clone());
        reporter
    }

    /// Everything reported so far.
    pub fn errors(&self) -> Vec<HeapError> {
        self.lock().clone()
    }

    /// Drain everything reported so far.
    pub fn take(&self) -> Vec<HeapError> {
        std::mem::take(&mut *self.lock())
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<HeapError>> {
        self.errors.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, error: &HeapError) {
        self.lock().push(error.clone());
    }
}

/// Counts how many of its deallocators have run.
#[derive(Clone, Default)]
pub struct DeallocCounter {
    hits: Arc<AtomicUsize>,
}

impl DeallocCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A deallocator that bumps this counter.
    pub fn deallocator(&self) -> Deallocator {
        let hits = Arc::clone(&self.hits);
        Box::new(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    pub fn count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// A distinct, never-dereferenced address for registry tests.
///
/// Addresses come from a process-wide counter so concurrent tests never
/// collide, even on the global registry.
pub fn fake_ptr() -> HeapPtr {
    static NEXT: AtomicUsize = AtomicUsize::new(0x1000);
    HeapPtr::from_addr(NEXT.fetch_add(16, Ordering::Relaxed))
}

/// A descriptor naming a test fixture.
#[track_caller]
pub fn test_descriptor(name: &'static str) -> Descriptor {
    Descriptor::caller(name)
}
