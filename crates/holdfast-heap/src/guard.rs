//! Scoped leak auditing.

use crate::registry::HeapRegistry;

/// Runs [`HeapRegistry::shutdown`] when dropped.
///
/// Hold one for the lifetime of a composition so the leak report is
/// produced even when the host unwinds.
#[must_use = "dropping the guard immediately runs the leak report"]
pub struct ShutdownGuard {
    registry: &'static HeapRegistry,
}

impl ShutdownGuard {
    /// The registry this guard audits.
    pub fn registry(&self) -> &'static HeapRegistry {
        self.registry
    }
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        let report = self.registry.shutdown();
        if !report.is_empty() {
            log::debug!("holdfast: {} pointer(s) leaked at shutdown", report.len());
        }
    }
}

impl HeapRegistry {
    /// A guard that audits this registry for leaks when dropped.
    pub fn shutdown_guard(&'static self) -> ShutdownGuard {
        ShutdownGuard { registry: self }
    }
}
