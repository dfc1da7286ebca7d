//! Typed handles over registry-tracked payloads.
//!
//! [`HeapRef`] ties an `Arc` payload to a registry entry: the registry's
//! deallocator owns one strong reference, so the payload's finalizer runs
//! on the 1 → 0 release while any stale handle still points at valid
//! memory. [`Retained`] turns one unit of registry ownership into an RAII
//! value.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::descriptor::Descriptor;
use crate::global::global;
use crate::ptr::{HeapPtr, RefCount};
use crate::registry::HeapRegistry;

/// A value whose lifetime is counted by a [`HeapRegistry`].
pub trait HeapTracked {
    /// Registry key of the value. [`HeapPtr::NULL`] means "no object".
    fn heap_ptr(&self) -> HeapPtr;

    /// The registry that counts the value.
    fn registry(&self) -> &'static HeapRegistry;

    /// Add one unit of ownership.
    #[track_caller]
    fn retain(&self) -> RefCount {
        self.registry().retain(self.heap_ptr())
    }

    /// Remove one unit of ownership.
    #[track_caller]
    fn release(&self) -> RefCount {
        self.registry().release(self.heap_ptr())
    }

    /// Registration descriptor of the value.
    fn describe(&self) -> String {
        self.registry().describe(self.heap_ptr())
    }
}

impl<H: HeapTracked> HeapTracked for Option<H> {
    fn heap_ptr(&self) -> HeapPtr {
        self.as_ref().map_or(HeapPtr::NULL, HeapTracked::heap_ptr)
    }

    fn registry(&self) -> &'static HeapRegistry {
        self.as_ref().map_or_else(global, HeapTracked::registry)
    }
}

/// Handle to a registered payload.
///
/// Cloning a handle copies the pointer; it does not change the count.
/// Ownership is expressed with [`HeapTracked::retain`] and
/// [`HeapTracked::release`], or with [`Retained`].
pub struct HeapRef<T: ?Sized + Send + Sync + 'static> {
    payload: Arc<T>,
    registry: &'static HeapRegistry,
}

impl<T: Send + Sync + 'static> HeapRef<T> {
    /// Register `value` in the global registry, described by the caller's location.
    #[track_caller]
    pub fn new(value: T, name: &'static str) -> Self {
        Self::new_in(global(), value, Descriptor::caller(name))
    }

    /// Register `value` in `registry`.
    pub fn new_in(registry: &'static HeapRegistry, value: T, descriptor: Descriptor) -> Self {
        Self::from_arc_in(registry, Arc::new(value), descriptor)
    }

    /// Register `value` in `registry`; `finalize` runs when the count
    /// returns to zero.
    pub fn with_finalizer<F>(
        registry: &'static HeapRegistry,
        value: T,
        descriptor: Descriptor,
        finalize: F,
    ) -> Self
    where
        F: FnOnce(&T) + Send + 'static,
    {
        let payload = Arc::new(value);
        let keeper = Arc::clone(&payload);
        let ptr = HeapPtr::of_arc(&payload);
        let _ = registry.register(
            ptr,
            Box::new(move |_| {
                finalize(&keeper);
                drop(keeper);
            }),
            descriptor,
        );
        Self { payload, registry }
    }
}

impl<T: ?Sized + Send + Sync + 'static> HeapRef<T> {
    /// Register an existing `Arc` payload in `registry`.
    pub fn from_arc_in(
        registry: &'static HeapRegistry,
        payload: Arc<T>,
        descriptor: Descriptor,
    ) -> Self {
        let keeper = Arc::clone(&payload);
        let ptr = HeapPtr::of_arc(&payload);
        let _ = registry.register(ptr, Box::new(move |_| drop(keeper)), descriptor);
        Self { payload, registry }
    }

    /// Register an `Arc` payload as a singleton: never counted, never freed.
    pub fn singleton_in(
        registry: &'static HeapRegistry,
        payload: Arc<T>,
        descriptor: Descriptor,
    ) -> Self {
        // The address must stay unique for as long as the entry exists.
        std::mem::forget(Arc::clone(&payload));
        let _ = registry.register_singleton(HeapPtr::of_arc(&payload), descriptor);
        Self { payload, registry }
    }

    /// Registry key of the payload.
    pub fn ptr(&self) -> HeapPtr {
        HeapPtr::of_arc(&self.payload)
    }

    /// Whether the registry still tracks the payload.
    pub fn is_tracked(&self) -> bool {
        self.registry.is_tracked(self.ptr())
    }

    /// Current count, or `None` once freed or for a singleton.
    pub fn ref_count(&self) -> Option<u32> {
        self.registry.ref_count(self.ptr())
    }

    /// The shared payload.
    pub fn as_arc(&self) -> &Arc<T> {
        &self.payload
    }
}

impl HeapRef<str> {
    /// Register a copy of `text` in the global registry.
    #[track_caller]
    pub fn from_text(text: &str, name: &'static str) -> Self {
        Self::from_arc_in(global(), Arc::from(text), Descriptor::caller(name))
    }
}

impl<T: ?Sized + Send + Sync + 'static> HeapTracked for HeapRef<T> {
    fn heap_ptr(&self) -> HeapPtr {
        self.ptr()
    }

    fn registry(&self) -> &'static HeapRegistry {
        self.registry
    }
}

impl<T: ?Sized + Send + Sync + 'static> Clone for HeapRef<T> {
    fn clone(&self) -> Self {
        Self {
            payload: Arc::clone(&self.payload),
            registry: self.registry,
        }
    }
}

impl<T: ?Sized + Send + Sync + 'static> Deref for HeapRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.payload
    }
}

impl<T: ?Sized + Send + Sync + 'static> PartialEq for HeapRef<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }
}

impl<T: ?Sized + Send + Sync + 'static> Eq for HeapRef<T> {}

impl<T: ?Sized + Send + Sync + fmt::Debug + 'static> fmt::Debug for HeapRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapRef")
            .field("ptr", &self.ptr())
            .field("value", &&*self.payload)
            .finish()
    }
}

/// One unit of registry ownership over a handle.
///
/// Retains on construction and on clone, releases on drop.
pub struct Retained<H: HeapTracked> {
    handle: H,
}

impl<H: HeapTracked> Retained<H> {
    /// Retain `handle` and hold that unit until drop.
    pub fn new(handle: H) -> Self {
        let _ = handle.retain();
        Self { handle }
    }

    /// Take over a unit of ownership the caller already holds.
    pub fn adopt(handle: H) -> Self {
        Self { handle }
    }

    /// The wrapped handle.
    pub fn handle(&self) -> &H {
        &self.handle
    }
}

impl<H: HeapTracked + Clone> Clone for Retained<H> {
    fn clone(&self) -> Self {
        Self::new(self.handle.clone())
    }
}

impl<H: HeapTracked> Drop for Retained<H> {
    fn drop(&mut self) {
        let _ = self.handle.release();
    }
}

impl<H: HeapTracked> Deref for Retained<H> {
    type Target = H;

    fn deref(&self) -> &H {
        &self.handle
    }
}

impl<H: HeapTracked + fmt::Debug> fmt::Debug for Retained<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Retained").field(&self.handle).finish()
    }
}
