//! Reference-counting heap registry for Holdfast.
//!
//! Turns ordinary allocations into reference-counted objects with a fixed
//! deallocator, a debuggable origin descriptor, and end-of-life leak
//! auditing. All bookkeeping lives behind one mutex; deallocators and
//! error reports always run after the lock has been released, so a
//! deallocator may freely retain or release other tracked objects.
//!
//! # Architecture
//!
//! ```text
//! HeapRegistry
//! ├── Mutex<Table>
//! │   ├── IndexMap<HeapPtr, Entry>   (count, deallocator, descriptor, singleton)
//! │   ├── in-flight deallocations    (resurrection guard)
//! │   └── HeapStats counters
//! ├── RwLock<Option<Arc<dyn ErrorReporter>>>
//! └── HeapConfig
//!
//! global()  ── lazily initialised process-wide HeapRegistry
//! HeapRef<T> ── typed handle to a payload registered in a registry
//! Retained<H> ── RAII unit of ownership over any HeapTracked handle
//! ShutdownGuard ── runs the leak report on drop
//! ```
//!
//! # Counting protocol
//!
//! - `register` creates an entry at count 0 ("allocated, not yet owned").
//! - `retain` adds one; `release` removes one and deallocates on 1 → 0.
//! - Releasing at count 0 is misuse: it is reported and never frees.
//! - Anything still tracked at `shutdown` is reported as a leak.
//!
//! Misuse never panics. Every operation returns a [`RefCount`] and sends a
//! [`HeapError`] to the installed [`ErrorReporter`] (or the `log` facade
//! when none is installed).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod descriptor;
pub mod error;
pub mod global;
pub mod guard;
pub mod ptr;
pub mod registry;
pub mod reporter;
pub mod tracked;

// Public re-exports for the primary API surface.
pub use config::HeapConfig;
pub use descriptor::{CallSite, Descriptor};
pub use error::{HeapError, Leak, LeakReport, Operation};
pub use global::{
    clear_reporter, describe, global, init, register, register_singleton, release, release_at,
    retain, retain_at, set_reporter, shutdown,
};
pub use guard::ShutdownGuard;
pub use ptr::{HeapPtr, RefCount};
pub use registry::{Deallocator, HeapRegistry, HeapStats};
pub use reporter::{ChannelReporter, ErrorReporter, LogReporter};
pub use tracked::{HeapRef, HeapTracked, Retained};
