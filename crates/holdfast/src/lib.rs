//! Holdfast: a reference-counting heap registry with leak detection, and a
//! generic reference-counted list built on it.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Holdfast sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use holdfast::prelude::*;
//!
//! // An isolated registry; runtime code usually goes through `global()`.
//! let registry: &'static HeapRegistry = Box::leak(Box::new(HeapRegistry::default()));
//!
//! let names: List<Text> = List::new_in(registry);
//! names.append(Text::new_in(registry, "b"));
//! names.append(Text::new_in(registry, "a"));
//! names.sort();
//! assert_eq!(names.get(1), "a");
//! assert_eq!(names.to_external_form(), r#"["a","b"]"#);
//!
//! // Releasing the list to zero frees it and every text it held.
//! let _ = names.retain();
//! let _ = names.release();
//! assert!(registry.is_empty());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`heap`] | `holdfast-heap` | Registry, descriptors, reporters, typed handles |
//! | [`list`] | `holdfast-list` | Reference-counted list, element policies, JSON form |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Heap registry and tracked handles (`holdfast-heap`).
///
/// Use [`heap::global`] for the process-wide registry, or create an
/// isolated [`heap::HeapRegistry`].
pub use holdfast_heap as heap;

/// Reference-counted list (`holdfast-list`).
///
/// [`list::List`] holds any [`list::Element`]; sorting needs
/// [`list::Comparable`].
pub use holdfast_list as list;

/// Common imports for typical Holdfast usage.
///
/// ```rust
/// use holdfast::prelude::*;
/// ```
pub mod prelude {
    // Registry
    pub use holdfast_heap::{
        global, init, Descriptor, ErrorReporter, HeapConfig, HeapError, HeapPtr, HeapRegistry,
        RefCount, ShutdownGuard,
    };

    // Handles
    pub use holdfast_heap::{HeapRef, HeapTracked, Retained};

    // List
    pub use holdfast_list::{Comparable, Element, List, ListError, SummaryConfig, Text};
}
