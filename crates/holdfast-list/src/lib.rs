//! Generic reference-counted list for Holdfast.
//!
//! [`List<T>`] is an ordered sequence registered in a
//! [`HeapRegistry`](holdfast_heap::HeapRegistry). Every stored element
//! carries one unit of list-contributed ownership, acquired through the
//! element type's statically chosen [`Ownership`] policy:
//!
//! | Element type            | Policy              |
//! |-------------------------|---------------------|
//! | `i64`, `f64`, `bool`, `String` | [`NotCounted`] |
//! | [`Text`]                | [`ThroughRegistry`] |
//! | `Option<List<T>>`       | [`ThroughRegistry`] |
//! | `(A, B)`                | [`ThroughElement`]  |
//!
//! Indices are 1-based and clamped, so no index operation fails. Sorting
//! and de-duplication exist only for [`Comparable`] element types.
//!
//! # Locking
//!
//! Each list's buffer sits behind its own mutex. Element releases always
//! run after that mutex is dropped, so releasing a nested list (whose
//! finalizer locks its own buffer and releases its own elements) never
//! re-enters a held lock.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod config;
pub mod element;
pub mod error;
mod index;
pub mod list;
pub mod order;
pub mod policy;
pub mod shuffle;

pub use config::SummaryConfig;
pub use element::{default_value, Element, Text};
pub use error::ListError;
pub use list::{count, List};
pub use order::Comparable;
pub use policy::{
    ownership_kind, NotCounted, Ownership, OwnershipKind, RetainRelease, ThroughElement,
    ThroughRegistry,
};
pub use shuffle::swap_sources;
