//! Element ownership policies.
//!
//! Each element type picks exactly one policy, statically, through
//! [`Element::Policy`](crate::Element::Policy). The list calls the policy
//! once per slot when a value enters and once when it leaves.

use holdfast_heap::HeapTracked;

use crate::element::Element;

/// How a policy counts ownership, for introspection and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnershipKind {
    /// Plain values; nothing is counted.
    NotCounted,
    /// Counted through the heap registry.
    ThroughRegistry,
    /// Counted through the element's own retain/release pair.
    ThroughElement,
}

/// Retain/release strategy for element type `T`.
pub trait Ownership<T: ?Sized> {
    /// Which strategy this is.
    const KIND: OwnershipKind;

    /// Add one unit of ownership to `value`.
    #[track_caller]
    fn retain(value: &T);

    /// Remove one unit of ownership from `value`.
    #[track_caller]
    fn release(value: &T);
}

/// Policy for plain values.
#[derive(Debug)]
pub enum NotCounted {}

impl<T: ?Sized> Ownership<T> for NotCounted {
    const KIND: OwnershipKind = OwnershipKind::NotCounted;

    fn retain(_: &T) {}

    fn release(_: &T) {}
}

/// Policy for values whose lifetime the heap registry counts.
#[derive(Debug)]
pub enum ThroughRegistry {}

impl<T: HeapTracked + ?Sized> Ownership<T> for ThroughRegistry {
    const KIND: OwnershipKind = OwnershipKind::ThroughRegistry;

    fn retain(value: &T) {
        let _ = value.retain();
    }

    fn release(value: &T) {
        let _ = value.release();
    }
}

/// A composite value that knows how to retain and release its parts.
pub trait RetainRelease {
    /// Retain every counted part.
    fn retain_parts(&self);

    /// Release every counted part.
    fn release_parts(&self);
}

/// Policy for composite values that count through [`RetainRelease`].
#[derive(Debug)]
pub enum ThroughElement {}

impl<T: RetainRelease + ?Sized> Ownership<T> for ThroughElement {
    const KIND: OwnershipKind = OwnershipKind::ThroughElement;

    fn retain(value: &T) {
        value.retain_parts();
    }

    fn release(value: &T) {
        value.release_parts();
    }
}

#[track_caller]
pub(crate) fn retain<T: Element>(value: &T) {
    <T::Policy as Ownership<T>>::retain(value)
}

#[track_caller]
pub(crate) fn release<T: Element>(value: &T) {
    <T::Policy as Ownership<T>>::release(value)
}

#[track_caller]
pub(crate) fn release_all<T: Element>(values: impl IntoIterator<Item = T>) {
    for value in values {
        release(&value);
    }
}

/// The ownership strategy of element type `T`.
pub fn ownership_kind<T: Element>() -> OwnershipKind {
    <T::Policy as Ownership<T>>::KIND
}
