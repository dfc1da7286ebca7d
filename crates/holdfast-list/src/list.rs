//! The reference-counted list.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use holdfast_heap::{global, Descriptor, HeapPtr, HeapRef, HeapRegistry, HeapTracked};
use smallvec::SmallVec;

use crate::element::{default_value, Element};
use crate::index;
use crate::policy::{release, release_all, retain};

/// Number of elements stored inline before the buffer spills to the heap.
pub(crate) const INLINE_CAPACITY: usize = 8;

pub(crate) type Items<T> = SmallVec<[T; INLINE_CAPACITY]>;

pub(crate) struct ListBuffer<T> {
    items: Mutex<Items<T>>,
}

impl<T> ListBuffer<T> {
    fn lock(&self) -> MutexGuard<'_, Items<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An ordered, reference-counted sequence of `T`.
///
/// The list is itself registered in a [`HeapRegistry`]. When its count
/// returns to zero every element is released and the buffer is freed.
/// Each stored element holds one unit of list-contributed ownership,
/// acquired through `T`'s [ownership policy](crate::Ownership).
///
/// Indices are 1-based and clamped: anything at or below 1 means the first
/// element, anything past the end means the last. No index operation fails.
///
/// Cloning a `List` copies the handle; use [`List::copy`] for a new list.
pub struct List<T: Element> {
    inner: HeapRef<ListBuffer<T>>,
}

impl<T: Element> List<T> {
    /// An empty list in the global registry.
    #[track_caller]
    pub fn new() -> Self {
        Self::new_in(global())
    }

    /// An empty list in `registry`.
    #[track_caller]
    pub fn new_in(registry: &'static HeapRegistry) -> Self {
        Self::from_retained(registry, Descriptor::caller("list"), Items::new())
    }

    /// `count` slots of `fill`, each retained.
    #[track_caller]
    pub fn with_count(count: usize, fill: T) -> Self {
        Self::with_count_in(global(), count, fill)
    }

    /// `count` slots of `fill` in `registry`, each retained.
    #[track_caller]
    pub fn with_count_in(registry: &'static HeapRegistry, count: usize, fill: T) -> Self {
        for _ in 0..count {
            retain(&fill);
        }
        Self::from_retained(
            registry,
            Descriptor::caller("list"),
            SmallVec::from_elem(fill, count),
        )
    }

    /// A list holding each of `values`, each retained.
    #[track_caller]
    pub fn from_values(values: &[T]) -> Self {
        Self::from_values_in(global(), values)
    }

    /// A list in `registry` holding each of `values`, each retained.
    #[track_caller]
    pub fn from_values_in(registry: &'static HeapRegistry, values: &[T]) -> Self {
        for value in values {
            retain(value);
        }
        Self::from_retained(
            registry,
            Descriptor::caller("list"),
            values.iter().cloned().collect(),
        )
    }

    /// A new list with the same elements, each retained again.
    #[track_caller]
    pub fn copy(&self) -> Self {
        let items = self.snapshot();
        for value in &items {
            retain(value);
        }
        Self::from_retained(self.registry(), Descriptor::caller("list copy"), items)
    }

    /// Register a buffer whose elements already carry their list unit.
    pub(crate) fn from_retained(
        registry: &'static HeapRegistry,
        descriptor: Descriptor,
        items: Items<T>,
    ) -> Self {
        let buffer = ListBuffer {
            items: Mutex::new(items),
        };
        let inner = HeapRef::with_finalizer(registry, buffer, descriptor, |buffer: &ListBuffer<T>| {
            let items = std::mem::take(&mut *buffer.lock());
            release_all(items);
        });
        Self { inner }
    }

    /// The element at `index`, or the default value when empty.
    ///
    /// The returned value is not retained on the caller's behalf.
    pub fn get(&self, index: i64) -> T {
        {
            let items = self.lock();
            if !items.is_empty() {
                return items[index::clamp(index, items.len())].clone();
            }
        }
        self.default_value()
    }

    /// Current number of elements.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Whether the list has no elements.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the elements in order. Nothing is retained.
    pub fn to_vec(&self) -> Vec<T> {
        self.lock().to_vec()
    }

    /// Overwrite the element at `index` with `value`.
    ///
    /// Without `expand`, the index is clamped and an empty list is left
    /// alone. With `expand`, an index past the end grows the list so that
    /// `value` lands at `index`; slots in between hold retained default
    /// values.
    pub fn set(&self, value: T, index: i64, expand: bool) {
        let replaced = {
            let mut items = self.lock();
            let len = items.len();
            if !expand && len == 0 {
                return;
            }
            let position = index::position(index);
            retain(&value);
            if expand && position >= len {
                while items.len() < position {
                    let filler = self.default_value();
                    retain(&filler);
                    items.push(filler);
                }
                items.push(value);
                None
            } else {
                let slot = index::clamp(index, len);
                Some(std::mem::replace(&mut items[slot], value))
            }
        };
        if let Some(old) = replaced {
            release(&old);
        }
    }

    /// Insert `value` before the element at `index`.
    ///
    /// An index at or below 1 prepends; an index past the end appends.
    pub fn insert(&self, value: T, index: i64) {
        retain(&value);
        let mut items = self.lock();
        let at = index::insertion_point(index, items.len());
        items.insert(at, value);
    }

    /// Insert `value` at the front.
    pub fn prepend(&self, value: T) {
        retain(&value);
        self.lock().insert(0, value);
    }

    /// Insert `value` at the back.
    pub fn append(&self, value: T) {
        retain(&value);
        self.lock().push(value);
    }

    /// Swap the elements at two clamped indices. Ownership is unchanged.
    pub fn exchange(&self, a: i64, b: i64) {
        let mut items = self.lock();
        let len = items.len();
        if len == 0 {
            return;
        }
        items.swap(index::clamp(a, len), index::clamp(b, len));
    }

    /// Reverse the order in place. Ownership is unchanged.
    pub fn reverse(&self) {
        self.lock().reverse();
    }

    /// A new list holding the clamped range `[start, start + count - 1]`.
    ///
    /// Returns `None` when the list is empty or the range misses it.
    #[track_caller]
    pub fn subset(&self, start: i64, count: usize) -> Option<Self> {
        let items: Items<T> = {
            let items = self.lock();
            let range = index::range(start, count, items.len())?;
            items[range].iter().cloned().collect()
        };
        for value in &items {
            retain(value);
        }
        Some(Self::from_retained(
            self.registry(),
            Descriptor::caller("list subset"),
            items,
        ))
    }

    /// Keep only the clamped range `[start, start + count - 1]`, in place.
    ///
    /// An empty list is left alone. A range that misses the list empties it.
    pub fn cut(&self, start: i64, count: usize) {
        let removed = {
            let mut items = self.lock();
            if items.is_empty() {
                return;
            }
            match index::range(start, count, items.len()) {
                Some(range) => {
                    let kept: Items<T> = items.drain(range).collect();
                    std::mem::replace(&mut *items, kept)
                }
                None => std::mem::take(&mut *items),
            }
        };
        release_all(removed);
    }

    /// Release and remove the first element, if any.
    pub fn remove_first(&self) {
        let removed = {
            let mut items = self.lock();
            (!items.is_empty()).then(|| items.remove(0))
        };
        if let Some(value) = removed {
            release(&value);
        }
    }

    /// Release and remove the last element, if any.
    pub fn remove_last(&self) {
        let removed = self.lock().pop();
        if let Some(value) = removed {
            release(&value);
        }
    }

    /// Release and remove the element at `index`.
    ///
    /// Out-of-range indices (including 0) are ignored rather than clamped.
    pub fn remove_at(&self, index: i64) {
        let removed = {
            let mut items = self.lock();
            let len = items.len();
            usize::try_from(index)
                .ok()
                .filter(|&i| (1..=len).contains(&i))
                .map(|i| items.remove(i - 1))
        };
        if let Some(value) = removed {
            release(&value);
        }
    }

    /// Release and remove every element.
    pub fn remove_all(&self) {
        let removed = std::mem::take(&mut *self.lock());
        release_all(removed);
    }

    /// Visit the elements in order until `visit` returns `false`.
    ///
    /// Visits a snapshot taken on entry, so `visit` may modify this list.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        for item in &self.snapshot() {
            if !visit(item) {
                break;
            }
        }
    }

    /// Registry key of the list.
    pub fn ptr(&self) -> HeapPtr {
        self.inner.ptr()
    }

    /// Whether `self` and `other` are handles to the same list.
    pub fn same_list(&self, other: &Self) -> bool {
        self.inner == other.inner
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Items<T>> {
        self.inner.lock()
    }

    pub(crate) fn snapshot(&self) -> Items<T> {
        self.lock().clone()
    }

    fn default_value(&self) -> T {
        default_value(self.registry())
    }
}

/// Length of `list`, or 0 when there is no list.
pub fn count<T: Element>(list: Option<&List<T>>) -> usize {
    list.map_or(0, List::count)
}

impl<T: Element> HeapTracked for List<T> {
    fn heap_ptr(&self) -> HeapPtr {
        self.inner.ptr()
    }

    fn registry(&self) -> &'static HeapRegistry {
        self.inner.registry()
    }
}

impl<T: Element> Clone for List<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Element> Default for List<T> {
    #[track_caller]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element + fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("ptr", &self.ptr())
            .field("items", &self.snapshot().as_slice())
            .finish()
    }
}
