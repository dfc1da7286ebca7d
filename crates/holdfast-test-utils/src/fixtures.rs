//! Reusable list fixtures.
//!
//! - [`Marker`]: an element counted through its own retain/release pair,
//!   recording every call in a shared [`Tally`].
//! - [`text_list`]: a list of registry-tracked text built from string slices.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use holdfast_heap::HeapRegistry;
use holdfast_list::{Comparable, Element, List, RetainRelease, Text, ThroughElement};
use serde_json::Value;

/// Shared retain/release counters for a family of markers.
#[derive(Clone, Debug, Default)]
pub struct Tally {
    retains: Arc<AtomicUsize>,
    releases: Arc<AtomicUsize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retains(&self) -> usize {
        self.retains.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Retains not yet matched by a release.
    pub fn outstanding(&self) -> isize {
        self.retains() as isize - self.releases() as isize
    }

    /// A marker reporting to this tally.
    pub fn marker(&self, id: i64) -> Marker {
        Marker {
            id,
            tally: self.clone(),
        }
    }
}

/// A list element that records ownership traffic.
#[derive(Clone, Debug)]
pub struct Marker {
    pub id: i64,
    tally: Tally,
}

impl RetainRelease for Marker {
    fn retain_parts(&self) {
        self.tally.retains.fetch_add(1, Ordering::SeqCst);
    }

    fn release_parts(&self) {
        self.tally.releases.fetch_add(1, Ordering::SeqCst);
    }
}

impl Element for Marker {
    type Policy = ThroughElement;

    fn from_json(value: Option<&Value>, _: &'static HeapRegistry) -> Self {
        Tally::new().marker(value.and_then(Value::as_i64).unwrap_or(0))
    }

    fn to_json(&self) -> Value {
        Value::from(self.id)
    }

    fn summary(&self) -> String {
        format!("marker {}", self.id)
    }
}

/// Markers compare by id.
impl Comparable for Marker {
    fn are_equal(&self, other: &Self) -> bool {
        self.id == other.id
    }

    fn is_less_than(&self, other: &Self) -> bool {
        self.id < other.id
    }
}

/// A list of registry-tracked text, one element per slice.
#[track_caller]
pub fn text_list(registry: &'static HeapRegistry, values: &[&str]) -> List<Text> {
    let list = List::new_in(registry);
    for value in values {
        list.append(Text::new_in(registry, value));
    }
    list
}

/// The contents of a text list, with null text rendered as `"<null>"`.
pub fn strings(list: &List<Text>) -> Vec<String> {
    list.to_vec()
        .iter()
        .map(|t| t.as_str().unwrap_or("<null>").to_owned())
        .collect()
}
