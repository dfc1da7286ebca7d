//! Element types a [`List`] can hold.
//!
//! An element type carries three things: its ownership policy, a JSON
//! encoding (whose decoding of an absent value is the type's default), and
//! a one-line human summary.

use std::fmt;
use std::sync::Arc;

use holdfast_heap::{Descriptor, HeapPtr, HeapRef, HeapRegistry, HeapTracked};
use serde_json::Value;

use crate::list::List;
use crate::policy::{release, retain, NotCounted, Ownership, RetainRelease, ThroughElement, ThroughRegistry};

/// A value that can be stored in a [`List`].
pub trait Element: Clone + Send + Sync + 'static {
    /// How the list retains and releases values of this type.
    type Policy: Ownership<Self>;

    /// Decode a value. `None` (or any value of the wrong shape) yields the
    /// type's default.
    ///
    /// Counted values are registered in `registry`.
    fn from_json(value: Option<&Value>, registry: &'static HeapRegistry) -> Self;

    /// Encode the value.
    fn to_json(&self) -> Value;

    /// Short human-readable rendering, used by list summaries.
    fn summary(&self) -> String;
}

/// The default value of `T`: the decoding of an absent value.
pub fn default_value<T: Element>(registry: &'static HeapRegistry) -> T {
    T::from_json(None, registry)
}

impl Element for i64 {
    type Policy = NotCounted;

    fn from_json(value: Option<&Value>, _: &'static HeapRegistry) -> Self {
        value.and_then(Value::as_i64).unwrap_or(0)
    }

    fn to_json(&self) -> Value {
        Value::from(*self)
    }

    fn summary(&self) -> String {
        self.to_string()
    }
}

impl Element for f64 {
    type Policy = NotCounted;

    fn from_json(value: Option<&Value>, _: &'static HeapRegistry) -> Self {
        value.and_then(Value::as_f64).unwrap_or(0.0)
    }

    fn to_json(&self) -> Value {
        Value::from(*self)
    }

    fn summary(&self) -> String {
        self.to_string()
    }
}

impl Element for bool {
    type Policy = NotCounted;

    fn from_json(value: Option<&Value>, _: &'static HeapRegistry) -> Self {
        value.and_then(Value::as_bool).unwrap_or(false)
    }

    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }

    fn summary(&self) -> String {
        String::from(if *self { "True" } else { "False" })
    }
}

impl Element for String {
    type Policy = NotCounted;

    fn from_json(value: Option<&Value>, _: &'static HeapRegistry) -> Self {
        value
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_default()
    }

    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }

    fn summary(&self) -> String {
        self.clone()
    }
}

/// Registry-counted text. The default is the null text.
///
/// Equality compares contents, not identity.
#[derive(Clone, Default)]
pub struct Text(Option<HeapRef<str>>);

impl Text {
    /// Register a copy of `text` in the global registry.
    #[track_caller]
    pub fn new(text: &str) -> Self {
        Self(Some(HeapRef::from_text(text, "text")))
    }

    /// Register a copy of `text` in `registry`.
    #[track_caller]
    pub fn new_in(registry: &'static HeapRegistry, text: &str) -> Self {
        Self(Some(HeapRef::from_arc_in(
            registry,
            Arc::from(text),
            Descriptor::caller("text"),
        )))
    }

    /// The null text.
    pub const fn null() -> Self {
        Self(None)
    }

    /// The contents, or `None` for the null text.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Whether this is the null text.
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }
}

impl From<&str> for Text {
    #[track_caller]
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Text {}

impl PartialEq<&str> for Text {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(text) => write!(f, "Text({text:?})"),
            None => f.write_str("Text(null)"),
        }
    }
}

impl HeapTracked for Text {
    fn heap_ptr(&self) -> HeapPtr {
        self.0.heap_ptr()
    }

    fn registry(&self) -> &'static HeapRegistry {
        self.0.registry()
    }
}

impl Element for Text {
    type Policy = ThroughRegistry;

    fn from_json(value: Option<&Value>, registry: &'static HeapRegistry) -> Self {
        match value.and_then(Value::as_str) {
            Some(text) => Self::new_in(registry, text),
            None => Self::null(),
        }
    }

    fn to_json(&self) -> Value {
        self.as_str().map_or(Value::Null, Value::from)
    }

    fn summary(&self) -> String {
        self.as_str().unwrap_or_default().to_owned()
    }
}

/// Lists of lists. The absent list is the default.
impl<T: Element> Element for Option<List<T>> {
    type Policy = ThroughRegistry;

    fn from_json(value: Option<&Value>, registry: &'static HeapRegistry) -> Self {
        match value {
            None | Some(Value::Null) => None,
            Some(value) => Some(List::from_json_in(registry, value)),
        }
    }

    fn to_json(&self) -> Value {
        self.as_ref().map_or(Value::Null, List::to_json)
    }

    fn summary(&self) -> String {
        self.as_ref().map_or_else(|| "Empty list".to_owned(), List::summary)
    }
}

impl<A: Element, B: Element> RetainRelease for (A, B) {
    fn retain_parts(&self) {
        retain(&self.0);
        retain(&self.1);
    }

    fn release_parts(&self) {
        release(&self.0);
        release(&self.1);
    }
}

/// Pairs, encoded as two-element arrays.
impl<A: Element, B: Element> Element for (A, B) {
    type Policy = ThroughElement;

    fn from_json(value: Option<&Value>, registry: &'static HeapRegistry) -> Self {
        let parts = value.and_then(Value::as_array);
        (
            A::from_json(parts.and_then(|p| p.first()), registry),
            B::from_json(parts.and_then(|p| p.get(1)), registry),
        )
    }

    fn to_json(&self) -> Value {
        Value::Array(vec![self.0.to_json(), self.1.to_json()])
    }

    fn summary(&self) -> String {
        format!("({}, {})", self.0.summary(), self.1.summary())
    }
}
