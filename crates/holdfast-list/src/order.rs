//! Ordering and equality for comparable element types.
//!
//! Only element types implementing [`Comparable`] can be sorted or
//! de-duplicated; anything else is rejected at compile time.

use std::cmp::Ordering;

use holdfast_heap::{Descriptor, HeapTracked};

use crate::element::{Element, Text};
use crate::list::{Items, List};
use crate::policy::retain;

/// An element type with equality and a strict total order.
pub trait Comparable: Element {
    /// Whether `self` and `other` are equal.
    fn are_equal(&self, other: &Self) -> bool;

    /// Whether `self` orders strictly before `other`.
    fn is_less_than(&self, other: &Self) -> bool;
}

fn ordering<T: Comparable>(a: &T, b: &T) -> Ordering {
    if a.is_less_than(b) {
        Ordering::Less
    } else if b.is_less_than(a) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

macro_rules! comparable_by_ord {
    ($($ty:ty),*) => {
        $(
            impl Comparable for $ty {
                fn are_equal(&self, other: &Self) -> bool {
                    self == other
                }

                fn is_less_than(&self, other: &Self) -> bool {
                    self < other
                }
            }
        )*
    };
}

comparable_by_ord!(i64, bool, String);

impl Comparable for f64 {
    fn are_equal(&self, other: &Self) -> bool {
        self == other
    }

    /// Total order, so NaN sorts consistently.
    fn is_less_than(&self, other: &Self) -> bool {
        self.total_cmp(other).is_lt()
    }
}

/// Null text orders before any text.
impl Comparable for Text {
    fn are_equal(&self, other: &Self) -> bool {
        self == other
    }

    fn is_less_than(&self, other: &Self) -> bool {
        self.as_str() < other.as_str()
    }
}

/// Absent lists order before any list.
impl<T: Comparable> Comparable for Option<List<T>> {
    fn are_equal(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.equals(b),
            (None, None) => true,
            _ => false,
        }
    }

    fn is_less_than(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.is_less_than(b),
            (None, Some(_)) => true,
            _ => false,
        }
    }
}

/// Lexicographic.
impl<A: Comparable, B: Comparable> Comparable for (A, B) {
    fn are_equal(&self, other: &Self) -> bool {
        self.0.are_equal(&other.0) && self.1.are_equal(&other.1)
    }

    fn is_less_than(&self, other: &Self) -> bool {
        match ordering(&self.0, &other.0) {
            Ordering::Equal => self.1.is_less_than(&other.1),
            o => o.is_lt(),
        }
    }
}

impl<T: Comparable> List<T> {
    /// Sort in place by [`Comparable::is_less_than`].
    ///
    /// Not stable: equal elements may change relative order.
    pub fn sort(&self) {
        let mut items = self.lock();
        if items.len() < 2 {
            return;
        }
        items.sort_unstable_by(ordering);
    }

    /// A new list with the first occurrence of each distinct element, in
    /// order, or `None` when the list is empty.
    ///
    /// Each candidate is compared against every element already kept, so
    /// this is quadratic in the list length.
    #[track_caller]
    pub fn remove_duplicates(&self) -> Option<Self> {
        let mut kept: Items<T> = Items::new();
        for item in self.snapshot() {
            if !kept.iter().any(|k| k.are_equal(&item)) {
                kept.push(item);
            }
        }
        if kept.is_empty() {
            return None;
        }
        for value in &kept {
            retain(value);
        }
        Some(Self::from_retained(
            self.registry(),
            Descriptor::caller("list without duplicates"),
            kept,
        ))
    }

    /// Same length and pairwise equal elements.
    pub fn equals(&self, other: &Self) -> bool {
        if self.same_list(other) {
            return true;
        }
        let (a, b) = (self.snapshot(), other.snapshot());
        a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.are_equal(y))
    }

    /// Shorter lists order first; equal lengths compare element by element.
    pub fn is_less_than(&self, other: &Self) -> bool {
        if self.same_list(other) {
            return false;
        }
        let (a, b) = (self.snapshot(), other.snapshot());
        match a.len().cmp(&b.len()) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| ordering(x, y))
                .find(|o| o.is_ne())
                .is_some_and(Ordering::is_lt),
        }
    }
}
