//! Pointer identity and count results.
//!
//! [`HeapPtr`] is the registry key: an address, never dereferenced by the
//! registry. [`RefCount`] is the outcome of every counting operation.

use std::fmt;
use std::sync::Arc;

/// Address of a tracked allocation.
///
/// The registry only compares and prints addresses; it never reads
/// through them. `HeapPtr::NULL` stands for "no object" and every
/// counting operation treats it as a silent no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeapPtr(usize);

impl HeapPtr {
    /// The null pointer.
    pub const NULL: HeapPtr = HeapPtr(0);

    /// Wrap a raw address.
    pub const fn from_addr(addr: usize) -> Self {
        Self(addr)
    }

    /// Identity of a raw pointer (metadata of fat pointers is discarded).
    pub fn from_ptr<T: ?Sized>(ptr: *const T) -> Self {
        Self(ptr.cast::<()>() as usize)
    }

    /// Identity of the payload behind an `Arc`.
    pub fn of_arc<T: ?Sized>(arc: &Arc<T>) -> Self {
        Self::from_ptr(Arc::as_ptr(arc))
    }

    /// The raw address.
    pub const fn addr(self) -> usize {
        self.0
    }

    /// Whether this is [`HeapPtr::NULL`].
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for HeapPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Result of a register, retain, or release call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum RefCount {
    /// The pointer is counted; this is its updated count.
    Counted(u32),
    /// The pointer is a singleton; counting has no effect on it.
    Singleton,
    /// The call did not apply: null, unregistered, unmatched release, or
    /// resurrection. Everything except null has been reported.
    Untracked,
}

impl RefCount {
    /// Raw value of [`RefCount::Untracked`] at the C boundary.
    pub const UNTRACKED_RAW: i32 = -1;

    /// Raw value of [`RefCount::Singleton`] at the C boundary.
    ///
    /// A singleton behaves as if permanently retained, so it reports the
    /// largest possible count.
    pub const SINGLETON_RAW: i32 = i32::MAX;

    /// The count, if the pointer is counted.
    pub fn get(self) -> Option<u32> {
        match self {
            Self::Counted(n) => Some(n),
            Self::Singleton | Self::Untracked => None,
        }
    }

    /// Whether the call applied to a counted pointer.
    pub fn is_counted(self) -> bool {
        matches!(self, Self::Counted(_))
    }

    /// Integer form used by the C-callable surface.
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Counted(n) => i32::try_from(n).unwrap_or(i32::MAX - 1),
            Self::Singleton => Self::SINGLETON_RAW,
            Self::Untracked => Self::UNTRACKED_RAW,
        }
    }
}

impl fmt::Display for RefCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Counted(n) => write!(f, "{n}"),
            Self::Singleton => f.write_str("singleton"),
            Self::Untracked => f.write_str("untracked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_zero() {
        assert!(HeapPtr::NULL.is_null());
        assert!(!HeapPtr::from_addr(8).is_null());
    }

    #[test]
    fn arc_identity_is_stable_across_clones() {
        let a = Arc::new(5u64);
        let b = Arc::clone(&a);
        assert_eq!(HeapPtr::of_arc(&a), HeapPtr::of_arc(&b));
        let c = Arc::new(5u64);
        assert_ne!(HeapPtr::of_arc(&a), HeapPtr::of_arc(&c));
    }

    #[test]
    fn fat_pointer_identity() {
        let s: Arc<str> = Arc::from("abc");
        assert_eq!(HeapPtr::of_arc(&s).addr(), Arc::as_ptr(&s).cast::<u8>() as usize);
    }

    #[test]
    fn raw_values() {
        assert_eq!(RefCount::Counted(3).as_raw(), 3);
        assert_eq!(RefCount::Untracked.as_raw(), -1);
        assert_eq!(RefCount::Singleton.as_raw(), i32::MAX);
        assert_eq!(RefCount::Counted(2).get(), Some(2));
        assert_eq!(RefCount::Singleton.get(), None);
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(HeapPtr::from_addr(255).to_string(), "0xff");
    }
}
