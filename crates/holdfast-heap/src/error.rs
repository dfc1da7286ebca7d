//! Registry misuse and leak diagnostics.
//!
//! Registry operations never fail with these values. They are the
//! out-of-band messages delivered to the [`ErrorReporter`](crate::ErrorReporter)
//! while the operation itself returns a [`RefCount`](crate::RefCount).

use std::error::Error;
use std::fmt;

use crate::descriptor::{CallSite, Descriptor};
use crate::ptr::HeapPtr;

/// The registry operation that observed a problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// [`HeapRegistry::register`](crate::HeapRegistry::register).
    Register,
    /// [`HeapRegistry::register_singleton`](crate::HeapRegistry::register_singleton).
    RegisterSingleton,
    /// [`HeapRegistry::retain`](crate::HeapRegistry::retain).
    Retain,
    /// [`HeapRegistry::release`](crate::HeapRegistry::release).
    Release,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Register => "register",
            Self::RegisterSingleton => "register_singleton",
            Self::Retain => "retain",
            Self::Release => "release",
        })
    }
}

/// A misuse or leak observed by the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeapError {
    /// A pointer was registered while already tracked. The original
    /// tracking state is kept.
    DoubleRegistration {
        /// Which registration call was repeated.
        operation: Operation,
        /// The pointer.
        ptr: HeapPtr,
        /// Descriptor of the registration that is in effect.
        previous: Descriptor,
        /// Descriptor of the rejected registration.
        current: Descriptor,
    },
    /// Retain or release on a pointer the registry does not track.
    Unregistered {
        /// The offending call.
        operation: Operation,
        /// The pointer.
        ptr: HeapPtr,
        /// Where the offending call was made.
        site: CallSite,
    },
    /// Release on a pointer whose count is 0. Nothing was deallocated.
    UnmatchedRelease {
        /// The pointer.
        ptr: HeapPtr,
        /// Its registration descriptor.
        descriptor: Descriptor,
        /// Where the offending release was made.
        site: CallSite,
    },
    /// A pointer was touched from inside its own deallocator.
    Resurrection {
        /// The offending call.
        operation: Operation,
        /// The pointer being deallocated.
        ptr: HeapPtr,
        /// Its registration descriptor.
        descriptor: Descriptor,
        /// Where the offending call was made.
        site: CallSite,
    },
    /// Pointers still tracked at shutdown.
    Leaked(LeakReport),
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DoubleRegistration {
                operation,
                ptr,
                previous,
                current,
            } => {
                write!(
                    f,
                    "{operation} was called more than once for {ptr} {previous} (previous call), {current} (current call)"
                )
            }
            Self::Unregistered {
                operation,
                ptr,
                site,
            } => {
                write!(
                    f,
                    "{operation} was called by {site} for unregistered pointer {ptr}"
                )
            }
            Self::UnmatchedRelease {
                ptr,
                descriptor,
                site,
            } => {
                write!(
                    f,
                    "release was called by {site} for unretained pointer {ptr} {descriptor}"
                )
            }
            Self::Resurrection {
                operation,
                ptr,
                descriptor,
                site,
            } => {
                write!(
                    f,
                    "{operation} was called by {site} for {ptr} {descriptor} while it was being deallocated"
                )
            }
            Self::Leaked(report) => write!(f, "{report}"),
        }
    }
}

impl Error for HeapError {}

/// One pointer still tracked at shutdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leak {
    /// The leaked pointer.
    pub ptr: HeapPtr,
    /// Its count when the report was built.
    pub count: u32,
    /// Its registration descriptor.
    pub descriptor: Descriptor,
}

/// Every pointer still tracked at shutdown, ordered by address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeakReport {
    leaks: Vec<Leak>,
    max_lines: Option<usize>,
}

impl LeakReport {
    pub(crate) fn new(mut leaks: Vec<Leak>, max_lines: Option<usize>) -> Self {
        leaks.sort_by_key(|leak| leak.ptr);
        Self { leaks, max_lines }
    }

    /// Whether nothing leaked.
    pub fn is_empty(&self) -> bool {
        self.leaks.is_empty()
    }

    /// Number of leaked pointers.
    pub fn len(&self) -> usize {
        self.leaks.len()
    }

    /// The leaked pointers.
    pub fn leaks(&self) -> &[Leak] {
        &self.leaks
    }
}

impl fmt::Display for LeakReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "release was not called enough times for:")?;
        let shown = self.max_lines.unwrap_or(usize::MAX).min(self.leaks.len());
        for leak in &self.leaks[..shown] {
            writeln!(
                f,
                "\t{:>3} refs to {}, registered at {}",
                leak.count, leak.ptr, leak.descriptor
            )?;
        }
        if shown < self.leaks.len() {
            writeln!(f, "\t… and {} more", self.leaks.len() - shown)?;
        }
        Ok(())
    }
}
