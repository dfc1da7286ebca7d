//! The reference-counting table.
//!
//! [`HeapRegistry`] maps each tracked [`HeapPtr`] to its count, its
//! deallocator, and its descriptor. One mutex serialises the bookkeeping.
//! Deallocators and reporter calls run only after the lock is released:
//! a deallocator that releases the elements it owns re-enters the
//! registry without deadlocking.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, ThreadId};

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::config::HeapConfig;
use crate::descriptor::{CallSite, Descriptor};
use crate::error::{HeapError, Leak, LeakReport, Operation};
use crate::ptr::{HeapPtr, RefCount};
use crate::reporter::{ErrorReporter, LogReporter};

/// Frees a tracked allocation. Called exactly once, on the 1 → 0 release.
pub type Deallocator = Box<dyn FnOnce(HeapPtr) + Send + 'static>;

struct Entry {
    count: u32,
    /// `None` for singletons.
    deallocate: Option<Deallocator>,
    descriptor: Descriptor,
}

impl Entry {
    fn is_singleton(&self) -> bool {
        self.deallocate.is_none()
    }
}

/// Point-in-time registry counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Pointers currently counted (singletons excluded).
    pub tracked: usize,
    /// Pointers currently registered as singletons.
    pub singletons: usize,
    /// Successful registrations since construction.
    pub registrations: u64,
    /// Deallocators run since construction.
    pub deallocations: u64,
    /// Diagnostics sent to the reporter since construction.
    pub reports: u64,
}

struct Table {
    entries: IndexMap<HeapPtr, Entry>,
    /// Deallocators running right now, with the thread running each.
    dying: SmallVec<[Dying; 4]>,
    singletons: usize,
    registrations: u64,
    deallocations: u64,
    reports: u64,
}

struct Dying {
    ptr: HeapPtr,
    thread: ThreadId,
    descriptor: Descriptor,
}

impl Table {
    /// The descriptor of `ptr` if the calling thread is inside its
    /// deallocator.
    ///
    /// Other threads may legitimately register a fresh allocation at the
    /// same address as soon as the old memory is freed, so only the
    /// deallocating thread is checked.
    fn dying(&self, ptr: HeapPtr) -> Option<&Descriptor> {
        let current = thread::current().id();
        self.dying
            .iter()
            .find(|d| d.ptr == ptr && d.thread == current)
            .map(|d| &d.descriptor)
    }
}

/// A reference-counting heap registry.
///
/// Most code uses the process-wide instance through [`global()`](crate::global).
/// Independent instances are useful for isolation in tests and for
/// embedding several runtimes in one process.
pub struct HeapRegistry {
    table: Mutex<Table>,
    reporter: RwLock<Option<Arc<dyn ErrorReporter>>>,
    config: HeapConfig,
}

/// Removes a pointer from the in-flight set once its deallocator returns,
/// including by unwinding.
struct DyingGuard<'a> {
    registry: &'a HeapRegistry,
    ptr: HeapPtr,
    thread: ThreadId,
}

impl Drop for DyingGuard<'_> {
    fn drop(&mut self) {
        let mut table = self.registry.lock();
        table
            .dying
            .retain(|d| !(d.ptr == self.ptr && d.thread == self.thread));
        table.deallocations += 1;
    }
}

impl HeapRegistry {
    /// Create an empty registry.
    pub fn new(config: HeapConfig) -> Self {
        Self {
            table: Mutex::new(Table {
                entries: IndexMap::with_capacity(config.initial_capacity),
                dying: SmallVec::new(),
                singletons: 0,
                registrations: 0,
                deallocations: 0,
                reports: 0,
            }),
            reporter: RwLock::new(None),
            config,
        }
    }

    /// The configuration this registry was built with.
    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    /// Install the sink for diagnostics, replacing any previous one.
    pub fn set_reporter(&self, reporter: Arc<dyn ErrorReporter>) {
        *self
            .reporter
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(reporter);
        log::debug!("holdfast: error reporter installed");
    }

    /// Remove the installed sink; diagnostics fall back to the `log` facade.
    pub fn clear_reporter(&self) {
        *self
            .reporter
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
        log::debug!("holdfast: error reporter cleared");
    }

    /// Start counting `ptr`.
    ///
    /// Returns `Counted(0)` for a new entry. A pointer that is already
    /// tracked keeps its count and deallocator; the call is reported and
    /// returns the existing count (or `Singleton`). Null returns
    /// `Untracked` without a report.
    pub fn register(
        &self,
        ptr: HeapPtr,
        deallocate: Deallocator,
        descriptor: Descriptor,
    ) -> RefCount {
        if ptr.is_null() {
            return RefCount::Untracked;
        }

        let (result, error) = {
            let mut guard = self.lock();
            let table = &mut *guard;
            if let Some(dying) = table.dying(ptr) {
                let error = HeapError::Resurrection {
                    operation: Operation::Register,
                    ptr,
                    descriptor: dying.clone(),
                    site: descriptor.site().clone(),
                };
                (RefCount::Untracked, Some(error))
            } else if let Some(entry) = table.entries.get(&ptr) {
                let result = if entry.is_singleton() {
                    RefCount::Singleton
                } else {
                    RefCount::Counted(entry.count)
                };
                let error = HeapError::DoubleRegistration {
                    operation: Operation::Register,
                    ptr,
                    previous: entry.descriptor.clone(),
                    current: descriptor,
                };
                (result, Some(error))
            } else {
                log::trace!("holdfast: register {ptr} {descriptor}");
                table.entries.insert(
                    ptr,
                    Entry {
                        count: 0,
                        deallocate: Some(deallocate),
                        descriptor,
                    },
                );
                table.registrations += 1;
                (RefCount::Counted(0), None)
            }
        };

        if let Some(error) = error {
            self.report(error);
        }
        result
    }

    /// Exempt `ptr` from counting for the rest of its life.
    ///
    /// A pointer already registered normally is reclassified and its
    /// deallocator discarded. Registering the same singleton twice is
    /// reported. Null returns `Untracked` without a report.
    pub fn register_singleton(&self, ptr: HeapPtr, descriptor: Descriptor) -> RefCount {
        if ptr.is_null() {
            return RefCount::Untracked;
        }

        let (result, error, discarded) = {
            let mut guard = self.lock();
            let table = &mut *guard;
            if let Some(dying) = table.dying(ptr) {
                let error = HeapError::Resurrection {
                    operation: Operation::RegisterSingleton,
                    ptr,
                    descriptor: dying.clone(),
                    site: descriptor.site().clone(),
                };
                (RefCount::Untracked, Some(error), None)
            } else {
                match table.entries.get_mut(&ptr) {
                    Some(entry) if entry.is_singleton() => {
                        let error = HeapError::DoubleRegistration {
                            operation: Operation::RegisterSingleton,
                            ptr,
                            previous: entry.descriptor.clone(),
                            current: descriptor,
                        };
                        (RefCount::Singleton, Some(error), None)
                    }
                    Some(entry) => {
                        log::debug!("holdfast: reclassify {ptr} as singleton");
                        entry.descriptor = descriptor;
                        let discarded = entry.deallocate.take();
                        table.singletons += 1;
                        (RefCount::Singleton, None, discarded)
                    }
                    None => {
                        log::trace!("holdfast: register singleton {ptr} {descriptor}");
                        table.entries.insert(
                            ptr,
                            Entry {
                                count: 0,
                                deallocate: None,
                                descriptor,
                            },
                        );
                        table.singletons += 1;
                        table.registrations += 1;
                        (RefCount::Singleton, None, None)
                    }
                }
            }
        };

        // Dropped outside the lock: the closure may own values whose drop
        // touches the registry.
        drop(discarded);
        if let Some(error) = error {
            self.report(error);
        }
        result
    }

    /// Add one unit of ownership to `ptr`.
    ///
    /// Misuse reports name the caller's source location.
    #[track_caller]
    pub fn retain(&self, ptr: HeapPtr) -> RefCount {
        self.retain_at(ptr, CallSite::caller())
    }

    /// [`retain`](Self::retain) on behalf of an explicit call site.
    pub fn retain_at(&self, ptr: HeapPtr, site: CallSite) -> RefCount {
        if ptr.is_null() {
            return RefCount::Untracked;
        }

        let (result, error) = {
            let mut guard = self.lock();
            let table = &mut *guard;
            if let Some(dying) = table.dying(ptr) {
                let error = HeapError::Resurrection {
                    operation: Operation::Retain,
                    ptr,
                    descriptor: dying.clone(),
                    site,
                };
                (RefCount::Untracked, Some(error))
            } else {
                match table.entries.get_mut(&ptr) {
                    Some(entry) if entry.is_singleton() => (RefCount::Singleton, None),
                    Some(entry) => {
                        entry.count = entry.count.saturating_add(1);
                        log::trace!("holdfast: retain {ptr} -> {}", entry.count);
                        (RefCount::Counted(entry.count), None)
                    }
                    None => {
                        let error = HeapError::Unregistered {
                            operation: Operation::Retain,
                            ptr,
                            site,
                        };
                        (RefCount::Untracked, Some(error))
                    }
                }
            }
        };

        if let Some(error) = error {
            self.report(error);
        }
        result
    }

    /// Remove one unit of ownership from `ptr`, deallocating on 1 → 0.
    ///
    /// The entry is removed under the lock; the deallocator runs after the
    /// lock is released and before this call returns. Misuse reports name
    /// the caller's source location.
    #[track_caller]
    pub fn release(&self, ptr: HeapPtr) -> RefCount {
        self.release_at(ptr, CallSite::caller())
    }

    /// [`release`](Self::release) on behalf of an explicit call site.
    pub fn release_at(&self, ptr: HeapPtr, site: CallSite) -> RefCount {
        if ptr.is_null() {
            return RefCount::Untracked;
        }

        let (result, error, deallocate) = {
            let mut guard = self.lock();
            let table = &mut *guard;
            if let Some(dying) = table.dying(ptr) {
                let error = HeapError::Resurrection {
                    operation: Operation::Release,
                    ptr,
                    descriptor: dying.clone(),
                    site,
                };
                (RefCount::Untracked, Some(error), None)
            } else {
                match table.entries.get_mut(&ptr) {
                    Some(entry) if entry.is_singleton() => (RefCount::Singleton, None, None),
                    Some(entry) if entry.count == 0 => {
                        let error = HeapError::UnmatchedRelease {
                            ptr,
                            descriptor: entry.descriptor.clone(),
                            site,
                        };
                        (RefCount::Untracked, Some(error), None)
                    }
                    Some(entry) => {
                        entry.count -= 1;
                        log::trace!("holdfast: release {ptr} -> {}", entry.count);
                        if entry.count > 0 {
                            (RefCount::Counted(entry.count), None, None)
                        } else {
                            match table.entries.swap_remove(&ptr) {
                                Some(Entry {
                                    deallocate,
                                    descriptor,
                                    ..
                                }) => {
                                    table.dying.push(Dying {
                                        ptr,
                                        thread: thread::current().id(),
                                        descriptor,
                                    });
                                    (RefCount::Counted(0), None, deallocate)
                                }
                                None => (RefCount::Counted(0), None, None),
                            }
                        }
                    }
                    None => {
                        let error = HeapError::Unregistered {
                            operation: Operation::Release,
                            ptr,
                            site,
                        };
                        (RefCount::Untracked, Some(error), None)
                    }
                }
            }
        };

        if let Some(deallocate) = deallocate {
            log::debug!("holdfast: deallocate {ptr}");
            let _dying = DyingGuard {
                registry: self,
                ptr,
                thread: thread::current().id(),
            };
            deallocate(ptr);
        }
        if let Some(error) = error {
            self.report(error);
        }
        result
    }

    /// The registration descriptor of `ptr`, or a fixed placeholder.
    pub fn describe(&self, ptr: HeapPtr) -> String {
        let table = self.lock();
        match table.entries.get(&ptr) {
            Some(entry) => entry.descriptor.to_string(),
            None => Self::UNREGISTERED_DESCRIPTION.to_string(),
        }
    }

    /// Placeholder returned by [`describe`](Self::describe) for unknown pointers.
    pub const UNREGISTERED_DESCRIPTION: &'static str = "(pointer was not registered)";

    /// Current count of `ptr`, if it is counted (not a singleton).
    pub fn ref_count(&self, ptr: HeapPtr) -> Option<u32> {
        let table = self.lock();
        table
            .entries
            .get(&ptr)
            .filter(|entry| !entry.is_singleton())
            .map(|entry| entry.count)
    }

    /// Whether `ptr` is currently registered (counted or singleton).
    pub fn is_tracked(&self, ptr: HeapPtr) -> bool {
        self.lock().entries.contains_key(&ptr)
    }

    /// Whether `ptr` is registered as a singleton.
    pub fn is_singleton(&self, ptr: HeapPtr) -> bool {
        self.lock()
            .entries
            .get(&ptr)
            .is_some_and(Entry::is_singleton)
    }

    /// Number of registered pointers, singletons included.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether no pointer is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the registry counters.
    pub fn stats(&self) -> HeapStats {
        let table = self.lock();
        HeapStats {
            tracked: table.entries.len() - table.singletons,
            singletons: table.singletons,
            registrations: table.registrations,
            deallocations: table.deallocations,
            reports: table.reports,
        }
    }

    /// Report every counted pointer that is still tracked.
    ///
    /// Sends one [`HeapError::Leaked`] message when anything leaked and
    /// returns the report either way. Entries are left in place: leaked
    /// objects are reported, never freed. Safe to call more than once.
    pub fn shutdown(&self) -> LeakReport {
        let leaks: Vec<Leak> = {
            let table = self.lock();
            table
                .entries
                .iter()
                .filter(|(_, entry)| !entry.is_singleton())
                .map(|(&ptr, entry)| Leak {
                    ptr,
                    count: entry.count,
                    descriptor: entry.descriptor.clone(),
                })
                .collect()
        };

        let report = LeakReport::new(leaks, self.config.max_leak_lines);
        if report.is_empty() {
            log::debug!("holdfast: shutdown with no leaks");
        } else {
            self.report(HeapError::Leaked(report.clone()));
        }
        report
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn report(&self, error: HeapError) {
        self.lock().reports += 1;
        let reporter = self
            .reporter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match reporter {
            Some(reporter) => reporter.report(&error),
            None => LogReporter.report(&error),
        }
    }
}

impl Default for HeapRegistry {
    fn default() -> Self {
        Self::new(HeapConfig::default())
    }
}
