//! End-to-end registry lifecycles through the public API.

use std::sync::Arc;
use std::thread;

use holdfast_heap::{
    CallSite, ChannelReporter, Descriptor, HeapError, HeapRef, HeapTracked, Operation, RefCount,
    Retained,
};
use holdfast_test_utils::{fake_ptr, recorded_registry, test_descriptor, DeallocCounter};

#[test]
fn retain_retain_release_release_deallocates_once() {
    let (registry, reporter) = recorded_registry();
    let dealloc = DeallocCounter::new();
    let p = fake_ptr();

    assert_eq!(
        registry.register(p, dealloc.deallocator(), test_descriptor("p")),
        RefCount::Counted(0)
    );
    assert_eq!(registry.retain(p), RefCount::Counted(1));
    assert_eq!(registry.retain(p), RefCount::Counted(2));
    assert_eq!(registry.release(p), RefCount::Counted(1));
    assert_eq!(dealloc.count(), 0);
    assert_eq!(registry.release(p), RefCount::Counted(0));
    assert_eq!(dealloc.count(), 1);
    assert!(!registry.is_tracked(p));
    assert!(reporter.is_empty());
}

#[test]
fn release_without_retain_is_reported_and_keeps_pointer() {
    let (registry, reporter) = recorded_registry();
    let dealloc = DeallocCounter::new();
    let p = fake_ptr();
    let _ = registry.register(p, dealloc.deallocator(), test_descriptor("p"));

    assert_eq!(registry.release(p), RefCount::Untracked);

    assert_eq!(dealloc.count(), 0);
    assert_eq!(registry.ref_count(p), Some(0));
    let errors = reporter.take();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], HeapError::UnmatchedRelease { ptr, .. } if ptr == p));
    assert!(errors[0].to_string().contains("unretained pointer"));
}

#[test]
fn double_registration_names_both_descriptors() {
    let (registry, reporter) = recorded_registry();
    let first = DeallocCounter::new();
    let second = DeallocCounter::new();
    let p = fake_ptr();
    let previous = Descriptor::new("node.c", 10, Some("make".into()), "image");
    let current = Descriptor::new("node.c", 20, None, "image");
    let _ = registry.register(p, first.deallocator(), previous);
    let _ = registry.register(p, second.deallocator(), current);

    let message = reporter.take()[0].to_string();
    assert!(message.contains("node.c:10 :: make() :: image (previous call)"));
    assert!(message.contains("node.c:20 :: image (current call)"));

    let _ = registry.retain(p);
    let _ = registry.release(p);
    assert_eq!((first.count(), second.count()), (1, 0));
}

#[test]
fn leak_report_lists_every_leaked_pointer() {
    let (registry, reporter) = recorded_registry();
    let a = fake_ptr();
    let b = fake_ptr();
    let _ = registry.register(a, DeallocCounter::new().deallocator(), test_descriptor("a"));
    let _ = registry.register(b, DeallocCounter::new().deallocator(), test_descriptor("b"));
    let _ = registry.retain(b);
    let _ = registry.register_singleton(fake_ptr(), test_descriptor("forever"));

    let report = registry.shutdown();

    assert_eq!(report.len(), 2);
    let text = report.to_string();
    assert!(text.starts_with("release was not called enough times for:\n"));
    assert!(text.contains(":: a\n"));
    assert!(text.contains(":: b\n"));
    assert!(!text.contains("forever"));
    assert_eq!(reporter.count(), 1);
}

#[test]
fn leak_report_truncation_is_configurable() {
    use holdfast_heap::{HeapConfig, HeapRegistry};

    let registry: &'static HeapRegistry =
        Box::leak(Box::new(HeapRegistry::new(HeapConfig::new().max_leak_lines(1))));
    registry.set_reporter(Arc::new(|_: &HeapError| {}));
    for _ in 0..3 {
        let _ = registry.register(fake_ptr(), Box::new(|_| {}), test_descriptor("x"));
    }
    let text = registry.shutdown().to_string();
    assert_eq!(text.lines().count(), 3);
    assert!(text.ends_with("and 2 more\n"));
}

#[test]
fn channel_reporter_receives_registry_diagnostics() {
    let (registry, _) = recorded_registry();
    let (reporter, rx) = ChannelReporter::new();
    registry.set_reporter(Arc::new(reporter));

    let p = fake_ptr();
    let _ = registry.retain(p);

    let line = line!() - 2;
    assert_eq!(
        rx.try_recv().unwrap(),
        HeapError::Unregistered {
            operation: Operation::Retain,
            ptr: p,
            site: CallSite::new(file!(), line, None),
        }
    );
}

#[test]
fn misuse_through_a_handle_names_the_calling_file() {
    let (registry, reporter) = recorded_registry();
    let value = HeapRef::new_in(registry, 5u8, test_descriptor("value"));

    let _ = value.release();
    let _ = value.retain();
    let _ = value.release();
    let _ = value.release();

    let messages: Vec<String> = reporter.take().iter().map(ToString::to_string).collect();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].starts_with("release was called by "));
    assert!(messages[0].contains("lifecycle.rs"));
    assert!(messages[0].contains("unretained pointer"));
    assert!(messages[1].contains("lifecycle.rs"));
    assert!(messages[1].contains("unregistered pointer"));
}

#[test]
fn deallocator_may_touch_other_pointers() {
    let (registry, reporter) = recorded_registry();
    let children: Vec<HeapRef<u32>> = (0..4)
        .map(|i| HeapRef::new_in(registry, i, test_descriptor("child")))
        .collect();
    for child in &children {
        let _ = child.retain();
    }

    let owned = children.clone();
    let parent = HeapRef::with_finalizer(registry, (), test_descriptor("parent"), move |_| {
        for child in &owned {
            let _ = child.release();
        }
    });
    let _ = parent.retain();
    let _ = parent.release();

    assert!(registry.is_empty());
    assert!(reporter.is_empty());
    assert_eq!(registry.stats().deallocations, 5);
}

#[test]
fn retained_handles_balance_across_threads() {
    let (registry, reporter) = recorded_registry();
    let value = Retained::new(HeapRef::new_in(registry, 42u64, test_descriptor("shared")));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let mine = value.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    let extra = mine.clone();
                    assert_eq!(**extra, 42);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(value.ref_count(), Some(1));
    let ptr = value.ptr();
    drop(value);
    assert!(!registry.is_tracked(ptr));
    assert!(reporter.is_empty());
}

#[test]
fn stats_track_activity() {
    let (registry, _reporter) = recorded_registry();
    let p = fake_ptr();
    let _ = registry.register(p, Box::new(|_| {}), test_descriptor("p"));
    let _ = registry.register_singleton(fake_ptr(), test_descriptor("s"));
    let _ = registry.release(p);

    let stats = registry.stats();
    assert_eq!(stats.tracked, 1);
    assert_eq!(stats.singletons, 1);
    assert_eq!(stats.registrations, 2);
    assert_eq!(stats.deallocations, 0);
    assert_eq!(stats.reports, 1);
}
