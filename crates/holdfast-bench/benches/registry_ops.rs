//! Criterion micro-benchmarks for registry counting.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use holdfast_bench::bench_registry;
use holdfast_heap::{HeapRef, HeapTracked};
use holdfast_test_utils::{fake_ptr, test_descriptor};

/// Benchmark: register one pointer, retain it, release it to zero.
fn bench_register_cycle(c: &mut Criterion) {
    let registry = bench_registry(1024);
    c.bench_function("register_retain_release", |b| {
        b.iter(|| {
            let p = fake_ptr();
            let _ = registry.register(p, Box::new(|_| {}), test_descriptor("bench"));
            let _ = registry.retain(black_box(p));
            let _ = registry.release(black_box(p));
        });
    });
}

/// Benchmark: retain/release on a pointer that stays alive, 1K tracked.
fn bench_retain_release_hot(c: &mut Criterion) {
    let registry = bench_registry(1024);
    let values: Vec<HeapRef<u64>> = (0..1024)
        .map(|i| HeapRef::new_in(registry, i, test_descriptor("resident")))
        .collect();
    for value in &values {
        let _ = value.retain();
    }
    let hot = values[512].ptr();

    c.bench_function("retain_release_hot_1k", |b| {
        b.iter(|| {
            let _ = registry.retain(black_box(hot));
            let _ = registry.release(black_box(hot));
        });
    });
}

/// Benchmark: describe a tracked pointer.
fn bench_describe(c: &mut Criterion) {
    let registry = bench_registry(16);
    let value = HeapRef::new_in(registry, 0u8, test_descriptor("described"));
    c.bench_function("describe", |b| {
        b.iter(|| black_box(registry.describe(value.ptr())));
    });
}

/// Benchmark: leak report over 1K leaked pointers.
///
/// Shutdown leaves leaks tracked, so one registry serves every iteration.
fn bench_shutdown_report(c: &mut Criterion) {
    let registry = bench_registry(1024);
    for _ in 0..1024 {
        let _ = registry.register(fake_ptr(), Box::new(|_| {}), test_descriptor("leak"));
    }
    c.bench_function("shutdown_1k_leaks", |b| {
        b.iter(|| black_box(registry.shutdown().len()));
    });
}

criterion_group!(
    benches,
    bench_register_cycle,
    bench_retain_release_hot,
    bench_describe,
    bench_shutdown_report
);
criterion_main!(benches);
