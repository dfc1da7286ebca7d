//! Criterion micro-benchmarks for list operations.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use holdfast_bench::{bench_registry, seeded_values, text_profile};
use holdfast_heap::HeapTracked;
use holdfast_list::{List, Text};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Benchmark: append 1K tracked text values, then release the list.
fn bench_append_release_1k(c: &mut Criterion) {
    let registry = bench_registry(2048);
    let values: Vec<Text> = (0..1000)
        .map(|i| Text::new_in(registry, &format!("value {i}")))
        .collect();
    for value in &values {
        let _ = value.retain();
    }

    c.bench_function("append_release_1k", |b| {
        b.iter(|| {
            let list = List::new_in(registry);
            for value in &values {
                list.append(value.clone());
            }
            let _ = list.retain();
            let _ = list.release();
        });
    });
}

/// Benchmark: clamped reads across a 1K integer list.
fn bench_get_1k(c: &mut Criterion) {
    let registry = bench_registry(16);
    let list = List::from_values_in(registry, &seeded_values(1000, 3));
    c.bench_function("get_1k", |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for i in 0..1000 {
                sum = sum.wrapping_add(list.get(black_box(i)));
            }
            black_box(sum)
        });
    });
}

/// Benchmark: sort a shuffled 1K integer list.
fn bench_sort_1k(c: &mut Criterion) {
    let registry = bench_registry(16);
    let values = seeded_values(1000, 5);
    c.bench_function("sort_1k", |b| {
        b.iter_batched(
            || List::from_values_in(registry, &values),
            |list| {
                list.sort();
                let _ = list.retain();
                let _ = list.release();
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: full-chaos shuffle of a 1K integer list.
fn bench_shuffle_1k(c: &mut Criterion) {
    let registry = bench_registry(16);
    let list = List::from_values_in(registry, &seeded_values(1000, 9));
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    c.bench_function("shuffle_1k", |b| {
        b.iter(|| list.shuffle_with(black_box(1.0), &mut rng));
    });
}

/// Benchmark: de-duplicate 256 tracked text values with 64 distinct labels.
fn bench_remove_duplicates_256(c: &mut Criterion) {
    let registry = bench_registry(512);
    let list = text_profile(registry, 256, 11);
    c.bench_function("remove_duplicates_256", |b| {
        b.iter(|| {
            if let Some(unique) = list.remove_duplicates() {
                black_box(unique.count());
                let _ = unique.retain();
                let _ = unique.release();
            }
        });
    });
}

/// Benchmark: JSON round trip of a 1K integer list.
fn bench_external_form_1k(c: &mut Criterion) {
    let registry = bench_registry(16);
    let list = List::from_values_in(registry, &seeded_values(1000, 13));
    c.bench_function("external_form_1k", |b| {
        b.iter(|| {
            let text = list.to_external_form();
            let back: List<i64> = List::from_external_form_in(registry, &text).unwrap();
            black_box(back.count());
            let _ = back.retain();
            let _ = back.release();
        });
    });
}

criterion_group!(
    benches,
    bench_append_release_1k,
    bench_get_1k,
    bench_sort_1k,
    bench_shuffle_1k,
    bench_remove_duplicates_256,
    bench_external_form_1k
);
criterion_main!(benches);
