//! Benchmark profiles for the Holdfast registry and list.
//!
//! - [`bench_registry`]: an isolated registry that discards diagnostics
//! - [`seeded_values`]: deterministic integer payloads
//! - [`text_profile`]: a list of registry-tracked text of a given length

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use holdfast_heap::{HeapConfig, HeapError, HeapRegistry};
use holdfast_list::{List, Text};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A fresh registry sized for `capacity` tracked pointers.
///
/// Diagnostics are dropped so misuse benchmarks measure the registry, not
/// the logger.
pub fn bench_registry(capacity: usize) -> &'static HeapRegistry {
    let registry: &'static HeapRegistry = Box::leak(Box::new(HeapRegistry::new(
        HeapConfig::new().initial_capacity(capacity),
    )));
    registry.set_reporter(Arc::new(|_: &HeapError| {}));
    registry
}

/// `len` integers drawn from a seeded generator.
pub fn seeded_values(len: usize, seed: u64) -> Vec<i64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.random_range(-1000..1000)).collect()
}

/// A list of `len` tracked text values in `registry`.
///
/// Values repeat every 64 entries so de-duplication has work to do.
pub fn text_profile(registry: &'static HeapRegistry, len: usize, seed: u64) -> List<Text> {
    let list = List::new_in(registry);
    for value in seeded_values(len, seed) {
        let label = format!("item {}", value.rem_euclid(64));
        list.append(Text::new_in(registry, &label));
    }
    list
}
