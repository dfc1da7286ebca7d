//! Partial Fisher–Yates shuffling.

use rand::Rng;

use crate::element::Element;
use crate::list::List;

/// Number of leading positions that act as swap sources for `chaos`.
///
/// `chaos` is clamped to `[0, 1]` and NaN counts as 0.
pub fn swap_sources(len: usize, chaos: f64) -> usize {
    let chaos = if chaos.is_nan() { 0.0 } else { chaos.clamp(0.0, 1.0) };
    // Exact for every length a list can reach in practice.
    ((len as f64) * chaos).floor() as usize
}

fn shuffle_prefix<T, R: Rng>(items: &mut [T], chaos: f64, rng: &mut R) {
    let len = items.len();
    for i in 0..swap_sources(len, chaos) {
        let j = rng.random_range(i..len);
        items.swap(i, j);
    }
}

impl<T: Element> List<T> {
    /// Shuffle in place with the thread-local generator.
    ///
    /// Each of the first `floor(count × chaos)` positions swaps with a
    /// uniformly chosen position at or after it. `chaos = 1` is a full
    /// uniform permutation and `chaos = 0` changes nothing. Ownership is
    /// unchanged.
    pub fn shuffle(&self, chaos: f64) {
        self.shuffle_with(chaos, &mut rand::rng());
    }

    /// [`shuffle`](Self::shuffle) driven by `rng`, for reproducible results.
    pub fn shuffle_with<R: Rng>(&self, chaos: f64, rng: &mut R) {
        let mut items = self.lock();
        shuffle_prefix(items.as_mut_slice(), chaos, rng);
    }
}
