//! Clamped 1-based indexing.
//!
//! List indices never fail. Anything at or below 1 maps to the first slot
//! and anything past the end maps to the last.

use std::ops::Range;

/// Zero-based slot for a 1-based `index` into `len` items. `len` must be non-zero.
pub(crate) fn clamp(index: i64, len: usize) -> usize {
    debug_assert!(len > 0, "clamp on an empty list");
    position(index).min(len - 1)
}

/// Zero-based position of a 1-based `index`, unclamped at the top.
pub(crate) fn position(index: i64) -> usize {
    if index <= 1 {
        0
    } else {
        usize::try_from(index - 1).unwrap_or(usize::MAX)
    }
}

/// Where an insert at 1-based `index` lands: ≤ 1 prepends, past the end appends.
pub(crate) fn insertion_point(index: i64, len: usize) -> usize {
    position(index).min(len)
}

/// The inclusive 1-based range `[start, start + count - 1]` intersected
/// with `[1, len]`, as a zero-based half-open range. `None` when empty.
pub(crate) fn range(start: i64, count: usize, len: usize) -> Option<Range<usize>> {
    if count == 0 || len == 0 {
        return None;
    }
    let count = i64::try_from(count).unwrap_or(i64::MAX);
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    let first = start.max(1);
    let last = start.saturating_add(count - 1).min(len);
    if first > last {
        return None;
    }
    let first = usize::try_from(first - 1).ok()?;
    let last = usize::try_from(last).ok()?;
    Some(first..last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_both_ends() {
        assert_eq!(clamp(0, 3), 0);
        assert_eq!(clamp(-5, 3), 0);
        assert_eq!(clamp(1, 3), 0);
        assert_eq!(clamp(2, 3), 1);
        assert_eq!(clamp(3, 3), 2);
        assert_eq!(clamp(10, 3), 2);
        assert_eq!(clamp(i64::MAX, 3), 2);
    }

    #[test]
    fn insertion_points() {
        assert_eq!(insertion_point(0, 3), 0);
        assert_eq!(insertion_point(1, 3), 0);
        assert_eq!(insertion_point(3, 3), 2);
        assert_eq!(insertion_point(4, 3), 3);
        assert_eq!(insertion_point(99, 0), 0);
    }

    #[test]
    fn ranges() {
        assert_eq!(range(2, 5, 3), Some(1..3));
        assert_eq!(range(1, 1, 3), Some(0..1));
        assert_eq!(range(-1, 3, 3), Some(0..1));
        assert_eq!(range(-1, 2, 3), None);
        assert_eq!(range(4, 2, 3), None);
        assert_eq!(range(2, 0, 3), None);
        assert_eq!(range(1, 3, 0), None);
        assert_eq!(range(i64::MAX, usize::MAX, 3), None);
        assert_eq!(range(-10, usize::MAX, 3), Some(0..3));
        assert_eq!(range(i64::MIN, 3, 3), None);
    }
}
