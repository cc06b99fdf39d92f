// SPDX-License-Identifier: MIT
//
// Windowed extraction over a circular sequence.
//
// Used twice per frame: over the spectrum table for the zoomed bar, and
// over the minimap's sample indices for the overview row. The result is
// always a fresh allocation; the source is only ever read.

/// Extract `width + 1` consecutive elements of the circular sequence
/// `items`, centered on `cursor`.
///
/// The cursor lands at index `width / 2`. For odd widths that puts it one
/// cell left of the geometric center. A window that crosses the end of the
/// sequence continues from the start, and a window longer than the
/// sequence repeats it. `cursor` is taken modulo `items.len()`.
///
/// Returns an empty vector if `items` is empty.
///
/// ```
/// use spectra_core::window::extract;
///
/// let table: Vec<u32> = (0..10).collect();
/// assert_eq!(extract(&table, 1, 4), vec![9, 0, 1, 2, 3]);
/// assert_eq!(extract(&table, 8, 4), vec![6, 7, 8, 9, 0]);
/// ```
#[must_use]
pub fn extract<T: Copy>(items: &[T], cursor: usize, width: usize) -> Vec<T> {
    let n = items.len();
    if n == 0 {
        return Vec::new();
    }

    let len = width + 1;
    let center = width / 2;
    let mut start = (cursor % n + n - center % n) % n;
    let mut out = Vec::with_capacity(len);

    while out.len() < len {
        let take = (n - start).min(len - out.len());
        out.extend_from_slice(&items[start..start + take]);
        start = 0;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(n: u32) -> Vec<u32> {
        (0..n).collect()
    }

    #[test]
    fn wraps_at_low_end() {
        let result = extract(&table(10), 1, 4);
        assert_eq!(result, vec![9, 0, 1, 2, 3]);
        assert_eq!(result[2], 1);
    }

    #[test]
    fn wraps_at_high_end() {
        assert_eq!(extract(&table(10), 8, 4), vec![6, 7, 8, 9, 0]);
    }

    #[test]
    fn no_wrap_in_the_middle() {
        assert_eq!(extract(&table(10), 5, 4), vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn odd_width_sits_left_of_center() {
        let result = extract(&table(10), 5, 5);
        assert_eq!(result, vec![3, 4, 5, 6, 7, 8]);
        assert_eq!(result[5 / 2], 5);
    }

    #[test]
    fn length_and_center_hold_for_every_cursor_and_width() {
        for n in 1..=12u32 {
            let items = table(n);
            for width in 0..=n as usize {
                for cursor in 0..n as usize {
                    let result = extract(&items, cursor, width);
                    assert_eq!(result.len(), width + 1, "n={n} w={width} c={cursor}");
                    assert_eq!(result[width / 2] as usize, cursor, "n={n} w={width} c={cursor}");
                }
            }
        }
    }

    #[test]
    fn window_wider_than_table_repeats() {
        assert_eq!(extract(&table(3), 0, 6), vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn cursor_beyond_length_is_normalized() {
        assert_eq!(extract(&table(10), 21, 2), extract(&table(10), 1, 2));
    }

    #[test]
    fn width_zero_is_the_cursor_alone() {
        assert_eq!(extract(&table(10), 7, 0), vec![7]);
    }

    #[test]
    fn empty_source_yields_empty_window() {
        assert!(extract::<u32>(&[], 0, 8).is_empty());
    }

    #[test]
    fn source_is_untouched_by_repeated_wrapping() {
        let items = table(10);
        let before = items.clone();
        for cursor in 0..10 {
            let _ = extract(&items, cursor, 9);
        }
        assert_eq!(items, before);
    }
}
