// SPDX-License-Identifier: MIT
//
// MiniMap — a downsampled overview of the spectrum table.
//
// The zoomed bar shows `width + 1` table entries around the cursor; the
// minimap row below it samples the table every `mini_step` entries so the
// same number of cells covers a much wider arc of the hue circle. A pair
// of box markers under the minimap frames the cursor's position in it.
//
//   build   on resize       O(N / mini_step)
//   locate  every frame     O(log(N / mini_step))
//   window  every frame     O(width)
//
// `mini_step = clamp(N / width, 1, cap)`; the cap keeps the overview from
// collapsing onto a handful of samples when the display is narrow.

use crate::window;

/// Default upper bound on the sampling stride.
pub const DEFAULT_MINI_STEP_CAP: usize = 13;

/// Sample indices into the spectrum table, rebuilt whenever the display
/// width changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MiniMap {
    indices: Vec<usize>,
    step: usize,
    width: usize,
}

impl MiniMap {
    /// Sample a table of `table_len` entries for a display `width` cells
    /// wide. A zero width (or an empty table) produces an empty minimap.
    #[must_use]
    pub fn build(table_len: usize, width: usize, cap: usize) -> Self {
        if width == 0 || table_len == 0 {
            log::trace!("minimap cleared (width {width}, table {table_len})");
            return Self {
                indices: Vec::new(),
                step: 0,
                width,
            };
        }

        let step = mini_step(table_len, width, cap);
        let indices: Vec<usize> = (0..table_len).step_by(step).collect();
        log::trace!(
            "minimap built: {} samples every {step} entries for width {width}",
            indices.len()
        );
        Self {
            indices,
            step,
            width,
        }
    }

    /// The sample indices, ascending.
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Stride between samples (0 when empty).
    #[inline]
    #[must_use]
    pub const fn step(&self) -> usize {
        self.step
    }

    /// Display width this minimap was built for.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Whether there are no samples.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The bracket holding `cursor`: the largest `mpos` with
    /// `indices[mpos] <= cursor`. A cursor past the last sample stays in the
    /// last bracket. Returns 0 for an empty minimap.
    ///
    /// ```
    /// use spectra_core::minimap::MiniMap;
    ///
    /// let map = MiniMap::build(20, 4, 13);
    /// assert_eq!(map.indices(), &[0, 5, 10, 15]);
    /// assert_eq!(map.locate(12), 2);
    /// assert_eq!(map.locate(19), 3);
    /// ```
    #[must_use]
    pub fn locate(&self, cursor: usize) -> usize {
        self.indices
            .partition_point(|&i| i <= cursor)
            .saturating_sub(1)
    }

    /// `width + 1` table indices centered on the bracket of `cursor`,
    /// wrapping around the sample list. Empty for an empty minimap.
    #[must_use]
    pub fn window(&self, cursor: usize) -> Vec<usize> {
        window::extract(&self.indices, self.locate(cursor), self.width)
    }
}

/// Sampling stride for a table of `table_len` entries shown `width` cells
/// wide, clamped to `[1, cap]`.
#[must_use]
pub fn mini_step(table_len: usize, width: usize, cap: usize) -> usize {
    table_len
        .checked_div(width)
        .unwrap_or(0)
        .min(cap)
        .max(1)
}

// ─── Box Markers ────────────────────────────────────────────────────────────

/// Half-width of the minimap box: `max(width / 30, 2)`.
#[must_use]
pub fn box_pad(width: usize) -> usize {
    (width / 30).max(2)
}

/// Column offsets of the left and right box markers, relative to the
/// widget origin.
///
/// Both sit `box_pad` cells from the center column. When the width is odd
/// and the pad even, the right marker moves one further out so the frame
/// stays symmetric around the pointer above it.
#[must_use]
pub fn box_markers(width: usize) -> (isize, isize) {
    let center = isize::try_from(width / 2).unwrap_or(isize::MAX);
    let pad = box_pad(width);
    let right_pad = if width % 2 == 1 && pad % 2 == 0 { pad + 1 } else { pad };
    let pad = isize::try_from(pad).unwrap_or(isize::MAX);
    let right_pad = isize::try_from(right_pad).unwrap_or(isize::MAX);
    (center - pad, center + right_pad)
}
