// SPDX-License-Identifier: MIT
//
// SpectrumTable — the hue circle sampled at a fixed angular step.
//
// Entry i holds the color at hue `i * step` for the current saturation and
// value. The length is fixed at construction; `rebuild` overwrites every
// entry in place and is the only O(N) operation in the engine. Indices
// are circular in both directions.

use spectra_term::color::Color;

/// Default angular resolution: two entries per degree.
pub const DEFAULT_STEP: f64 = 0.5;

/// The full-resolution, circular color table.
#[derive(Debug, Clone)]
pub struct SpectrumTable {
    step: f64,
    colors: Vec<Color>,
    rebuilds: u64,
}

impl SpectrumTable {
    /// A table of `floor(360 / step)` entries at full saturation and value.
    ///
    /// `step` must be finite and in (0, 360]; the configuration layer
    /// validates it. The table always has at least one entry.
    #[must_use]
    pub fn new(step: f64) -> Self {
        Self::with_sv(step, 1.0, 1.0)
    }

    /// A table built for the given saturation and value.
    #[must_use]
    pub fn with_sv(step: f64, saturation: f64, value: f64) -> Self {
        // Truncation is the intent: floor(360 / step), and a validated step
        // keeps this well inside usize.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let len = ((360.0 / step).floor() as usize).max(1);
        let mut table = Self {
            step,
            colors: vec![Color::BLACK; len],
            rebuilds: 0,
        };
        table.fill(saturation, value);
        table
    }

    /// Re-evaluate every entry for a new saturation and value.
    pub fn rebuild(&mut self, saturation: f64, value: f64) {
        self.fill(saturation, value);
        self.rebuilds += 1;
        log::debug!(
            "spectrum table rebuilt: {} entries at s={saturation:.2} v={value:.2}",
            self.colors.len()
        );
    }

    fn fill(&mut self, saturation: f64, value: f64) {
        let step = self.step;
        for (i, slot) in self.colors.iter_mut().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let hue = i as f64 * step;
            *slot = Color::from_hsv(hue, saturation, value);
        }
    }

    /// The color at a circular index. Negative and overflowing indices
    /// wrap: `at(-1)` is the last entry, `at(len)` the first.
    #[must_use]
    pub fn at(&self, index: isize) -> Color {
        let n = self.colors.len();
        // A Vec never holds more than isize::MAX elements.
        #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
        let i = index.rem_euclid(n as isize) as usize;
        self.colors[i]
    }

    /// The cursor index for a hue in degrees: `round(hue / step) mod N`.
    #[must_use]
    pub fn index_for_hue(&self, hue: f64) -> usize {
        let n = self.colors.len();
        let raw = (hue / self.step).round();
        if !raw.is_finite() {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        let i = raw.rem_euclid(n as f64) as usize;
        // rem_euclid on floats can land exactly on n after rounding.
        i % n
    }

    /// All entries in hue order.
    #[inline]
    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; kept for API symmetry with slices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Angular step between entries, in degrees.
    #[inline]
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// How many times [`rebuild`](Self::rebuild) has run.
    #[inline]
    #[must_use]
    pub const fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_step_covers_the_circle() {
        let table = SpectrumTable::new(DEFAULT_STEP);
        assert_eq!(table.len(), 720);
        assert_eq!(table.at(0), Color::rgb(255, 0, 0));
        assert_eq!(table.at(240), Color::rgb(0, 255, 0));
        assert_eq!(table.at(480), Color::rgb(0, 0, 255));
    }

    #[test]
    fn length_is_floor_of_360_over_step() {
        assert_eq!(SpectrumTable::new(1.0).len(), 360);
        assert_eq!(SpectrumTable::new(7.0).len(), 51);
        assert_eq!(SpectrumTable::new(360.0).len(), 1);
    }

    #[test]
    fn circular_indexing_is_exact_at_the_seam() {
        let table = SpectrumTable::new(36.0);
        assert_eq!(table.len(), 10);
        assert_eq!(table.at(-1), table.at(9));
        assert_eq!(table.at(10), table.at(0));
        assert_eq!(table.at(-10), table.at(0));
        assert_eq!(table.at(-11), table.at(9));
        assert_eq!(table.at(29), table.at(9));
    }

    #[test]
    fn rebuild_uses_saturation_and_value() {
        let mut table = SpectrumTable::new(DEFAULT_STEP);
        table.rebuild(0.0, 0.5);
        assert!(table.colors().iter().all(|&c| c == Color::rgb(128, 128, 128)));
        assert_eq!(table.rebuilds(), 1);
    }

    #[test]
    fn construction_does_not_count_as_rebuild() {
        assert_eq!(SpectrumTable::with_sv(1.0, 0.3, 0.3).rebuilds(), 0);
    }

    #[test]
    fn index_for_hue_rounds_and_wraps() {
        let table = SpectrumTable::new(DEFAULT_STEP);
        assert_eq!(table.index_for_hue(0.0), 0);
        assert_eq!(table.index_for_hue(10.2), 20);
        assert_eq!(table.index_for_hue(10.3), 21);
        assert_eq!(table.index_for_hue(359.9), 0);
        assert_eq!(table.index_for_hue(360.0), 0);
        assert_eq!(table.index_for_hue(-0.5), 719);
        assert_eq!(table.index_for_hue(f64::NAN), 0);
    }
}
