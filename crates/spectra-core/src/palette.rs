// SPDX-License-Identifier: MIT
//
// Palette state — the swatches the user is editing.
//
// The engine never reaches for the palette directly. It sees the
// `PaletteState` capability set: read and write hue, saturation and value
// of the current color, and subscribe to change events. `Palette` is the
// concrete implementation the application hands in; tests hand in mocks.
//
// Subscribers get a `Receiver<Change>`. Every accepted mutation sends one
// event to every live receiver; receivers that were dropped are pruned on
// the next send. Writes that change nothing send nothing.

use std::sync::mpsc::{self, Receiver, Sender};

use spectra_term::color::{Color, normalize_hue};

use crate::change::Change;
use crate::error::PaletteError;

// ─── PaletteState ───────────────────────────────────────────────────────────

/// What the spectrum engine needs from the palette.
pub trait PaletteState {
    /// Hue of the current color, degrees in [0, 360).
    fn hue(&self) -> f64;

    /// Set the hue; stored wrapped into [0, 360).
    fn set_hue(&mut self, hue: f64);

    /// Saturation of the current color, in [0, 1].
    fn saturation(&self) -> f64;

    /// Set the saturation; clamped to [0, 1].
    fn set_saturation(&mut self, saturation: f64);

    /// Value (brightness) of the current color, in [0, 1].
    fn value(&self) -> f64;

    /// Set the value; clamped to [0, 1].
    fn set_value(&mut self, value: f64);

    /// A new receiver for change events.
    fn subscribe(&mut self) -> Receiver<Change>;
}

/// Exact comparison; a write of the identical value is not a change.
#[inline]
fn same(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits()
}

/// Clamp saturation or value into [0, 1]. NaN becomes 0.
#[inline]
fn unit(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

/// Wrap a hue into [0, 360). NaN becomes 0.
#[inline]
fn wrap(h: f64) -> f64 {
    if h.is_finite() { normalize_hue(h) } else { 0.0 }
}

// ─── Swatch ─────────────────────────────────────────────────────────────────

/// One palette color in HSV coordinates.
///
/// Deserialized swatches go through [`Swatch::new`], so a hand-edited
/// palette file never yields an out-of-range color.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawSwatch")]
pub struct Swatch {
    /// Degrees in [0, 360).
    pub hue: f64,
    /// [0, 1].
    pub saturation: f64,
    /// [0, 1].
    pub value: f64,
}

impl Swatch {
    /// A swatch with the hue wrapped and saturation/value clamped.
    #[must_use]
    pub fn new(hue: f64, saturation: f64, value: f64) -> Self {
        Self {
            hue: wrap(hue),
            saturation: unit(saturation),
            value: unit(value),
        }
    }

    /// The RGB color of this swatch.
    #[must_use]
    pub fn color(self) -> Color {
        Color::from_hsv(self.hue, self.saturation, self.value)
    }
}

/// A swatch as written on disk, before normalization.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSwatch {
    hue: f64,
    saturation: f64,
    value: f64,
}

impl TryFrom<RawSwatch> for Swatch {
    type Error = String;

    fn try_from(raw: RawSwatch) -> Result<Self, Self::Error> {
        let fields = [("hue", raw.hue), ("saturation", raw.saturation), ("value", raw.value)];
        if let Some((name, x)) = fields.into_iter().find(|(_, x)| !x.is_finite()) {
            return Err(format!("{name} must be a finite number, got {x}"));
        }
        Ok(Self::new(raw.hue, raw.saturation, raw.value))
    }
}

// ─── Palette ────────────────────────────────────────────────────────────────

/// Swatches shown by the default palette: one per 30° of hue.
pub const DEFAULT_SWATCHES: usize = 12;

/// An ordered, non-empty list of swatches with one selected.
#[derive(Debug)]
pub struct Palette {
    swatches: Vec<Swatch>,
    selected: usize,
    subscribers: Vec<Sender<Change>>,
}

impl Palette {
    /// Build a palette. The selection is clamped into range.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::Empty`] if `swatches` is empty.
    pub fn new(swatches: Vec<Swatch>, selected: usize) -> Result<Self, PaletteError> {
        if swatches.is_empty() {
            return Err(PaletteError::Empty);
        }
        let selected = selected.min(swatches.len() - 1);
        Ok(Self {
            swatches,
            selected,
            subscribers: Vec::new(),
        })
    }

    /// All swatches in order.
    #[inline]
    #[must_use]
    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    /// RGB colors of all swatches in order.
    #[must_use]
    pub fn colors(&self) -> Vec<Color> {
        self.swatches.iter().map(|s| s.color()).collect()
    }

    /// Number of swatches (never 0).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    /// Always `false`: a palette keeps at least one swatch.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    /// Index of the selected swatch.
    #[inline]
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    /// The selected swatch.
    #[inline]
    #[must_use]
    pub fn current(&self) -> Swatch {
        self.swatches[self.selected]
    }

    /// Select the next swatch, wrapping to the first.
    pub fn select_next(&mut self) {
        self.select((self.selected + 1) % self.swatches.len());
    }

    /// Select the previous swatch, wrapping to the last.
    pub fn select_prev(&mut self) {
        let n = self.swatches.len();
        self.select((self.selected + n - 1) % n);
    }

    /// Select swatch `index` (clamped). Fires a selection event that also
    /// carries hue, saturation and value, since all three may now differ.
    pub fn select(&mut self, index: usize) {
        let index = index.min(self.swatches.len() - 1);
        if index == self.selected {
            return;
        }
        self.selected = index;
        self.notify(Change::all());
    }

    /// Insert a copy of the selected swatch after it and select the copy.
    pub fn add(&mut self) {
        let copy = self.current();
        self.swatches.insert(self.selected + 1, copy);
        self.selected += 1;
        self.notify(Change::all());
    }

    /// Remove the selected swatch. The last remaining swatch is kept.
    /// Returns whether a swatch was removed.
    pub fn remove(&mut self) -> bool {
        if self.swatches.len() <= 1 {
            return false;
        }
        self.swatches.remove(self.selected);
        self.selected = self.selected.min(self.swatches.len() - 1);
        self.notify(Change::all());
        true
    }

    fn notify(&mut self, change: Change) {
        if change.is_empty() {
            return;
        }
        self.subscribers.retain(|tx| tx.send(change).is_ok());
    }

    fn current_mut(&mut self) -> &mut Swatch {
        &mut self.swatches[self.selected]
    }
}

impl Default for Palette {
    /// Twelve fully saturated hues, 30° apart, first one selected.
    fn default() -> Self {
        let swatches = (0..DEFAULT_SWATCHES)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let hue = (i * 360 / DEFAULT_SWATCHES) as f64;
                Swatch::new(hue, 1.0, 1.0)
            })
            .collect();
        Self {
            swatches,
            selected: 0,
            subscribers: Vec::new(),
        }
    }
}

impl PaletteState for Palette {
    fn hue(&self) -> f64 {
        self.current().hue
    }

    fn set_hue(&mut self, hue: f64) {
        let hue = wrap(hue);
        if same(self.current().hue, hue) {
            return;
        }
        self.current_mut().hue = hue;
        self.notify(Change::HUE_CHANGED);
    }

    fn saturation(&self) -> f64 {
        self.current().saturation
    }

    fn set_saturation(&mut self, saturation: f64) {
        let saturation = unit(saturation);
        if same(self.current().saturation, saturation) {
            return;
        }
        self.current_mut().saturation = saturation;
        self.notify(Change::SATURATION_CHANGED);
    }

    fn value(&self) -> f64 {
        self.current().value
    }

    fn set_value(&mut self, value: f64) {
        let value = unit(value);
        if same(self.current().value, value) {
            return;
        }
        self.current_mut().value = value;
        self.notify(Change::VALUE_CHANGED);
    }

    fn subscribe(&mut self) -> Receiver<Change> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &Receiver<Change>) -> Vec<Change> {
        rx.try_iter().collect()
    }

    fn three() -> Palette {
        Palette::new(
            vec![
                Swatch::new(0.0, 1.0, 1.0),
                Swatch::new(120.0, 0.5, 0.5),
                Swatch::new(240.0, 0.2, 0.8),
            ],
            0,
        )
        .unwrap()
    }

    // ── Construction ────────────────────────────────────────────────

    #[test]
    fn empty_palette_is_rejected() {
        assert!(matches!(Palette::new(Vec::new(), 0), Err(PaletteError::Empty)));
    }

    #[test]
    fn selection_is_clamped() {
        let palette = Palette::new(vec![Swatch::new(10.0, 1.0, 1.0)], 7).unwrap();
        assert_eq!(palette.selected_index(), 0);
    }

    #[test]
    fn default_palette_is_twelve_hues() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 12);
        let hues: Vec<f64> = palette.swatches().iter().map(|s| s.hue).collect();
        assert_eq!(hues[0].to_bits(), 0.0f64.to_bits());
        assert_eq!(hues[11].to_bits(), 330.0f64.to_bits());
        assert_eq!(palette.colors()[4], Color::rgb(0, 255, 0));
    }

    #[test]
    fn deserialized_swatch_is_normalized() {
        let s: Swatch = toml::from_str("hue = -90\nsaturation = 2\nvalue = 0.5\n").unwrap();
        assert_eq!(s, Swatch::new(270.0, 1.0, 0.5));
    }

    #[test]
    fn non_finite_swatch_is_rejected() {
        let err = toml::from_str::<Swatch>("hue = 10\nsaturation = nan\nvalue = 1\n").unwrap_err();
        assert!(err.message().contains("saturation must be a finite number"), "{err}");
    }

    #[test]
    fn swatch_normalizes() {
        let s = Swatch::new(-30.0, 1.5, -0.1);
        assert_eq!(s, Swatch { hue: 330.0, saturation: 1.0, value: 0.0 });
    }

    // ── Mutation and events ─────────────────────────────────────────

    #[test]
    fn set_hue_wraps_and_notifies() {
        let mut palette = three();
        let rx = palette.subscribe();
        palette.set_hue(370.0);
        assert_eq!(palette.hue().to_bits(), 10.0f64.to_bits());
        assert_eq!(drain(&rx), vec![Change::HUE_CHANGED]);
    }

    #[test]
    fn unchanged_write_is_silent() {
        let mut palette = three();
        let rx = palette.subscribe();
        palette.set_hue(0.0);
        palette.set_saturation(1.0);
        palette.set_value(3.0); // clamps to the current 1.0
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn saturation_and_value_clamp() {
        let mut palette = three();
        let rx = palette.subscribe();
        palette.set_saturation(-2.0);
        palette.set_value(0.25);
        assert_eq!(palette.saturation().to_bits(), 0.0f64.to_bits());
        assert_eq!(palette.value().to_bits(), 0.25f64.to_bits());
        assert_eq!(
            drain(&rx),
            vec![Change::SATURATION_CHANGED, Change::VALUE_CHANGED]
        );
    }

    #[test]
    fn every_subscriber_receives_events() {
        let mut palette = three();
        let a = palette.subscribe();
        let b = palette.subscribe();
        palette.set_hue(45.0);
        assert_eq!(drain(&a), vec![Change::HUE_CHANGED]);
        assert_eq!(drain(&b), vec![Change::HUE_CHANGED]);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut palette = three();
        let keep = palette.subscribe();
        drop(palette.subscribe());
        assert_eq!(palette.subscribers.len(), 2);
        palette.set_hue(45.0);
        assert_eq!(palette.subscribers.len(), 1);
        assert_eq!(drain(&keep).len(), 1);
    }

    // ── Selection ───────────────────────────────────────────────────

    #[test]
    fn selection_wraps_both_ways() {
        let mut palette = three();
        palette.select_prev();
        assert_eq!(palette.selected_index(), 2);
        palette.select_next();
        assert_eq!(palette.selected_index(), 0);
    }

    #[test]
    fn selection_fires_all_kinds_at_once() {
        let mut palette = three();
        let rx = palette.subscribe();
        palette.select_next();
        assert_eq!(drain(&rx), vec![Change::all()]);
        assert_eq!(palette.hue().to_bits(), 120.0f64.to_bits());
    }

    #[test]
    fn reselecting_current_is_silent() {
        let mut palette = three();
        let rx = palette.subscribe();
        palette.select(0);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn add_duplicates_after_selected() {
        let mut palette = three();
        palette.select(1);
        palette.add();
        assert_eq!(palette.len(), 4);
        assert_eq!(palette.selected_index(), 2);
        assert_eq!(palette.swatches()[1], palette.swatches()[2]);
    }

    #[test]
    fn remove_keeps_the_last_swatch() {
        let mut palette = three();
        palette.select(2);
        assert!(palette.remove());
        assert_eq!(palette.selected_index(), 1);
        assert!(palette.remove());
        assert!(!palette.remove());
        assert_eq!(palette.len(), 1);
    }
}
