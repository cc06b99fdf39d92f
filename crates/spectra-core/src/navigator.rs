// SPDX-License-Identifier: MIT
//
// Navigator — hue stepping and saturation/value forwarding.
//
// Holds no color state of its own. Hue moves are computed here with true
// modulo wraparound and written back; saturation and value requests go
// straight to the palette state, which clamps and fires the event the
// widget then reacts to. Every entry point reports whether the request
// was accepted; with the current palette semantics that is always true.

use spectra_term::color::normalize_hue;

use crate::palette::PaletteState;

/// Default saturation/value increment.
pub const DEFAULT_SV_STEP: f64 = 0.01;

/// `hue + delta`, wrapped into [0, 360) for any delta.
///
/// ```
/// use spectra_core::navigator::wrap_hue;
///
/// assert_eq!(wrap_hue(355.0, 10.0), 5.0);
/// assert_eq!(wrap_hue(5.0, -10.0), 355.0);
/// assert_eq!(wrap_hue(10.0, 725.0), 15.0);
/// ```
#[must_use]
pub fn wrap_hue(hue: f64, delta: f64) -> f64 {
    normalize_hue(hue + delta)
}

/// Cursor movement over the palette state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Navigator {
    sv_step: f64,
}

impl Navigator {
    /// A navigator whose saturation/value steps are `sv_step`.
    #[must_use]
    pub const fn new(sv_step: f64) -> Self {
        Self { sv_step }
    }

    /// The fine saturation/value increment.
    #[must_use]
    pub const fn sv_step(&self) -> f64 {
        self.sv_step
    }

    /// Move the hue by `delta` degrees.
    pub fn step_hue(&self, state: &mut impl PaletteState, delta: f64) -> bool {
        state.set_hue(wrap_hue(state.hue(), delta));
        true
    }

    /// Move the saturation by `delta`; the state clamps.
    pub fn step_saturation(&self, state: &mut impl PaletteState, delta: f64) -> bool {
        state.set_saturation(state.saturation() + delta);
        true
    }

    /// Move the value by `delta`; the state clamps.
    pub fn step_brightness(&self, state: &mut impl PaletteState, delta: f64) -> bool {
        state.set_value(state.value() + delta);
        true
    }

    pub fn step_saturation_up(&self, state: &mut impl PaletteState) -> bool {
        self.step_saturation(state, self.sv_step)
    }

    pub fn step_saturation_down(&self, state: &mut impl PaletteState) -> bool {
        self.step_saturation(state, -self.sv_step)
    }

    pub fn step_brightness_up(&self, state: &mut impl PaletteState) -> bool {
        self.step_brightness(state, self.sv_step)
    }

    pub fn step_brightness_down(&self, state: &mut impl PaletteState) -> bool {
        self.step_brightness(state, -self.sv_step)
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(DEFAULT_SV_STEP)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::Receiver;

    use super::*;
    use crate::change::Change;

    /// Records every write verbatim; no clamping, no events.
    #[derive(Default)]
    struct Recording {
        hue: f64,
        saturation: f64,
        value: f64,
        writes: Vec<&'static str>,
    }

    impl PaletteState for Recording {
        fn hue(&self) -> f64 {
            self.hue
        }
        fn set_hue(&mut self, hue: f64) {
            self.hue = hue;
            self.writes.push("hue");
        }
        fn saturation(&self) -> f64 {
            self.saturation
        }
        fn set_saturation(&mut self, saturation: f64) {
            self.saturation = saturation;
            self.writes.push("saturation");
        }
        fn value(&self) -> f64 {
            self.value
        }
        fn set_value(&mut self, value: f64) {
            self.value = value;
            self.writes.push("value");
        }
        fn subscribe(&mut self) -> Receiver<Change> {
            std::sync::mpsc::channel().1
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn hue_wraps_up_past_360() {
        let mut state = Recording { hue: 355.0, ..Recording::default() };
        assert!(Navigator::default().step_hue(&mut state, 10.0));
        assert!(approx(state.hue, 5.0));
    }

    #[test]
    fn hue_wraps_down_past_0() {
        let mut state = Recording { hue: 5.0, ..Recording::default() };
        assert!(Navigator::default().step_hue(&mut state, -10.0));
        assert!(approx(state.hue, 355.0));
    }

    #[test]
    fn large_steps_use_true_modulo() {
        assert!(approx(wrap_hue(0.0, 360.0), 0.0));
        assert!(approx(wrap_hue(100.0, -1000.0), 180.0));
        assert!(approx(wrap_hue(359.0, 1.0), 0.0));
    }

    #[test]
    fn saturation_and_value_are_forwarded_unclamped() {
        let nav = Navigator::new(0.1);
        let mut state = Recording {
            saturation: 1.0,
            value: 0.0,
            ..Recording::default()
        };
        assert!(nav.step_saturation_up(&mut state));
        assert!(nav.step_brightness_down(&mut state));
        // The navigator does not clamp; the state is responsible.
        assert!(approx(state.saturation, 1.1));
        assert!(approx(state.value, -0.1));
        assert_eq!(state.writes, vec!["saturation", "value"]);
    }

    #[test]
    fn down_then_up_returns_to_start() {
        let nav = Navigator::default();
        let mut state = Recording {
            saturation: 0.5,
            value: 0.5,
            ..Recording::default()
        };
        nav.step_saturation_down(&mut state);
        nav.step_saturation_up(&mut state);
        nav.step_brightness_up(&mut state);
        nav.step_brightness_down(&mut state);
        assert!(approx(state.saturation, 0.5));
        assert!(approx(state.value, 0.5));
    }
}
