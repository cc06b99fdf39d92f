// SPDX-License-Identifier: MIT
//
// Tunables for the spectrum engine and the key bindings that drive it.

use crate::error::ConfigError;
use crate::minimap::DEFAULT_MINI_STEP_CAP;
use crate::navigator::DEFAULT_SV_STEP;
use crate::spectrum::DEFAULT_STEP;

/// Step sizes and limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Angular resolution of the spectrum table, in degrees.
    pub hue_step_table: f64,
    /// Hue change for a plain arrow key, in degrees.
    pub hue_step_fine: f64,
    /// Hue change for a shifted arrow key, in degrees.
    pub hue_step_coarse: f64,
    /// Saturation/value change for a plain key.
    pub sv_step_fine: f64,
    /// Saturation/value change for a shifted key.
    pub sv_step_coarse: f64,
    /// Upper bound on the minimap sampling stride.
    pub mini_step_cap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hue_step_table: DEFAULT_STEP,
            hue_step_fine: 1.0,
            hue_step_coarse: 10.0,
            sv_step_fine: DEFAULT_SV_STEP,
            sv_step_coarse: 0.1,
            mini_step_cap: DEFAULT_MINI_STEP_CAP,
        }
    }
}

impl Config {
    /// Check every value is usable.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::TableStep`] if the table step is not finite or
    ///   outside (0, 360].
    /// - [`ConfigError::Step`] if a key step is not a positive finite number.
    /// - [`ConfigError::MiniStepCap`] if the minimap cap is 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let step = self.hue_step_table;
        if !step.is_finite() || step <= 0.0 || step > 360.0 {
            return Err(ConfigError::TableStep(step));
        }

        let steps = [
            ("hue_step_fine", self.hue_step_fine),
            ("hue_step_coarse", self.hue_step_coarse),
            ("sv_step_fine", self.sv_step_fine),
            ("sv_step_coarse", self.sv_step_coarse),
        ];
        if let Some(&(name, value)) = steps.iter().find(|(_, v)| !v.is_finite() || *v <= 0.0) {
            return Err(ConfigError::Step { name, value });
        }

        if self.mini_step_cap == 0 {
            return Err(ConfigError::MiniStepCap);
        }
        Ok(())
    }

    /// Override the table step.
    #[must_use]
    pub const fn with_table_step(self, hue_step_table: f64) -> Self {
        Self {
            hue_step_table,
            ..self
        }
    }
}
