// SPDX-License-Identifier: MIT
//
// spectra-core — the spectrum navigation engine.
//
// A hue circle sampled into a fixed table, a zoomed window over it that
// wraps across the 0°/360° seam, a downsampled minimap for the whole
// circle, and a change-driven policy that rebuilds the table only when
// saturation or value move. Around the engine sit the collaborators it
// talks to: the palette state it observes, the palette file, and the
// print formats.
//
// Module map:
//
//   change     change-event bitmask and the recompute policy
//   spectrum   the circular color table
//   window     wraparound window extraction
//   minimap    downsampled index array, bracket lookup, box markers
//   navigator  hue stepping, saturation/value forwarding
//   hue_bar    the widget tying the above to a drawing surface
//   palette    palette state and the `PaletteState` trait
//   store      palette file load/save
//   output     palette print formats
//   config     tunables
//   error      error types

pub mod change;
pub mod config;
pub mod error;
pub mod hue_bar;
pub mod minimap;
pub mod navigator;
pub mod output;
pub mod palette;
pub mod spectrum;
pub mod store;
pub mod window;
