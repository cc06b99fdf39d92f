// SPDX-License-Identifier: MIT
//
// spectra-term — Terminal surface for spectra.
//
// A small, direct terminal backend: RGB/HSV color values, a cell grid
// that widgets paint into through the `Surface` trait, a differential
// renderer that emits only changed cells, raw-mode terminal control,
// a key parser, and the single-threaded event loop that ties them
// together.
//
// No TUI framework sits underneath. Escape sequences are written by
// hand and every frame leaves the process in a single write.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod diff;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;
