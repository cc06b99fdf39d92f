// SPDX-License-Identifier: MIT
//
// HueBar — the spectrum navigation widget.
//
// Owns the engine state (spectrum table, minimap, cursor) and the palette
// state it was handed at construction. Layout, six rows from the origin:
//
//   y      ▾                 pointer above the cursor column
//   y+1   │           │      zoomed spectrum window, width + 1 columns
//   y+2   │           │
//   y+3   │▁▁▁▁▁▁▁▁▁▁▁│      bottom edge of the window
//   y+4   │           │      minimap window
//   y+5        └ ┘           box framing the cursor's minimap bracket
//
// Mutations happen in the input handler: a navigation call writes to the
// palette, the palette fires a change event, and `sync` drains the
// events through the recompute policy before returning. `draw` only reads.

use std::sync::mpsc::Receiver;

use spectra_term::buffer::Surface;
use spectra_term::cell::Style;
use spectra_term::color::{CellColor, Color};

use crate::change::{Change, Recompute};
use crate::config::Config;
use crate::minimap::{self, MiniMap};
use crate::navigator::Navigator;
use crate::palette::PaletteState;
use crate::spectrum::SpectrumTable;
use crate::window;

/// Rows of the bar itself: pointer excluded, minimap row included.
const BAR_HEIGHT: i32 = 4;

/// Rows `draw` consumes for a non-empty width.
pub const ROWS: u16 = 6;

const POINTER: char = '▾';
const BORDER: char = '│';
const WINDOW_EDGE: char = '▁';
const BOX_LEFT: char = '└';
const BOX_RIGHT: char = '┘';

/// `origin + offset`, saturating at the edges of `i32`.
fn at(origin: i32, offset: usize) -> i32 {
    origin.saturating_add(i32::try_from(offset).unwrap_or(i32::MAX))
}

/// The hue spectrum widget over a palette state `P`.
pub struct HueBar<P: PaletteState> {
    state: P,
    changes: Receiver<Change>,
    table: SpectrumTable,
    minimap: MiniMap,
    mini_step_cap: usize,
    cursor: usize,
    width: usize,
    navigator: Navigator,
    pointer: Style,
}

impl<P: PaletteState> HueBar<P> {
    /// Subscribe to `state` and build the table for its current color.
    /// The width starts at 0; call [`resize`](Self::resize) before drawing.
    pub fn new(mut state: P, config: &Config) -> Self {
        let changes = state.subscribe();
        let table = SpectrumTable::with_sv(config.hue_step_table, state.saturation(), state.value());
        let cursor = table.index_for_hue(state.hue());
        Self {
            state,
            changes,
            table,
            minimap: MiniMap::default(),
            mini_step_cap: config.mini_step_cap,
            cursor,
            width: 0,
            navigator: Navigator::new(config.sv_step_fine),
            pointer: Style::DEFAULT,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// The palette state.
    #[must_use]
    pub const fn state(&self) -> &P {
        &self.state
    }

    /// Mutable palette state. Changes made through it take effect on the
    /// next [`sync`](Self::sync).
    pub const fn state_mut(&mut self) -> &mut P {
        &mut self.state
    }

    /// The spectrum table.
    #[must_use]
    pub const fn table(&self) -> &SpectrumTable {
        &self.table
    }

    /// The current minimap.
    #[must_use]
    pub const fn minimap(&self) -> &MiniMap {
        &self.minimap
    }

    /// Index of the selected hue in the table.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Display width in cells.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Color under the cursor.
    #[must_use]
    pub fn current_color(&self) -> Color {
        self.table.colors()[self.cursor]
    }

    /// Style of the pointer, borders and box markers.
    pub const fn set_pointer_style(&mut self, style: Style) {
        self.pointer = style;
    }

    // ─── Events ──────────────────────────────────────────────────────────

    /// Set the display width and rebuild the minimap for it.
    pub fn resize(&mut self, width: usize) {
        self.width = width;
        self.minimap = MiniMap::build(self.table.len(), width, self.mini_step_cap);
    }

    /// Apply the recompute policy to one change event.
    pub fn handle(&mut self, change: Change) {
        let work = Recompute::for_change(change);
        if work.rebuild_table {
            self.table.rebuild(self.state.saturation(), self.state.value());
        }
        if work.sync_cursor {
            self.cursor = self.table.index_for_hue(self.state.hue());
        }
    }

    /// Drain pending change events through [`handle`](Self::handle).
    /// Returns whether any arrived.
    pub fn sync(&mut self) -> bool {
        let mut any = false;
        while let Ok(change) = self.changes.try_recv() {
            self.handle(change);
            any = true;
        }
        any
    }

    // ─── Navigation ──────────────────────────────────────────────────────

    /// Move the hue by `delta` degrees, wrapping around the circle.
    pub fn step_hue(&mut self, delta: f64) -> bool {
        let accepted = self.navigator.step_hue(&mut self.state, delta);
        self.sync();
        accepted
    }

    /// Move the saturation by `delta`.
    pub fn step_saturation(&mut self, delta: f64) -> bool {
        let accepted = self.navigator.step_saturation(&mut self.state, delta);
        self.sync();
        accepted
    }

    /// Move the value by `delta`.
    pub fn step_brightness(&mut self, delta: f64) -> bool {
        let accepted = self.navigator.step_brightness(&mut self.state, delta);
        self.sync();
        accepted
    }

    pub fn step_saturation_up(&mut self) -> bool {
        self.step_saturation(self.navigator.sv_step())
    }

    pub fn step_saturation_down(&mut self) -> bool {
        self.step_saturation(-self.navigator.sv_step())
    }

    pub fn step_brightness_up(&mut self) -> bool {
        self.step_brightness(self.navigator.sv_step())
    }

    pub fn step_brightness_down(&mut self) -> bool {
        self.step_brightness(-self.navigator.sv_step())
    }

    // ─── Drawing ─────────────────────────────────────────────────────────

    /// Paint the widget with its top-left corner at `(x, y)` and return
    /// the rows consumed. Borders land one column outside on each side.
    /// A zero width paints nothing and consumes no rows.
    pub fn draw(&self, x: i32, y: i32, surface: &mut impl Surface) -> u16 {
        if self.width == 0 || self.minimap.is_empty() {
            return 0;
        }
        let width = self.width;

        surface.set_cell(at(x, width / 2), y, self.pointer, POINTER);

        for row in 1..=BAR_HEIGHT {
            surface.set_cell(x.saturating_sub(1), y + row, self.pointer, BORDER);
            surface.set_cell(at(x, width + 1), y + row, self.pointer, BORDER);
        }

        let base = Style::DEFAULT.with_fg(CellColor::from(Color::BLACK));

        let colors = window::extract(self.table.colors(), self.cursor, width);
        for (col, &color) in colors.iter().enumerate() {
            let style = base.with_bg_color(color);
            let cx = at(x, col);
            for row in 1..BAR_HEIGHT - 1 {
                surface.set_cell(cx, y + row, style, ' ');
            }
            surface.set_cell(cx, y + BAR_HEIGHT - 1, style, WINDOW_EDGE);
        }

        for (col, &index) in self.minimap.window(self.cursor).iter().enumerate() {
            let style = base.with_bg_color(self.table.colors()[index]);
            surface.set_cell(at(x, col), y + BAR_HEIGHT, style, ' ');
        }

        let (left, right) = minimap::box_markers(width);
        let marker_x = |offset: isize| {
            x.saturating_add(i32::try_from(offset).unwrap_or(i32::MAX))
        };
        surface.set_cell(marker_x(left), y + BAR_HEIGHT + 1, self.pointer, BOX_LEFT);
        surface.set_cell(marker_x(right), y + BAR_HEIGHT + 1, self.pointer, BOX_RIGHT);

        ROWS
    }
}
