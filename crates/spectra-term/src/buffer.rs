// SPDX-License-Identifier: MIT
//
// The cell grid widgets paint into.
//
// Widgets only see `Surface`: put one styled glyph somewhere, ask how big
// the canvas is. `FrameBuffer` is the real canvas; engine tests plug in
// recording surfaces instead.
//
// Surface coordinates are signed. The hue bar draws its left border one
// column left of its origin, so an origin of 0 yields x = -1, which is
// dropped here rather than wrapped.
//
// Cells are stored row-major in one `Vec`. A double-width glyph takes its
// own cell plus a continuation cell to its right; overwriting either half
// blanks the other.

use unicode_width::UnicodeWidthChar;

use crate::cell::{Cell, Style};

// ─── Surface ────────────────────────────────────────────────────────────────

/// Something a widget can paint on.
pub trait Surface {
    /// Put `ch` at `(x, y)`. Out-of-range positions are ignored.
    fn set_cell(&mut self, x: i32, y: i32, style: Style, ch: char);

    /// `(columns, rows)`.
    fn size(&self) -> (u16, u16);
}

// ─── FrameBuffer ────────────────────────────────────────────────────────────

/// One frame's worth of cells.
///
/// ```
/// use spectra_term::buffer::{FrameBuffer, Surface};
/// use spectra_term::cell::Style;
///
/// let mut frame = FrameBuffer::new(40, 10);
/// frame.set_cell(3, 1, Style::DEFAULT, '▾');
/// frame.set_cell(-1, 1, Style::DEFAULT, '│');
/// assert_eq!(frame.get(3, 1).and_then(|c| c.character()), Some('▾'));
/// assert_eq!(frame.size(), (40, 10));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// A blank `width` × `height` frame.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            cols: width,
            rows: height,
            cells: vec![Cell::EMPTY; usize::from(width) * usize::from(height)],
        }
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.cols
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.rows
    }

    /// Offset of `(x, y)` in `cells`, if it is on the frame.
    fn slot(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.cols && y < self.rows)
            .then(|| usize::from(y) * usize::from(self.cols) + usize::from(x))
    }

    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.slot(x, y).map(|i| &self.cells[i])
    }

    /// Row `y`, `width` cells long.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        let start = self.slot(0, y)?;
        self.cells.get(start..start + usize::from(self.cols))
    }

    /// Characters of row `y`; continuation cells contribute nothing.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .unwrap_or_default()
            .iter()
            .filter_map(|c| c.character())
            .collect()
    }

    /// Blank every cell.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Change dimensions. Content is discarded.
    pub fn resize(&mut self, width: u16, height: u16) {
        *self = Self::new(width, height);
    }

    /// Take `other`'s content. Sizes must match; on a mismatch the frame
    /// becomes a copy of `other` outright.
    pub fn copy_from(&mut self, other: &Self) {
        if self.cells.len() == other.cells.len() && self.cols == other.cols {
            self.cells.copy_from_slice(&other.cells);
        } else {
            self.clone_from(other);
        }
    }

    /// Store `cell` at `(x, y)`. Returns `false` if the position is off
    /// the frame.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        let Some(i) = self.slot(x, y) else {
            return false;
        };

        // Blank the other half of any wide glyph this write splits.
        if self.cells[i].is_continuation() && x > 0 {
            self.cells[i - 1] = Cell::styled(' ', self.cells[i - 1].style());
        }
        if let Some(next) = self.slot(x + 1, y).filter(|&n| self.cells[n].is_continuation()) {
            self.cells[next] = Cell::EMPTY;
        }

        self.cells[i] = cell;
        true
    }

    /// Write `text` from `(x, y)` rightwards, clipped at the right edge.
    /// A wide glyph that would be cut in half is replaced by a space.
    /// Returns the columns used.
    pub fn print(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        if y >= self.rows {
            return 0;
        }

        let mut col = x;
        for ch in text.chars() {
            let room = self.cols.saturating_sub(col);
            match ch.width().unwrap_or(0) {
                _ if room == 0 => break,
                0 => {}
                1 => {
                    self.set(col, y, Cell::styled(ch, style));
                    col += 1;
                }
                _ if room == 1 => {
                    self.set(col, y, Cell::styled(' ', style));
                    col += 1;
                    break;
                }
                _ => {
                    self.set(col, y, Cell::styled(ch, style));
                    self.set(col + 1, y, Cell::continuation(style));
                    col += 2;
                }
            }
        }
        col - x
    }
}

impl Surface for FrameBuffer {
    fn set_cell(&mut self, x: i32, y: i32, style: Style, ch: char) {
        if let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) {
            self.set(x, y, Cell::styled(ch, style));
        }
    }

    fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("cols", &self.cols)
            .field("rows", &self.rows)
            .finish_non_exhaustive()
    }
}
