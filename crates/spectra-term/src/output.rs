// SPDX-License-Identifier: MIT
//
// The pen: turns cells into bytes while remembering what the terminal
// already has.
//
// It tracks where the cursor sits and which colors and attributes are
// active, and only writes the sequences that change something. A row of
// spectrum cells differs only in background, so after the first cell
// each following one costs a single SGR and a space.

use std::io::Write;

use crate::ansi::Seq;
use crate::cell::{Attr, Cell};
use crate::color::CellColor;

/// What the terminal is known to be set to. `None` means unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PenState {
    at: Option<(u16, u16)>,
    fg: Option<CellColor>,
    bg: Option<CellColor>,
    attrs: Attr,
}

/// Stateful cell encoder.
#[derive(Debug, Default)]
pub struct Pen {
    state: PenState,
}

impl Pen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything. Needed after anything else wrote to the terminal.
    pub fn forget(&mut self) {
        self.state = PenState::default();
    }

    /// Append the bytes that put `cell` at `(x, y)`.
    pub fn put(&mut self, out: &mut Vec<u8>, x: u16, y: u16, cell: &Cell) {
        // The wide glyph to the left already painted this column.
        if cell.is_continuation() && x > 0 && self.state.at == Some((x - 1, y)) {
            self.state.at = Some((x, y));
            return;
        }

        let adjacent = x > 0 && self.state.at == Some((x - 1, y));
        if !adjacent {
            emit(out, Seq::MoveTo(x, y));
        }
        self.style(out, cell);

        match cell.character() {
            Some(ch) => {
                let mut utf8 = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
            }
            // A continuation cell reached on its own.
            None => out.push(b' '),
        }
        self.state.at = Some((x, y));
    }

    fn style(&mut self, out: &mut Vec<u8>, cell: &Cell) {
        let s = &mut self.state;
        if cell.style.attrs != s.attrs {
            // SGR has no per-attribute "off" we rely on; start over.
            if !s.attrs.is_empty() {
                emit(out, Seq::Reset);
                s.fg = None;
                s.bg = None;
            }
            emit(out, Seq::Attrs(cell.style.attrs));
            s.attrs = cell.style.attrs;
        }
        if s.fg != Some(cell.style.fg) {
            emit(out, Seq::Fg(cell.style.fg));
            s.fg = Some(cell.style.fg);
        }
        if s.bg != Some(cell.style.bg) {
            emit(out, Seq::Bg(cell.style.bg));
            s.bg = Some(cell.style.bg);
        }
    }
}

/// Append one sequence. Writing into a `Vec` cannot fail.
pub fn emit(out: &mut Vec<u8>, seq: Seq) {
    let _ = write!(out, "{seq}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Style;

    fn draw(cells: &[(u16, u16, Cell)]) -> String {
        let mut out = Vec::new();
        let mut pen = Pen::new();
        for (x, y, cell) in cells {
            pen.put(&mut out, *x, *y, cell);
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn neighbours_share_one_cursor_move() {
        let out = draw(&[(0, 0, Cell::new('a')), (1, 0, Cell::new('b'))]);
        assert_eq!(out.matches('H').count(), 1);
        assert!(out.ends_with("ab"));
    }

    #[test]
    fn gaps_and_new_rows_move_the_cursor() {
        let out = draw(&[
            (0, 0, Cell::new('a')),
            (5, 0, Cell::new('b')),
            (6, 1, Cell::new('c')),
        ]);
        assert!(out.contains("\x1b[1;6H"));
        assert!(out.contains("\x1b[2;7H"));
    }

    #[test]
    fn repeated_background_is_sent_once() {
        let red = Style::DEFAULT.with_bg(CellColor::Rgb(255, 0, 0));
        let out = draw(&[
            (0, 0, Cell::styled(' ', red)),
            (1, 0, Cell::styled(' ', red)),
            (2, 0, Cell::styled(' ', red)),
        ]);
        assert_eq!(out.matches("48;2;255;0;0").count(), 1);
    }

    #[test]
    fn dropping_an_attribute_resets_and_resends_colors() {
        let bold = Style::DEFAULT.with_attrs(Attr::BOLD);
        let out = draw(&[(0, 0, Cell::styled('a', bold)), (1, 0, Cell::new('b'))]);
        assert!(out.contains("\x1b[1m"));
        assert!(out.contains("\x1b[0m"));
        assert_eq!(out.matches("\x1b[39m").count(), 2);
    }

    #[test]
    fn wide_glyph_covers_its_continuation() {
        let out = draw(&[
            (0, 0, Cell::new('中')),
            (1, 0, Cell::continuation(Style::DEFAULT)),
        ]);
        assert!(out.ends_with('中'));
    }

    #[test]
    fn lone_continuation_becomes_a_space() {
        let out = draw(&[(3, 0, Cell::continuation(Style::DEFAULT))]);
        assert!(out.ends_with(' '));
    }

    #[test]
    fn forget_forces_a_full_restyle() {
        let mut out = Vec::new();
        let mut pen = Pen::new();
        pen.put(&mut out, 0, 0, &Cell::new('a'));
        pen.forget();
        out.clear();
        pen.put(&mut out, 1, 0, &Cell::new('b'));
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("\x1b[1;2H"));
        assert!(out.contains("\x1b[39m"));
    }
}
