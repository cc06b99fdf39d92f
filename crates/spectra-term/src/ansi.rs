// SPDX-License-Identifier: MIT
//
// ANSI escape sequences as values.
//
// A `Seq` knows how to format itself, so emitting one is just
// `write!(out, "{}", Seq::HideCursor)`. Which sequences to send and when
// is decided by the pen in `output` and by `terminal`.
//
// Coordinates are 0-based here and 1-based on the wire.

use std::fmt;

use crate::cell::Attr;
use crate::color::CellColor;

/// SGR parameter for each attribute flag, in emission order.
const ATTR_CODES: [(Attr, u8); 5] = [
    (Attr::BOLD, 1),
    (Attr::DIM, 2),
    (Attr::ITALIC, 3),
    (Attr::UNDERLINE, 4),
    (Attr::INVERSE, 7),
];

/// One escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seq {
    /// CUP: move the cursor to column `x`, row `y`.
    MoveTo(u16, u16),
    /// DECTCEM reset.
    HideCursor,
    /// DECTCEM set.
    ShowCursor,
    /// ED 2.
    ClearScreen,
    /// SGR 0. Any tracked colors are stale afterwards.
    Reset,
    /// DEC 1049 set (`true`) or reset (`false`).
    AltScreen(bool),
    /// DEC 2026 synchronized output, begin (`true`) or end (`false`).
    Sync(bool),
    /// Foreground color.
    Fg(CellColor),
    /// Background color.
    Bg(CellColor),
    /// Attribute flags in a single SGR. Empty flags format as nothing.
    Attrs(Attr),
}

/// SGR for a color. `base` is 30 for foreground, 40 for background.
fn color(f: &mut fmt::Formatter<'_>, base: u16, color: CellColor) -> fmt::Result {
    match color {
        CellColor::Default => write!(f, "\x1b[{}m", base + 9),
        CellColor::Rgb(r, g, b) => write!(f, "\x1b[{};2;{r};{g};{b}m", base + 8),
    }
}

fn mode(f: &mut fmt::Formatter<'_>, number: u16, on: bool) -> fmt::Result {
    write!(f, "\x1b[?{number}{}", if on { 'h' } else { 'l' })
}

impl fmt::Display for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::MoveTo(x, y) => write!(f, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1),
            Self::HideCursor => mode(f, 25, false),
            Self::ShowCursor => mode(f, 25, true),
            Self::ClearScreen => f.write_str("\x1b[2J"),
            Self::Reset => f.write_str("\x1b[0m"),
            Self::AltScreen(on) => mode(f, 1049, on),
            Self::Sync(on) => mode(f, 2026, on),
            Self::Fg(c) => color(f, 30, c),
            Self::Bg(c) => color(f, 40, c),
            Self::Attrs(attrs) => {
                let mut codes = ATTR_CODES.iter().filter(|(flag, _)| attrs.contains(*flag));
                let Some((_, first)) = codes.next() else {
                    return Ok(());
                };
                write!(f, "\x1b[{first}")?;
                for (_, code) in codes {
                    write!(f, ";{code}")?;
                }
                f.write_str("m")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn s(seq: Seq) -> String {
        seq.to_string()
    }

    #[test]
    fn move_to_is_one_based() {
        assert_eq!(s(Seq::MoveTo(0, 0)), "\x1b[1;1H");
        assert_eq!(s(Seq::MoveTo(9, 4)), "\x1b[5;10H");
        assert_eq!(s(Seq::MoveTo(u16::MAX, u16::MAX)), "\x1b[65536;65536H");
    }

    #[test]
    fn foreground_colors() {
        assert_eq!(s(Seq::Fg(CellColor::Default)), "\x1b[39m");
        assert_eq!(s(Seq::Fg(CellColor::Rgb(1, 2, 3))), "\x1b[38;2;1;2;3m");
    }

    #[test]
    fn background_colors() {
        assert_eq!(s(Seq::Bg(CellColor::Default)), "\x1b[49m");
        assert_eq!(s(Seq::Bg(CellColor::Rgb(255, 0, 43))), "\x1b[48;2;255;0;43m");
    }

    #[test]
    fn attrs_join_into_one_sgr() {
        assert_eq!(s(Seq::Attrs(Attr::BOLD | Attr::INVERSE)), "\x1b[1;7m");
        assert_eq!(s(Seq::Attrs(Attr::DIM)), "\x1b[2m");
        assert_eq!(s(Seq::Attrs(Attr::empty())), "");
    }

    #[test]
    fn private_modes() {
        assert_eq!(s(Seq::AltScreen(true)), "\x1b[?1049h");
        assert_eq!(s(Seq::AltScreen(false)), "\x1b[?1049l");
        assert_eq!(s(Seq::Sync(true)), "\x1b[?2026h");
        assert_eq!(s(Seq::Sync(false)), "\x1b[?2026l");
        assert_eq!(s(Seq::HideCursor), "\x1b[?25l");
        assert_eq!(s(Seq::ShowCursor), "\x1b[?25h");
    }
}
