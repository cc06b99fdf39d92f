// SPDX-License-Identifier: MIT
//
// What one screen position holds.
//
// A `Style` says how to paint (colors and attributes); a `Cell` is a
// glyph plus the style it was painted with. Both are `Copy` and compared
// field by field in the renderer's inner loop.
//
// The right half of a double-width glyph is a continuation cell: it has
// no glyph of its own (`ch == 0`) and only carries the colors.

use crate::color::{CellColor, Color};

// ─── Attributes ─────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// SGR text attributes.
    ///
    /// ```
    /// use spectra_term::cell::Attr;
    ///
    /// let title = Attr::BOLD | Attr::UNDERLINE;
    /// assert!(title.contains(Attr::BOLD));
    /// assert!(!title.contains(Attr::DIM));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        const BOLD      = 1;
        const DIM       = 1 << 1;
        const ITALIC    = 1 << 2;
        const UNDERLINE = 1 << 3;
        const INVERSE   = 1 << 4;
    }
}

// ─── Style ──────────────────────────────────────────────────────────────────

/// Colors and attributes for a cell.
///
/// ```
/// use spectra_term::cell::{Attr, Style};
/// use spectra_term::color::{CellColor, Color};
///
/// let pointer = Style::DEFAULT.with_fg(CellColor::Rgb(110, 110, 110));
/// let swatch = Style::DEFAULT.with_bg_color(Color::rgb(255, 0, 0));
/// assert_eq!(swatch.bg, CellColor::Rgb(255, 0, 0));
/// assert!(pointer.attrs.is_empty());
/// assert!(Style::DEFAULT.with_attrs(Attr::DIM).attrs.contains(Attr::DIM));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

impl Style {
    /// The terminal's own colors, no attributes.
    pub const DEFAULT: Self = Self {
        fg: CellColor::Default,
        bg: CellColor::Default,
        attrs: Attr::empty(),
    };

    #[must_use]
    pub const fn with_fg(mut self, fg: CellColor) -> Self {
        self.fg = fg;
        self
    }

    #[must_use]
    pub const fn with_bg(mut self, bg: CellColor) -> Self {
        self.bg = bg;
        self
    }

    /// Background from an RGB [`Color`].
    #[must_use]
    pub const fn with_bg_color(self, bg: Color) -> Self {
        self.with_bg(bg.to_cell_color())
    }

    #[must_use]
    pub const fn with_attrs(mut self, attrs: Attr) -> Self {
        self.attrs = attrs;
        self
    }
}

// ─── Cell ───────────────────────────────────────────────────────────────────

/// Marks the right half of a wide glyph.
const CONTINUATION: u32 = 0;

/// A glyph and its style.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    ch: u32,
    pub style: Style,
}

impl Cell {
    /// A space in the default style.
    pub const EMPTY: Self = Self::new(' ');

    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self::styled(ch, Style::DEFAULT)
    }

    #[must_use]
    pub const fn styled(ch: char, style: Style) -> Self {
        Self { ch: ch as u32, style }
    }

    /// The right half of a wide glyph, in `style`'s colors.
    #[must_use]
    pub const fn continuation(style: Style) -> Self {
        Self {
            ch: CONTINUATION,
            style,
        }
    }

    #[must_use]
    pub const fn is_continuation(self) -> bool {
        self.ch == CONTINUATION
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    /// The glyph; `None` for a continuation cell.
    #[must_use]
    pub const fn character(self) -> Option<char> {
        if self.is_continuation() {
            None
        } else {
            char::from_u32(self.ch)
        }
    }

    #[must_use]
    pub const fn style(self) -> Style {
        self.style
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(ch) = self.character() else {
            return f.write_str("Cell(continuation)");
        };
        let mut t = f.debug_tuple("Cell");
        t.field(&ch);
        if self.style != Style::DEFAULT {
            t.field(&self.style);
        }
        t.finish()
    }
}
