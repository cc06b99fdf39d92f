// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key events. Covers what a legacy-mode
// terminal sends for the keys the navigator binds:
//
// - CSI sequences for arrows, Home/End, PageUp/PageDown, Delete and
//   BackTab, with xterm modifier parameters (`CSI 1;2C` = Shift+Right)
// - SS3 arrows (application cursor mode)
// - Alt+key as ESC followed by the key
// - Control characters and UTF-8 multi-byte characters
//
// Escape sequences can span several `read()` calls, so the parser keeps
// a small byte buffer. A lone ESC stays pending until the caller decides
// no more bytes are coming and calls [`Parser::flush`].

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A parsed terminal input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(KeyEvent),
    /// The terminal was resized. Produced by the event loop, not the parser.
    Resize(u16, u16),
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A key press with the given modifiers.
    #[must_use]
    pub const fn with(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A printable Unicode character.
    Char(char),
    Enter,
    Tab,
    /// Shift+Tab (`CSI Z`).
    BackTab,
    Backspace,
    Escape,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Keyboard modifier flags, in the xterm encoding (`param = 1 + bits`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Incremental input parser.
///
/// ```
/// use spectra_term::input::{Event, KeyCode, KeyEvent, Modifiers, Parser};
///
/// let mut parser = Parser::new();
/// let events = parser.advance(b"\x1b[1;2Cq");
/// assert_eq!(events, vec![
///     Event::Key(KeyEvent::with(KeyCode::Right, Modifiers::SHIFT)),
///     Event::Key(KeyEvent::plain(KeyCode::Char('q'))),
/// ]);
/// ```
pub struct Parser {
    buf: Vec<u8>,
}

impl Parser {
    /// Create a parser with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(32),
        }
    }

    /// Feed bytes and return every event that can be completed.
    ///
    /// An incomplete trailing sequence stays buffered until the next call.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match parse_one(&self.buf[pos..]) {
                Parsed::Key(key, consumed) => {
                    events.push(Event::Key(key));
                    pos += consumed;
                }
                Parsed::Skip(n) => pos += n,
                Parsed::Incomplete => break,
            }
        }

        self.buf.drain(..pos);
        events
    }

    /// Whether bytes are waiting for the rest of a sequence.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Resolve whatever is buffered as literal keys. A lone ESC becomes
    /// Escape; the bytes of a truncated sequence become plain characters.
    pub fn flush(&mut self) -> Vec<Event> {
        let events = self
            .buf
            .iter()
            .filter_map(|&b| match b {
                0x1B => Some(KeyEvent::plain(KeyCode::Escape)),
                0x20..=0x7E => Some(KeyEvent::plain(KeyCode::Char(char::from(b)))),
                _ => None,
            })
            .map(Event::Key)
            .collect();
        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing ──────────────────────────────────────────────────────

enum Parsed {
    Key(KeyEvent, usize),
    Skip(usize),
    Incomplete,
}

fn parse_one(buf: &[u8]) -> Parsed {
    let Some(&first) = buf.first() else {
        return Parsed::Skip(0);
    };

    match first {
        0x1B => parse_escape(buf),
        0x09 => Parsed::Key(KeyEvent::plain(KeyCode::Tab), 1),
        0x0A | 0x0D => Parsed::Key(KeyEvent::plain(KeyCode::Enter), 1),
        0x08 | 0x7F => Parsed::Key(KeyEvent::plain(KeyCode::Backspace), 1),
        0x00 => Parsed::Key(KeyEvent::with(KeyCode::Char(' '), Modifiers::CTRL), 1),
        b @ 0x01..=0x1A => Parsed::Key(ctrl_letter(b), 1),
        b @ 0x20..=0x7E => Parsed::Key(KeyEvent::plain(KeyCode::Char(char::from(b))), 1),
        0xC0..=0xF7 => parse_utf8(buf),
        _ => Parsed::Skip(1),
    }
}

/// `0x01..=0x1A` is Ctrl+A..Ctrl+Z.
fn ctrl_letter(b: u8) -> KeyEvent {
    KeyEvent::with(KeyCode::Char(char::from(b + b'a' - 1)), Modifiers::CTRL)
}

fn parse_escape(buf: &[u8]) -> Parsed {
    let Some(&second) = buf.get(1) else {
        return Parsed::Incomplete;
    };

    match second {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        0x1B => Parsed::Key(KeyEvent::with(KeyCode::Escape, Modifiers::ALT), 2),
        b @ 0x20..=0x7E => Parsed::Key(
            KeyEvent::with(KeyCode::Char(char::from(b)), Modifiers::ALT),
            2,
        ),
        b @ 0x01..=0x1A => {
            let key = ctrl_letter(b);
            Parsed::Key(KeyEvent::with(key.code, key.modifiers | Modifiers::ALT), 2)
        }
        _ => Parsed::Key(KeyEvent::plain(KeyCode::Escape), 1),
    }
}

fn parse_csi(buf: &[u8]) -> Parsed {
    // Parameter bytes are 0x30..=0x3F, intermediates 0x20..=0x2F, and the
    // final byte is 0x40..=0x7E.
    let mut end = 2;
    loop {
        let Some(&b) = buf.get(end) else {
            return Parsed::Incomplete;
        };
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }

    let params = parse_params(&buf[2..end]);
    let consumed = end + 1;
    let modifiers = params.get(1).copied().map_or(Modifiers::empty(), decode_modifiers);

    let code = match buf[end] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'Z' => KeyCode::BackTab,
        b'~' => match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            _ => return Parsed::Skip(consumed),
        },
        _ => return Parsed::Skip(consumed),
    };

    Parsed::Key(KeyEvent::with(code, modifiers), consumed)
}

fn parse_ss3(buf: &[u8]) -> Parsed {
    let Some(&b) = buf.get(2) else {
        return Parsed::Incomplete;
    };
    let code = match b {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => return Parsed::Skip(3),
    };
    Parsed::Key(KeyEvent::plain(code), 3)
}

fn parse_utf8(buf: &[u8]) -> Parsed {
    let len = match buf[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    };
    if buf.len() < len {
        return Parsed::Incomplete;
    }
    std::str::from_utf8(&buf[..len])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Parsed::Skip(1), |ch| {
            Parsed::Key(KeyEvent::plain(KeyCode::Char(ch)), len)
        })
}

/// Semicolon-separated decimal parameters. Empty fields read as 0;
/// colon sub-parameters are ignored.
fn parse_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &d| {
                    acc.saturating_mul(10).saturating_add(u16::from(d - b'0'))
                })
        })
        .collect()
}

/// xterm modifier parameter: `1 + bitmask`.
fn decode_modifiers(param: u16) -> Modifiers {
    let bits = param.saturating_sub(1);
    Modifiers::from_bits_truncate(u8::try_from(bits & 0xFF).unwrap_or(0))
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(bytes: &[u8]) -> Vec<KeyEvent> {
        Parser::new()
            .advance(bytes)
            .into_iter()
            .filter_map(|e| match e {
                Event::Key(k) => Some(k),
                Event::Resize(..) => None,
            })
            .collect()
    }

    fn plain(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    // ── Plain keys ──────────────────────────────────────────────────

    #[test]
    fn printable_and_control() {
        assert_eq!(
            keys(b"hL\t\r\x7f"),
            vec![
                plain(KeyCode::Char('h')),
                plain(KeyCode::Char('L')),
                plain(KeyCode::Tab),
                plain(KeyCode::Enter),
                plain(KeyCode::Backspace),
            ]
        );
    }

    #[test]
    fn ctrl_c() {
        assert_eq!(
            keys(b"\x03"),
            vec![KeyEvent::with(KeyCode::Char('c'), Modifiers::CTRL)]
        );
    }

    #[test]
    fn utf8_character() {
        assert_eq!(keys("°".as_bytes()), vec![plain(KeyCode::Char('°'))]);
    }

    // ── Sequences ───────────────────────────────────────────────────

    #[test]
    fn arrows_csi_and_ss3() {
        assert_eq!(
            keys(b"\x1b[A\x1b[D\x1bOC"),
            vec![plain(KeyCode::Up), plain(KeyCode::Left), plain(KeyCode::Right)]
        );
    }

    #[test]
    fn shifted_arrow() {
        assert_eq!(
            keys(b"\x1b[1;2D"),
            vec![KeyEvent::with(KeyCode::Left, Modifiers::SHIFT)]
        );
    }

    #[test]
    fn back_tab() {
        assert_eq!(keys(b"\x1b[Z"), vec![plain(KeyCode::BackTab)]);
    }

    #[test]
    fn tilde_keys() {
        assert_eq!(
            keys(b"\x1b[3~\x1b[5~\x1b[6~\x1b[1~\x1b[4~"),
            vec![
                plain(KeyCode::Delete),
                plain(KeyCode::PageUp),
                plain(KeyCode::PageDown),
                plain(KeyCode::Home),
                plain(KeyCode::End),
            ]
        );
    }

    #[test]
    fn alt_key() {
        assert_eq!(
            keys(b"\x1bx"),
            vec![KeyEvent::with(KeyCode::Char('x'), Modifiers::ALT)]
        );
    }

    #[test]
    fn unknown_csi_is_skipped() {
        assert_eq!(keys(b"\x1b[99Xq"), vec![plain(KeyCode::Char('q'))]);
    }

    // ── Buffering ───────────────────────────────────────────────────

    #[test]
    fn split_sequence_resumes() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b[1;").is_empty());
        assert!(parser.has_pending());
        assert_eq!(
            parser.advance(b"2C"),
            vec![Event::Key(KeyEvent::with(KeyCode::Right, Modifiers::SHIFT))]
        );
        assert!(!parser.has_pending());
    }

    #[test]
    fn lone_escape_waits_for_flush() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b").is_empty());
        assert_eq!(parser.flush(), vec![Event::Key(plain(KeyCode::Escape))]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn split_utf8_resumes() {
        let mut parser = Parser::new();
        let bytes = "é".as_bytes();
        assert!(parser.advance(&bytes[..1]).is_empty());
        assert_eq!(
            parser.advance(&bytes[1..]),
            vec![Event::Key(plain(KeyCode::Char('é')))]
        );
    }
}
