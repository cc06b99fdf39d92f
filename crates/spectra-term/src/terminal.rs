// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Terminal control: size queries, raw mode, the alternate screen.
//
// termios, ioctl and isatty have no std wrapper, so each is a single libc
// call in an `unsafe` block.
//
// `Terminal::enter` saves the tty settings in a `RawMode` guard, switches
// to the alternate screen and hides the cursor; `leave` (or drop) reverses
// it. The saved settings are mirrored into a static so the panic hook can
// put the shell back even when the panic unwinds past the guard's owner.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi::Seq;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

/// Used when stdout is not a terminal.
pub const FALLBACK_SIZE: Size = Size { cols: 80, rows: 24 };

/// Ask the kernel for the window size of stdout.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    if unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) } != 0 {
        return None;
    }
    let size = Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    };
    (size.cols > 0 && size.rows > 0).then_some(size)
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Whether stdin is a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Screen Sequences ───────────────────────────────────────────────────────

/// Everything `enter` sends, in order.
const SCREEN_ON: [Seq; 3] = [Seq::AltScreen(true), Seq::HideCursor, Seq::ClearScreen];

/// Everything `leave` sends. The alternate screen goes last so the shell
/// comes back with default colors and a visible cursor.
const SCREEN_OFF: [Seq; 4] = [
    Seq::Sync(false),
    Seq::Reset,
    Seq::ShowCursor,
    Seq::AltScreen(false),
];

fn write_all(seqs: &[Seq]) -> io::Result<()> {
    let mut bytes = Vec::new();
    for seq in seqs {
        write!(bytes, "{seq}")?;
    }
    let mut out = io::stdout().lock();
    out.write_all(&bytes)?;
    out.flush()
}

// ─── Raw Mode ───────────────────────────────────────────────────────────────

/// tty settings from before raw mode, for the panic hook.
#[cfg(unix)]
static SAVED: Mutex<Option<libc::termios>> = Mutex::new(None);

#[cfg(unix)]
fn set_attrs(termios: &libc::termios) -> io::Result<()> {
    if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, termios) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Raw mode for as long as the guard lives.
#[cfg(unix)]
struct RawMode {
    original: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    fn enable() -> io::Result<Self> {
        let mut original: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut original) } != 0 {
            return Err(io::Error::last_os_error());
        }

        let mut termios = original;
        unsafe { libc::cfmakeraw(&raw mut termios) };
        // Blocking reads that return as soon as one byte is in.
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;
        set_attrs(&termios)?;

        if let Ok(mut saved) = SAVED.lock() {
            *saved = Some(original);
        }
        Ok(Self { original })
    }

    fn disable(self) -> io::Result<()> {
        let result = set_attrs(&self.original);
        if let Ok(mut saved) = SAVED.lock() {
            *saved = None;
        }
        result
    }
}

#[cfg(not(unix))]
struct RawMode;

#[cfg(not(unix))]
impl RawMode {
    fn enable() -> io::Result<Self> {
        Ok(Self)
    }

    fn disable(self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Panic Hook ─────────────────────────────────────────────────────────────

static HOOK: Once = Once::new();

/// Bytes of [`SCREEN_OFF`], prepared before any panic can happen.
fn screen_off_bytes() -> Vec<u8> {
    SCREEN_OFF.iter().flat_map(|s| s.to_string().into_bytes()).collect()
}

fn install_panic_hook() {
    HOOK.call_once(|| {
        let restore = screen_off_bytes();
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            // Straight to fd 1; the stdout lock may be held by the panicking frame.
            #[cfg(unix)]
            unsafe {
                let _ = libc::write(libc::STDOUT_FILENO, restore.as_ptr().cast(), restore.len());
            }
            #[cfg(not(unix))]
            let _ = io::stdout().write_all(&restore);

            #[cfg(unix)]
            if let Ok(saved) = SAVED.lock() {
                if let Some(original) = saved.as_ref() {
                    let _ = set_attrs(original);
                }
            }
            previous(info);
        }));
    });
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// The controlling terminal. Restores itself on drop.
///
/// ```no_run
/// use spectra_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // draw frames, read keys
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    raw: Option<RawMode>,
    size: Size,
    active: bool,
}

impl Terminal {
    /// Record the current size. Terminal modes are left alone.
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw: None,
            size: get_size().unwrap_or(FALLBACK_SIZE),
            active: false,
        }
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Query the size again, keeping the old one if the query fails.
    pub fn refresh_size(&mut self) -> Size {
        self.size = get_size().unwrap_or(self.size);
        self.size
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Raw mode, alternate screen, hidden cursor. Calling it twice is
    /// harmless.
    ///
    /// # Errors
    ///
    /// Fails if the tty settings cannot be changed or stdout rejects the
    /// write.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        if is_tty() {
            self.raw = Some(RawMode::enable()?);
        }
        write_all(&SCREEN_ON)?;
        self.active = true;
        log::debug!("entered {}x{} terminal", self.size.cols, self.size.rows);
        Ok(())
    }

    /// Undo [`enter`](Self::enter). Calling it twice is harmless.
    ///
    /// # Errors
    ///
    /// Fails if stdout rejects the write or the tty settings cannot be
    /// restored.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let screen = write_all(&SCREEN_OFF);
        let raw = self.raw.take().map_or(Ok(()), RawMode::disable);
        log::debug!("terminal restored");
        screen.and(raw)
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Err(e) = self.leave() {
            log::warn!("could not restore the terminal: {e}");
        }
    }
}
