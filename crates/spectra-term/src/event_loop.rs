// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop.
//
// Stdin bytes arrive from the background reader, become events, go to the
// application, and a dirty frame is painted and diffed to the terminal.
// Everything runs on this one thread, one event at a time; a frame is
// never painted while an event is half-applied.
//
// The loop blocks on the stdin channel with a tick timeout. A keypress is
// handled the moment it arrives; an idle terminal costs nothing. The
// timeout doubles as the ESC timeout: a lone ESC still pending when a
// tick fires is flushed as the Escape key.
//
// Signals only set atomic flags, which the loop checks once per tick:
//
//   SIGWINCH          → Event::Resize delivered through `on_event`,
//                       before the next paint.
//   SIGTERM / SIGHUP  → cooperative quit; the loop returns normally so
//                       the caller's shutdown path runs.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::buffer::FrameBuffer;
use crate::diff::Renderer;
use crate::input::{Event, Parser};
use crate::reader::StdinReader;
use crate::terminal::{Size, Terminal};

// ─── Signals ────────────────────────────────────────────────────────────────

static RESIZE_PENDING: AtomicBool = AtomicBool::new(false);
static QUIT_REQUESTED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
extern "C" fn on_sigwinch(_sig: libc::c_int) {
    RESIZE_PENDING.store(true, Ordering::Relaxed);
}

#[cfg(unix)]
extern "C" fn on_terminate(_sig: libc::c_int) {
    QUIT_REQUESTED.store(true, Ordering::Relaxed);
}

#[cfg(unix)]
fn install_handler(signal: libc::c_int, handler: extern "C" fn(libc::c_int)) {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = handler as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        if libc::sigaction(signal, &raw const sa, std::ptr::null_mut()) != 0 {
            log::warn!("sigaction({signal}) failed: {}", io::Error::last_os_error());
        }
    }
}

#[cfg(unix)]
fn install_signal_handlers() {
    install_handler(libc::SIGWINCH, on_sigwinch);
    install_handler(libc::SIGTERM, on_terminate);
    install_handler(libc::SIGHUP, on_terminate);
}

#[cfg(not(unix))]
fn install_signal_handlers() {}

/// Combine the session's outcome with the terminal restore. The session's
/// own error wins; a restore failure behind it is only logged.
fn settle(session: io::Result<()>, restore: io::Result<()>) -> io::Result<()> {
    match (session, restore) {
        (Err(e), Err(restore)) => {
            log::warn!("could not restore the terminal: {restore}");
            Err(e)
        }
        (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
        (Ok(()), Ok(())) => Ok(()),
    }
}

// ─── App Trait ──────────────────────────────────────────────────────────────

/// What the application tells the loop after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep running.
    Continue,
    /// Leave the loop.
    Quit,
}

/// A terminal application driven by [`EventLoop`].
///
/// Each iteration the loop delivers input events (and `Event::Resize`)
/// through [`on_event`](App::on_event), then calls
/// [`on_tick`](App::on_tick), then [`paint`](App::paint) if anything
/// changed.
pub trait App {
    /// Handle one event. Return [`Action::Quit`] to leave the loop.
    fn on_event(&mut self, event: &Event) -> Action;

    /// Called every iteration. Return `true` if a repaint is needed.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Paint the whole UI. The buffer is cleared beforehand.
    fn paint(&mut self, buf: &mut FrameBuffer);
}

/// Deliver events in order. Stops at the first `Quit`.
fn dispatch(app: &mut impl App, events: &[Event], dirty: &mut bool) -> Action {
    for event in events {
        *dirty = true;
        if app.on_event(event) == Action::Quit {
            return Action::Quit;
        }
    }
    Action::Continue
}

// ─── Loop Config ────────────────────────────────────────────────────────────

/// Loop timing.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// `recv_timeout` interval in microseconds. Also the ESC timeout and
    /// the latency bound for signal handling.
    pub tick_interval_us: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        // 60 Hz; nothing here animates.
        Self {
            tick_interval_us: 16_667,
        }
    }
}

// ─── EventLoop ──────────────────────────────────────────────────────────────

/// Owns the terminal, parser and renderer for the lifetime of a session.
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    renderer: Renderer,
    config: LoopConfig,
}

impl EventLoop {
    /// A loop with default timing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    /// A loop with custom timing.
    #[must_use]
    pub fn with_config(config: LoopConfig) -> Self {
        Self {
            terminal: Terminal::new(),
            parser: Parser::new(),
            renderer: Renderer::new(),
            config,
        }
    }

    /// The current terminal size.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Run until the app quits, stdin closes, or SIGTERM/SIGHUP arrives.
    ///
    /// The app first receives `Event::Resize` with the starting size. The
    /// terminal is restored on every exit path.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, output or restore fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        QUIT_REQUESTED.store(false, Ordering::Relaxed);
        self.terminal.enter()?;
        install_signal_handlers();

        let result = StdinReader::spawn().and_then(|(mut reader, rx)| {
            let result = self.run_inner(app, &rx);
            reader.stop();
            result
        });

        settle(result, self.terminal.leave())
    }

    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> io::Result<()> {
        let size = self.terminal.size();
        let mut frame = FrameBuffer::new(size.cols, size.rows);
        let mut dirty = false;
        let timeout = Duration::from_micros(self.config.tick_interval_us);

        if dispatch(app, &[Event::Resize(size.cols, size.rows)], &mut dirty) == Action::Quit {
            return Ok(());
        }

        loop {
            if dirty {
                frame.clear();
                app.paint(&mut frame);
                let stats = self.renderer.draw(&frame);
                self.renderer.present()?;
                log::trace!(
                    "frame: {} cells rendered, {} skipped, {} bytes",
                    stats.cells_rendered,
                    stats.cells_skipped,
                    stats.bytes_written
                );
                dirty = false;
            }

            let events = match rx.recv_timeout(timeout) {
                Ok(bytes) => self.parser.advance(&bytes),
                Err(RecvTimeoutError::Timeout) if self.parser.has_pending() => self.parser.flush(),
                Err(RecvTimeoutError::Timeout) => Vec::new(),
                Err(RecvTimeoutError::Disconnected) => {
                    log::info!("stdin closed, leaving event loop");
                    return Ok(());
                }
            };
            if dispatch(app, &events, &mut dirty) == Action::Quit {
                return Ok(());
            }

            if RESIZE_PENDING.swap(false, Ordering::Relaxed) {
                let size = self.terminal.refresh_size();
                frame.resize(size.cols, size.rows);
                self.renderer.invalidate();
                if dispatch(app, &[Event::Resize(size.cols, size.rows)], &mut dirty)
                    == Action::Quit
                {
                    return Ok(());
                }
            }

            if QUIT_REQUESTED.swap(false, Ordering::Relaxed) {
                log::info!("termination signal received, leaving event loop");
                return Ok(());
            }

            if app.on_tick() {
                dirty = true;
            }
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
