// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// Keeps the last frame it drew. Each new frame is compared row by row;
// rows that match are skipped outright, and inside a changed row only the
// runs of differing cells are sent. Stepping the hue repaints the bar and
// minimap rows while the title, swatch strip and borders stay untouched.
//
// A frame is accumulated in memory and leaves in one write, bracketed by
// synchronized-output markers so the terminal never shows half of it.

use std::io::{self, Write};
use std::ops::Range;

use crate::ansi::Seq;
use crate::buffer::FrameBuffer;
use crate::cell::Cell;
use crate::output::{Pen, emit};

/// Counters from one [`Renderer::draw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Cells sent to the terminal.
    pub cells_rendered: usize,
    /// Cells unchanged since the last frame.
    pub cells_skipped: usize,
    /// Size of the queued output.
    pub bytes_written: usize,
}

/// Index ranges where `cur` differs from `prev`. Both rows have equal length.
fn changed_spans<'a>(prev: &'a [Cell], cur: &'a [Cell]) -> impl Iterator<Item = Range<usize>> + 'a {
    let mut x = 0;
    std::iter::from_fn(move || {
        let start = x + (x..cur.len()).position(|i| prev[i] != cur[i])?;
        let len = cur[start..]
            .iter()
            .zip(&prev[start..])
            .take_while(|(c, p)| c != p)
            .count();
        x = start + len;
        Some(start..x)
    })
}

/// Frame-to-frame renderer.
#[derive(Default)]
pub struct Renderer {
    out: Vec<u8>,
    pen: Pen,
    last: Option<FrameBuffer>,
}

impl Renderer {
    /// The first frame after construction is drawn in full.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the output that turns the last frame into `frame`.
    pub fn draw(&mut self, frame: &FrameBuffer) -> FrameStats {
        self.out.clear();
        self.pen.forget();
        let mut stats = FrameStats::default();

        if frame.width() == 0 || frame.height() == 0 {
            self.last = Some(frame.clone());
            return stats;
        }

        // A size change invalidates everything on screen.
        let last = self
            .last
            .take()
            .filter(|l| l.width() == frame.width() && l.height() == frame.height());

        emit(&mut self.out, Seq::Sync(true));
        if last.is_none() {
            emit(&mut self.out, Seq::ClearScreen);
        }

        for y in 0..frame.height() {
            let Some(row) = frame.row(y) else { continue };
            let spans: Vec<Range<usize>> = match last.as_ref().and_then(|l| l.row(y)) {
                Some(prev) if prev == row => Vec::new(),
                Some(prev) => changed_spans(prev, row).collect(),
                None => vec![0..row.len()],
            };

            let mut sent = 0;
            for span in spans {
                sent += span.len();
                for x in span {
                    let col = u16::try_from(x).unwrap_or(u16::MAX);
                    self.pen.put(&mut self.out, col, y, &row[x]);
                }
            }
            stats.cells_rendered += sent;
            stats.cells_skipped += row.len() - sent;
        }

        emit(&mut self.out, Seq::Reset);
        emit(&mut self.out, Seq::Sync(false));
        stats.bytes_written = self.out.len();

        self.last = match last {
            Some(mut kept) => {
                kept.copy_from(frame);
                Some(kept)
            }
            None => Some(frame.clone()),
        };
        stats
    }

    /// Bytes queued by the last [`draw`](Self::draw).
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.out
    }

    /// Send the queued bytes to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn present(&mut self) -> io::Result<()> {
        self.present_to(&mut io::stdout().lock())
    }

    /// Send the queued bytes to `w` and empty the queue.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn present_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if self.out.is_empty() {
            return Ok(());
        }
        w.write_all(&self.out)?;
        w.flush()?;
        self.out.clear();
        Ok(())
    }

    /// Drop the remembered frame; the next draw repaints the whole screen.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}
