// SPDX-License-Identifier: MIT
//
// The interactive palette editor: a HueBar over the palette, a strip of
// swatches, and a line describing the selected color.
//
// Layout:
//
//   ┌──────────────────────────────────────────┐
//   │ title + key hints                        │  ← row 0
//   │                                          │
//   │ hue bar (HueBar::ROWS rows)              │  ← from row 2
//   │                                          │
//   │ [  ]  swatch strip, selection bracketed  │
//   │                                          │
//   │ hex  rgb  hsv  swatch i/n  status        │
//   └──────────────────────────────────────────┘
//
// Keys map to commands in a pure function so the bindings can be tested
// without a terminal.

use std::path::PathBuf;

use spectra_core::config::Config;
use spectra_core::hue_bar::{self, HueBar};
use spectra_core::output;
use spectra_core::palette::Palette;
use spectra_core::store;

use spectra_term::buffer::FrameBuffer;
use spectra_term::cell::{Attr, Style};
use spectra_term::color::CellColor;
use spectra_term::event_loop::{Action, App};
use spectra_term::input::{Event, KeyCode, KeyEvent, Modifiers};

/// Columns kept free on each side of the hue bar.
const MARGIN: u16 = 2;

/// First row of the hue bar.
const BAR_TOP: u16 = 2;

/// Columns per swatch in the strip, brackets included.
const SWATCH_SLOT: u16 = 5;

const HINTS: &str = "←→ hue  ↑↓ value  s/S saturation  tab swatch  a add  x remove  w save  q quit";

// ─── Commands ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Up,
    Down,
}

impl Dir {
    const fn sign(self) -> f64 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }
}

/// Fine steps for plain keys, coarse steps for shifted ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stride {
    Fine,
    Coarse,
}

/// Everything a key can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Hue(Dir, Stride),
    Saturation(Dir, Stride),
    Value(Dir, Stride),
    NextSwatch,
    PrevSwatch,
    AddSwatch,
    RemoveSwatch,
    Save,
    Quit,
}

/// The binding table.
#[must_use]
pub fn command_for(key: KeyEvent) -> Option<Command> {
    use Command::{
        AddSwatch, Hue, NextSwatch, PrevSwatch, Quit, RemoveSwatch, Saturation, Save, Value,
    };
    use Dir::{Down, Up};
    use Stride::{Coarse, Fine};

    let stride = if key.modifiers.contains(Modifiers::SHIFT) {
        Coarse
    } else {
        Fine
    };

    let command = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(Modifiers::CTRL) => Quit,
        _ if key.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) => return None,

        KeyCode::Right => Hue(Up, stride),
        KeyCode::Left => Hue(Down, stride),
        KeyCode::Up => Value(Up, stride),
        KeyCode::Down => Value(Down, stride),
        KeyCode::Tab => NextSwatch,
        KeyCode::BackTab => PrevSwatch,
        KeyCode::Delete => RemoveSwatch,
        KeyCode::Escape => Quit,

        KeyCode::Char(ch) => match ch {
            'l' => Hue(Up, Fine),
            'h' => Hue(Down, Fine),
            'L' => Hue(Up, Coarse),
            'H' => Hue(Down, Coarse),
            'k' => Value(Up, Fine),
            'j' => Value(Down, Fine),
            'K' => Value(Up, Coarse),
            'J' => Value(Down, Coarse),
            'S' => Saturation(Up, Fine),
            's' => Saturation(Down, Fine),
            'a' => AddSwatch,
            'x' => RemoveSwatch,
            'w' => Save,
            'q' => Quit,
            _ => return None,
        },

        _ => return None,
    };
    Some(command)
}

// ─── Application ────────────────────────────────────────────────────────────

/// Editor state driven by the event loop.
pub struct Spectra {
    bar: HueBar<Palette>,
    config: Config,
    path: Option<PathBuf>,
    status: Option<String>,
}

impl Spectra {
    /// Build the editor around a loaded palette. `path` is where `w` saves;
    /// without one, saving reports an error in the status line.
    pub fn new(palette: Palette, config: Config, path: Option<PathBuf>) -> Self {
        let mut bar = HueBar::new(palette, &config);
        bar.set_pointer_style(Style::DEFAULT.with_fg(CellColor::Rgb(110, 110, 110)));
        Self {
            bar,
            config,
            path,
            status: None,
        }
    }

    /// The palette being edited.
    #[must_use]
    pub const fn palette(&self) -> &Palette {
        self.bar.state()
    }

    /// The message shown after the color description, if any.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Write the palette to its path.
    ///
    /// # Errors
    ///
    /// Fails if there is no path or the file cannot be written.
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            anyhow::bail!("no palette file to save to");
        };
        store::save(self.palette(), path)?;
        Ok(())
    }

    fn resize(&mut self, cols: u16) {
        let width = cols.saturating_sub(2 * MARGIN);
        log::debug!("resize to {cols} columns, bar width {width}");
        self.bar.resize(usize::from(width));
    }

    fn execute(&mut self, command: Command) -> Action {
        let cfg = self.config;
        let step = |dir: Dir, stride: Stride, fine: f64, coarse: f64| {
            dir.sign()
                * match stride {
                    Stride::Fine => fine,
                    Stride::Coarse => coarse,
                }
        };

        match command {
            Command::Hue(dir, stride) => {
                self.bar
                    .step_hue(step(dir, stride, cfg.hue_step_fine, cfg.hue_step_coarse));
            }
            Command::Saturation(dir, stride) => {
                self.bar
                    .step_saturation(step(dir, stride, cfg.sv_step_fine, cfg.sv_step_coarse));
            }
            Command::Value(dir, stride) => {
                self.bar
                    .step_brightness(step(dir, stride, cfg.sv_step_fine, cfg.sv_step_coarse));
            }
            Command::NextSwatch => {
                self.bar.state_mut().select_next();
                self.bar.sync();
            }
            Command::PrevSwatch => {
                self.bar.state_mut().select_prev();
                self.bar.sync();
            }
            Command::AddSwatch => {
                self.bar.state_mut().add();
                self.bar.sync();
            }
            Command::RemoveSwatch => {
                if self.bar.state_mut().remove() {
                    self.bar.sync();
                } else {
                    self.status = Some("cannot remove the last swatch".into());
                }
            }
            Command::Save => {
                self.status = Some(match self.save() {
                    Ok(()) => "saved".into(),
                    Err(e) => {
                        log::warn!("save failed: {e:#}");
                        format!("save failed: {e:#}")
                    }
                });
            }
            Command::Quit => return Action::Quit,
        }
        Action::Continue
    }

    // ─── Painting ────────────────────────────────────────────────────────────

    const fn strip_row() -> u16 {
        BAR_TOP + hue_bar::ROWS + 1
    }

    const fn info_row() -> u16 {
        Self::strip_row() + 2
    }

    fn paint_header(buf: &mut FrameBuffer) {
        let title = Style::DEFAULT.with_attrs(Attr::BOLD);
        let hints = Style::DEFAULT.with_attrs(Attr::DIM);
        let used = buf.print(MARGIN, 0, "spectra", title);
        buf.print(MARGIN + used + 2, 0, HINTS, hints);
    }

    fn paint_strip(&self, buf: &mut FrameBuffer) {
        let y = Self::strip_row();
        let frame = Style::DEFAULT.with_attrs(Attr::BOLD);
        let palette = self.palette();

        for (i, swatch) in palette.swatches().iter().enumerate() {
            let Ok(slot) = u16::try_from(i) else { break };
            let x = MARGIN.saturating_add(slot.saturating_mul(SWATCH_SLOT));
            if x.saturating_add(SWATCH_SLOT) > buf.width() {
                break;
            }
            if i == palette.selected_index() {
                buf.print(x, y, "[", frame);
                buf.print(x + SWATCH_SLOT - 1, y, "]", frame);
            }
            let fill = Style::DEFAULT.with_bg_color(swatch.color());
            buf.print(x + 1, y, "   ", fill);
        }
    }

    fn paint_info(&self, buf: &mut FrameBuffer) {
        let palette = self.palette();
        let swatch = palette.current();
        let mut line = format!(
            "{}  rgb {}  hsv {}  swatch {}/{}",
            output::hex(swatch),
            output::rgb(swatch),
            output::hsv(swatch),
            palette.selected_index() + 1,
            palette.len(),
        );
        if let Some(status) = &self.status {
            line.push_str("  ");
            line.push_str(status);
        }
        buf.print(MARGIN, Self::info_row(), &line, Style::DEFAULT);
    }
}

impl App for Spectra {
    fn on_event(&mut self, event: &Event) -> Action {
        match *event {
            Event::Resize(cols, _) => {
                self.resize(cols);
                Action::Continue
            }
            Event::Key(key) => {
                self.status = None;
                command_for(key).map_or(Action::Continue, |command| self.execute(command))
            }
        }
    }

    fn paint(&mut self, buf: &mut FrameBuffer) {
        Self::paint_header(buf);
        self.bar.draw(i32::from(MARGIN), i32::from(BAR_TOP), buf);
        self.paint_strip(buf);
        self.paint_info(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spectra_core::palette::{PaletteState, Swatch};

    fn press(ch: char) -> Event {
        Event::Key(KeyEvent::plain(KeyCode::Char(ch)))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::plain(code))
    }

    fn app() -> Spectra {
        let palette = Palette::new(
            vec![Swatch::new(0.0, 1.0, 1.0), Swatch::new(120.0, 1.0, 1.0)],
            0,
        )
        .unwrap();
        let mut app = Spectra::new(palette, Config::default(), None);
        app.on_event(&Event::Resize(80, 24));
        app
    }

    // ── Bindings ────────────────────────────────────────────────────

    #[test]
    fn arrows_and_letters_agree() {
        let right = command_for(KeyEvent::plain(KeyCode::Right));
        assert_eq!(right, command_for(KeyEvent::plain(KeyCode::Char('l'))));
        assert_eq!(right, Some(Command::Hue(Dir::Up, Stride::Fine)));
    }

    #[test]
    fn shift_selects_coarse_steps() {
        let left = command_for(KeyEvent::with(KeyCode::Left, Modifiers::SHIFT));
        assert_eq!(left, Some(Command::Hue(Dir::Down, Stride::Coarse)));
        assert_eq!(left, command_for(KeyEvent::plain(KeyCode::Char('H'))));
        assert_eq!(
            command_for(KeyEvent::with(KeyCode::Up, Modifiers::SHIFT)),
            Some(Command::Value(Dir::Up, Stride::Coarse))
        );
    }

    #[test]
    fn quit_keys() {
        for k in [
            KeyEvent::plain(KeyCode::Char('q')),
            KeyEvent::plain(KeyCode::Escape),
            KeyEvent::with(KeyCode::Char('c'), Modifiers::CTRL),
        ] {
            assert_eq!(command_for(k), Some(Command::Quit), "{k:?}");
        }
    }

    #[test]
    fn modified_letters_are_unbound() {
        assert_eq!(command_for(KeyEvent::with(KeyCode::Char('l'), Modifiers::ALT)), None);
        assert_eq!(command_for(KeyEvent::with(KeyCode::Char('x'), Modifiers::CTRL)), None);
        assert_eq!(command_for(KeyEvent::plain(KeyCode::Char('z'))), None);
    }

    // ── Events ──────────────────────────────────────────────────────

    #[test]
    fn resize_leaves_margins() {
        let app = app();
        assert_eq!(app.bar.width(), 76);
    }

    #[test]
    fn hue_keys_wrap() {
        let mut app = app();
        assert_eq!(app.on_event(&press('H')), Action::Continue);
        assert!((app.palette().hue() - 350.0).abs() < 1e-9);
        app.on_event(&key(KeyCode::Right));
        assert!((app.palette().hue() - 351.0).abs() < 1e-9);
        assert_eq!(app.bar.cursor(), 702);
    }

    #[test]
    fn saturation_and_value_keys() {
        let mut app = app();
        app.on_event(&press('s'));
        app.on_event(&press('J'));
        assert!((app.palette().saturation() - 0.99).abs() < 1e-9);
        assert!((app.palette().value() - 0.9).abs() < 1e-9);
        assert_eq!(app.bar.table().rebuilds(), 2);
    }

    #[test]
    fn tab_moves_selection_and_cursor() {
        let mut app = app();
        app.on_event(&key(KeyCode::Tab));
        assert_eq!(app.palette().selected_index(), 1);
        assert_eq!(app.bar.cursor(), 240);
        app.on_event(&key(KeyCode::BackTab));
        assert_eq!(app.palette().selected_index(), 0);
        assert_eq!(app.bar.cursor(), 0);
    }

    #[test]
    fn add_and_remove_swatches() {
        let mut app = app();
        app.on_event(&press('a'));
        assert_eq!(app.palette().len(), 3);
        assert_eq!(app.palette().selected_index(), 1);
        app.on_event(&press('x'));
        app.on_event(&key(KeyCode::Delete));
        assert_eq!(app.palette().len(), 1);
        app.on_event(&press('x'));
        assert_eq!(app.palette().len(), 1);
        assert_eq!(app.status(), Some("cannot remove the last swatch"));
    }

    #[test]
    fn save_without_path_reports_status() {
        let mut app = app();
        app.on_event(&press('w'));
        assert_eq!(app.status(), Some("save failed: no palette file to save to"));
        // Any key clears it.
        app.on_event(&press('l'));
        assert_eq!(app.status(), None);
    }

    #[test]
    fn quit_returns_quit() {
        let mut app = app();
        assert_eq!(app.on_event(&press('q')), Action::Quit);
    }

    // ── Painting ────────────────────────────────────────────────────

    #[test]
    fn paint_layout() {
        let mut app = app();
        let mut buf = FrameBuffer::new(80, 24);
        app.paint(&mut buf);

        assert!(buf.row_text(0).starts_with("  spectra"));
        assert_eq!(buf.get(40, BAR_TOP).and_then(|c| c.character()), Some('▾'));

        let strip = buf.row_text(Spectra::strip_row());
        assert!(strip.starts_with("  [   ]"), "{strip:?}");

        let info = buf.row_text(Spectra::info_row());
        assert!(
            info.starts_with("  #ff0000  rgb 255,0,0  hsv 0,100,100  swatch 1/2"),
            "{info:?}"
        );
    }

    #[test]
    fn selected_swatch_is_bracketed() {
        let mut app = app();
        app.on_event(&key(KeyCode::Tab));
        let mut buf = FrameBuffer::new(80, 24);
        app.paint(&mut buf);
        let strip = buf.row_text(Spectra::strip_row());
        assert!(strip.starts_with("       [   ]"), "{strip:?}");
    }

    #[test]
    fn narrow_terminal_paints_without_bar() {
        let palette = Palette::default();
        let mut app = Spectra::new(palette, Config::default(), None);
        app.on_event(&Event::Resize(3, 24));
        let mut buf = FrameBuffer::new(3, 24);
        app.paint(&mut buf);
        assert_eq!(app.bar.width(), 0);
        assert!(buf.row(BAR_TOP).unwrap().iter().all(|c| c.is_empty()));
    }
}
