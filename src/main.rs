// SPDX-License-Identifier: MIT
//
// spectra — a terminal hue-spectrum navigator and palette editor.
//
// This is the main binary that wires together the two crates:
//
//   spectra-term → terminal control, rendering, input parsing, event loop
//   spectra-core → spectrum table, minimap, hue bar widget, palette state
//
// Two modes:
//
//   spectra            interactive: load the palette, edit it, save on quit
//   spectra --print    write the palette to stdout and exit
//
// Logging goes through `log`. Nothing is logged unless there is somewhere
// to put it that won't corrupt the screen: `--log <file>` in either mode,
// or stderr in print mode.

mod app;
mod cli;

use std::fs::File;
use std::process;

use anyhow::{Context, bail};
use clap::Parser;
use log::LevelFilter;

use spectra_core::config::Config;
use spectra_core::palette::Palette;
use spectra_core::{output, store};
use spectra_term::event_loop::EventLoop;
use spectra_term::terminal;

use crate::app::Spectra;
use crate::cli::Cli;

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn).parse_default_env();

    match &cli.log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            builder
                .target(env_logger::Target::Pipe(Box::new(file)))
                .write_style(env_logger::WriteStyle::Never);
        }
        // The alternate screen owns stderr's terminal too.
        None if !cli.print => return Ok(()),
        None => {
            builder.target(env_logger::Target::Stderr);
        }
    }

    builder.try_init()?;
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    init_logging(cli)?;

    let config = Config::default().with_table_step(cli.step);
    config.validate()?;

    let path = cli.palette.clone().or_else(store::default_path);
    let palette = match &path {
        Some(p) => store::load(p).with_context(|| format!("cannot load {}", p.display()))?,
        None => {
            log::warn!("no config directory, the palette will not be saved");
            Palette::default()
        }
    };

    if cli.print {
        print!("{}", output::render(&palette, cli.format));
        return Ok(());
    }

    if !terminal::is_tty() {
        bail!("stdin is not a terminal (use --print for non-interactive output)");
    }

    let mut app = Spectra::new(palette, config, path.clone());
    EventLoop::new().run(&mut app).context("terminal error")?;

    // Quitting saves.
    if let Some(p) = &path {
        app.save().with_context(|| format!("cannot save {}", p.display()))?;
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        log::error!("{e:#}");
        eprintln!("spectra: {e:#}");
        process::exit(1);
    }
}
