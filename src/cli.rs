// SPDX-License-Identifier: MIT
//
// Command-line interface.

use std::path::PathBuf;

use clap::Parser;
use spectra_core::output::OutputFormat;
use spectra_core::spectrum::DEFAULT_STEP;

/// Navigate the hue spectrum and edit a color palette in the terminal.
#[derive(Parser, Debug)]
#[command(name = "spectra", version, about)]
pub struct Cli {
    /// Print the palette and exit instead of starting the interface
    #[arg(short, long)]
    pub print: bool,

    /// Print format: all, hex, rgb or hsv
    #[arg(short, long, default_value = "all")]
    pub format: OutputFormat,

    /// Palette file (default: <config dir>/spectra/palette.toml)
    #[arg(long, value_name = "PATH")]
    pub palette: Option<PathBuf>,

    /// Hue table resolution in degrees
    #[arg(long, value_name = "DEGREES", default_value_t = DEFAULT_STEP)]
    pub step: f64,

    /// Write logs to this file (RUST_LOG sets the level)
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("spectra").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        assert!(!cli.print);
        assert_eq!(cli.format, OutputFormat::All);
        assert!(cli.palette.is_none());
        assert!((cli.step - DEFAULT_STEP).abs() < f64::EPSILON);
        assert!(cli.log.is_none());
    }

    #[test]
    fn print_with_format() {
        let cli = parse(&["-p", "-f", "hex", "--palette", "/tmp/p"]);
        assert!(cli.print);
        assert_eq!(cli.format, OutputFormat::Hex);
        assert_eq!(cli.palette, Some(PathBuf::from("/tmp/p")));
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = Cli::try_parse_from(["spectra", "-f", "cmyk"]).unwrap_err();
        assert!(err.to_string().contains("unknown format \"cmyk\""));
    }

    #[test]
    fn step_and_log() {
        let cli = parse(&["--step", "1", "--log", "spectra.log"]);
        assert!((cli.step - 1.0).abs() < f64::EPSILON);
        assert_eq!(cli.log, Some(PathBuf::from("spectra.log")));
    }
}
