// SPDX-License-Identifier: MIT
//
// Printing a palette for scripts and humans.
//
//   hex  →  #ff0000 #ffff00 ...
//   rgb  →  255,0,0 255,255,0 ...
//   hsv  →  0,100,100 60,100,100 ...     (degrees, percent, percent)
//   all  →  an aligned table, the selected swatch marked with `*`

use std::fmt::Write as _;
use std::str::FromStr;

use crate::error::UnknownFormat;
use crate::palette::{Palette, Swatch};

/// How `--print` renders the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Table of every representation.
    #[default]
    All,
    Hex,
    Rgb,
    Hsv,
}

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "all" => Ok(Self::All),
            "hex" => Ok(Self::Hex),
            "rgb" => Ok(Self::Rgb),
            "hsv" => Ok(Self::Hsv),
            _ => Err(UnknownFormat(name)),
        }
    }
}

/// `#rrggbb`.
#[must_use]
pub fn hex(swatch: Swatch) -> String {
    swatch.color().to_hex()
}

/// `r,g,b` with 8-bit channels.
#[must_use]
pub fn rgb(swatch: Swatch) -> String {
    let c = swatch.color();
    format!("{},{},{}", c.r, c.g, c.b)
}

/// `h,s,v` as whole degrees and whole percentages.
#[must_use]
pub fn hsv(swatch: Swatch) -> String {
    format!(
        "{:.0},{:.0},{:.0}",
        swatch.hue.floor(),
        (swatch.saturation * 100.0).round(),
        (swatch.value * 100.0).round()
    )
}

/// Render `palette` in `format`. Always ends with a newline.
#[must_use]
pub fn render(palette: &Palette, format: OutputFormat) -> String {
    let line = |f: fn(Swatch) -> String| {
        let mut out = palette
            .swatches()
            .iter()
            .map(|&s| f(s))
            .collect::<Vec<_>>()
            .join(" ");
        out.push('\n');
        out
    };

    match format {
        OutputFormat::Hex => line(hex),
        OutputFormat::Rgb => line(rgb),
        OutputFormat::Hsv => line(hsv),
        OutputFormat::All => table(palette),
    }
}

fn table(palette: &Palette) -> String {
    let rows: Vec<[String; 4]> = palette
        .swatches()
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let marker = if i == palette.selected_index() { "*" } else { " " };
            [format!("{marker}{}", i + 1), hex(s), rgb(s), hsv(s)]
        })
        .collect();

    let header = [" #", "HEX", "RGB", "HSV"].map(String::from);
    let widths: [usize; 4] = std::array::from_fn(|col| {
        rows.iter()
            .chain(std::iter::once(&header))
            .map(|r| r[col].len())
            .max()
            .unwrap_or(0)
    });

    let mut out = String::new();
    for row in std::iter::once(&header).chain(&rows) {
        let _ = writeln!(
            out,
            "{:>w0$}  {:<w1$}  {:<w2$}  {}",
            row[0],
            row[1],
            row[2],
            row[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        );
    }
    out
}
