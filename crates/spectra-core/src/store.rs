// SPDX-License-Identifier: MIT
//
// Palette file, stored as TOML.
//
//   selected = 2
//
//   [[swatches]]
//   hue = 0.0
//   saturation = 1.0
//   value = 1.0
//
// `selected` is optional and clamped into range. Swatches are normalized on
// load (hue wrapped, saturation/value clamped); non-finite numbers are
// rejected.
//
// Saves go through a temporary file next to the target and a rename, so an
// interrupted save leaves the previous palette intact. The temp name carries
// the process id; two instances saving at once never share one.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::PaletteError;
use crate::palette::{Palette, Swatch};

const APP_DIR: &str = "spectra";
const FILE_NAME: &str = "palette.toml";

/// Prefixed to every saved palette.
const HEADER: &str = "\
# spectra palette
# hue in degrees [0, 360), saturation and value in [0, 1].
# `selected` is the 0-based index of the swatch being edited.

";

/// On-disk shape of a palette.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct PaletteFile {
    #[serde(default)]
    selected: usize,
    #[serde(default)]
    swatches: Vec<Swatch>,
}

/// `<config dir>/spectra/palette.toml`, or `None` if the platform has no
/// config directory.
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(FILE_NAME))
}

/// Load a palette. A missing file yields the default palette.
///
/// # Errors
///
/// Returns [`PaletteError::Io`] if the file exists but cannot be read,
/// and [`PaletteError::Parse`] / [`PaletteError::Empty`] if its contents
/// are invalid.
pub fn load(path: &Path) -> Result<Palette, PaletteError> {
    match fs::read_to_string(path) {
        Ok(text) => {
            let palette = parse(&text)?;
            log::info!("loaded {} swatches from {}", palette.len(), path.display());
            Ok(palette)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("no palette at {}, starting from defaults", path.display());
            Ok(Palette::default())
        }
        Err(e) => Err(PaletteError::io(path, e)),
    }
}

/// Write a palette, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`PaletteError::Serialize`] if the palette cannot be encoded
/// and [`PaletteError::Io`] if any filesystem step fails.
pub fn save(palette: &Palette, path: &Path) -> Result<(), PaletteError> {
    let text = render(palette)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PaletteError::io(parent, e))?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, text).map_err(|e| PaletteError::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(PaletteError::io(path, e));
    }

    log::info!("saved {} swatches to {}", palette.len(), path.display());
    Ok(())
}

/// `<name>.<pid>.tmp` beside `path`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

/// Parse palette TOML.
///
/// # Errors
///
/// [`PaletteError::Parse`] with the 1-based line of the problem when the
/// parser reports one; [`PaletteError::Empty`] if there are no swatches.
pub fn parse(text: &str) -> Result<Palette, PaletteError> {
    let file: PaletteFile = toml::from_str(text).map_err(|e| PaletteError::parse(text, &e))?;

    if file.selected >= file.swatches.len() && !file.swatches.is_empty() {
        log::warn!(
            "selected swatch {} out of range for {} swatches, using the last",
            file.selected,
            file.swatches.len()
        );
    }
    Palette::new(file.swatches, file.selected)
}

/// Serialize a palette in the format [`parse`] reads.
///
/// # Errors
///
/// [`PaletteError::Serialize`] if TOML serialization fails.
pub fn render(palette: &Palette) -> Result<String, PaletteError> {
    let file = PaletteFile {
        selected: palette.selected_index(),
        swatches: palette.swatches().to_vec(),
    };
    Ok(HEADER.to_owned() + &toml::to_string_pretty(&file)?)
}
