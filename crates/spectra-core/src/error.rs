// SPDX-License-Identifier: MIT
//
// Error types for the palette collaborators.
//
// The spectrum engine itself has no error surface: widths and deltas are
// well-formed by construction and every index goes through modulo
// arithmetic. Only the parts that touch the outside world (the palette
// file, user-supplied configuration) can fail.

use std::path::PathBuf;

/// Failures loading, saving or editing a palette.
#[derive(thiserror::Error, Debug)]
pub enum PaletteError {
    /// Reading or writing the palette file failed.
    #[error("palette file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The palette file is not valid TOML or does not describe a palette.
    /// `line` is 1-based when the parser could point at one.
    #[error("palette {}: {reason}", location(*.line))]
    Parse { line: Option<usize>, reason: String },
    /// The palette file contained no swatches.
    #[error("palette has no swatches")]
    Empty,
    /// The palette could not be written out as TOML.
    #[error("palette could not be serialized: {0}")]
    Serialize(#[from] toml::ser::Error),
}

fn location(line: Option<usize>) -> String {
    line.map_or_else(|| "file".to_owned(), |n| format!("line {n}"))
}

impl PaletteError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a TOML error, turning its byte span in `text` into a line.
    pub(crate) fn parse(text: &str, err: &toml::de::Error) -> Self {
        let line = err
            .span()
            .and_then(|span| text.get(..span.start))
            .map(|before| before.matches('\n').count() + 1);
        Self::Parse {
            line,
            reason: err.message().to_owned(),
        }
    }
}

/// Rejected configuration values.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("hue table step must be a finite number in (0, 360], got {0}")]
    TableStep(f64),
    #[error("{name} must be a positive finite number, got {value}")]
    Step { name: &'static str, value: f64 },
    #[error("minimap step cap must be at least 1")]
    MiniStepCap,
}

/// An unrecognized `--format` value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown format {0:?}")]
pub struct UnknownFormat(pub String);
