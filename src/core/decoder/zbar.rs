//! Decoder backed by the `zbarimg` command-line tool.

use super::{BarcodeDecoder, Reading, Symbology};
use crate::error::DecodeError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// zbarimg exits with 4 when the image decoded but held no symbols
const EXIT_NO_SYMBOLS: i32 = 4;

/// Runs `zbarimg --quiet <image>` and parses its `TYPE:DATA` lines
#[derive(Debug, Clone)]
pub struct ZbarDecoder {
    program: PathBuf,
}

impl ZbarDecoder {
    /// Use `zbarimg` from `PATH`
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("zbarimg"),
        }
    }

    /// Use a specific zbarimg binary
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Parse zbarimg output. Lines without a `TYPE:` prefix are ignored.
    pub fn parse_output(stdout: &str) -> Vec<Reading> {
        stdout
            .lines()
            .filter_map(|line| {
                let line = line.trim_end_matches('\r');
                let (tag, data) = line.split_once(':')?;
                if tag.is_empty() || tag.contains(char::is_whitespace) {
                    return None;
                }
                Some(Reading::from_symbol(Symbology::from_tag(tag), data))
            })
            .collect()
    }
}

impl Default for ZbarDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BarcodeDecoder for ZbarDecoder {
    fn decode(&self, image: &Path) -> Result<Vec<Reading>, DecodeError> {
        let output = Command::new(&self.program)
            .arg("--quiet")
            .arg(image)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => DecodeError::ToolNotFound {
                    tool: self.program.clone(),
                },
                _ => DecodeError::Io {
                    path: image.to_path_buf(),
                    source: e,
                },
            })?;

        match output.status.code() {
            Some(0) => Ok(Self::parse_output(&String::from_utf8_lossy(&output.stdout))),
            Some(EXIT_NO_SYMBOLS) => Ok(Vec::new()),
            code => Err(DecodeError::ToolFailed {
                path: image.to_path_buf(),
                code,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }
}
