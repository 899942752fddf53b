//! Input resources and line decoding
//!
//! Exports are small, so each input is read into memory once and decoded as
//! UTF-8, replacing undecodable bytes rather than failing.

use std::path::Path;
use tracing::debug;

use crate::{Error, Result};

/// One named input resource held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Identifying name used to key results and report failures
    pub name: String,
    /// Raw file content
    pub bytes: Vec<u8>,
}

impl InputFile {
    /// Wrap bytes that were obtained elsewhere (an upload, a test fixture)
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, naming it after its file name
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = name_for_path(path);

        let bytes = std::fs::read(path).map_err(|e| {
            Error::io(
                name.clone(),
                format!("Failed to read file {}", path.display()),
                e,
            )
        })?;

        debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(Self { name, bytes })
    }

    /// Decode the content into lines
    pub fn lines(&self) -> RawLines {
        RawLines::decode(&self.bytes)
    }
}

/// Identifying name of a file on disk: its file name, or the full path without one
pub fn name_for_path(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Decoded text lines of one input, in file order, without line terminators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLines {
    lines: Vec<String>,
}

impl RawLines {
    /// Decode bytes leniently, dropping a leading byte-order mark
    pub fn decode(bytes: &[u8]) -> Self {
        let decoded = String::from_utf8_lossy(bytes);
        let text: &str = decoded.strip_prefix('\u{feff}').unwrap_or(&decoded);
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }
}

impl From<&str> for RawLines {
    fn from(text: &str) -> Self {
        Self::decode(text.as_bytes())
    }
}
