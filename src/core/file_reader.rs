//! Source file reading
//!
//! Reads a whole file and decodes it as UTF-8. Failures never propagate:
//! they come back as a skip reason the renderer turns into an inline marker.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Strategy for handling non-UTF-8 content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingStrategy {
    /// Report the file as unreadable
    #[default]
    Strict,
    /// Use lossy conversion (replace invalid bytes with U+FFFD)
    Lossy,
}

/// Result of reading a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReadResult {
    /// The file content (if successfully read)
    pub content: Option<String>,

    /// Whether lossy conversion was used
    pub lossy_conversion: bool,

    /// Reason the content is missing
    pub skip_reason: Option<String>,
}

impl FileReadResult {
    /// Create a successful read result
    pub fn success(content: String) -> Self {
        Self {
            content: Some(content),
            lossy_conversion: false,
            skip_reason: None,
        }
    }

    /// Create a skipped result
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            content: None,
            lossy_conversion: false,
            skip_reason: Some(reason.into()),
        }
    }

    /// Mark as lossy conversion
    pub fn with_lossy(mut self) -> Self {
        self.lossy_conversion = true;
        self
    }
}

/// Read a source file with the given encoding strategy
pub fn read_source(path: &Path, strategy: EncodingStrategy) -> FileReadResult {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => return FileReadResult::skipped(e.to_string()),
    };

    match String::from_utf8(bytes) {
        Ok(content) => FileReadResult::success(content),
        Err(e) => match strategy {
            EncodingStrategy::Strict => FileReadResult::skipped(e.to_string()),
            EncodingStrategy::Lossy => {
                FileReadResult::success(String::from_utf8_lossy(e.as_bytes()).into_owned())
                    .with_lossy()
            }
        },
    }
}
