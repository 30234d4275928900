//! Bundle data model
//!
//! Candidates flow from the collector into the renderer; the summary is what
//! a run reports back.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::paths::anchor_for;

/// A file selected for inclusion in the bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Absolute (or root-joined) path used for reading
    pub path: PathBuf,

    /// Path relative to root, using '/' as separator
    pub relative: String,

    /// Extension without the leading dot
    pub extension: Option<String>,
}

impl Candidate {
    pub fn new(path: PathBuf, relative: impl Into<String>) -> Self {
        let extension = crate::core::paths::extension_of(&path).map(str::to_string);
        Self {
            path,
            relative: relative.into(),
            extension,
        }
    }

    /// Table-of-contents anchor for this file
    pub fn anchor(&self) -> String {
        anchor_for(&self.relative)
    }
}

/// One line of `--list` output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateEntry {
    pub path: String,

    /// Code-fence language (empty when unmapped)
    pub lang: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Outcome of a bundle run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleSummary {
    /// Files written into the document (including those with error markers)
    pub files: usize,

    /// Files rendered as an error marker
    pub errors: usize,

    /// Files decoded with replacement characters
    pub lossy: usize,

    /// Size of the rendered document in bytes
    pub bytes: usize,

    /// Token estimate, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<usize>,

    /// Where the document was written (None when printed to stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}
