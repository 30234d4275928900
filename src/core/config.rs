//! Collection configuration
//!
//! The defaults describe a typical Rust + TypeScript web project. The CLI
//! replaces the extension set and extends the skip sets.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::file_reader::EncodingStrategy;

/// Default output file name, written inside the root
pub const DEFAULT_OUTPUT_NAME: &str = "all_source.md";

/// Extensions bundled by default (without the leading dot)
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "rs", "ts", "tsx", "js", "jsx", "css", "html", "toml", "json",
];

/// Directory names never descended into
pub const DEFAULT_SKIP_DIRS: &[&str] = &[
    "node_modules",
    "target",
    ".git",
    "dist",
    "build",
    "sample_data",
];

/// File names never bundled, even when the extension matches
pub const DEFAULT_SKIP_FILES: &[&str] = &["package-lock.json", "Cargo.lock"];

/// Extension to Markdown code-fence language
pub const DEFAULT_LANGUAGES: &[(&str, &str)] = &[
    ("rs", "rust"),
    ("toml", "toml"),
    ("ts", "typescript"),
    ("tsx", "tsx"),
    ("js", "javascript"),
    ("jsx", "jsx"),
    ("css", "css"),
    ("html", "html"),
    ("json", "json"),
];

/// Everything the collector and renderer need to know
#[derive(Debug, Clone)]
pub struct CollectConfig {
    /// Allowed extensions (case-sensitive, no leading dot)
    pub extensions: BTreeSet<String>,

    /// Directory names pruned from the walk
    pub skip_dirs: BTreeSet<String>,

    /// File names excluded from the bundle
    pub skip_files: BTreeSet<String>,

    /// Language hint per extension
    pub languages: BTreeMap<String, String>,

    /// Maximum walk depth (root-level files are depth 1)
    pub max_depth: Option<usize>,

    /// How to treat files that are not valid UTF-8
    pub encoding: EncodingStrategy,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            extensions: to_set(DEFAULT_EXTENSIONS),
            skip_dirs: to_set(DEFAULT_SKIP_DIRS),
            skip_files: to_set(DEFAULT_SKIP_FILES),
            languages: DEFAULT_LANGUAGES
                .iter()
                .map(|(ext, lang)| (ext.to_string(), lang.to_string()))
                .collect(),
            max_depth: None,
            encoding: EncodingStrategy::default(),
        }
    }
}

impl CollectConfig {
    /// Replace the allowed extensions. Leading dots are accepted and stripped.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    /// Add directory names to the skip set
    pub fn skip_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_dirs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add file names to the skip set
    pub fn skip_files<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_files.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_encoding(mut self, encoding: EncodingStrategy) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn allows_extension(&self, ext: &str) -> bool {
        self.extensions.contains(ext)
    }

    pub fn is_skipped_dir(&self, name: &str) -> bool {
        self.skip_dirs.contains(name)
    }

    pub fn is_skipped_file(&self, name: &str) -> bool {
        self.skip_files.contains(name)
    }

    /// Code-fence language for an extension; empty when unmapped
    pub fn language_for(&self, ext: Option<&str>) -> &str {
        ext.and_then(|e| self.languages.get(e))
            .map(String::as_str)
            .unwrap_or("")
    }
}

fn to_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}
