//! Path normalization utilities
//!
//! All paths shown in the bundle use '/' as separator and are relative to root.

use std::path::{Path, PathBuf};

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Resolve a user-supplied path against root unless it is already absolute
pub fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Derive the table-of-contents anchor for a relative path.
///
/// Separators, dots and underscores are dropped and the rest lowercased,
/// so `src/app.rs` becomes `srcapprs`.
pub fn anchor_for(relative: &str) -> String {
    relative
        .chars()
        .filter(|c| !matches!(c, '/' | '.' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Extension of a path without the leading dot.
///
/// Dotfiles such as `.json` have no extension.
pub fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

/// Last component of a path, or the whole path when there is none
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
