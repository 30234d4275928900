//! File collection backend
//!
//! Walks the root with walkdir and returns the ordered candidate list. At each
//! level the directory's files come first (sorted by name), then its
//! subdirectories (sorted by name), each descended depth-first.

use anyhow::Result;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::{DirEntry, WalkDir};

use crate::core::config::CollectConfig;
use crate::core::error::BundleError;
use crate::core::model::{Candidate, CandidateEntry};
use crate::core::paths::{extension_of, make_relative};

/// Collect candidate files under `root`.
///
/// `exclude` names a single path (the bundle itself) that is never returned.
pub fn collect_files(
    root: &Path,
    config: &CollectConfig,
    exclude: Option<&Path>,
) -> Result<Vec<Candidate>> {
    ensure_root(root)?;

    let mut walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by(files_then_dirs);
    if let Some(depth) = config.max_depth {
        walker = walker.max_depth(depth);
    }

    let mut candidates = Vec::new();

    let entries = walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e, config));

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();
        if entry.file_type().is_dir() || path.is_dir() {
            continue;
        }

        if !is_candidate(&entry, config) {
            trace!(path = %path.display(), "filtered out");
            continue;
        }

        if exclude.is_some_and(|target| is_same_file(path, target)) {
            debug!(path = %path.display(), "skipping bundle output");
            continue;
        }

        let relative = match make_relative(path, root) {
            Some(r) => r,
            None => continue,
        };

        candidates.push(Candidate::new(path.to_path_buf(), relative));
    }

    debug!(root = %root.display(), count = candidates.len(), "collected files");
    Ok(candidates)
}

/// Describe candidates for `--list` output
pub fn describe(candidates: &[Candidate], config: &CollectConfig) -> Vec<CandidateEntry> {
    candidates
        .iter()
        .map(|c| CandidateEntry {
            path: c.relative.clone(),
            lang: config.language_for(c.extension.as_deref()).to_string(),
            size: fs::metadata(&c.path).ok().map(|m| m.len()),
        })
        .collect()
}

fn ensure_root(root: &Path) -> Result<(), BundleError> {
    if !root.exists() {
        return Err(BundleError::RootNotFound(PathBuf::from(root)));
    }
    if !root.is_dir() {
        return Err(BundleError::RootNotDirectory(PathBuf::from(root)));
    }
    Ok(())
}

fn is_same_file(path: &Path, target: &Path) -> bool {
    if path == target {
        return true;
    }
    match (path.canonicalize(), target.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn files_then_dirs(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn is_skipped_dir(entry: &DirEntry, config: &CollectConfig) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| config.is_skipped_dir(name))
            .unwrap_or(false)
}

fn is_candidate(entry: &DirEntry, config: &CollectConfig) -> bool {
    let name = match entry.file_name().to_str() {
        Some(n) => n,
        None => return false,
    };
    if config.is_skipped_file(name) {
        return false;
    }
    extension_of(entry.path())
        .map(|ext| config.allows_extension(ext))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        File::create(path).unwrap();
    }

    fn relatives(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.relative.as_str()).collect()
    }

    #[test]
    fn test_collect_empty_dir() {
        let temp = tempdir().unwrap();
        let result = collect_files(temp.path(), &CollectConfig::default(), None).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_collect_default_filters() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "a.rs");
        touch(temp.path(), "b.txt");
        touch(temp.path(), "node_modules/c.js");
        touch(temp.path(), "Cargo.lock");

        let result = collect_files(temp.path(), &CollectConfig::default(), None).unwrap();
        assert_eq!(relatives(&result), vec!["a.rs"]);
    }

    #[test]
    fn test_collect_files_before_subdirs() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "z.rs");
        touch(temp.path(), "a/m.rs");
        touch(temp.path(), "a/b/x.rs");
        touch(temp.path(), "a/c.rs");
        touch(temp.path(), "b/a.ts");

        let result = collect_files(temp.path(), &CollectConfig::default(), None).unwrap();
        assert_eq!(
            relatives(&result),
            vec!["z.rs", "a/c.rs", "a/m.rs", "a/b/x.rs", "b/a.ts"]
        );
    }

    #[test]
    fn test_collect_skips_nested_skip_dirs() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "frontend/node_modules/pkg/index.js");
        touch(temp.path(), "backend/target/debug/build.rs");
        touch(temp.path(), "backend/src/main.rs");
        touch(temp.path(), ".git/hooks/x.json");

        let result = collect_files(temp.path(), &CollectConfig::default(), None).unwrap();
        assert_eq!(relatives(&result), vec!["backend/src/main.rs"]);
    }

    #[test]
    fn test_collect_skip_file_with_allowed_extension() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "web/package-lock.json");
        touch(temp.path(), "web/package.json");

        let result = collect_files(temp.path(), &CollectConfig::default(), None).unwrap();
        assert_eq!(relatives(&result), vec!["web/package.json"]);
    }

    #[test]
    fn test_collect_skip_dir_name_only_matches_directories() {
        let temp = tempdir().unwrap();
        // stem matches a skipped directory, but only directories are pruned
        touch(temp.path(), "build.rs");

        let result = collect_files(temp.path(), &CollectConfig::default(), None).unwrap();
        assert_eq!(relatives(&result), vec!["build.rs"]);
    }

    #[test]
    fn test_collect_root_named_like_skip_dir() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("build");
        touch(&root, "lib.rs");

        let result = collect_files(&root, &CollectConfig::default(), None).unwrap();
        assert_eq!(relatives(&result), vec!["lib.rs"]);
    }

    #[test]
    fn test_collect_dotfile_has_no_extension() {
        let temp = tempdir().unwrap();
        touch(temp.path(), ".json");
        touch(temp.path(), "x.RS");

        let result = collect_files(temp.path(), &CollectConfig::default(), None).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_collect_excludes_output() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "all_source.md");
        touch(temp.path(), "notes.md");

        let config = CollectConfig::default().with_extensions(["md"]);
        let output = temp.path().join("all_source.md");
        let result = collect_files(temp.path(), &config, Some(&output)).unwrap();
        assert_eq!(relatives(&result), vec!["notes.md"]);
    }

    #[test]
    fn test_collect_max_depth() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "top.rs");
        touch(temp.path(), "src/deep.rs");

        let config = CollectConfig::default().with_max_depth(Some(1));
        let result = collect_files(temp.path(), &config, None).unwrap();
        assert_eq!(relatives(&result), vec!["top.rs"]);
    }

    #[test]
    fn test_collect_is_deterministic() {
        let temp = tempdir().unwrap();
        for name in ["q.rs", "b/c.ts", "a.json", "b/a/z.css", "C.toml"] {
            touch(temp.path(), name);
        }

        let config = CollectConfig::default();
        let first = collect_files(temp.path(), &config, None).unwrap();
        let second = collect_files(temp.path(), &config, None).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            relatives(&first),
            vec!["C.toml", "a.json", "q.rs", "b/c.ts", "b/a/z.css"]
        );
    }

    #[test]
    fn test_collect_missing_root() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("nope");
        let err = collect_files(&missing, &CollectConfig::default(), None).unwrap_err();
        assert!(err.to_string().contains("root directory not found"));
    }

    #[test]
    fn test_collect_root_is_file() {
        let temp = tempdir().unwrap();
        touch(temp.path(), "file.rs");
        let err =
            collect_files(&temp.path().join("file.rs"), &CollectConfig::default(), None)
                .unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_describe() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("main.rs"), "fn main() {}").unwrap();

        let config = CollectConfig::default();
        let candidates = collect_files(temp.path(), &config, None).unwrap();
        let entries = describe(&candidates, &config);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "main.rs");
        assert_eq!(entries[0].lang, "rust");
        assert_eq!(entries[0].size, Some(12));
    }
}
