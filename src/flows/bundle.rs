//! Bundle flow - collect, render and write the source document
//!
//! The document is built in memory and written with a single call, replacing
//! any previous bundle.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::backends::collect::{collect_files, describe};
use crate::core::config::CollectConfig;
use crate::core::error::BundleError;
use crate::core::model::{BundleSummary, Candidate};
use crate::core::paths::display_name;
use crate::core::render::{RenderedDocument, Renderer};
use crate::core::tokenizer::{count_tokens, TokenModel};

/// Where the rendered document goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Write to the output file
    #[default]
    File,
    /// Print the document to stdout
    Stdout,
    /// Print the candidate list as JSON lines, render nothing
    List,
}

/// Options for a bundle run
#[derive(Debug, Clone)]
pub struct BundleOptions {
    /// Output file (already resolved against root)
    pub output: PathBuf,
    /// Document title; derived from the root name when absent
    pub title: Option<String>,
    pub mode: OutputMode,
    /// Token model for `--stats`; no counting when absent
    pub token_model: Option<TokenModel>,
}

impl BundleOptions {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            title: None,
            mode: OutputMode::default(),
            token_model: None,
        }
    }
}

/// Default document title for a root directory
pub fn default_title(root: &Path) -> String {
    format!("{} - Full Source Code", display_name(root))
}

/// Collect and render without touching the output file
pub fn render_bundle(
    root: &Path,
    config: &CollectConfig,
    options: &BundleOptions,
) -> Result<(Vec<Candidate>, RenderedDocument)> {
    let candidates = collect_files(root, config, Some(&options.output))?;
    let title = options
        .title
        .clone()
        .unwrap_or_else(|| default_title(root));
    let doc = Renderer::new(config).render(&title, &candidates);
    Ok((candidates, doc))
}

/// Render and write the bundle to `options.output`
pub fn write_bundle(
    root: &Path,
    config: &CollectConfig,
    options: &BundleOptions,
) -> Result<BundleSummary> {
    let (candidates, doc) = render_bundle(root, config, options)?;

    fs::write(&options.output, &doc.text).map_err(|source| BundleError::WriteOutput {
        path: options.output.clone(),
        source,
    })?;
    debug!(path = %options.output.display(), bytes = doc.text.len(), "bundle written");

    let mut summary = summarize(&candidates, &doc, options.token_model);
    summary.output = Some(options.output.clone());
    Ok(summary)
}

fn summarize(
    candidates: &[Candidate],
    doc: &RenderedDocument,
    token_model: Option<TokenModel>,
) -> BundleSummary {
    BundleSummary {
        files: candidates.len(),
        errors: doc.errors,
        lossy: doc.lossy,
        bytes: doc.text.len(),
        tokens: token_model.map(|model| count_tokens(&doc.text, model)),
        output: None,
    }
}

/// Run the bundle command
pub fn run_bundle(root: &Path, config: &CollectConfig, options: &BundleOptions) -> Result<()> {
    match options.mode {
        OutputMode::List => {
            let candidates = collect_files(root, config, Some(&options.output))?;
            for entry in describe(&candidates, config) {
                let line = serde_json::to_string(&entry).context("serialize candidate")?;
                println!("{}", line);
            }
            info!(files = candidates.len(), "listed candidates");
        }
        OutputMode::Stdout => {
            let (candidates, doc) = render_bundle(root, config, options)?;
            print!("{}", doc.text);
            let summary = summarize(&candidates, &doc, options.token_model);
            info!(files = summary.files, "bundle printed to stdout");
            log_stats(&summary, options.token_model);
        }
        OutputMode::File => {
            let summary = write_bundle(root, config, options)?;
            println!(
                "Written {} files to {}",
                summary.files,
                options.output.display().to_string().bold()
            );
            log_stats(&summary, options.token_model);
        }
    }
    Ok(())
}

fn log_stats(summary: &BundleSummary, token_model: Option<TokenModel>) {
    if let (Some(tokens), Some(model)) = (summary.tokens, token_model) {
        info!(
            files = summary.files,
            errors = summary.errors,
            lossy = summary.lossy,
            bytes = summary.bytes,
            tokens,
            model = %model,
            "bundle statistics"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(root: &Path, relative: &str, content: &[u8]) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_default_title() {
        assert_eq!(
            default_title(Path::new("/work/gdml-studio")),
            "gdml-studio - Full Source Code"
        );
    }

    #[test]
    fn test_write_bundle_scenario() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        write(root, "a.rs", b"fn a() {}");
        write(root, "b.txt", b"text");
        write(root, "node_modules/c.js", b"c()");
        write(root, "Cargo.lock", b"# lock");

        let options = BundleOptions {
            title: Some("Demo".to_string()),
            ..BundleOptions::new(root.join("all_source.md"))
        };
        let summary = write_bundle(root, &CollectConfig::default(), &options).unwrap();
        assert_eq!(summary.files, 1);
        assert_eq!(summary.errors, 0);
        assert!(summary.tokens.is_none());

        let text = fs::read_to_string(root.join("all_source.md")).unwrap();
        assert_eq!(
            text,
            "# Demo\n\n## Table of Contents\n\n- [`a.rs`](#ars)\n\n---\n\n\
## `a.rs`\n\n```rust\nfn a() {}\n```\n\n---\n\n"
        );
        assert_eq!(summary.bytes, text.len());
    }

    #[test]
    fn test_write_bundle_is_idempotent() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        write(root, "src/lib.rs", b"pub mod a;");
        write(root, "src/a.rs", b"pub fn a() {}");
        write(root, "Cargo.toml", b"[package]");

        let config = CollectConfig::default().with_extensions(["rs", "toml", "md"]);
        let options = BundleOptions::new(root.join("all_source.md"));

        write_bundle(root, &config, &options).unwrap();
        let first = fs::read(root.join("all_source.md")).unwrap();
        let summary = write_bundle(root, &config, &options).unwrap();
        let second = fs::read(root.join("all_source.md")).unwrap();

        assert_eq!(first, second);
        assert_eq!(summary.files, 3);
    }

    #[test]
    fn test_write_bundle_decode_error_continues() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        write(root, "a_bad.rs", &[0xC3, 0x28, 0xFF]);
        write(root, "b_good.rs", b"fn ok() {}");

        let options = BundleOptions::new(root.join("out.md"));
        let summary = write_bundle(root, &CollectConfig::default(), &options).unwrap();
        assert_eq!(summary.files, 2);
        assert_eq!(summary.errors, 1);

        let text = fs::read_to_string(root.join("out.md")).unwrap();
        assert!(text.contains("## `a_bad.rs`\n\n*Error reading file: "));
        assert!(text.contains("```rust\nfn ok() {}\n```"));
    }

    #[test]
    fn test_write_bundle_with_token_stats() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        write(root, "main.rs", b"fn main() { println!(\"hi\"); }");

        let options = BundleOptions {
            token_model: Some(TokenModel::Heuristic),
            ..BundleOptions::new(root.join("out.md"))
        };
        let summary = write_bundle(root, &CollectConfig::default(), &options).unwrap();
        assert!(summary.tokens.unwrap() > 0);
    }

    #[test]
    fn test_write_bundle_unwritable_output() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        write(root, "main.rs", b"fn main() {}");

        let options = BundleOptions::new(root.join("missing_dir/out.md"));
        let err = write_bundle(root, &CollectConfig::default(), &options).unwrap_err();
        assert!(err.to_string().contains("failed to write bundle"));
    }
}
