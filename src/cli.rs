//! CLI module - Command-line interface definition and handler

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::core::config::{CollectConfig, DEFAULT_OUTPUT_NAME};
use crate::core::file_reader::EncodingStrategy;
use crate::core::paths::resolve_against;
use crate::core::tokenizer::TokenModel;
use crate::flows::bundle::{run_bundle, BundleOptions, OutputMode};

/// srcbundle - package a project's source files into one Markdown document.
#[derive(Parser, Debug)]
#[command(name = "srcbundle")]
#[command(
    author,
    version,
    about,
    long_about = r#"srcbundle walks ROOT, keeps files whose extension is allowed and that are
not inside a skipped directory, and writes them into a single Markdown file:
a title, a table of contents, then one fenced code block per file.

Traversal is sorted (files first, then subdirectories, by name at every level),
so an unchanged tree always produces a byte-identical bundle.

Defaults:
- extensions: rs ts tsx js jsx css html toml json
- skipped directories: node_modules target .git dist build sample_data
- skipped files: package-lock.json Cargo.lock

Examples:
    srcbundle
    srcbundle ../my-project -o /tmp/project.md
    srcbundle --ext rs,toml --skip-dir fixtures
    srcbundle --list
    srcbundle --stdout --stats | pbcopy
"#
)]
pub struct Cli {
    /// Root directory to bundle.
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Output file (relative to ROOT unless absolute).
    #[arg(
        short,
        long,
        env = "SRCBUNDLE_OUTPUT",
        value_name = "FILE",
        long_help = "Output file for the bundle. Relative paths are resolved against ROOT.\n\n\
Defaults to all_source.md inside ROOT. An existing file is overwritten, and the\n\
output file itself is never bundled."
    )]
    pub output: Option<PathBuf>,

    /// Document title.
    #[arg(
        long,
        env = "SRCBUNDLE_TITLE",
        value_name = "TEXT",
        long_help = "Title of the bundle's top-level heading.\n\n\
Defaults to \"<root directory name> - Full Source Code\"."
    )]
    pub title: Option<String>,

    /// Allowed extensions (comma-separated, replaces the defaults).
    #[arg(long = "ext", value_name = "EXT", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Extra directory names to skip (comma-separated).
    #[arg(long = "skip-dir", value_name = "NAME", value_delimiter = ',')]
    pub skip_dirs: Vec<String>,

    /// Extra file names to skip (comma-separated).
    #[arg(long = "skip-file", value_name = "NAME", value_delimiter = ',')]
    pub skip_files: Vec<String>,

    /// Maximum directory depth (root-level files are depth 1).
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Replace invalid UTF-8 instead of emitting an error marker.
    #[arg(
        long,
        long_help = "Decode files that are not valid UTF-8 with replacement characters.\n\n\
By default such files are rendered as an inline \"Error reading file\" marker."
    )]
    pub lossy: bool,

    /// Print the candidate files as JSON lines and exit.
    #[arg(long, conflicts_with = "stdout")]
    pub list: bool,

    /// Print the bundle to stdout instead of writing the output file.
    #[arg(long)]
    pub stdout: bool,

    /// Log byte and token statistics on stderr.
    #[arg(long)]
    pub stats: bool,

    /// Token model used by --stats (cl100k/o200k/heuristic).
    #[arg(long, default_value = "cl100k", value_name = "MODEL")]
    pub token_model: String,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Log level implied by the flags; RUST_LOG takes precedence
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else if self.stats {
            "info"
        } else {
            "warn"
        }
    }

    /// Build the collection config from the defaults and the flags
    pub fn collect_config(&self) -> CollectConfig {
        let mut config = CollectConfig::default()
            .skip_dirs(self.skip_dirs.iter().cloned())
            .skip_files(self.skip_files.iter().cloned())
            .with_max_depth(self.max_depth);
        if !self.extensions.is_empty() {
            config = config.with_extensions(&self.extensions);
        }
        if self.lossy {
            config = config.with_encoding(EncodingStrategy::Lossy);
        }
        config
    }

    pub fn output_mode(&self) -> OutputMode {
        if self.list {
            OutputMode::List
        } else if self.stdout {
            OutputMode::Stdout
        } else {
            OutputMode::File
        }
    }
}

/// Install the stderr tracing subscriber
pub fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    setup_logging(cli.log_level());

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = cli.collect_config();
    let token_model = if cli.stats {
        Some(cli.token_model.parse::<TokenModel>().map_err(|e| anyhow!(e))?)
    } else {
        None
    };

    // Get absolute root path
    let root = cli.root.canonicalize().unwrap_or_else(|_| cli.root.clone());
    let output = resolve_against(
        &root,
        cli.output
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_OUTPUT_NAME)),
    );
    debug!(root = %root.display(), output = %output.display(), ?config, "starting bundle");

    let options = BundleOptions {
        title: cli.title.clone(),
        mode: cli.output_mode(),
        token_model,
        ..BundleOptions::new(output)
    };
    run_bundle(&root, &config, &options)
}
