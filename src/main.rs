//! srcbundle - bundle a project's source files into one Markdown document
//!
//! srcbundle provides:
//! - Deterministic, filtered directory traversal
//! - A Markdown document with a table of contents and one fenced block per file
//! - Inline error markers for files that cannot be decoded

use anyhow::Result;
use clap::Parser;

mod backends;
mod cli;
mod core;
mod flows;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
