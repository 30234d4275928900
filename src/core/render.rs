//! Renderer module
//!
//! Renders an ordered candidate list into a single Markdown document:
//! title, table of contents, then one fenced section per file.

use tracing::{debug, warn};

use crate::core::config::CollectConfig;
use crate::core::file_reader::{read_source, FileReadResult};
use crate::core::model::Candidate;

/// Heading of the table-of-contents block
pub const TOC_HEADING: &str = "## Table of Contents";

/// Prefix of the marker that replaces unreadable file content
pub const ERROR_MARKER_PREFIX: &str = "*Error reading file:";

/// A fully rendered bundle
#[derive(Debug, Clone, Default)]
pub struct RenderedDocument {
    pub text: String,

    /// Number of sections rendered as an error marker
    pub errors: usize,

    /// Number of sections decoded lossily
    pub lossy: usize,
}

/// Renderer for bundle documents
pub struct Renderer<'a> {
    config: &'a CollectConfig,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a CollectConfig) -> Self {
        Self { config }
    }

    /// Render the whole document, reading each candidate from disk
    pub fn render(&self, title: &str, candidates: &[Candidate]) -> RenderedDocument {
        self.render_with(title, candidates, |c| {
            read_source(&c.path, self.config.encoding)
        })
    }

    /// Render using a caller-supplied reader
    pub fn render_with<F>(
        &self,
        title: &str,
        candidates: &[Candidate],
        mut read: F,
    ) -> RenderedDocument
    where
        F: FnMut(&Candidate) -> FileReadResult,
    {
        let mut doc = RenderedDocument::default();
        let out = &mut doc.text;

        out.push_str(&format!("# {}\n\n", title));
        render_toc(out, candidates);

        for candidate in candidates {
            let result = read(candidate);
            if result.lossy_conversion {
                warn!(path = %candidate.relative, "invalid UTF-8 replaced");
                doc.lossy += 1;
            }
            match (&result.content, &result.skip_reason) {
                (Some(content), _) => {
                    let lang = self.config.language_for(candidate.extension.as_deref());
                    render_section(out, &candidate.relative, lang, content);
                }
                (None, reason) => {
                    let reason = reason.as_deref().unwrap_or("unknown error");
                    warn!(path = %candidate.relative, %reason, "could not read file");
                    render_error_section(out, &candidate.relative, reason);
                    doc.errors += 1;
                }
            }
        }

        debug!(
            files = candidates.len(),
            errors = doc.errors,
            bytes = doc.text.len(),
            "document rendered"
        );
        doc
    }
}

fn render_toc(out: &mut String, candidates: &[Candidate]) {
    out.push_str(TOC_HEADING);
    out.push_str("\n\n");
    for candidate in candidates {
        out.push_str(&format!(
            "- [`{}`](#{})\n",
            candidate.relative,
            candidate.anchor()
        ));
    }
    out.push_str("\n---\n\n");
}

fn render_section(out: &mut String, relative: &str, lang: &str, content: &str) {
    out.push_str(&format!("## `{}`\n\n", relative));
    out.push_str(&format!("```{}\n{}\n```\n\n---\n\n", lang, content));
}

fn render_error_section(out: &mut String, relative: &str, reason: &str) {
    out.push_str(&format!("## `{}`\n\n", relative));
    out.push_str(&format!("{} {}*\n\n---\n\n", ERROR_MARKER_PREFIX, reason));
}
