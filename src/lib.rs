//! Incremental structured-content renderer for streamed assistant messages.
//!
//! The text of a message is re-parsed from scratch every time it grows. Each
//! parse turns the text into a [`Document`] of [`Block`]s; [`is_artifact`]
//! decides whether the message should be shown as a structured artifact or as
//! plain prose.

mod block;
mod classify;
mod config;
mod document;
mod error;
mod inline;
mod parser;
mod stream;
mod table;
mod typst;

pub use block::{Block, Span, spans_text};
pub use classify::is_artifact;
pub use config::Config;
pub use document::{Document, KeyedBlock, assemble};
pub use error::{Error, Result};
pub use inline::parse_spans;
pub use parser::{ParseMode, segment, segment_complete, segment_with};
pub use stream::{StreamingMessage, settled_prefix};
pub use typst::document_to_typst;

use serde::Serialize;
use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

/// How the consumer should present a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Rendered<'a> {
    Artifact { document: Document },
    Prose { text: &'a str },
}

/// Parse text that may still be streaming in.
pub fn parse(text: &str) -> Document {
    assemble(segment(text))
}

/// Parse text that is known to be final.
pub fn parse_complete(text: &str) -> Document {
    assemble(segment_complete(text))
}

/// Classify and, for artifacts, parse a streaming message.
pub fn render(text: &str) -> Rendered<'_> {
    render_with(text, ParseMode::Streaming)
}

pub fn render_with(text: &str, mode: ParseMode) -> Rendered<'_> {
    if is_artifact(text) {
        Rendered::Artifact {
            document: assemble(segment_with(text, mode)),
        }
    } else {
        Rendered::Prose { text }
    }
}

/// Compile a document to PDF bytes.
pub fn document_to_pdf(doc: &Document, config: &Config) -> Result<Vec<u8>> {
    use typst_library::layout::PagedDocument;

    let typst_content = document_to_typst(doc, config);

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    let compiled: PagedDocument = engine
        .compile()
        .output
        .map_err(|e| Error::Typst(format!("{e:?}")))?;

    tracing::debug!(pages = compiled.pages.len(), "compiled document");

    typst_pdf::pdf(&compiled, &PdfOptions::default()).map_err(|e| Error::Pdf(format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_from_mixed_document() {
        let doc = parse_complete(
            "## Visit plan\n**Bold** *it* `code` and un**believ**able **Note**s\n| A | B |\n|---|---|\n| 1 | 2 |\n1. one\n3. three\n  1. not a list",
        );
        let pdf = document_to_pdf(&doc, &Config::default()).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn pdf_from_empty_document() {
        let pdf = document_to_pdf(&Document::default(), &Config::default()).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }
}
