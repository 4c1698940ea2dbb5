use serde::{Deserialize, Serialize};

/// Inline text spans with formatting.
///
/// Spans never nest: the text of a `Bold` span is rendered bold as a whole,
/// even if it contains characters that would otherwise open another span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Span {
    Plain(String),
    Bold(String),
    Italic(String),
    Code(String),
}

impl Span {
    /// The visible text of the span, without delimiter markers.
    pub fn text(&self) -> &str {
        match self {
            Span::Plain(text) | Span::Bold(text) | Span::Italic(text) | Span::Code(text) => text,
        }
    }
}

/// Concatenated visible text of a run of spans.
pub fn spans_text(spans: &[Span]) -> String {
    spans.iter().map(Span::text).collect()
}

/// Block-level elements of a rendered message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// Heading text is kept verbatim; inline markers are not interpreted.
    Header {
        level: u8,
        text: String,
    },
    Paragraph {
        spans: Vec<Span>,
    },
    BulletItem {
        spans: Vec<Span>,
    },
    /// `index` is the numeral as written in the source, never renumbered.
    NumberedItem {
        index: u64,
        spans: Vec<Span>,
    },
    /// Every row has exactly `headers.len()` cells.
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Blank,
}

impl Block {
    /// Inline spans of the block, for the kinds that carry them.
    pub fn spans(&self) -> Option<&[Span]> {
        match self {
            Block::Paragraph { spans }
            | Block::BulletItem { spans }
            | Block::NumberedItem { spans, .. } => Some(spans),
            Block::Header { .. } | Block::Table { .. } | Block::Blank => None,
        }
    }
}
