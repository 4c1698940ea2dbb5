//! Inline span parsing for bold, italic and inline code.

use crate::block::Span;

/// Inline delimiters in priority order at a given position.
#[derive(Clone, Copy)]
enum Delimiter {
    Code,
    Bold,
    Italic,
}

impl Delimiter {
    /// Delimiter opening at the start of `text`, which begins with '`' or '*'.
    fn opening(text: &str) -> Self {
        if text.starts_with('`') {
            Delimiter::Code
        } else if text.starts_with("**") {
            Delimiter::Bold
        } else {
            Delimiter::Italic
        }
    }

    fn marker(self) -> &'static str {
        match self {
            Delimiter::Code => "`",
            Delimiter::Bold => "**",
            Delimiter::Italic => "*",
        }
    }

    /// Offset of the closing marker in `body`, the text after the opener.
    fn closing(self, body: &str) -> Option<usize> {
        match self {
            Delimiter::Code | Delimiter::Bold => body.find(self.marker()),
            // A single `*` that is not half of a `**` pair; a `*` at offset 0
            // touches the opener.
            Delimiter::Italic => {
                let bytes = body.as_bytes();
                body.match_indices('*').map(|(i, _)| i).find(|&i| {
                    i > 0 && bytes[i - 1] != b'*' && bytes.get(i + 1) != Some(&b'*')
                })
            }
        }
    }

    fn span(self, text: &str) -> Span {
        match self {
            Delimiter::Code => Span::Code(text.to_string()),
            Delimiter::Bold => Span::Bold(text.to_string()),
            Delimiter::Italic => Span::Italic(text.to_string()),
        }
    }
}

/// Parse a single line into inline spans.
///
/// Scans left to right. An opening delimiter without a matching closer before
/// the end of the line turns itself and the rest of the line into plain text,
/// so the visible characters always survive. Adjacent plain text is merged
/// into one `Plain` span.
pub fn parse_spans(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut rest = line;

    while let Some(pos) = rest.find(['`', '*']) {
        plain.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let delimiter = Delimiter::opening(tail);
        let marker = delimiter.marker();
        let body = &tail[marker.len()..];

        match delimiter.closing(body) {
            Some(end) => {
                flush_plain(&mut plain, &mut spans);
                spans.push(delimiter.span(&body[..end]));
                rest = &body[end + marker.len()..];
            }
            None => {
                plain.push_str(tail);
                rest = "";
                break;
            }
        }
    }

    plain.push_str(rest);
    flush_plain(&mut plain, &mut spans);
    spans
}

fn flush_plain(plain: &mut String, spans: &mut Vec<Span>) {
    if !plain.is_empty() {
        spans.push(Span::Plain(std::mem::take(plain)));
    }
}
