use crate::block::{Block, Span};
use crate::config::Config;
use crate::document::Document;

/// Convert a document to Typst markup
pub fn document_to_typst(doc: &Document, config: &Config) -> String {
    let blocks: Vec<&Block> = doc.iter().collect();
    let mut out = String::new();

    emit_preamble(config, &mut out);

    let mut i = 0;
    while i < blocks.len() {
        let block = blocks[i];

        match block {
            Block::Header { level, text } => {
                // Keep the heading on the same page as the paragraph or table under it
                let next = blocks.get(i + 1).filter(|next| {
                    matches!(next, Block::Paragraph { .. } | Block::Table { .. })
                });
                match next {
                    Some(next) => {
                        out.push_str("#block(breakable: false)[\n");
                        emit_heading(*level, text, &mut out);
                        emit_block(next, config, &mut out);
                        out.push_str("]\n\n");
                        i += 1;
                    }
                    None => emit_heading(*level, text, &mut out),
                }
            }
            _ => emit_block(block, config, &mut out),
        }

        // A list ends where the next block is not an item of the same kind
        let ends_list = match (block, blocks.get(i + 1)) {
            (Block::BulletItem { .. }, Some(Block::BulletItem { .. })) => false,
            (Block::NumberedItem { .. }, Some(Block::NumberedItem { .. })) => false,
            (Block::BulletItem { .. } | Block::NumberedItem { .. }, _) => true,
            _ => false,
        };
        if ends_list {
            out.push('\n');
        }

        i += 1;
    }

    out
}

fn emit_preamble(config: &Config, out: &mut String) {
    out.push_str(&format!("#set page(paper: {:?}", config.page.paper));
    if config.page.numbers {
        out.push_str(", numbering: \"1\"");
    }
    out.push_str(")\n");
    out.push_str(&format!("#set text(size: {})\n", config.text.size));
    out.push_str("#set par(linebreaks: \"optimized\")\n\n");
}

fn emit_heading(level: u8, text: &str, out: &mut String) {
    for _ in 0..level {
        out.push('=');
    }
    out.push(' ');
    escape_into(text, out);
    out.push_str("\n\n");
}

fn emit_block(block: &Block, config: &Config, out: &mut String) {
    match block {
        Block::Header { level, text } => emit_heading(*level, text, out),
        Block::Paragraph { spans } => {
            spans_to_typst(spans, out);
            out.push_str("\n\n");
        }
        Block::BulletItem { spans } => {
            out.push_str("- ");
            spans_to_typst(spans, out);
            out.push('\n');
        }
        Block::NumberedItem { index, spans } => {
            out.push_str(&format!("#enum.item({index})["));
            spans_to_typst(spans, out);
            out.push_str("]\n");
        }
        Block::Table { headers, rows } => table_to_typst(headers, rows, config, out),
        Block::Blank => {
            out.push_str(&format!("#v({})\n\n", config.blank.spacing));
        }
    }
}

/// Write a run of spans that starts a line or a content block.
fn spans_to_typst(spans: &[Span], out: &mut String) {
    let mut line_start = true;
    let mut after_call = false;
    for span in spans {
        if span.text().is_empty() {
            continue;
        }
        match span {
            Span::Plain(text) => {
                // `(` and `.` right after `#f[..]` continue the call, `;` ends it
                if after_call && text.starts_with(['(', '.', ';']) {
                    out.push('\\');
                }
                escape_text(text, line_start, out);
                after_call = false;
            }
            Span::Bold(text) => {
                content_call("strong", text, out);
                after_call = true;
            }
            Span::Italic(text) => {
                content_call("emph", text, out);
                after_call = true;
            }
            Span::Code(text) => {
                raw_call(text, out);
                after_call = true;
            }
        }
        line_start = false;
    }
}

/// `#name[text]`, which also works inside a word, unlike `*..*` and `_.._`.
fn content_call(name: &str, text: &str, out: &mut String) {
    out.push('#');
    out.push_str(name);
    out.push('[');
    escape_text(text, true, out);
    out.push(']');
}

fn raw_call(text: &str, out: &mut String) {
    out.push_str("#raw(\"");
    for ch in text.chars() {
        if matches!(ch, '\\' | '"') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push_str("\")");
}

/// Escape text, including a leading `N.` that Typst would read as an enum
/// marker when the text starts a line or a content block.
fn escape_text(text: &str, line_start: bool, out: &mut String) {
    match numeral_dot(text).filter(|_| line_start) {
        Some(dot) => {
            escape_into(&text[..dot], out);
            out.push_str("\\.");
            escape_into(&text[dot + 1..], out);
        }
        None => escape_into(text, out),
    }
}

/// Byte offset of the `.` in leading whitespace, digits and a dot.
fn numeral_dot(text: &str) -> Option<usize> {
    let trimmed = text.trim_start();
    let digits = trimmed.len() - trimmed.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 || !trimmed[digits..].starts_with('.') {
        return None;
    }
    Some(text.len() - trimmed.len() + digits)
}

/// Escape every character that has a meaning in Typst markup.
fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '=' | '-' | '+'
            | '/' | '~' | '"' | '\'' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

fn table_to_typst(headers: &[String], rows: &[Vec<String>], config: &Config, out: &mut String) {
    let col_count = headers.len();
    if col_count == 0 {
        return;
    }

    out.push_str("#block(breakable: false)[\n");
    out.push_str("#table(\n");
    out.push_str(&format!("  columns: {col_count},\n"));
    out.push_str(&format!("  stroke: {},\n", config.table.stroke));

    out.push_str("  table.header(");
    for (i, cell) in headers.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('[');
        if config.table.header_bold {
            content_call("strong", cell, out);
        } else {
            escape_text(cell, true, out);
        }
        out.push(']');
    }
    out.push_str("),\n");

    for row in rows {
        for cell in row {
            out.push_str("  [");
            escape_text(cell, true, out);
            out.push_str("],\n");
        }
    }

    out.push_str(")\n]\n\n");
}
