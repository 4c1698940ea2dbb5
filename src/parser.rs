use std::ops::Range;

use tracing::trace;

use crate::block::Block;
use crate::inline::parse_spans;
use crate::table::{TableState, is_row_candidate, is_separator, is_separator_prefix};

/// How to treat the last line of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// The text is still streaming in and its last line may grow. A table
    /// header followed only by a possible separator prefix is shown as a table.
    #[default]
    Streaming,
    /// The text is final.
    Complete,
}

/// A block together with the source lines it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment {
    pub block: Block,
    pub lines: Range<usize>,
}

/// Segment streaming text into blocks.
///
/// The last line may still be growing, so a row candidate followed only by an
/// empty or partial separator line is shown as a header-only table:
/// `segment("a | b\n")` returns a `Table`. Use [`segment_complete`] for text
/// that is final, where that row stays a paragraph.
pub fn segment(text: &str) -> Vec<Block> {
    segment_with(text, ParseMode::Streaming)
}

/// Segment text that is known to be complete.
pub fn segment_complete(text: &str) -> Vec<Block> {
    segment_with(text, ParseMode::Complete)
}

pub fn segment_with(text: &str, mode: ParseMode) -> Vec<Block> {
    segments(text, mode).into_iter().map(|s| s.block).collect()
}

/// Single forward pass over the lines with one line of lookahead.
pub(crate) fn segments(text: &str, mode: ParseMode) -> Vec<Segment> {
    if text.is_empty() {
        return Vec::new();
    }

    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let mut out = Vec::new();
    let mut table = TableState::Idle;
    let mut table_start = 0;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if table.is_collecting() {
            if is_row_candidate(line) && heading(line).is_none() {
                table.push_row(line);
                i += 1;
                continue;
            }
            // The run ended; this line is classified below like any other.
            flush_table(&mut table, table_start..i, &mut out);
        }

        if let Some((level, text)) = heading(line) {
            out.push(Segment {
                block: Block::Header {
                    level,
                    text: text.to_string(),
                },
                lines: i..i + 1,
            });
            i += 1;
            continue;
        }

        if is_row_candidate(line) && opens_table(&lines, i, mode) {
            table.start(line);
            table_start = i;
            // skip the separator
            i += 2;
            continue;
        }

        out.push(Segment {
            block: classify_line(line),
            lines: i..i + 1,
        });
        i += 1;
    }

    flush_table(&mut table, table_start..lines.len(), &mut out);

    trace!(lines = lines.len(), blocks = out.len(), ?mode, "segmented");
    out
}

fn flush_table(table: &mut TableState, lines: Range<usize>, out: &mut Vec<Segment>) {
    if let Some(block) = table.finish() {
        out.push(Segment { block, lines });
    }
}

/// Whether the candidate row at `i` is a table header.
fn opens_table(lines: &[&str], i: usize, mode: ParseMode) -> bool {
    let Some(next) = lines.get(i + 1) else {
        return false;
    };
    if is_separator(next) {
        return true;
    }
    let next_is_last = i + 2 == lines.len();
    mode == ParseMode::Streaming && next_is_last && is_separator_prefix(next)
}

/// `#`, `##` or `###` followed by whitespace.
fn heading(line: &str) -> Option<(u8, &str)> {
    let rest = line.trim_start_matches('#');
    let level = line.len() - rest.len();
    if !(1..=3).contains(&level) || !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((level as u8, rest.trim_start()))
}

/// Per-line rules for lines outside headers and tables.
fn classify_line(line: &str) -> Block {
    if let Some(rest) = after_marker(line, "-") {
        return Block::BulletItem {
            spans: parse_spans(rest),
        };
    }

    if let Some((index, rest)) = numbered(line) {
        return Block::NumberedItem {
            index,
            spans: parse_spans(rest),
        };
    }

    if line.trim().is_empty() {
        return Block::Blank;
    }

    Block::Paragraph {
        spans: parse_spans(line),
    }
}

/// Text after `marker` and at least one whitespace character.
fn after_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(marker)?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// `12. text`; numerals that overflow fall back to a paragraph.
fn numbered(line: &str) -> Option<(u64, &str)> {
    let digits = line
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(line.len());
    if digits == 0 {
        return None;
    }
    let rest = after_marker(&line[digits..], ".")?;
    let index = line[..digits].parse().ok()?;
    Some((index, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Span;

    fn plain(s: &str) -> Vec<Span> {
        vec![Span::Plain(s.to_string())]
    }

    fn cells(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn header_levels() {
        assert_eq!(
            segment("# One\n## Two\n### Three\n#### Four"),
            vec![
                Block::Header {
                    level: 1,
                    text: "One".to_string()
                },
                Block::Header {
                    level: 2,
                    text: "Two".to_string()
                },
                Block::Header {
                    level: 3,
                    text: "Three".to_string()
                },
                Block::Paragraph {
                    spans: plain("#### Four")
                },
            ]
        );
    }

    #[test]
    fn header_needs_whitespace() {
        assert_eq!(
            segment("#tag"),
            vec![Block::Paragraph {
                spans: plain("#tag")
            }]
        );
    }

    #[test]
    fn header_text_is_not_inline_parsed() {
        assert_eq!(
            segment("## **Results**"),
            vec![Block::Header {
                level: 2,
                text: "**Results**".to_string()
            }]
        );
    }

    #[test]
    fn list_items() {
        assert_eq!(
            segment("- one\n3. three\n10.  ten\n-dash"),
            vec![
                Block::BulletItem { spans: plain("one") },
                Block::NumberedItem {
                    index: 3,
                    spans: plain("three")
                },
                Block::NumberedItem {
                    index: 10,
                    spans: plain("ten")
                },
                Block::Paragraph {
                    spans: plain("-dash")
                },
            ]
        );
    }

    #[test]
    fn oversized_numeral_is_a_paragraph() {
        let line = "99999999999999999999999. big";
        assert_eq!(segment(line), vec![Block::Paragraph { spans: plain(line) }]);
    }

    #[test]
    fn blank_lines() {
        assert_eq!(
            segment("a\n   \nb\n"),
            vec![
                Block::Paragraph { spans: plain("a") },
                Block::Blank,
                Block::Paragraph { spans: plain("b") },
                Block::Blank,
            ]
        );
    }

    #[test]
    fn empty_text_has_no_blocks() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn crlf_line_endings() {
        assert_eq!(
            segment("- a\r\n- b"),
            vec![
                Block::BulletItem { spans: plain("a") },
                Block::BulletItem { spans: plain("b") },
            ]
        );
    }

    #[test]
    fn pipe_without_separator_is_prose() {
        assert_eq!(
            segment_complete("a | b\nmore"),
            vec![
                Block::Paragraph {
                    spans: plain("a | b")
                },
                Block::Paragraph {
                    spans: plain("more")
                },
            ]
        );
    }

    #[test]
    fn table_run_ends_at_non_candidate() {
        let text = "| A | B |\n|---|---|\n| 1 | 2 |\n\nafter";
        let segs = segments(text, ParseMode::Complete);
        assert_eq!(
            segs,
            vec![
                Segment {
                    block: Block::Table {
                        headers: cells(&["A", "B"]),
                        rows: vec![cells(&["1", "2"])],
                    },
                    lines: 0..3,
                },
                Segment {
                    block: Block::Blank,
                    lines: 3..4,
                },
                Segment {
                    block: Block::Paragraph {
                        spans: plain("after")
                    },
                    lines: 4..5,
                },
            ]
        );
    }

    #[test]
    fn header_line_ends_a_table() {
        assert_eq!(
            segment("| A |\n| - |\n| 1 |\n## Next | up"),
            vec![
                Block::Table {
                    headers: cells(&["A"]),
                    rows: vec![cells(&["1"])],
                },
                Block::Header {
                    level: 2,
                    text: "Next | up".to_string()
                },
            ]
        );
    }

    #[test]
    fn separator_mid_table_ends_the_run() {
        assert_eq!(
            segment_complete("| A |\n| - |\n| 1 |\n| - |"),
            vec![
                Block::Table {
                    headers: cells(&["A"]),
                    rows: vec![cells(&["1"])],
                },
                Block::Paragraph {
                    spans: plain("| - |")
                },
            ]
        );
    }

    #[test]
    fn streaming_header_with_pending_separator() {
        let expected = vec![Block::Table {
            headers: cells(&["Name", "Score"]),
            rows: vec![],
        }];
        assert_eq!(segment("| Name | Score |\n"), expected);
        assert_eq!(segment("| Name | Score |\n| -"), expected);
    }

    #[test]
    fn streaming_and_complete_differ_on_unconfirmed_row() {
        assert_eq!(
            segment("a | b\n"),
            vec![Block::Table {
                headers: cells(&["a", "b"]),
                rows: vec![],
            }]
        );
        assert_eq!(
            segment_complete("a | b\n"),
            vec![
                Block::Paragraph {
                    spans: plain("a | b")
                },
                Block::Blank,
            ]
        );
    }

    #[test]
    fn separator_needs_a_dash() {
        assert_eq!(
            segment_complete("| a |\n| |"),
            vec![
                Block::Paragraph {
                    spans: plain("| a |")
                },
                Block::Paragraph {
                    spans: plain("| |")
                },
            ]
        );
    }

    #[test]
    fn complete_header_without_separator_is_prose() {
        assert_eq!(
            segment_complete("| Name | Score |\n"),
            vec![
                Block::Paragraph {
                    spans: plain("| Name | Score |")
                },
                Block::Blank,
            ]
        );
    }

    #[test]
    fn pending_separator_that_turns_into_prose() {
        assert_eq!(
            segment("| a |\n| x"),
            vec![
                Block::Paragraph {
                    spans: plain("| a |")
                },
                Block::Paragraph { spans: plain("| x") },
            ]
        );
    }

    #[test]
    fn inline_spans_in_items() {
        assert_eq!(
            segment("- **bold** rest"),
            vec![Block::BulletItem {
                spans: vec![
                    Span::Bold("bold".to_string()),
                    Span::Plain(" rest".to_string()),
                ]
            }]
        );
    }
}
