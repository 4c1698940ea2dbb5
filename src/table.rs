//! Pipe-table recognition: row predicates and the accumulator state machine.

use crate::block::Block;

/// Characters a separator line (`| --- | :-: |`) may consist of.
fn is_separator_char(c: char) -> bool {
    matches!(c, '|' | '-' | ':') || c.is_whitespace()
}

/// A finished separator line: only `|`, `-`, `:` and whitespace, with at
/// least one `-`.
///
/// The `-` is required, so a bare `| |` or `|` line is a row candidate and
/// not a separator; `| a |\n| |` is two paragraphs rather than a table.
pub fn is_separator(line: &str) -> bool {
    line.contains('-') && line.chars().all(is_separator_char)
}

/// A line that may still grow into a separator. Empty lines qualify.
pub fn is_separator_prefix(line: &str) -> bool {
    line.chars().all(is_separator_char)
}

/// A line that can be a header or data row of a table.
pub fn is_row_candidate(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('|') && !is_separator(trimmed)
}

/// Split a row into trimmed cells.
///
/// The empty cells produced by a leading or trailing pipe are dropped; empty
/// cells between pipes are kept.
pub fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let mut inner = trimmed;
    if let Some(rest) = inner.strip_prefix('|') {
        inner = rest;
    }
    if let Some(rest) = inner.strip_suffix('|') {
        inner = rest;
    }
    if inner.is_empty() {
        // "|" or "||": nothing but edge pipes
        return Vec::new();
    }
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

/// Pad with empty cells or truncate so the row has exactly `width` cells.
pub fn normalize_row(mut row: Vec<String>, width: usize) -> Vec<String> {
    row.resize(width, String::new());
    row
}

/// Table accumulator embedded in the segmentation pass.
#[derive(Debug, Default)]
pub enum TableState {
    #[default]
    Idle,
    Collecting {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

impl TableState {
    pub fn is_collecting(&self) -> bool {
        matches!(self, TableState::Collecting { .. })
    }

    /// Enter `Collecting` with `line` as the header row. The separator line is
    /// consumed by the caller.
    pub fn start(&mut self, line: &str) {
        *self = TableState::Collecting {
            headers: split_cells(line),
            rows: Vec::new(),
        };
    }

    /// Append a data row, normalized to the header width.
    pub fn push_row(&mut self, line: &str) {
        if let TableState::Collecting { headers, rows } = self {
            rows.push(normalize_row(split_cells(line), headers.len()));
        }
    }

    /// Leave `Collecting`, yielding the table block. Emits a table even when
    /// no data row arrived so an already visible header is never lost.
    pub fn finish(&mut self) -> Option<Block> {
        match std::mem::take(self) {
            TableState::Idle => None,
            TableState::Collecting { headers, rows } => Some(Block::Table { headers, rows }),
        }
    }
}
