//! Re-rendering a message while its text streams in.
//!
//! The renderer keeps no state between calls. `StreamingMessage` only owns the
//! growing text of one assistant message and re-runs the whole pipeline on it.

use tracing::debug;

use crate::document::Document;
use crate::parser::ParseMode;
use crate::{Rendered, render_with};

/// The text of one assistant message during a streaming turn.
#[derive(Debug, Clone, Default)]
pub struct StreamingMessage {
    text: String,
    finished: bool,
}

impl StreamingMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token. Tokens after `finish` are ignored.
    pub fn push(&mut self, token: &str) {
        if self.finished {
            debug!("dropping token after end of turn ({} bytes)", token.len());
            return;
        }
        self.text.push_str(token);
    }

    /// Mark the turn as ended; the last line is final from now on.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mode(&self) -> ParseMode {
        if self.finished {
            ParseMode::Complete
        } else {
            ParseMode::Streaming
        }
    }

    /// Render the text received so far.
    pub fn render(&self) -> Rendered<'_> {
        render_with(&self.text, self.mode())
    }
}

/// Number of leading blocks that are identical in two renders.
pub fn settled_prefix(previous: &Document, next: &Document) -> usize {
    previous
        .iter()
        .zip(next.iter())
        .take_while(|(a, b)| a == b)
        .count()
}
