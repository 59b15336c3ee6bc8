//! Span: one inline leaf of the editable document
//!
//! A span is a text run, a mention token or a line break, together with the
//! stack of formatting wrappers that enclose it.

use super::style::Style;
use crate::mention::MentionToken;
use serde::Serialize;

/// Formatting wrappers around a span, outermost first
pub type Marks = Vec<Style>;

/// Content of a span
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SpanKind {
    /// Contiguous characters with no formatting boundary
    Text { text: String },
    /// Atomic `@username` unit
    Mention { token: MentionToken },
    /// Hard line break, projects to `\n`
    LineBreak,
}

/// An inline leaf with its formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub kind: SpanKind,
    pub marks: Marks,
}

impl Span {
    pub fn text(text: impl Into<String>, marks: Marks) -> Self {
        Self {
            kind: SpanKind::Text { text: text.into() },
            marks,
        }
    }

    pub fn mention(token: MentionToken, marks: Marks) -> Self {
        Self {
            kind: SpanKind::Mention { token },
            marks,
        }
    }

    pub fn line_break(marks: Marks) -> Self {
        Self {
            kind: SpanKind::LineBreak,
            marks,
        }
    }

    /// Rendered length in the plain-text projection (chars)
    pub fn len(&self) -> usize {
        match &self.kind {
            SpanKind::Text { text } => text.chars().count(),
            SpanKind::Mention { token } => token.display_len(),
            SpanKind::LineBreak => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Atomic spans are never split or partially edited
    pub fn is_atomic(&self) -> bool {
        !matches!(self.kind, SpanKind::Text { .. })
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            SpanKind::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn as_mention(&self) -> Option<&MentionToken> {
        match &self.kind {
            SpanKind::Mention { token } => Some(token),
            _ => None,
        }
    }

    /// Append this span's plain-text projection
    pub fn push_plain_text(&self, out: &mut String) {
        match &self.kind {
            SpanKind::Text { text } => out.push_str(text),
            SpanKind::Mention { token } => {
                out.push('@');
                out.push_str(token.username());
            }
            SpanKind::LineBreak => out.push('\n'),
        }
    }

    /// Plain-text projection of chars `from..to` within this span
    pub fn plain_slice(&self, from: usize, to: usize) -> String {
        let mut full = String::new();
        self.push_plain_text(&mut full);
        full.chars().skip(from).take(to.saturating_sub(from)).collect()
    }

    /// Whether a wrapper of the same kind as `style` encloses this span
    pub fn has_style_kind(&self, style: &Style) -> bool {
        self.marks.iter().any(|mark| mark.same_kind(style))
    }
}
