//! EditableDocument: the live inline content of one editing surface
//!
//! The document is an ordered list of spans. Addressing is by char offset in
//! the plain-text projection; the mapper turns those offsets into
//! `(span, offset)` locations when a concrete node position is needed.
//!
//! Atomic spans (mentions, line breaks) are never split. Every primitive that
//! takes a range first widens it so that no boundary sits strictly inside an
//! atomic span, and every insertion point inside one is moved to just after
//! it. After each mutation the span list is normalized: empty text runs are
//! dropped and neighbouring text runs with identical marks are merged.

use super::span::{Marks, Span, SpanKind};
use super::style::Style;
use crate::error::{EditorError, Result};
use crate::mention::MentionToken;
use crate::offsets::char_to_byte;
use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

/// Editable rich-text document
///
/// # Example
///
/// ```rust
/// use mentionkit_core::document::EditableDocument;
/// use mentionkit_core::mention::MentionToken;
/// use mentionkit_core::document::Span;
///
/// let mut doc = EditableDocument::from_plain_text("Hi ");
/// let token = MentionToken::new("alice").unwrap();
/// doc.insert_spans(3, vec![Span::mention(token, vec![])]).unwrap();
///
/// assert_eq!(doc.plain_text(), "Hi @alice");
/// assert_eq!(doc.len(), 9);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditableDocument {
    spans: Vec<Span>,
}

impl EditableDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from unformatted text; `\n` becomes a line break
    pub fn from_plain_text(text: &str) -> Self {
        Self::from_spans(text_to_spans(text, &Vec::new()))
    }

    /// Build a document from spans (normalized)
    pub fn from_spans(spans: Vec<Span>) -> Self {
        let mut doc = Self { spans };
        doc.normalize();
        doc
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Length of the plain-text projection in chars
    pub fn len(&self) -> usize {
        self.spans.iter().map(Span::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Plain-text projection: text runs verbatim, mentions as `@username`,
    /// line breaks as `\n`
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            span.push_plain_text(&mut out);
        }
        out
    }

    /// Mention tokens in document order
    pub fn mentions(&self) -> impl Iterator<Item = &MentionToken> + '_ {
        self.spans.iter().filter_map(Span::as_mention)
    }

    pub fn clear(&mut self) {
        self.spans.clear();
    }

    /// Index and start offset of the span whose range `[start, start + len)`
    /// contains `index`
    pub fn span_at(&self, index: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for (i, span) in self.spans.iter().enumerate() {
            let len = span.len();
            if index < start + len {
                return Some((i, start));
            }
            start += len;
        }
        None
    }

    /// Char offset where the given span starts
    pub fn span_start(&self, span_index: usize) -> usize {
        let end = span_index.min(self.spans.len());
        self.spans[..end].iter().map(Span::len).sum()
    }

    /// Bounds of the atomic span that strictly contains `index`
    ///
    /// A caret at either edge of an atomic span is not inside it.
    pub fn atomic_bounds(&self, index: usize) -> Option<(usize, usize)> {
        let (i, start) = self.span_at(index)?;
        let span = &self.spans[i];
        (span.is_atomic() && index > start).then(|| (start, start + span.len()))
    }

    /// Move an offset that falls inside an atomic span to just after it
    pub fn snap_out_of_atomic(&self, index: usize) -> usize {
        self.atomic_bounds(index).map(|(_, end)| end).unwrap_or(index)
    }

    /// Widen a range so that it covers any atomic span it cuts into
    pub fn expand_to_atomic(&self, start: usize, end: usize) -> (usize, usize) {
        let start = self.atomic_bounds(start).map(|(s, _)| s).unwrap_or(start);
        let end = self.atomic_bounds(end).map(|(_, e)| e).unwrap_or(end);
        (start, end)
    }

    /// Narrow a range so that it cuts into no atomic span
    ///
    /// The start moves to the end of the span it falls in and the end to the
    /// start of its span. A range that narrows to nothing collapses at the
    /// moved start.
    pub fn shrink_to_atomic(&self, start: usize, end: usize) -> (usize, usize) {
        let start = self.snap_out_of_atomic(start);
        let end = self.atomic_bounds(end).map(|(s, _)| s).unwrap_or(end);
        (start, end.max(start))
    }

    /// Marks that text typed at `index` inherits
    ///
    /// Text continues the formatting of whatever sits before the caret; at the
    /// very start it takes the formatting of the first span.
    pub fn marks_at(&self, index: usize) -> Marks {
        if index > 0 {
            if let Some((i, _)) = self.span_at(index - 1) {
                return self.spans[i].marks.clone();
            }
        }
        self.spans
            .first()
            .map(|span| span.marks.clone())
            .unwrap_or_default()
    }

    /// Insert text at `index` with the given marks
    ///
    /// Returns the offset just after the inserted text.
    pub fn insert_text(&mut self, index: usize, text: &str, marks: Marks) -> Result<usize> {
        self.insert_spans(index, text_to_spans(text, &marks))
    }

    /// Insert spans at `index`
    ///
    /// An index inside an atomic span inserts after that span. Returns the
    /// offset just after the inserted content.
    pub fn insert_spans(&mut self, index: usize, spans: Vec<Span>) -> Result<usize> {
        self.check_position(index)?;

        let index = self.snap_out_of_atomic(index);
        let inserted: usize = spans.iter().map(Span::len).sum();
        let at = self.split_at(index);
        self.spans.splice(at..at, spans);
        self.normalize();

        Ok(index + inserted)
    }

    /// Delete `start..end`, widened to whole atomic spans
    ///
    /// Returns the range actually removed.
    pub fn delete_range(&mut self, start: usize, end: usize) -> Result<(usize, usize)> {
        self.check_range(start, end)?;

        let (start, end) = self.expand_to_atomic(start, end);
        if start == end {
            return Ok((start, end));
        }

        let from = self.split_at(start);
        let to = self.split_at(end);
        self.spans.drain(from..to);
        self.normalize();

        Ok((start, end))
    }

    /// Apply (`enable`) or remove a style over `start..end`
    ///
    /// Applying replaces any style of the same kind (one colour at a time)
    /// and makes the new style the innermost wrapper.
    pub fn set_style(
        &mut self,
        start: usize,
        end: usize,
        style: &Style,
        enable: bool,
    ) -> Result<()> {
        self.restyle(start, end, |marks| {
            marks.retain(|mark| !mark.same_kind(style));
            if enable {
                marks.push(style.clone());
            }
        })
    }

    /// Remove every formatting wrapper over `start..end`
    pub fn clear_styles(&mut self, start: usize, end: usize) -> Result<()> {
        self.restyle(start, end, |marks| marks.clear())
    }

    /// Whether every non-empty span overlapping `start..end` carries `style`
    pub fn range_has_style(&self, start: usize, end: usize, style: &Style) -> bool {
        let mut pos = 0;
        let mut any = false;

        for span in &self.spans {
            let span_start = pos;
            let len = span.len();
            pos += len;

            if len == 0 || span_start + len <= start || span_start >= end {
                continue;
            }
            any = true;
            if !span.marks.contains(style) {
                return false;
            }
        }

        any
    }

    /// Offset of the start of the deletable unit that ends at `index`
    ///
    /// The unit is a grapheme cluster inside text, or a whole atomic span.
    pub fn grapheme_before(&self, index: usize) -> usize {
        if index == 0 {
            return 0;
        }
        let Some((i, start)) = self.span_at(index - 1) else {
            return index - 1;
        };

        match &self.spans[i].kind {
            SpanKind::Text { text } => {
                let prefix = &text[..char_to_byte(text, index - start)];
                let last = prefix
                    .graphemes(true)
                    .next_back()
                    .map(|g| g.chars().count())
                    .unwrap_or(1);
                index - last
            }
            _ => start,
        }
    }

    /// Offset of the end of the deletable unit that starts at `index`
    pub fn grapheme_after(&self, index: usize) -> usize {
        let Some((i, start)) = self.span_at(index) else {
            return index;
        };

        let span = &self.spans[i];
        match &span.kind {
            SpanKind::Text { text } => {
                let suffix = &text[char_to_byte(text, index - start)..];
                let first = suffix
                    .graphemes(true)
                    .next()
                    .map(|g| g.chars().count())
                    .unwrap_or(1);
                index + first
            }
            _ => start + span.len(),
        }
    }

    fn restyle(
        &mut self,
        start: usize,
        end: usize,
        mut edit: impl FnMut(&mut Marks),
    ) -> Result<()> {
        self.check_range(start, end)?;

        let (start, end) = self.expand_to_atomic(start, end);
        if start == end {
            return Ok(());
        }

        let from = self.split_at(start);
        let to = self.split_at(end);
        for span in &mut self.spans[from..to] {
            edit(&mut span.marks);
        }
        self.normalize();

        Ok(())
    }

    /// Ensure a span boundary at `index` and return the index of the first
    /// span at or after it
    ///
    /// Callers widen or snap `index` out of atomic spans first; an index that
    /// still falls inside one resolves to the boundary after it.
    fn split_at(&mut self, index: usize) -> usize {
        let mut start = 0;

        for i in 0..self.spans.len() {
            let len = self.spans[i].len();
            if index == start {
                return i;
            }
            if index < start + len {
                if let SpanKind::Text { text } = &mut self.spans[i].kind {
                    let byte = char_to_byte(text, index - start);
                    let right = text.split_off(byte);
                    let marks = self.spans[i].marks.clone();
                    self.spans.insert(i + 1, Span::text(right, marks));
                }
                return i + 1;
            }
            start += len;
        }

        self.spans.len()
    }

    fn normalize(&mut self) {
        let mut merged: Vec<Span> = Vec::with_capacity(self.spans.len());

        for span in self.spans.drain(..) {
            if let SpanKind::Text { text } = &span.kind {
                if text.is_empty() {
                    continue;
                }
            }

            if let Some(last) = merged.last_mut() {
                if last.marks == span.marks {
                    if let (SpanKind::Text { text: left }, SpanKind::Text { text: right }) =
                        (&mut last.kind, &span.kind)
                    {
                        left.push_str(right);
                        continue;
                    }
                }
            }

            merged.push(span);
        }

        self.spans = merged;
    }

    fn check_position(&self, position: usize) -> Result<()> {
        let length = self.len();
        if position > length {
            return Err(EditorError::PositionOutOfBounds { position, length });
        }
        Ok(())
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        let length = self.len();
        if start > end || end > length {
            return Err(EditorError::RangeOutOfBounds { start, end, length });
        }
        Ok(())
    }
}

/// Split text into text runs and line breaks sharing the same marks
pub(crate) fn text_to_spans(text: &str, marks: &Marks) -> Vec<Span> {
    let mut spans = Vec::new();

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            spans.push(Span::line_break(marks.clone()));
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        if !line.is_empty() {
            spans.push(Span::text(line, marks.clone()));
        }
    }

    spans
}
