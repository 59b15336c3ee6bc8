//! Mention detection and insertion
//!
//! Detection runs after every edit and selection change: the text before the
//! caret is matched against a trailing `@query` pattern and the host is told
//! when a query appears, changes or disappears. The host answers with
//! [`Editor::insert_mention`], passing back the offsets it was given.

use super::{Editor, EditorHost};
use crate::document::Span;
use crate::error::{EditorError, Result};
use crate::mapper::{locate, text_up_to_cursor, Range};
use crate::mention::MentionToken;
use crate::offsets::OffsetIndex;
use crate::selection::Selection;
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Where a mention query starts, for positioning an autocomplete dropdown
///
/// `line` and `column` are 0-based and counted in chars of the plain-text
/// projection; the embedding surface maps them to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnchorPosition {
    /// Offset of the `@`
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// An active mention query at the caret
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentionTrigger {
    /// Characters typed after the `@`
    pub query: String,
    pub anchor: AnchorPosition,
    /// Caret offset; the query spans `anchor.offset..cursor`
    pub cursor: usize,
}

/// Result of a mention insertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentionInsertion {
    /// Offset of the inserted token
    pub start: usize,
    /// Caret after the trailing space
    pub caret: usize,
    /// Plain text that was replaced
    pub replaced: String,
    /// The offsets were stale and the token went to the end of the document
    pub appended: bool,
}

impl<H: EditorHost> Editor<H> {
    /// Replace a typed `@query` with a mention token
    ///
    /// `mention_start..mention_end` are the plain-text offsets of the partial
    /// query, usually `anchor.offset..cursor` from the trigger. They are
    /// clamped to the document first, so stale offsets never fail: if the
    /// document shrank since the query was reported, the token lands at the
    /// tail. An offset inside an existing token moves to that token's nearer
    /// edge and never replaces it. The token always renders `@username`
    /// whatever was typed, and is followed by a space with the caret placed
    /// after it. A composition in progress ends with its text kept.
    ///
    /// # Errors
    ///
    /// - `EditorError::InvalidUsername` for a username a token cannot carry
    /// - `EditorError::MaxLengthExceeded` if the token and its space do not
    ///   fit; the document is left untouched
    #[instrument(skip(self), fields(editor = %self.id))]
    pub fn insert_mention(
        &mut self,
        username: &str,
        mention_start: usize,
        mention_end: usize,
    ) -> Result<MentionInsertion> {
        let token = MentionToken::new(username)?;

        let len = self.doc.len();
        let stale = mention_start > len || mention_end > len;
        if stale {
            warn!(
                mention_start,
                mention_end, len, "stale mention offsets clamped to the document"
            );
        }
        let (start, end) = (mention_start.min(len), mention_end.min(len));
        let (start, end) = (start.min(end), start.max(end));

        // A bound inside another token moves to its nearer edge; that token stays
        let (start, end, fell_back) = match (locate(&self.doc, start), locate(&self.doc, end)) {
            (Some(_), Some(_)) => {
                let (start, end) = self.doc.shrink_to_atomic(start, end);
                (start, end, stale)
            }
            _ => {
                warn!(start, end, len, "mention offsets did not resolve, appending at tail");
                (len, len, true)
            }
        };

        let inserted = token.display_len() + 1;
        if let Some(max_length) = self.config.max_length {
            let required = len - (end - start) + inserted;
            if required > max_length {
                return Err(EditorError::MaxLengthExceeded {
                    required,
                    max_length,
                });
            }
        }

        let replaced = match (locate(&self.doc, start), locate(&self.doc, end)) {
            (Some(from), Some(to)) => Range::new(from, to).text(&self.doc),
            _ => String::new(),
        };
        debug!(
            username = token.username(),
            replaced = %replaced,
            contains_at = replaced.contains('@'),
            "replacing mention query"
        );

        self.programmatic(|editor| -> Result<MentionInsertion> {
            // Provisional composed text is kept as typed
            if editor.composition.take().is_some() {
                debug!("composition ended by mention insertion");
            }

            let marks = if start < end {
                editor
                    .doc
                    .span_at(start)
                    .map(|(index, _)| editor.doc.spans()[index].marks.clone())
                    .unwrap_or_default()
            } else {
                editor.doc.marks_at(start)
            };

            editor.doc.delete_range(start, end)?;
            let caret = editor.doc.insert_spans(
                start,
                vec![Span::mention(token, marks.clone()), Span::text(" ", marks)],
            )?;

            editor.selection = Selection::collapsed(caret);
            editor.pending_marks = None;
            editor.commit();

            Ok(MentionInsertion {
                start,
                caret,
                replaced,
                appended: fell_back && start == len,
            })
        })
    }

    /// Re-run mention detection and notify the host of any change
    pub(super) fn detect_mention(&mut self) {
        let previous = self.active_query.take();
        self.active_query = self.find_mention_query();

        match (&previous, &self.active_query) {
            (_, Some(trigger)) if previous.as_ref() != Some(trigger) => {
                debug!(
                    editor = %self.id,
                    query = %trigger.query,
                    cursor = trigger.cursor,
                    "mention query"
                );
                self.host.on_mention_trigger(trigger);
            }
            (Some(_), None) => {
                debug!(editor = %self.id, "mention query hidden");
                self.host.on_mention_hide();
            }
            _ => {}
        }
    }

    fn find_mention_query(&self) -> Option<MentionTrigger> {
        if self.composition.is_some() || !self.selection.is_collapsed() {
            return None;
        }

        let cursor = self.selection.caret().min(self.doc.len());
        // Never re-trigger from inside an existing token
        if self.doc.atomic_bounds(cursor).is_some() {
            return None;
        }

        let before = text_up_to_cursor(&self.doc, &Selection::collapsed(cursor));
        let captures = self.mention_pattern.captures(&before)?;
        let whole = captures.get(0)?;
        let query = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

        let at = before[..whole.start()].chars().count();
        // The `@` of an existing mention
        if let Some((index, _)) = self.doc.span_at(at) {
            if self.doc.spans()[index].is_atomic() {
                return None;
            }
        }

        let position = OffsetIndex::new(&before).line_column(at);
        Some(MentionTrigger {
            query: query.to_string(),
            anchor: AnchorPosition {
                offset: at,
                line: position.line,
                column: position.column,
            },
            cursor,
        })
    }
}
