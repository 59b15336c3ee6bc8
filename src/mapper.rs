//! Text-offset mapper
//!
//! Converts between linear offsets into the plain-text projection and
//! concrete positions inside the span list.
//!
//! # Addressing
//!
//! ```text
//! spans:     [ "Hi "      ][ @alice          ][ "!" ]
//! offsets:     0  1  2      3  4  5  6  7  8    9    10 (End)
//! locate(4) = At { span: 1, offset: 1 }     (inside the mention)
//! locate(10) = End
//! locate(11) = None
//! ```
//!
//! A span owns the half-open range `[start, start + len)`, so an offset on a
//! boundary resolves to the start of the following span. The offset equal to
//! the total length has no span and resolves to the synthetic `End` position
//! so callers can always insert at the tail.

use crate::document::EditableDocument;
use crate::selection::Selection;
use serde::Serialize;

/// A concrete position in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Location {
    /// `offset` chars into the rendered text of span `span`
    At { span: usize, offset: usize },
    /// After the last span
    End,
}

/// A span of the document between two locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start: Location,
    pub end: Location,
}

impl Range {
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// Range from the start of the document to `end`
    pub fn from_start(doc: &EditableDocument, end: Location) -> Self {
        Self::new(document_start(doc), end)
    }

    pub fn is_collapsed(&self, doc: &EditableDocument) -> bool {
        index_of(doc, self.start) == index_of(doc, self.end)
    }

    /// Plain-text projection of the range
    pub fn text(&self, doc: &EditableDocument) -> String {
        range_to_string(doc, self)
    }
}

/// Total rendered length in chars
///
/// Mentions count as the length of `@username`, line breaks as one.
pub fn plain_text_length(doc: &EditableDocument) -> usize {
    doc.len()
}

/// Resolve an offset to a location
///
/// Returns `Location::End` for `index == plain_text_length(doc)` and `None`
/// beyond it.
///
/// # Example
///
/// ```rust
/// use mentionkit_core::document::EditableDocument;
/// use mentionkit_core::mapper::{locate, Location};
///
/// let doc = EditableDocument::from_plain_text("abc");
/// assert_eq!(locate(&doc, 1), Some(Location::At { span: 0, offset: 1 }));
/// assert_eq!(locate(&doc, 3), Some(Location::End));
/// assert_eq!(locate(&doc, 4), None);
/// ```
pub fn locate(doc: &EditableDocument, index: usize) -> Option<Location> {
    let mut start = 0;

    for (i, span) in doc.spans().iter().enumerate() {
        let len = span.len();
        if index < start + len {
            return Some(Location::At {
                span: i,
                offset: index - start,
            });
        }
        start += len;
    }

    (index == start).then_some(Location::End)
}

/// Offset of a location (inverse of [`locate`])
///
/// Locations past the end of a span or of the document clamp to the end.
pub fn index_of(doc: &EditableDocument, location: Location) -> usize {
    match location {
        Location::At { span, offset } => match doc.spans().get(span) {
            Some(leaf) => doc.span_start(span) + offset.min(leaf.len()),
            None => doc.len(),
        },
        Location::End => doc.len(),
    }
}

/// Location of the start of the document
pub fn document_start(doc: &EditableDocument) -> Location {
    locate(doc, 0).unwrap_or(Location::End)
}

/// Stringify a range through the plain-text projection
///
/// A reversed range is read in document order. A range cutting into a
/// mention yields the covered part of `@username`.
pub fn range_to_string(doc: &EditableDocument, range: &Range) -> String {
    let a = index_of(doc, range.start);
    let b = index_of(doc, range.end);
    let (from, to) = (a.min(b), a.max(b));

    let mut out = String::new();
    let mut pos = 0;

    for span in doc.spans() {
        let span_start = pos;
        let len = span.len();
        pos += len;

        if span_start + len <= from {
            continue;
        }
        if span_start >= to {
            break;
        }

        let lo = from.saturating_sub(span_start);
        let hi = (to - span_start).min(len);
        if lo == 0 && hi == len {
            span.push_plain_text(&mut out);
        } else {
            out.push_str(&span.plain_slice(lo, hi));
        }
    }

    out
}

/// Text before the caret
///
/// Builds a range from the start of the document to the selection's end
/// point and stringifies it. A selection beyond the document is clamped.
pub fn text_up_to_cursor(doc: &EditableDocument, selection: &Selection) -> String {
    let end = selection.end().min(doc.len());
    let end = locate(doc, end).unwrap_or(Location::End);
    Range::from_start(doc, end).text(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Span;
    use crate::mention::MentionToken;
    use proptest::prelude::*;

    fn sample() -> EditableDocument {
        EditableDocument::from_spans(vec![
            Span::text("Hi ", vec![]),
            Span::mention(MentionToken::new("alice").unwrap(), vec![]),
            Span::text("!", vec![]),
        ])
    }

    #[test]
    fn test_plain_text_length() {
        assert_eq!(plain_text_length(&sample()), 10);
        assert_eq!(plain_text_length(&EditableDocument::new()), 0);
    }

    #[test]
    fn test_locate_at_zero() {
        let doc = sample();
        assert_eq!(locate(&doc, 0), Some(Location::At { span: 0, offset: 0 }));
    }

    #[test]
    fn test_locate_at_total_length() {
        let doc = sample();
        assert_eq!(locate(&doc, 10), Some(Location::End));
        assert_eq!(locate(&doc, 11), None);
        assert_eq!(index_of(&doc, Location::End), 10);
    }

    #[test]
    fn test_locate_boundaries() {
        let doc = sample();
        // A boundary belongs to the span that starts there
        assert_eq!(locate(&doc, 3), Some(Location::At { span: 1, offset: 0 }));
        assert_eq!(locate(&doc, 9), Some(Location::At { span: 2, offset: 0 }));
    }

    #[test]
    fn test_locate_inside_mention() {
        let doc = sample();
        assert_eq!(locate(&doc, 5), Some(Location::At { span: 1, offset: 2 }));

        let range = Range::from_start(&doc, Location::At { span: 1, offset: 2 });
        assert_eq!(range.text(&doc), "Hi @a");
    }

    #[test]
    fn test_single_empty_text_run() {
        let doc = EditableDocument::from_spans(vec![Span::text("", vec![])]);

        assert_eq!(plain_text_length(&doc), 0);
        assert_eq!(locate(&doc, 0), Some(Location::End));
        assert_eq!(locate(&doc, 1), None);
        assert_eq!(text_up_to_cursor(&doc, &Selection::collapsed(0)), "");
    }

    #[test]
    fn test_index_of_clamps() {
        let doc = sample();
        assert_eq!(index_of(&doc, Location::At { span: 0, offset: 99 }), 3);
        assert_eq!(index_of(&doc, Location::At { span: 9, offset: 0 }), 10);
    }

    #[test]
    fn test_range_to_string() {
        let doc = sample();
        let range = Range::new(
            Location::At { span: 0, offset: 1 },
            Location::At { span: 2, offset: 0 },
        );
        assert_eq!(range_to_string(&doc, &range), "i @alice");

        let reversed = Range::new(range.end, range.start);
        assert_eq!(range_to_string(&doc, &reversed), "i @alice");
        assert!(!range.is_collapsed(&doc));
    }

    #[test]
    fn test_text_up_to_cursor() {
        let doc = EditableDocument::from_plain_text("line one\nThanks @al");

        let caret = Selection::collapsed(doc.len());
        assert_eq!(text_up_to_cursor(&doc, &caret), "line one\nThanks @al");

        // Uses the end point of a range selection
        let range = Selection::new(12, 4);
        assert_eq!(text_up_to_cursor(&doc, &range), "line one\nTha");

        // Stale selection beyond the document
        assert_eq!(
            text_up_to_cursor(&doc, &Selection::collapsed(500)),
            "line one\nThanks @al"
        );
    }

    fn arb_doc() -> impl Strategy<Value = EditableDocument> {
        let piece = prop_oneof![
            "[a-z é😀\n]{0,8}"
                .prop_map(|text| EditableDocument::from_plain_text(&text).spans().to_vec()),
            "[a-z]{1,8}"
                .prop_map(|name| vec![Span::mention(MentionToken::new(name).unwrap(), vec![])]),
        ];
        prop::collection::vec(piece, 0..10)
            .prop_map(|pieces| EditableDocument::from_spans(pieces.into_iter().flatten().collect()))
    }

    proptest! {
        #[test]
        fn prop_offset_round_trip(doc in arb_doc()) {
            let len = plain_text_length(&doc);
            for i in 0..=len {
                let location = locate(&doc, i);
                prop_assert!(location.is_some());
                let location = location.unwrap();

                prop_assert_eq!(index_of(&doc, location), i);
                let prefix = Range::from_start(&doc, location).text(&doc);
                prop_assert_eq!(prefix.chars().count(), i);
            }
            prop_assert_eq!(locate(&doc, len + 1), None);
        }
    }
}
