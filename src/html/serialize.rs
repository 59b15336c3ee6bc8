//! Markup serialization
//!
//! Spans carry their wrapper stacks flattened, so nesting is rebuilt here:
//! consecutive spans keep every wrapper of their shared mark prefix open and
//! only close and reopen what differs.

use super::tokenizer::escape_text;
use crate::document::{EditableDocument, SpanKind, Style};
use crate::mention::serialize_to_html;

/// Serialize a document to markup
///
/// # Example
///
/// ```rust
/// use mentionkit_core::document::{EditableDocument, Style};
/// use mentionkit_core::html::serialize_html;
///
/// let mut doc = EditableDocument::from_plain_text("Hello World");
/// doc.set_style(0, 5, &Style::Bold, true).unwrap();
///
/// assert_eq!(serialize_html(&doc), "<strong>Hello</strong> World");
/// ```
pub fn serialize_html(doc: &EditableDocument) -> String {
    let mut out = String::new();
    let mut open: &[Style] = &[];

    for span in doc.spans() {
        let shared = open
            .iter()
            .zip(&span.marks)
            .take_while(|(a, b)| a == b)
            .count();

        for style in open[shared..].iter().rev() {
            out.push_str(style.close_tag());
        }
        for style in &span.marks[shared..] {
            out.push_str(&style.open_tag());
        }

        match &span.kind {
            SpanKind::Text { text } => out.push_str(&escape_text(text)),
            SpanKind::Mention { token } => out.push_str(&serialize_to_html(token)),
            SpanKind::LineBreak => out.push_str("<br>"),
        }

        open = &span.marks;
    }

    for style in open.iter().rev() {
        out.push_str(style.close_tag());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Span;
    use crate::html::parse_html;
    use crate::mention::{to_plain_text, MentionToken};
    use proptest::prelude::*;

    fn mention(username: &str, marks: Vec<Style>) -> Span {
        Span::mention(MentionToken::new(username).unwrap(), marks)
    }

    #[test]
    fn test_empty() {
        assert_eq!(serialize_html(&EditableDocument::new()), "");
    }

    #[test]
    fn test_escapes_text() {
        let doc = EditableDocument::from_plain_text("a <b> & c");
        assert_eq!(serialize_html(&doc), "a &lt;b&gt; &amp; c");
    }

    #[test]
    fn test_shared_prefix_stays_open() {
        let doc = EditableDocument::from_spans(vec![
            Span::text("a", vec![Style::Bold]),
            Span::text("b", vec![Style::Bold, Style::Italic]),
            Span::text("c", vec![Style::Bold]),
            Span::text("d", vec![]),
        ]);

        assert_eq!(serialize_html(&doc), "<strong>a<em>b</em>c</strong>d");
    }

    #[test]
    fn test_differing_prefix_reopens() {
        let doc = EditableDocument::from_spans(vec![
            Span::text("a", vec![Style::Color("red".into()), Style::Bold]),
            Span::text("b", vec![Style::Bold]),
        ]);

        assert_eq!(
            serialize_html(&doc),
            r#"<span style="color: red"><strong>a</strong></span><strong>b</strong>"#
        );
    }

    #[test]
    fn test_mentions_and_breaks() {
        let doc = EditableDocument::from_spans(vec![
            Span::text("hi", vec![]),
            Span::line_break(vec![]),
            mention("alice", vec![Style::Bold]),
        ]);

        assert_eq!(
            serialize_html(&doc),
            r#"hi<br><strong><span class="mention" data-username="alice" contenteditable="false">@alice</span></strong>"#
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let doc = EditableDocument::from_spans(vec![
            Span::text("Thanks ", vec![Style::Italic]),
            mention("alice", vec![Style::Italic, Style::Underline]),
            Span::text(" & ", vec![]),
            Span::line_break(vec![Style::Size("large".into())]),
            Span::text("<bye>", vec![Style::Background("#ff0".into())]),
        ]);

        assert_eq!(parse_html(&serialize_html(&doc)), doc);
    }

    fn arb_doc() -> impl Strategy<Value = EditableDocument> {
        let piece = prop_oneof![
            "[a-zA-Z0-9 @<>&\"'.,!é😀]{0,12}".prop_map(|text| Span::text(text, vec![])),
            "[a-z][a-z0-9_.-]{0,10}".prop_map(|name| mention(&name, vec![])),
        ];
        prop::collection::vec(piece, 0..12).prop_map(EditableDocument::from_spans)
    }

    proptest! {
        #[test]
        fn prop_plain_text_projection_idempotent(doc in arb_doc()) {
            prop_assert_eq!(to_plain_text(&serialize_html(&doc)), doc.plain_text());
        }

        #[test]
        fn prop_parse_inverts_serialize(doc in arb_doc()) {
            prop_assert_eq!(parse_html(&serialize_html(&doc)), doc);
        }
    }
}
