//! Writing direction detection
//!
//! The surface's direction follows its content: the first strong directional
//! character of the text runs decides. Mentions are skipped since usernames
//! say nothing about the language of the post.

use crate::document::{EditableDocument, SpanKind};
use serde::Serialize;

/// Direction of the editing surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

/// Direction of a document, `Ltr` when it has no strong character
pub fn detect_direction(doc: &EditableDocument) -> TextDirection {
    doc.spans()
        .iter()
        .filter_map(|span| match &span.kind {
            SpanKind::Text { text } => text_direction(text),
            _ => None,
        })
        .next()
        .unwrap_or_default()
}

/// Direction of the first strong character in `text`
pub fn text_direction(text: &str) -> Option<TextDirection> {
    text.chars().find_map(|c| {
        if is_rtl_char(c) {
            Some(TextDirection::Rtl)
        } else if c.is_alphabetic() {
            Some(TextDirection::Ltr)
        } else {
            None
        }
    })
}

/// Strong right-to-left scripts: Hebrew, Arabic, Syriac, Thaana, NKo and
/// their presentation forms
fn is_rtl_char(c: char) -> bool {
    matches!(
        c as u32,
        0x0590..=0x08FF | 0xFB1D..=0xFDFF | 0xFE70..=0xFEFF | 0x10800..=0x10FFF | 0x1E800..=0x1EFFF
    ) && c.is_alphabetic()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Span;
    use crate::mention::MentionToken;

    #[test]
    fn test_text_direction() {
        assert_eq!(text_direction("hello"), Some(TextDirection::Ltr));
        assert_eq!(text_direction("שלום"), Some(TextDirection::Rtl));
        assert_eq!(text_direction("مرحبا"), Some(TextDirection::Rtl));
        assert_eq!(text_direction("123 !?"), None);
    }

    #[test]
    fn test_first_strong_wins() {
        assert_eq!(text_direction("12 שלום hello"), Some(TextDirection::Rtl));
        assert_eq!(text_direction("hi שלום"), Some(TextDirection::Ltr));
    }

    #[test]
    fn test_detect_direction_skips_mentions() {
        let doc = EditableDocument::from_spans(vec![
            Span::mention(MentionToken::new("alice").unwrap(), vec![]),
            Span::text(" مرحبا", vec![]),
        ]);
        assert_eq!(detect_direction(&doc), TextDirection::Rtl);
    }

    #[test]
    fn test_empty_is_ltr() {
        assert_eq!(detect_direction(&EditableDocument::new()), TextDirection::Ltr);
        assert_eq!(TextDirection::Rtl.as_str(), "rtl");
    }
}
