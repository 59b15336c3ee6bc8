//! Markup ingestion
//!
//! Turns sanitized markup into an [`EditableDocument`]. Parsing never fails:
//! unknown elements are unwrapped, unrecognized mention-like spans keep their
//! text, and end tags without a matching start tag are ignored.

use super::tokenizer::{events, is_block_element, is_dropped_element, is_void_element, Event, Tag};
use crate::document::{
    parse_style_attribute, text_to_spans, EditableDocument, Marks, Span, SpanKind, Style,
};
use crate::mention::deserialize_from_html;

/// An open element during parsing
struct Frame {
    name: String,
    /// Marks in effect before the element opened
    restore: Marks,
    /// Content of this element is not ingested
    suppress: bool,
    block: bool,
}

struct Parser {
    spans: Vec<Span>,
    marks: Marks,
    frames: Vec<Frame>,
    suppressed: usize,
    /// A block element just closed; the next content starts a new line
    after_block: bool,
}

/// Parse markup into an editable document
///
/// # Example
///
/// ```rust
/// use mentionkit_core::html::parse_html;
///
/// let doc = parse_html(r#"<b>Hi</b> <span class="mention" data-username="alice">@al</span>"#);
/// assert_eq!(doc.plain_text(), "Hi @alice");
/// assert_eq!(doc.mentions().count(), 1);
/// ```
pub fn parse_html(html: &str) -> EditableDocument {
    let mut parser = Parser {
        spans: Vec::new(),
        marks: Vec::new(),
        frames: Vec::new(),
        suppressed: 0,
        after_block: false,
    };

    for event in events(html) {
        match event {
            Event::Start(tag) => parser.start(tag),
            Event::End(name) => parser.end(&name),
            Event::Text(text) => parser.text(&text),
        }
    }

    EditableDocument::from_spans(parser.spans)
}

impl Parser {
    fn start(&mut self, tag: Tag) {
        if self.suppressed > 0 {
            if !is_void_element(&tag.name) && !tag.self_closing {
                self.suppress(tag.name);
            }
            return;
        }

        if tag.name == "br" {
            self.push_content(Span::line_break(self.marks.clone()));
            return;
        }
        if is_void_element(&tag.name) {
            return;
        }

        let block = is_block_element(&tag.name);
        if block {
            self.line_boundary();
        }

        if let Some(token) = deserialize_from_html(&tag) {
            self.push_content(Span::mention(token, self.marks.clone()));
            if !tag.self_closing {
                self.suppress(tag.name);
            }
            return;
        }

        if tag.self_closing {
            return;
        }

        if is_dropped_element(&tag.name) {
            self.suppress(tag.name);
            return;
        }

        let restore = self.marks.clone();
        for style in tag_styles(&tag) {
            self.marks.retain(|mark| !mark.same_kind(&style));
            self.marks.push(style);
        }
        self.frames.push(Frame {
            name: tag.name,
            restore,
            suppress: false,
            block,
        });
    }

    fn end(&mut self, name: &str) {
        // Inside skipped content only skipped elements can close
        let floor = if self.suppressed > 0 {
            self.frames.len() - self.suppressed
        } else {
            0
        };
        let Some(found) = self.frames[floor..].iter().rposition(|frame| frame.name == name) else {
            return;
        };
        let position = floor + found;

        // Elements left open inside this one close with it
        while self.frames.len() > position {
            let Some(frame) = self.frames.pop() else {
                break;
            };
            if frame.suppress {
                self.suppressed -= 1;
            }
            if frame.block {
                self.after_block = true;
            }
            self.marks = frame.restore;
        }
    }

    fn text(&mut self, text: &str) {
        if self.suppressed > 0 || text.is_empty() {
            return;
        }
        for span in text_to_spans(text, &self.marks) {
            self.push_content(span);
        }
    }

    /// Open an element whose content is skipped
    fn suppress(&mut self, name: String) {
        self.suppressed += 1;
        self.frames.push(Frame {
            name,
            restore: self.marks.clone(),
            suppress: true,
            block: false,
        });
    }

    fn push_content(&mut self, span: Span) {
        if self.after_block {
            self.line_boundary();
        }
        self.spans.push(span);
    }

    /// Start a new line unless already at the start of one
    fn line_boundary(&mut self) {
        self.after_block = false;
        match self.spans.last() {
            None => {}
            Some(span) if span.kind == SpanKind::LineBreak => {}
            Some(_) => self.spans.push(Span::line_break(self.marks.clone())),
        }
    }
}

/// Styles an element applies to its content
fn tag_styles(tag: &Tag) -> Vec<Style> {
    let mut styles = match tag.name.as_str() {
        "strong" | "b" => vec![Style::Bold],
        "em" | "i" => vec![Style::Italic],
        "u" | "ins" => vec![Style::Underline],
        "s" | "strike" | "del" => vec![Style::Strikethrough],
        "font" => {
            let mut font = Vec::new();
            if let Some(color) = tag.attr("color").and_then(Style::color) {
                font.push(color);
            }
            if let Some(size) = tag.attr("size").and_then(Style::size_from_scale) {
                font.push(size);
            }
            font
        }
        _ => Vec::new(),
    };

    if let Some(style) = tag.attr("style") {
        styles.extend(parse_style_attribute(style));
    }
    styles
}
