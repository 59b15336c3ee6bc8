//! Allow-list sanitization
//!
//! Markup crosses a [`Sanitizer`] before it is exposed to the host and before
//! any external markup is parsed back into a document. The sanitizing policy
//! itself belongs to the embedding application; any `Fn(&str) -> String` can
//! be plugged in. [`AllowListSanitizer`] is the default policy: it keeps the
//! elements and attributes the serializer and the ingestion path understand,
//! unwraps everything else and drops script-like content.

use super::tokenizer::{
    escape_attr, escape_text, events, is_dropped_element, is_void_element, Event, Tag,
};
use crate::document::safe_css_value;
use crate::mention::{MENTION_CLASS, USERNAME_ATTR};

/// External allow-list sanitizer seam
pub trait Sanitizer {
    fn sanitize(&self, html: &str) -> String;
}

impl<F> Sanitizer for F
where
    F: Fn(&str) -> String,
{
    fn sanitize(&self, html: &str) -> String {
        self(html)
    }
}

/// Elements kept by [`AllowListSanitizer`]
const ALLOWED_ELEMENTS: &[&str] = &[
    "strong", "b", "em", "i", "u", "s", "strike", "del", "span", "font", "br", "div", "p",
];

/// CSS properties kept in `style` attributes
const ALLOWED_PROPERTIES: &[&str] = &[
    "color",
    "background-color",
    "font-size",
    "font-weight",
    "font-style",
    "text-decoration",
];

/// Default sanitizer keeping only editor markup
///
/// Output is stable: sanitizing already-sanitized markup returns it
/// unchanged, and markup produced by the serializer passes through as-is.
///
/// # Example
///
/// ```rust
/// use mentionkit_core::html::{AllowListSanitizer, Sanitizer};
///
/// let sanitizer = AllowListSanitizer::new();
/// let clean = sanitizer.sanitize(r#"<b onclick="x()">hi</b><script>alert(1)</script>"#);
/// assert_eq!(clean, "<b>hi</b>");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowListSanitizer;

impl AllowListSanitizer {
    pub fn new() -> Self {
        Self
    }
}

/// How an open element was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Emitted,
    Unwrapped,
    Dropped,
}

impl Sanitizer for AllowListSanitizer {
    fn sanitize(&self, html: &str) -> String {
        let mut out = String::with_capacity(html.len());
        let mut open: Vec<(String, Frame)> = Vec::new();
        // Dropped frames always sit on top of the stack
        let mut dropped = 0usize;

        for event in events(html) {
            match event {
                Event::Start(tag) => {
                    let has_content = !is_void_element(&tag.name) && !tag.self_closing;

                    if dropped > 0 || is_dropped_element(&tag.name) {
                        if has_content {
                            dropped += 1;
                            open.push((tag.name, Frame::Dropped));
                        }
                        continue;
                    }

                    let allowed = ALLOWED_ELEMENTS.contains(&tag.name.as_str());
                    if allowed {
                        write_start_tag(&mut out, &tag);
                        if tag.self_closing && !is_void_element(&tag.name) {
                            write_end_tag(&mut out, &tag.name);
                        }
                    }
                    if has_content {
                        let frame = if allowed { Frame::Emitted } else { Frame::Unwrapped };
                        open.push((tag.name, frame));
                    }
                }
                Event::End(name) => {
                    // Inside dropped content only dropped elements can close
                    let floor = if dropped > 0 { open.len() - dropped } else { 0 };
                    let Some(found) = open[floor..]
                        .iter()
                        .rposition(|(open_name, _)| *open_name == name)
                    else {
                        continue;
                    };
                    let position = floor + found;

                    while open.len() > position {
                        let Some((closed, frame)) = open.pop() else {
                            break;
                        };
                        match frame {
                            Frame::Emitted => write_end_tag(&mut out, &closed),
                            Frame::Unwrapped => {}
                            Frame::Dropped => dropped -= 1,
                        }
                    }
                }
                Event::Text(text) => {
                    if dropped == 0 {
                        out.push_str(&escape_text(&text));
                    }
                }
            }
        }

        for (name, frame) in open.iter().rev() {
            if *frame == Frame::Emitted {
                write_end_tag(&mut out, name);
            }
        }

        out
    }
}

fn write_end_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn write_start_tag(out: &mut String, tag: &Tag) {
    out.push('<');
    out.push_str(&tag.name);

    for (name, value) in &tag.attrs {
        let Some(value) = allowed_attribute(&tag.name, name, value) else {
            continue;
        };
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(&value));
        out.push('"');
    }

    out.push('>');
}

/// The value to keep for an attribute, `None` to drop it
fn allowed_attribute(element: &str, name: &str, value: &str) -> Option<String> {
    match (element, name) {
        ("span", "class") => {
            let classes: Vec<&str> = value
                .split_ascii_whitespace()
                .filter(|class| *class == MENTION_CLASS)
                .collect();
            (!classes.is_empty()).then(|| classes.join(" "))
        }
        ("span", attr) if attr == USERNAME_ATTR => Some(value.to_string()),
        ("span", "contenteditable") => (value == "false").then(|| value.to_string()),
        ("font", "color") | ("font", "size") => safe_css_value(value),
        (_, "style") => sanitize_style(value),
        _ => None,
    }
}

/// Keep allowed declarations with safe values, in canonical `prop: value` form
fn sanitize_style(style: &str) -> Option<String> {
    let declarations: Vec<String> = style
        .split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim().to_ascii_lowercase();
            if !ALLOWED_PROPERTIES.contains(&property.as_str()) {
                return None;
            }
            let value = safe_css_value(value)?;
            Some(format!("{}: {}", property, value))
        })
        .collect();

    (!declarations.is_empty()).then(|| declarations.join("; "))
}
