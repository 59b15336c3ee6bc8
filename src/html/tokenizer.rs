//! Markup tokenizer for the editor's inline HTML subset
//!
//! Built on `logos`. Only the shapes an inline editing surface produces are
//! recognized as markup: start tags, end tags and text. Comments are skipped
//! and a `<` that does not open a tag is kept as text. The tokenizer never
//! fails; anything it cannot classify is passed through as text so ingestion
//! can degrade instead of erroring.

use logos::{Lexer, Logos, Skip};
use std::borrow::Cow;

/// Raw lexical token with a slice into the source
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'src> {
    #[token("<!--", skip_comment)]
    Comment,

    #[regex(r"</[A-Za-z][A-Za-z0-9]*[^>]*>", |lex| lex.slice())]
    EndTag(&'src str),

    #[regex(r#"<[A-Za-z][A-Za-z0-9]*([^>"']|"[^"]*"|'[^']*')*>"#, |lex| lex.slice())]
    StartTag(&'src str),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),

    #[token("<")]
    StrayLt,
}

fn skip_comment<'src>(lex: &mut Lexer<'src, Token<'src>>) -> Skip {
    let rest = lex.remainder();
    match rest.find("-->") {
        Some(end) => lex.bump(end + 3),
        None => lex.bump(rest.len()),
    }
    Skip
}

/// A parsed start tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Lowercased element name
    pub name: String,
    /// Attributes in source order, names lowercased, values entity-decoded
    pub attrs: Vec<(String, String)>,
    /// Written as `<name ... />`
    pub self_closing: bool,
}

impl Tag {
    /// First value of the named attribute
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the `class` attribute contains the given class name
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

/// Markup event produced by [`events`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<'src> {
    Start(Tag),
    End(String),
    Text(Cow<'src, str>),
}

/// Tokenize markup into start/end/text events
pub fn events(html: &str) -> Vec<Event<'_>> {
    let mut out = Vec::new();
    let mut lexer = Token::lexer(html);

    while let Some(token) = lexer.next() {
        match token {
            Ok(Token::StartTag(raw)) => out.push(Event::Start(parse_start_tag(raw))),
            Ok(Token::EndTag(raw)) => out.push(Event::End(parse_end_tag(raw))),
            Ok(Token::Text(raw)) => out.push(Event::Text(decode_entities(raw))),
            Ok(Token::StrayLt) => out.push(Event::Text(Cow::Borrowed("<"))),
            Ok(Token::Comment) => {}
            Err(()) => out.push(Event::Text(Cow::Borrowed(lexer.slice()))),
        }
    }

    out
}

/// Element names without content or end tag
pub fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "br" | "img" | "hr" | "input" | "meta" | "link" | "wbr" | "col" | "area" | "base" | "source"
    )
}

/// Elements whose content never reaches the document
pub fn is_dropped_element(name: &str) -> bool {
    matches!(
        name,
        "script"
            | "style"
            | "iframe"
            | "object"
            | "embed"
            | "template"
            | "noscript"
            | "head"
            | "title"
    )
}

/// Block elements whose boundaries become line breaks on ingestion
pub fn is_block_element(name: &str) -> bool {
    matches!(
        name,
        "div" | "p" | "li" | "blockquote" | "pre" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
    )
}

fn parse_end_tag(raw: &str) -> String {
    let inner = raw.trim_start_matches("</").trim_end_matches('>');
    inner
        .split(|c: char| c.is_ascii_whitespace())
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn parse_start_tag(raw: &str) -> Tag {
    let inner = &raw[1..raw.len() - 1];
    let self_closing = inner.trim_end().ends_with('/');
    let inner = inner.trim_end().trim_end_matches('/');

    let name_end = inner
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();

    Tag {
        name,
        attrs: parse_attributes(&inner[name_end..]),
        self_closing,
    }
}

fn parse_attributes(source: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut chars = source.char_indices().peekable();

    loop {
        // Skip separators
        while let Some(&(_, c)) = chars.peek() {
            if c.is_ascii_whitespace() || c == '/' {
                chars.next();
            } else {
                break;
            }
        }

        let Some(&(name_start, _)) = chars.peek() else {
            break;
        };

        let mut name_end = source.len();
        while let Some(&(i, c)) = chars.peek() {
            if c.is_ascii_whitespace() || c == '=' || c == '/' {
                name_end = i;
                break;
            }
            chars.next();
        }
        let name = source[name_start..name_end].to_ascii_lowercase();

        while let Some(&(_, c)) = chars.peek() {
            if c.is_ascii_whitespace() {
                chars.next();
            } else {
                break;
            }
        }

        let mut value = String::new();
        if let Some(&(_, '=')) = chars.peek() {
            chars.next();
            while let Some(&(_, c)) = chars.peek() {
                if c.is_ascii_whitespace() {
                    chars.next();
                } else {
                    break;
                }
            }

            match chars.peek().copied() {
                Some((_, quote @ ('"' | '\''))) => {
                    chars.next();
                    for (_, c) in chars.by_ref() {
                        if c == quote {
                            break;
                        }
                        value.push(c);
                    }
                }
                Some(_) => {
                    while let Some(&(_, c)) = chars.peek() {
                        if c.is_ascii_whitespace() {
                            break;
                        }
                        value.push(c);
                        chars.next();
                    }
                }
                None => {}
            }
        }

        if !name.is_empty() {
            attrs.push((name, decode_entities(&value).into_owned()));
        }
    }

    attrs
}

/// Decode the character references an editing surface emits
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest.find(';').and_then(|semi| {
            let entity = &rest[1..semi];
            decode_entity(entity).map(|c| (c, semi + 1))
        });

        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = entity.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Escape text content
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// Escape an attribute value for a double-quoted attribute
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}
