//! Style: the attribute carried by a formatting wrapper
//!
//! A formatting wrapper has no identity beyond the spans it covers, so a
//! style is just a value. Spans carry a stack of styles (outermost first)
//! and the HTML serializer rebuilds nested wrappers from those stacks.

use serde::Serialize;
use std::mem::discriminant;

/// Longest CSS value accepted for colour and size styles
const MAX_CSS_VALUE_LEN: usize = 64;

/// A single inline formatting attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Style {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    /// Foreground colour (CSS colour value)
    Color(String),
    /// Background colour (CSS colour value)
    Background(String),
    /// Font size (CSS length or keyword)
    Size(String),
}

impl Style {
    /// Foreground colour style, `None` if the value is not a safe CSS value
    pub fn color(value: &str) -> Option<Self> {
        safe_css_value(value).map(Style::Color)
    }

    /// Background colour style, `None` if the value is not a safe CSS value
    pub fn background(value: &str) -> Option<Self> {
        safe_css_value(value).map(Style::Background)
    }

    /// Font size style, `None` if the value is not a safe CSS value
    pub fn size(value: &str) -> Option<Self> {
        safe_css_value(value).map(Style::Size)
    }

    /// Font size from the 1-7 scale used by `fontSize` commands and `<font size>`
    ///
    /// Anything that is not a digit in range is tried as a CSS value.
    pub fn size_from_scale(value: &str) -> Option<Self> {
        let keyword = match value.trim() {
            "1" => "x-small",
            "2" => "small",
            "3" => "medium",
            "4" => "large",
            "5" => "x-large",
            "6" => "xx-large",
            "7" => "xxx-large",
            other => return Self::size(other),
        };
        Some(Style::Size(keyword.to_string()))
    }

    /// Whether two styles occupy the same slot (e.g. two colours)
    pub fn same_kind(&self, other: &Style) -> bool {
        discriminant(self) == discriminant(other)
    }

    /// Opening tag used when serializing this style as a wrapper
    pub fn open_tag(&self) -> String {
        match self {
            Style::Bold => "<strong>".to_string(),
            Style::Italic => "<em>".to_string(),
            Style::Underline => "<u>".to_string(),
            Style::Strikethrough => "<s>".to_string(),
            Style::Color(value) => format!("<span style=\"color: {}\">", value),
            Style::Background(value) => {
                format!("<span style=\"background-color: {}\">", value)
            }
            Style::Size(value) => format!("<span style=\"font-size: {}\">", value),
        }
    }

    /// Closing tag matching [`Style::open_tag`]
    pub fn close_tag(&self) -> &'static str {
        match self {
            Style::Bold => "</strong>",
            Style::Italic => "</em>",
            Style::Underline => "</u>",
            Style::Strikethrough => "</s>",
            Style::Color(_) | Style::Background(_) | Style::Size(_) => "</span>",
        }
    }

    /// Map one CSS declaration onto a style
    ///
    /// Used when ingesting `style` attributes. Unknown properties and unsafe
    /// values yield `None`.
    pub fn from_declaration(property: &str, value: &str) -> Option<Self> {
        let value = value.trim();
        match property.trim().to_ascii_lowercase().as_str() {
            "color" => Self::color(value),
            "background-color" | "background" => Self::background(value),
            "font-size" => Self::size(value),
            "font-weight" => {
                let bold = value.eq_ignore_ascii_case("bold")
                    || value.eq_ignore_ascii_case("bolder")
                    || value.parse::<u16>().map(|w| w >= 600).unwrap_or(false);
                bold.then_some(Style::Bold)
            }
            "font-style" => value.eq_ignore_ascii_case("italic").then_some(Style::Italic),
            "text-decoration" | "text-decoration-line" => {
                let lower = value.to_ascii_lowercase();
                if lower.contains("underline") {
                    Some(Style::Underline)
                } else if lower.contains("line-through") {
                    Some(Style::Strikethrough)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// Validate a CSS value against a conservative character allow-list
pub(crate) fn safe_css_value(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > MAX_CSS_VALUE_LEN {
        return None;
    }

    let allowed = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "#(),.% -".contains(c));
    if !allowed {
        return None;
    }

    let lower = value.to_ascii_lowercase();
    if lower.contains("url(") || lower.contains("expression") || lower.contains("javascript") {
        return None;
    }

    Some(value.to_string())
}

/// Parse a `style` attribute into the styles it expresses
pub(crate) fn parse_style_attribute(style: &str) -> Vec<Style> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            Style::from_declaration(property, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_kind() {
        assert!(Style::Color("red".into()).same_kind(&Style::Color("blue".into())));
        assert!(!Style::Color("red".into()).same_kind(&Style::Background("red".into())));
        assert!(Style::Bold.same_kind(&Style::Bold));
    }

    #[test]
    fn test_unsafe_values_rejected() {
        assert!(Style::color("red").is_some());
        assert!(Style::color("#ff0000").is_some());
        assert!(Style::color("rgb(255, 0, 0)").is_some());
        assert!(Style::color("red; position: fixed").is_none());
        assert!(Style::color("url(http://evil)").is_none());
        assert!(Style::color("expression(alert(1))").is_none());
        assert!(Style::color("\"><script>").is_none());
        assert!(Style::color("").is_none());
    }

    #[test]
    fn test_size_scale() {
        assert_eq!(Style::size_from_scale("1"), Some(Style::Size("x-small".into())));
        assert_eq!(Style::size_from_scale("7"), Some(Style::Size("xxx-large".into())));
        assert_eq!(Style::size_from_scale("18px"), Some(Style::Size("18px".into())));
        assert_eq!(Style::size_from_scale("9;x"), None);
    }

    #[test]
    fn test_tags() {
        assert_eq!(Style::Bold.open_tag(), "<strong>");
        assert_eq!(Style::Bold.close_tag(), "</strong>");
        assert_eq!(
            Style::Color("red".into()).open_tag(),
            "<span style=\"color: red\">"
        );
        assert_eq!(Style::Size("large".into()).close_tag(), "</span>");
    }

    #[test]
    fn test_parse_style_attribute() {
        let styles =
            parse_style_attribute("color: red; font-weight: 700; text-decoration: underline");
        assert_eq!(
            styles,
            vec![Style::Color("red".into()), Style::Bold, Style::Underline]
        );

        assert!(parse_style_attribute("position: absolute").is_empty());
        assert!(parse_style_attribute("font-weight: normal").is_empty());
    }
}
