//! Mention tokens
//!
//! A mention is an atomic inline unit rendering as `@username`. In markup it
//! is a non-editable span:
//!
//! ```html
//! <span class="mention" data-username="alice" contenteditable="false">@alice</span>
//! ```
//!
//! `contenteditable="false"` is what makes an editing surface treat the span
//! as one caret unit for arrow keys and backspace. The display text is always
//! derived from the username; whatever text the span contains on ingestion is
//! ignored.

use crate::error::{EditorError, Result};
use crate::html::{escape_attr, parse_html, Tag};
use serde::Serialize;

/// Class marking a mention span
pub const MENTION_CLASS: &str = "mention";

/// Attribute carrying the mentioned username
pub const USERNAME_ATTR: &str = "data-username";

/// Longest username accepted for a mention
pub const MAX_USERNAME_LEN: usize = 64;

/// Atomic `@username` unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MentionToken {
    username: String,
}

impl MentionToken {
    /// Create a token for the selected user
    ///
    /// # Errors
    ///
    /// Returns `EditorError::InvalidUsername` if the username is empty, too
    /// long, or contains characters other than letters, digits, `_`, `.`
    /// and `-`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mentionkit_core::mention::MentionToken;
    ///
    /// let token = MentionToken::new("alice").unwrap();
    /// assert_eq!(token.display_text(), "@alice");
    /// assert!(MentionToken::new("not valid").is_err());
    /// ```
    pub fn new(username: impl Into<String>) -> Result<Self> {
        let username = username.into();
        if !is_valid_username(&username) {
            return Err(EditorError::InvalidUsername(username));
        }
        Ok(Self { username })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Rendered text, always `@` followed by the username
    pub fn display_text(&self) -> String {
        format!("@{}", self.username)
    }

    /// Length of the display text in chars
    pub fn display_len(&self) -> usize {
        1 + self.username.chars().count()
    }
}

/// Whether a username can be carried by a mention token
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.chars().count() <= MAX_USERNAME_LEN
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// Serialize a token to its canonical markup
pub fn serialize_to_html(token: &MentionToken) -> String {
    let username = escape_attr(token.username());
    format!(
        "<span class=\"{}\" {}=\"{}\" contenteditable=\"false\">@{}</span>",
        MENTION_CLASS,
        USERNAME_ATTR,
        username,
        crate::html::escape_text(token.username())
    )
}

/// Recognize a mention from the start tag of a span
///
/// Returns `None` for anything that is not a `span` with the mention class
/// and a valid `data-username`; callers then treat the element as ordinary
/// markup, so its text survives as plain text.
pub fn deserialize_from_html(tag: &Tag) -> Option<MentionToken> {
    if tag.name != "span" || !tag.has_class(MENTION_CLASS) {
        return None;
    }
    let username = tag.attr(USERNAME_ATTR)?.trim();
    MentionToken::new(username).ok()
}

/// Plain-text projection of markup
///
/// Every mention span becomes `@username` in document order, whatever
/// wrappers surround it.
///
/// # Example
///
/// ```rust
/// use mentionkit_core::mention::to_plain_text;
///
/// let html = r#"<em>Hi <span class="mention" data-username="alice">@Al</span></em>!"#;
/// assert_eq!(to_plain_text(html), "Hi @alice!");
/// ```
pub fn to_plain_text(html: &str) -> String {
    parse_html(html).plain_text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::tokenizer::{events, Event};

    fn start_tag(html: &str) -> Tag {
        match events(html).into_iter().next() {
            Some(Event::Start(tag)) => tag,
            other => panic!("Expected start tag, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_usernames() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("bob_smith.jr-2"));
        assert!(is_valid_username("zoë"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("two words"));
        assert!(!is_valid_username("x\"><script>"));
        assert!(!is_valid_username(&"a".repeat(MAX_USERNAME_LEN + 1)));
    }

    #[test]
    fn test_serialize_to_html() {
        let token = MentionToken::new("alice").unwrap();
        assert_eq!(
            serialize_to_html(&token),
            r#"<span class="mention" data-username="alice" contenteditable="false">@alice</span>"#
        );
    }

    #[test]
    fn test_deserialize_round_trip() {
        let token = MentionToken::new("bob.smith").unwrap();
        let tag = start_tag(&serialize_to_html(&token));
        assert_eq!(deserialize_from_html(&tag), Some(token));
    }

    #[test]
    fn test_deserialize_unrecognized() {
        // Missing username
        assert_eq!(deserialize_from_html(&start_tag(r#"<span class="mention">"#)), None);
        // Wrong class
        assert_eq!(
            deserialize_from_html(&start_tag(r#"<span class="tag" data-username="alice">"#)),
            None
        );
        // Invalid username
        assert_eq!(
            deserialize_from_html(&start_tag(r#"<span class="mention" data-username="a b">"#)),
            None
        );
        // Not a span
        assert_eq!(
            deserialize_from_html(&start_tag(r#"<a class="mention" data-username="alice">"#)),
            None
        );
    }

    #[test]
    fn test_display_normalized_to_username() {
        // The span text is whatever was typed; the projection uses the username
        let html = r#"<span class="mention" data-username="alice" contenteditable="false">@Al</span>"#;
        assert_eq!(to_plain_text(html), "@alice");
    }

    #[test]
    fn test_to_plain_text_wrappers_and_order() {
        let html = concat!(
            r#"<strong>cc <span class="mention" data-username="alice">@alice</span></strong>"#,
            r#" and <span style="color: red"><span class="mention" data-username="bob">x</span></span>"#,
        );
        assert_eq!(to_plain_text(html), "cc @alice and @bob");
    }

    #[test]
    fn test_to_plain_text_unrecognized_mention_is_text() {
        let html = r#"hey <span class="mention">@ghost</span>"#;
        assert_eq!(to_plain_text(html), "hey @ghost");
    }
}
