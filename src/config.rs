//! Editor configuration and content props
//!
//! Both are plain serde types so a host can hand them over as JSON:
//!
//! ```json
//! { "silenceWindowMs": 300, "maxLength": 280, "placeholder": "What's up?" }
//! ```

use crate::document::EditableDocument;
use crate::error::{EditorError, Result};
use crate::html::{parse_html, Sanitizer};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default silence window after the last keystroke, in milliseconds
pub const DEFAULT_SILENCE_WINDOW_MS: u64 = 500;

/// Default length delta above which an external update overrides typing
pub const DEFAULT_RESET_THRESHOLD: usize = 5;

/// Default characters allowed in a mention query (a regex class body)
pub const DEFAULT_MENTION_CHARS: &str = r"\w.\-";

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Quiet period after the last input event before typing ends
    pub silence_window_ms: u64,

    /// External updates whose length differs from the current plain text by
    /// more than this are applied even while typing
    pub reset_threshold: usize,

    /// Limit on the plain-text length in chars
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Text shown while the document is empty
    pub placeholder: String,

    /// Characters a mention query may contain, as the body of a regex class
    pub mention_chars: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            silence_window_ms: DEFAULT_SILENCE_WINDOW_MS,
            reset_threshold: DEFAULT_RESET_THRESHOLD,
            max_length: None,
            placeholder: String::new(),
            mention_chars: DEFAULT_MENTION_CHARS.to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON configuration; missing keys take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EditorConfig =
            serde_json::from_str(json).map_err(|e| EditorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.silence_window_ms == 0 {
            return Err(EditorError::Config(
                "silenceWindowMs must be greater than zero".to_string(),
            ));
        }
        self.mention_pattern()?;
        Ok(())
    }

    /// Pattern matching a trailing `@query` at the end of the text before
    /// the caret; group 1 is the query
    pub fn mention_pattern(&self) -> Result<Regex> {
        Regex::new(&format!(r"@([{}]*)$", self.mention_chars))
            .map_err(|e| EditorError::Config(format!("invalid mentionChars: {}", e)))
    }
}

/// Content delivered by the host (`value` / `htmlValue` props)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalContent {
    /// Plain text
    #[serde(default)]
    pub value: Option<String>,

    /// Markup; preferred over `value` when both are given
    #[serde(default)]
    pub html_value: Option<String>,
}

impl ExternalContent {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            html_value: None,
        }
    }

    pub fn html(html_value: impl Into<String>) -> Self {
        Self {
            value: None,
            html_value: Some(html_value.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.html_value.is_none()
    }

    /// Build the document this content describes
    ///
    /// Markup crosses the sanitizer before it is parsed. Absent content is
    /// an empty document.
    pub fn to_document(&self, sanitizer: &dyn Sanitizer) -> EditableDocument {
        match (&self.html_value, &self.value) {
            (Some(html), _) => parse_html(&sanitizer.sanitize(html)),
            (None, Some(value)) => EditableDocument::from_plain_text(value),
            (None, None) => EditableDocument::new(),
        }
    }
}
