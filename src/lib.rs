//! MentionKit Core - Mention-aware rich-text editing engine
//!
//! This is the Rust core of MentionKit, compiled to both native and WASM.
//! It implements:
//! - An editable document model with atomic `@mention` tokens
//! - HTML ingestion, serialization and allow-list sanitization
//! - Plain-text offset mapping and mention query detection
//! - A typing guard that keeps host updates from clobbering live input
//!
//! # Examples
//!
//! ```rust
//! use mentionkit_core::{EditorConfig, ExternalContent, SyncOutcome};
//! use mentionkit_core::editor::Editor;
//! use mentionkit_core::sync::ManualClock;
//!
//! let clock = ManualClock::new();
//! let mut editor = Editor::with_clock(EditorConfig::default(), (), clock.clone()).unwrap();
//!
//! let outcome = editor.set_content(&ExternalContent::html(
//!     r#"Hi <span class="mention" data-username="bob">@bob</span>"#,
//! ));
//! assert_eq!(outcome, SyncOutcome::Applied);
//! assert_eq!(editor.plain_text(), "Hi @bob");
//! ```

pub mod config;
pub mod direction;
pub mod document;
pub mod editor;
pub mod error;
pub mod html;
pub mod mapper;
pub mod mention;
pub mod offsets;
pub mod selection;
pub mod sync;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use config::{EditorConfig, ExternalContent};
pub use document::EditableDocument;
pub use editor::{Editor, EditorHost, MentionInsertion, MentionTrigger};
pub use error::{EditorError, Result};
pub use mention::MentionToken;
pub use selection::Selection;
pub use sync::SyncOutcome;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_import() {
        // Smoke test that modules compile
        let doc = html::parse_html("<b>hi</b>");
        assert_eq!(doc.plain_text(), "hi");
        assert!(MentionToken::new("alice").is_ok());
    }
}
