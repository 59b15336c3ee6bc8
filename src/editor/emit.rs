//! Change emission
//!
//! Output always goes document → markup → sanitizer, and the plain text the
//! host sees is derived from that sanitized markup, so the two values handed
//! to `on_change` can never disagree.

use super::{Editor, EditorHost};
use crate::html::serialize_html;
use crate::mention::to_plain_text;
use tracing::trace;

impl<H: EditorHost> Editor<H> {
    /// Sanitized markup of the document
    pub fn html(&self) -> String {
        self.sanitizer.sanitize(&serialize_html(&self.doc))
    }

    /// Plain-text projection of the sanitized markup
    pub fn plain_text(&self) -> String {
        to_plain_text(&self.html())
    }

    /// Notify the host of the current content
    ///
    /// No-op while an IME composition is in progress; the composed text is
    /// emitted once, when the composition ends.
    pub fn emit_change(&mut self) {
        if self.composition.is_some() {
            trace!(editor = %self.id, "change emission deferred during composition");
            return;
        }

        let html = self.html();
        let plain_text = to_plain_text(&html);
        trace!(editor = %self.id, len = plain_text.chars().count(), "emitting change");
        self.host.on_change(&plain_text, &html);
    }
}
