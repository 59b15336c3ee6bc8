//! Editor: the engine facade for one editing surface
//!
//! An [`Editor`] owns the live document, the selection and the typing guard,
//! and talks to the surrounding application through an [`EditorHost`].
//!
//! # Example
//!
//! ```rust
//! use mentionkit_core::config::EditorConfig;
//! use mentionkit_core::editor::Editor;
//! use mentionkit_core::sync::ManualClock;
//!
//! let mut editor = Editor::with_clock(EditorConfig::default(), (), ManualClock::new()).unwrap();
//! editor.insert_text("Thanks @al").unwrap();
//!
//! let query = editor.active_mention_query().unwrap();
//! assert_eq!(query.query, "al");
//!
//! editor.insert_mention("alice", 7, 10).unwrap();
//! assert_eq!(editor.plain_text(), "Thanks @alice ");
//! ```
//!
//! # Architecture
//!
//! ```text
//! input events ──► TypingGuard (Typing) ──► EditableDocument ──► commit
//!                                                                  │
//!       host ◄── on_change(plain, html) ◄── emit_change ◄──────────┤
//!       host ◄── on_mention_trigger / on_mention_hide ◄── detect ◄─┘
//!       host ──► set_content ──► TypingGuard::admit ──► Applied | Dropped
//! ```
//!
//! Programmatic operations (mention insertion, commands, clear) run inside
//! [`GuardState::ProgrammaticEdit`] and restore the previous guard state when
//! they return.

mod command;
mod emit;
mod input;
mod mention_ops;

pub use command::Command;
pub use mention_ops::{AnchorPosition, MentionInsertion, MentionTrigger};

use crate::config::{EditorConfig, ExternalContent};
use crate::direction::{detect_direction, TextDirection};
use crate::document::{EditableDocument, Marks};
use crate::error::Result;
use crate::html::{AllowListSanitizer, Sanitizer};
use crate::selection::Selection;
use crate::sync::{Admission, Clock, GuardState, SyncOutcome, TypingGuard};
use regex::Regex;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Callbacks into the embedding application
///
/// Every callback has a no-op default, and `()` is a host that ignores
/// everything.
pub trait EditorHost {
    /// Content changed through a user edit or a programmatic operation
    fn on_change(&mut self, _plain_text: &str, _html: &str) {}

    /// A mention query is active at the caret (or changed)
    fn on_mention_trigger(&mut self, _trigger: &MentionTrigger) {}

    /// The previously reported mention query is gone
    fn on_mention_hide(&mut self) {}
}

impl EditorHost for () {}

/// IME composition in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Composition {
    /// Where the composed text starts
    start: usize,
    /// Length of the provisional text currently in the document
    len: usize,
}

/// Mention-aware rich-text editor
pub struct Editor<H: EditorHost = ()> {
    id: Uuid,
    config: EditorConfig,
    mention_pattern: Regex,
    doc: EditableDocument,
    selection: Selection,
    guard: TypingGuard,
    clock: Box<dyn Clock>,
    sanitizer: Box<dyn Sanitizer>,
    host: H,
    /// Set once content has been applied since mount or `clear`
    initialized: bool,
    composition: Option<Composition>,
    /// Styles for the next typed text at a collapsed caret
    pending_marks: Option<Marks>,
    direction: TextDirection,
    active_query: Option<MentionTrigger>,
    focused: bool,
}

impl<H: EditorHost> Editor<H> {
    /// Mount an editor using the system clock
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(config: EditorConfig, host: H) -> Result<Self> {
        Self::with_clock(config, host, crate::sync::SystemClock::new())
    }

    /// Mount an editor with an explicit clock
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Config` if the configuration does not validate.
    pub fn with_clock(config: EditorConfig, host: H, clock: impl Clock + 'static) -> Result<Self> {
        config.validate()?;
        let mention_pattern = config.mention_pattern()?;
        let id = Uuid::new_v4();

        debug!(editor = %id, silence_window_ms = config.silence_window_ms, "editor mounted");

        Ok(Self {
            id,
            guard: TypingGuard::new(config.silence_window_ms, config.reset_threshold),
            config,
            mention_pattern,
            doc: EditableDocument::new(),
            selection: Selection::default(),
            clock: Box::new(clock),
            sanitizer: Box::new(AllowListSanitizer::new()),
            host,
            initialized: false,
            composition: None,
            pending_marks: None,
            direction: TextDirection::Ltr,
            active_query: None,
            focused: false,
        })
    }

    /// Replace the sanitizer used for output and ingestion
    pub fn with_sanitizer(mut self, sanitizer: impl Sanitizer + 'static) -> Self {
        self.sanitizer = Box::new(sanitizer);
        self
    }

    /// Instance id, carried by every log event of this editor
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &EditableDocument {
        &self.doc
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn direction(&self) -> TextDirection {
        self.direction
    }

    pub fn placeholder(&self) -> &str {
        &self.config.placeholder
    }

    /// Whether the placeholder should be visible
    pub fn shows_placeholder(&self) -> bool {
        self.doc.is_empty() && self.composition.is_none()
    }

    pub fn is_composing(&self) -> bool {
        self.composition.is_some()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// The mention query last reported to the host, if still active
    pub fn active_mention_query(&self) -> Option<&MentionTrigger> {
        self.active_query.as_ref()
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn guard_state(&self) -> GuardState {
        self.guard.state(self.clock.now_ms())
    }

    /// When the typing silence window ends, in clock milliseconds
    pub fn typing_deadline(&self) -> Option<u64> {
        self.guard.typing_deadline()
    }

    /// Silence timer callback
    pub fn expire_typing(&mut self) -> bool {
        let ended = self.guard.end_typing();
        if ended {
            debug!(editor = %self.id, "typing ended");
        }
        ended
    }

    /// Place the selection, in plain-text offsets
    ///
    /// Offsets are clamped to the document. A caret inside a mention moves to
    /// just after it, and a range cutting into one widens to cover it. Moving
    /// the caret discards pending styles.
    pub fn set_selection(&mut self, anchor: usize, focus: usize) {
        let len = self.doc.len();
        let (anchor, focus) = (anchor.min(len), focus.min(len));

        let selection = if anchor == focus {
            Selection::collapsed(self.doc.snap_out_of_atomic(anchor))
        } else {
            let (start, end) = self.doc.expand_to_atomic(anchor.min(focus), anchor.max(focus));
            if anchor < focus {
                Selection::new(start, end)
            } else {
                Selection::new(end, start)
            }
        };

        if selection != self.selection {
            self.pending_marks = None;
        }
        self.selection = selection;
        self.detect_mention();
    }

    /// Apply host content (`value` / `htmlValue` props)
    ///
    /// The first application after mount or `clear` is unconditional. Later
    /// ones go through the typing guard. Content is not echoed back through
    /// `on_change`.
    #[instrument(skip(self, content), fields(editor = %self.id))]
    pub fn set_content(&mut self, content: &ExternalContent) -> SyncOutcome {
        let incoming = content.to_document(self.sanitizer.as_ref());

        if incoming == self.doc {
            self.initialized = true;
            return SyncOutcome::Unchanged;
        }

        if self.initialized {
            let now = self.clock.now_ms();
            if self.guard.expire(now) {
                debug!("silence window elapsed");
            }
            let admission = self.guard.admit(now, self.doc.len(), incoming.len());
            if admission == Admission::Drop {
                debug!(
                    current_len = self.doc.len(),
                    incoming_len = incoming.len(),
                    state = ?self.guard.state(now),
                    "dropped external update"
                );
                return SyncOutcome::Dropped;
            }
        }

        self.initialized = true;
        self.replace_document(incoming);
        debug!(len = self.doc.len(), "applied external update");
        SyncOutcome::Applied
    }

    /// Wipe the content
    ///
    /// The next `set_content` is applied as if freshly mounted.
    pub fn clear(&mut self) {
        self.programmatic(|editor| {
            editor.replace_document(EditableDocument::new());
            editor.emit_change();
        });
        self.initialized = false;
        debug!(editor = %self.id, "editor cleared");
    }

    /// Run a programmatic operation under `ProgrammaticEdit`
    fn programmatic<T>(&mut self, operation: impl FnOnce(&mut Self) -> T) -> T {
        self.guard.begin_programmatic();
        let result = operation(self);
        self.guard.end_programmatic();
        result
    }

    fn replace_document(&mut self, doc: EditableDocument) {
        self.doc = doc;
        self.composition = None;
        self.pending_marks = None;
        self.selection = Selection::collapsed(self.doc.len());
        self.direction = detect_direction(&self.doc);
        self.detect_mention();
    }

    /// Bookkeeping after every mutation
    fn commit(&mut self) {
        self.direction = detect_direction(&self.doc);
        self.emit_change();
        self.detect_mention();
    }
}

impl<H: EditorHost> Drop for Editor<H> {
    fn drop(&mut self) {
        debug!(editor = %self.id, "editor unmounted");
    }
}

impl<H: EditorHost> std::fmt::Debug for Editor<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("id", &self.id)
            .field("doc", &self.doc)
            .field("selection", &self.selection)
            .field("guard", &self.guard)
            .field("composition", &self.composition)
            .finish_non_exhaustive()
    }
}
