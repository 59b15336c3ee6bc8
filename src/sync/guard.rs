/// Typing guard
///
/// Mediates between content pushed by the host and the user's own edits.
/// While the user is typing, host updates that look like an echo of the
/// local edits (small length difference) are dropped instead of replacing
/// the document under the caret.
///
/// ```text
///            input event                 silence window elapsed
///   Idle ───────────────────► Typing ─────────────────────────► Idle
///     ▲   (input restarts the window)
///     │
///     └── programmatic operation: ProgrammaticEdit for its duration,
///         then back to whatever state preceded it
/// ```
///
/// The silence timer is a deadline checked lazily against a [`Clock`]; a
/// host timer firing at the deadline only needs to call [`TypingGuard::end_typing`].
///
/// [`Clock`]: super::Clock
use serde::Serialize;

/// Current state of the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GuardState {
    Idle,
    Typing,
    ProgrammaticEdit,
}

/// Verdict on an incoming host update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Apply,
    Drop,
}

/// Typing-guard state machine for one editor
#[derive(Debug, Clone)]
pub struct TypingGuard {
    silence_window_ms: u64,
    reset_threshold: usize,
    /// End of the current silence window
    typing_until: Option<u64>,
    /// Nesting depth of programmatic operations
    programmatic: usize,
}

impl TypingGuard {
    pub fn new(silence_window_ms: u64, reset_threshold: usize) -> Self {
        Self {
            silence_window_ms,
            reset_threshold,
            typing_until: None,
            programmatic: 0,
        }
    }

    /// Record a native input event, (re)starting the silence window
    pub fn note_input(&mut self, now_ms: u64) {
        self.typing_until = Some(now_ms.saturating_add(self.silence_window_ms));
    }

    pub fn state(&self, now_ms: u64) -> GuardState {
        if self.programmatic > 0 {
            GuardState::ProgrammaticEdit
        } else if self.is_typing(now_ms) {
            GuardState::Typing
        } else {
            GuardState::Idle
        }
    }

    fn is_typing(&self, now_ms: u64) -> bool {
        self.typing_until
            .map(|deadline| now_ms < deadline)
            .unwrap_or(false)
    }

    /// When the current silence window ends, if typing
    pub fn typing_deadline(&self) -> Option<u64> {
        self.typing_until
    }

    /// Silence timer callback: typing is over
    ///
    /// Returns whether the guard was in a silence window.
    pub fn end_typing(&mut self) -> bool {
        self.typing_until.take().is_some()
    }

    /// Drop the deadline if it has passed
    pub fn expire(&mut self, now_ms: u64) -> bool {
        if self.typing_until.is_some() && !self.is_typing(now_ms) {
            self.typing_until = None;
            return true;
        }
        false
    }

    pub fn begin_programmatic(&mut self) {
        self.programmatic += 1;
    }

    pub fn end_programmatic(&mut self) {
        self.programmatic = self.programmatic.saturating_sub(1);
    }

    /// Decide whether a host update replaces the document
    ///
    /// Lengths are plain-text char counts. While typing, only an update whose
    /// length differs by more than the reset threshold is applied; anything
    /// smaller is taken to be the host echoing our own keystrokes back. A
    /// programmatic operation in flight owns the document, so updates
    /// arriving during one are dropped.
    pub fn admit(&self, now_ms: u64, current_len: usize, incoming_len: usize) -> Admission {
        match self.state(now_ms) {
            GuardState::Idle => Admission::Apply,
            GuardState::Typing => {
                if current_len.abs_diff(incoming_len) > self.reset_threshold {
                    Admission::Apply
                } else {
                    Admission::Drop
                }
            }
            GuardState::ProgrammaticEdit => Admission::Drop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> TypingGuard {
        TypingGuard::new(500, 5)
    }

    #[test]
    fn test_starts_idle() {
        let guard = guard();
        assert_eq!(guard.state(0), GuardState::Idle);
        assert_eq!(guard.typing_deadline(), None);
    }

    #[test]
    fn test_silence_window() {
        let mut guard = guard();
        guard.note_input(1_000);

        assert_eq!(guard.state(1_000), GuardState::Typing);
        assert_eq!(guard.state(1_499), GuardState::Typing);
        assert_eq!(guard.state(1_500), GuardState::Idle);
        assert_eq!(guard.typing_deadline(), Some(1_500));
    }

    #[test]
    fn test_keystroke_restarts_window() {
        let mut guard = guard();
        guard.note_input(0);
        guard.note_input(400);

        assert_eq!(guard.state(600), GuardState::Typing);
        assert_eq!(guard.state(900), GuardState::Idle);
    }

    #[test]
    fn test_end_typing_and_expire() {
        let mut guard = guard();
        guard.note_input(0);

        assert!(!guard.expire(100));
        assert!(guard.expire(500));
        assert_eq!(guard.typing_deadline(), None);

        guard.note_input(600);
        assert!(guard.end_typing());
        assert_eq!(guard.state(601), GuardState::Idle);
        assert!(!guard.end_typing());
    }

    #[test]
    fn test_programmatic_restores_previous_state() {
        let mut guard = guard();
        guard.note_input(0);

        guard.begin_programmatic();
        assert_eq!(guard.state(10), GuardState::ProgrammaticEdit);
        guard.begin_programmatic();
        guard.end_programmatic();
        assert_eq!(guard.state(10), GuardState::ProgrammaticEdit);
        guard.end_programmatic();

        assert_eq!(guard.state(10), GuardState::Typing);
    }

    #[test]
    fn test_admit_while_typing() {
        let mut guard = guard();
        guard.note_input(0);

        // "Hello" -> "Hell": echo of our own typing
        assert_eq!(guard.admit(100, 5, 4), Admission::Drop);
        assert_eq!(guard.admit(100, 5, 10), Admission::Drop);
        // A different post loaded into the same editor
        assert_eq!(guard.admit(100, 5, 40), Admission::Apply);
        assert_eq!(guard.admit(100, 40, 5), Admission::Apply);
    }

    #[test]
    fn test_admit_when_idle() {
        let mut guard = guard();
        assert_eq!(guard.admit(0, 5, 4), Admission::Apply);

        guard.note_input(0);
        assert_eq!(guard.admit(500, 5, 4), Admission::Apply);
    }

    #[test]
    fn test_admit_during_programmatic_edit() {
        let mut guard = guard();
        guard.begin_programmatic();
        assert_eq!(guard.admit(0, 5, 100), Admission::Drop);
    }
}
