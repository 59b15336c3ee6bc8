mod clock;
/// Document synchronization with the host
///
/// Content flows both ways between an editor and its host: local edits go
/// out through change emission, and the host pushes content back in (props).
/// The typing guard decides which incoming updates are allowed to replace the
/// live document.
///
/// Key properties:
/// - The first content application after mount (or after `clear`) is
///   unconditional
/// - While typing, small updates are dropped, not queued or merged
/// - Programmatic operations are never mistaken for conflicting updates
mod guard;

#[cfg(not(target_arch = "wasm32"))]
pub use clock::SystemClock;
pub use clock::{Clock, ManualClock};
pub use guard::{Admission, GuardState, TypingGuard};

use serde::Serialize;

/// Default silence window after the last keystroke, in milliseconds
pub const DEFAULT_SILENCE_WINDOW_MS: u64 = crate::config::DEFAULT_SILENCE_WINDOW_MS;

/// Default length delta that lets an external update through while typing
pub const DEFAULT_RESET_THRESHOLD: usize = crate::config::DEFAULT_RESET_THRESHOLD;

/// What happened to a host content update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncOutcome {
    /// The document was replaced
    Applied,
    /// The update was discarded by the typing guard
    Dropped,
    /// The update matched the current document
    Unchanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_guard() {
        let guard = TypingGuard::new(DEFAULT_SILENCE_WINDOW_MS, DEFAULT_RESET_THRESHOLD);
        assert_eq!(guard.state(0), GuardState::Idle);
        assert_eq!(DEFAULT_SILENCE_WINDOW_MS, 500);
    }
}
