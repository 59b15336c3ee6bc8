//! Selection in plain-text offsets
//!
//! The editor never caches a node position across edits: the selection is a
//! pair of offsets into the plain-text projection and every concrete location
//! is re-derived from the current document through the mapper.

use serde::{Deserialize, Serialize};

/// Anchor/focus pair, like a native selection
///
/// The anchor is where the selection started, the focus is where the caret
/// is. Backward selections have `focus < anchor`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: usize,
    pub focus: usize,
}

impl Selection {
    pub fn new(anchor: usize, focus: usize) -> Self {
        Self { anchor, focus }
    }

    /// A caret at `offset`
    pub fn collapsed(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn caret(&self) -> usize {
        self.focus
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.focus)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.focus)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Clamp both ends into `[0, len]`
    pub fn clamp(&self, len: usize) -> Self {
        Self::new(self.anchor.min(len), self.focus.min(len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backward_selection() {
        let selection = Selection::new(8, 3);
        assert_eq!(selection.start(), 3);
        assert_eq!(selection.end(), 8);
        assert_eq!(selection.caret(), 3);
        assert!(!selection.is_collapsed());
    }

    #[test]
    fn test_clamp() {
        assert_eq!(Selection::new(2, 10).clamp(5), Selection::new(2, 5));
        assert!(Selection::collapsed(4).is_collapsed());
    }
}
