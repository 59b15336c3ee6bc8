//! Native input events
//!
//! Every event here is user input: it restarts the typing guard's silence
//! window before touching the document. Deletion works on whole grapheme
//! clusters inside text and on whole atomic spans, so a backspace right after
//! a mention removes the mention.

use super::{Composition, Editor, EditorHost};
use crate::error::Result;
use crate::selection::Selection;
use unicode_segmentation::UnicodeSegmentation;

impl<H: EditorHost> Editor<H> {
    /// Insert typed or pasted text at the selection
    ///
    /// A non-collapsed selection is replaced. Newlines become line breaks.
    /// With a `max_length`, the text is cut at the last grapheme boundary
    /// that fits.
    pub fn insert_text(&mut self, text: &str) -> Result<()> {
        self.note_input();

        let (start, removed) = self.remove_selection()?;
        let text = self.fit_to_max_length(text);
        if text.is_empty() {
            if removed {
                self.commit();
            }
            return Ok(());
        }

        let marks = match self.pending_marks.take() {
            Some(marks) => marks,
            None => self.doc.marks_at(start),
        };
        let caret = self.doc.insert_text(start, text, marks)?;
        self.selection = Selection::collapsed(caret);
        self.commit();
        Ok(())
    }

    /// Enter key
    pub fn insert_line_break(&mut self) -> Result<()> {
        self.insert_text("\n")
    }

    /// Backspace
    pub fn delete_backward(&mut self) -> Result<()> {
        self.note_input();

        if !self.selection.is_collapsed() {
            self.remove_selection()?;
            self.commit();
            return Ok(());
        }

        let caret = self.selection.caret().min(self.doc.len());
        if caret == 0 {
            return Ok(());
        }

        let from = self.doc.grapheme_before(caret);
        let (start, _) = self.doc.delete_range(from, caret)?;
        self.selection = Selection::collapsed(start);
        self.pending_marks = None;
        self.commit();
        Ok(())
    }

    /// Delete key
    pub fn delete_forward(&mut self) -> Result<()> {
        self.note_input();

        if !self.selection.is_collapsed() {
            self.remove_selection()?;
            self.commit();
            return Ok(());
        }

        let caret = self.selection.caret().min(self.doc.len());
        if caret == self.doc.len() {
            return Ok(());
        }

        let to = self.doc.grapheme_after(caret);
        let (start, _) = self.doc.delete_range(caret, to)?;
        self.selection = Selection::collapsed(start);
        self.pending_marks = None;
        self.commit();
        Ok(())
    }

    /// IME composition started
    ///
    /// A non-collapsed selection is replaced by the composition. Change
    /// emission and mention detection are suspended until it ends.
    pub fn composition_start(&mut self) -> Result<()> {
        self.note_input();

        let (start, _) = self.remove_selection()?;
        self.composition = Some(Composition { start, len: 0 });
        self.detect_mention();
        Ok(())
    }

    /// Provisional composed text changed
    pub fn composition_update(&mut self, text: &str) -> Result<()> {
        if self.composition.is_none() {
            self.composition_start()?;
        }
        self.note_input();

        let start = self.take_composed_text()?;
        let marks = match &self.pending_marks {
            Some(marks) => marks.clone(),
            None => self.doc.marks_at(start),
        };
        let caret = self.doc.insert_text(start, text, marks)?;

        self.composition = Some(Composition {
            start,
            len: caret - start,
        });
        self.selection = Selection::collapsed(caret);
        Ok(())
    }

    /// Composition committed with its final text
    pub fn composition_end(&mut self, text: &str) -> Result<()> {
        if self.composition.is_none() {
            return self.insert_text(text);
        }
        self.note_input();

        let start = self.take_composed_text()?;
        self.composition = None;
        self.selection = Selection::collapsed(start);

        let text = self.fit_to_max_length(text);
        if !text.is_empty() {
            let marks = match self.pending_marks.take() {
                Some(marks) => marks,
                None => self.doc.marks_at(start),
            };
            let caret = self.doc.insert_text(start, text, marks)?;
            self.selection = Selection::collapsed(caret);
        }
        self.commit();
        Ok(())
    }

    pub(super) fn note_input(&mut self) {
        let now = self.clock.now_ms();
        self.guard.note_input(now);
    }

    /// Delete a non-collapsed selection
    ///
    /// Returns the collapsed insertion point and whether anything was
    /// removed.
    fn remove_selection(&mut self) -> Result<(usize, bool)> {
        let selection = self.selection.clamp(self.doc.len());

        if selection.is_collapsed() {
            let caret = self.doc.snap_out_of_atomic(selection.caret());
            self.selection = Selection::collapsed(caret);
            return Ok((caret, false));
        }

        let (start, _) = self.doc.delete_range(selection.start(), selection.end())?;
        self.selection = Selection::collapsed(start);
        self.pending_marks = None;
        Ok((start, true))
    }

    /// Remove the provisional composed text, returning where it started
    fn take_composed_text(&mut self) -> Result<usize> {
        let Some(composition) = self.composition else {
            return Ok(self.selection.caret().min(self.doc.len()));
        };

        let len = self.doc.len();
        let start = composition.start.min(len);
        let end = (composition.start + composition.len).min(len);
        self.doc.delete_range(start, end)?;
        Ok(start)
    }

    /// Longest grapheme-aligned prefix of `text` that fits in `max_length`
    fn fit_to_max_length<'a>(&self, text: &'a str) -> &'a str {
        let Some(max_length) = self.config.max_length else {
            return text;
        };
        let available = max_length.saturating_sub(self.doc.len());

        let mut used = 0;
        let mut end = 0;
        for (index, grapheme) in text.grapheme_indices(true) {
            let chars = grapheme.chars().count();
            if used + chars > available {
                break;
            }
            used += chars;
            end = index + grapheme.len();
        }

        &text[..end]
    }
}
