//! Formatting commands
//!
//! Command names follow the `document.execCommand` vocabulary the toolbar
//! already speaks. Unknown names and unusable values are silent no-ops so a
//! host without native formatting support keeps a working editor.

use super::{Editor, EditorHost};
use crate::document::{Marks, Style};
use crate::selection::Selection;
use tracing::debug;

/// A parsed formatting command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Apply a style, or remove it if the whole selection already has it
    Toggle(Style),
    /// Apply a valued style (colour, size), replacing any of the same kind
    Set(Style),
    /// Remove all formatting from the selection
    RemoveFormat,
    /// Select the whole document
    SelectAll,
}

impl Command {
    /// Parse an `execCommand` name and optional value
    ///
    /// Names are matched case-insensitively. Returns `None` for unknown
    /// commands and for colour or size values that are not safe CSS.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mentionkit_core::document::Style;
    /// use mentionkit_core::editor::Command;
    ///
    /// assert_eq!(Command::parse("bold", None), Some(Command::Toggle(Style::Bold)));
    /// assert_eq!(
    ///     Command::parse("foreColor", Some("#336699")),
    ///     Some(Command::Set(Style::Color("#336699".into())))
    /// );
    /// assert_eq!(Command::parse("insertTable", None), None);
    /// ```
    pub fn parse(name: &str, value: Option<&str>) -> Option<Self> {
        let command = match name.to_ascii_lowercase().as_str() {
            "bold" => Command::Toggle(Style::Bold),
            "italic" => Command::Toggle(Style::Italic),
            "underline" => Command::Toggle(Style::Underline),
            "strikethrough" => Command::Toggle(Style::Strikethrough),
            "forecolor" => Command::Set(Style::color(value?)?),
            "hilitecolor" | "backcolor" => Command::Set(Style::background(value?)?),
            "fontsize" => Command::Set(Style::size_from_scale(value?)?),
            "removeformat" => Command::RemoveFormat,
            "selectall" => Command::SelectAll,
            _ => return None,
        };
        Some(command)
    }
}

impl<H: EditorHost> Editor<H> {
    /// Run a formatting command against the selection
    ///
    /// Returns `false`, changing nothing, for an unsupported command or
    /// value. With a collapsed caret, style commands set the styles the next
    /// typed text will carry. Change emission follows every supported
    /// command.
    pub fn exec_command(&mut self, name: &str, value: Option<&str>) -> bool {
        let Some(command) = Command::parse(name, value) else {
            debug!(
                editor = %self.id,
                command = name,
                value = ?value,
                "unsupported command ignored"
            );
            return false;
        };

        self.programmatic(|editor| {
            editor.apply_command(&command);
            editor.commit();
        });
        true
    }

    fn apply_command(&mut self, command: &Command) {
        let selection = self.selection.clamp(self.doc.len());
        let (start, end) = (selection.start(), selection.end());

        if let Command::SelectAll = command {
            self.selection = Selection::new(0, self.doc.len());
            self.pending_marks = None;
            return;
        }

        if selection.is_collapsed() {
            let mut marks = self
                .pending_marks
                .take()
                .unwrap_or_else(|| self.doc.marks_at(start));
            edit_marks(&mut marks, command);
            self.pending_marks = Some(marks);
            return;
        }

        let result = match command {
            Command::Toggle(style) => {
                let enable = !self.doc.range_has_style(start, end, style);
                self.doc.set_style(start, end, style, enable)
            }
            Command::Set(style) => self.doc.set_style(start, end, style, true),
            Command::RemoveFormat => self.doc.clear_styles(start, end),
            Command::SelectAll => Ok(()),
        };

        if let Err(e) = result {
            debug!(editor = %self.id, error = %e, "command not applied");
        }
    }
}

/// Apply a command to a pending mark stack
fn edit_marks(marks: &mut Marks, command: &Command) {
    match command {
        Command::Toggle(style) => {
            if marks.contains(style) {
                marks.retain(|mark| mark != style);
            } else {
                marks.push(style.clone());
            }
        }
        Command::Set(style) => {
            marks.retain(|mark| !mark.same_kind(style));
            marks.push(style.clone());
        }
        Command::RemoveFormat => marks.clear(),
        Command::SelectAll => {}
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::editor;
    use super::*;
    use crate::html::{AllowListSanitizer, Sanitizer};
    use crate::sync::GuardState;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("BOLD", None), Some(Command::Toggle(Style::Bold)));
        assert_eq!(
            Command::parse("strikeThrough", None),
            Some(Command::Toggle(Style::Strikethrough))
        );
        assert_eq!(
            Command::parse("hiliteColor", Some("yellow")),
            Some(Command::Set(Style::Background("yellow".into())))
        );
        assert_eq!(
            Command::parse("fontSize", Some("4")),
            Some(Command::Set(Style::Size("large".into())))
        );
        assert_eq!(Command::parse("foreColor", None), None);
        assert_eq!(Command::parse("foreColor", Some("red;x:y")), None);
        assert_eq!(Command::parse("justifyCenter", None), None);
    }

    #[test]
    fn test_unsupported_command_is_noop() {
        let (mut editor, _) = editor();
        editor.insert_text("abc").unwrap();
        let emitted = editor.host().changes.len();

        assert!(!editor.exec_command("insertOrderedList", None));
        assert!(!editor.exec_command("foreColor", Some("url(x)")));
        assert_eq!(editor.host().changes.len(), emitted);
        assert_eq!(editor.html(), "abc");
    }

    #[test]
    fn test_toggle_range() {
        let (mut editor, _) = editor();
        editor.insert_text("Hello World").unwrap();
        editor.set_selection(0, 5);

        assert!(editor.exec_command("bold", None));
        assert_eq!(editor.html(), "<strong>Hello</strong> World");

        assert!(editor.exec_command("bold", None));
        assert_eq!(editor.html(), "Hello World");
    }

    #[test]
    fn test_toggle_partially_styled_range_applies() {
        let (mut editor, _) = editor();
        editor.insert_text("Hello World").unwrap();
        editor.set_selection(0, 5);
        editor.exec_command("italic", None);

        editor.set_selection(0, 11);
        editor.exec_command("italic", None);
        assert_eq!(editor.html(), "<em>Hello World</em>");
    }

    #[test]
    fn test_bold_then_type_passes_sanitizer() {
        let (mut editor, _) = editor();
        editor.insert_text("Plain ").unwrap();
        editor.exec_command("bold", None);
        editor.insert_text("bold").unwrap();

        let html = editor.html();
        assert_eq!(html, "Plain <strong>bold</strong>");
        assert_eq!(AllowListSanitizer::new().sanitize(&html), html);
    }

    #[test]
    fn test_pending_style_discarded_on_caret_move() {
        let (mut editor, _) = editor();
        editor.insert_text("ab").unwrap();
        editor.exec_command("bold", None);
        editor.set_selection(1, 1);
        editor.insert_text("x").unwrap();

        assert_eq!(editor.html(), "axb");
    }

    #[test]
    fn test_pending_toggle_off() {
        let (mut editor, _) = editor();
        editor.exec_command("bold", None);
        editor.insert_text("a").unwrap();
        editor.exec_command("bold", None);
        editor.insert_text("b").unwrap();

        assert_eq!(editor.html(), "<strong>a</strong>b");
    }

    #[test]
    fn test_colors_and_sizes() {
        let (mut editor, _) = editor();
        editor.insert_text("red text").unwrap();
        editor.set_selection(0, 3);
        editor.exec_command("foreColor", Some("red"));
        editor.exec_command("foreColor", Some("blue"));
        editor.set_selection(4, 8);
        editor.exec_command("fontSize", Some("18px"));

        assert_eq!(
            editor.html(),
            r#"<span style="color: blue">red</span> <span style="font-size: 18px">text</span>"#
        );
    }

    #[test]
    fn test_remove_format() {
        let (mut editor, _) = editor();
        editor.insert_text("abc").unwrap();
        editor.exec_command("selectAll", None);
        assert_eq!(editor.selection(), Selection::new(0, 3));

        editor.exec_command("bold", None);
        editor.exec_command("underline", None);
        editor.exec_command("removeFormat", None);
        assert_eq!(editor.html(), "abc");
    }

    #[test]
    fn test_command_over_mention_styles_whole_token() {
        let (mut editor, _) = editor();
        editor.insert_text("@al").unwrap();
        editor.insert_mention("alice", 0, 3).unwrap();

        // Selection cuts into the token
        editor.set_selection(2, 7);
        editor.exec_command("italic", None);

        assert!(editor.html().starts_with(r#"<em><span class="mention""#));
    }

    #[test]
    fn test_command_is_programmatic() {
        let (mut editor, clock) = editor();
        editor.insert_text("abc").unwrap();
        clock.advance(600);

        editor.set_selection(0, 3);
        editor.exec_command("bold", None);
        // A command is not typing
        assert_eq!(editor.guard_state(), GuardState::Idle);
    }

    #[test]
    fn test_direction_recomputed() {
        let (mut editor, _) = editor();
        editor.insert_text("שלום").unwrap();
        assert_eq!(editor.direction(), crate::direction::TextDirection::Rtl);

        editor.exec_command("selectAll", None);
        editor.exec_command("bold", None);
        assert_eq!(editor.direction(), crate::direction::TextDirection::Rtl);
    }
}
