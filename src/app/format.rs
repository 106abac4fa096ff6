//! Formatting and media shortcuts: read the widget selection, run the edit
//! model, then replay the result into the widget.
//!
//! Edits are replayed as insertions rather than by rebuilding the widget, so
//! tui-textarea's undo history keeps working across them. A wrap takes two
//! insertions; it is recorded as an [`EditGroup`] so one Ctrl+Z reverts it.

use super::*;
use crate::editor::actions::{Format, Media};
use crate::editor::model::Edit;

/// Alt+key bindings for the formatting actions, in toolbar order.
pub(crate) const FORMAT_KEYS: [(char, Format); 11] = [
    ('b', Format::Bold),
    ('i', Format::Italic),
    ('u', Format::Underline),
    ('`', Format::InlineCode),
    ('k', Format::Link),
    ('q', Format::Quote),
    ('l', Format::BulletList),
    ('n', Format::NumberedList),
    ('1', Format::Heading1),
    ('2', Format::Heading2),
    ('3', Format::Heading3),
];

/// Alt+key bindings for the media templates.
pub(crate) const MEDIA_KEYS: [(char, Media); 3] = [
    ('g', Media::Image),
    ('v', Media::Video),
    ('f', Media::CodeBlock),
];

/// Cap on remembered groups, matching tui-textarea's default history depth.
const MAX_EDIT_GROUPS: usize = 50;

/// One formatting action that landed in the widget history as `steps`
/// entries. The buffer snapshots tell whether the history is at either end
/// of the group.
pub(super) struct EditGroup {
    steps: usize,
    before: String,
    after: String,
}

pub(crate) fn format_for_key(ch: char) -> Option<Format> {
    FORMAT_KEYS.iter().find(|(k, _)| *k == ch).map(|(_, f)| *f)
}

pub(crate) fn media_for_key(ch: char) -> Option<Media> {
    MEDIA_KEYS.iter().find(|(k, _)| *k == ch).map(|(_, m)| *m)
}

impl<'a> App<'a> {
    /// Wraps the current selection (or caret) in `format`'s delimiters.
    pub fn apply_format(&mut self, format: Format) {
        let buffer = self.textarea_content();
        let selection = self.selection().clamp_to(&buffer);
        let action = format.action();
        let edit = format.apply(&buffer, selection);

        // Closing delimiter first so the opening position stays valid
        let mut steps = 0;
        steps += usize::from(self.insert_at_offset(&buffer, selection.end, action.after));
        steps += usize::from(self.insert_at_offset(&buffer, selection.start, action.before));
        self.finish_edit(buffer, edit, steps, action.label);
    }

    /// Inserts `media`'s template at the selection start.
    pub fn insert_media(&mut self, media: Media) {
        let buffer = self.textarea_content();
        let selection = self.selection().clamp_to(&buffer);
        let edit = media.insert(&buffer, selection);

        let inserted = self.insert_at_offset(&buffer, selection.start, media.template());
        self.finish_edit(buffer, edit, usize::from(inserted), media.label());
    }

    /// Ctrl+Z. A formatting action is undone as a whole.
    pub(super) fn undo_edit(&mut self) {
        let content = self.textarea_content();
        let mut steps = 1;
        if self.undo_groups.last().is_some_and(|g| g.after == content) {
            if let Some(group) = self.undo_groups.pop() {
                steps = group.steps;
                self.redo_groups.push(group);
            }
        }
        for _ in 0..steps {
            if !self.textarea.undo() {
                break;
            }
        }
        self.update_modified();
    }

    /// Ctrl+Y / Ctrl+Shift+Z. Redoes a formatting action as a whole.
    pub(super) fn redo_edit(&mut self) {
        let content = self.textarea_content();
        let mut steps = 1;
        if self.redo_groups.last().is_some_and(|g| g.before == content) {
            if let Some(group) = self.redo_groups.pop() {
                steps = group.steps;
                self.undo_groups.push(group);
            }
        }
        for _ in 0..steps {
            if !self.textarea.redo() {
                break;
            }
        }
        self.update_modified();
    }

    /// Inserts `text` at a byte offset of `buffer`, the content before this
    /// action started. Returns whether the widget recorded an edit.
    fn insert_at_offset(&mut self, buffer: &str, offset: usize, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let (row, col) = position::position_of(buffer, offset);
        self.textarea.cancel_selection();
        self.textarea
            .move_cursor(CursorMove::Jump(row as u16, col as u16));
        self.textarea.insert_str(text)
    }

    /// Restores the edit's selection in the widget and records the undo group.
    fn finish_edit(&mut self, before: String, edit: Edit, steps: usize, label: &str) {
        self.redo_groups.clear();
        if self.textarea_content() != edit.buffer {
            tracing::warn!(action = label, "widget diverged from edit, reloading buffer");
            self.textarea = editor::textarea_from(&edit.buffer);
            // The rebuilt widget has no history to group
            self.undo_groups.clear();
        } else if steps > 1 {
            if self.undo_groups.len() == MAX_EDIT_GROUPS {
                self.undo_groups.remove(0);
            }
            self.undo_groups.push(EditGroup {
                steps,
                before,
                after: edit.buffer.clone(),
            });
        }
        let (start_row, start_col) = position::position_of(&edit.buffer, edit.selection.start);
        let (end_row, end_col) = position::position_of(&edit.buffer, edit.selection.end);

        self.textarea.cancel_selection();
        self.textarea
            .move_cursor(CursorMove::Jump(start_row as u16, start_col as u16));
        if !edit.selection.is_caret() {
            self.textarea.start_selection();
            self.textarea
                .move_cursor(CursorMove::Jump(end_row as u16, end_col as u16));
        }

        tracing::debug!(
            action = label,
            start = edit.selection.start,
            end = edit.selection.end,
            "formatting applied"
        );
        self.update_modified();
    }
}
