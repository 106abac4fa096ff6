//! Pure text mutations over an explicit buffer and selection.
//!
//! Nothing here owns the buffer: every operation takes the current text and
//! offsets and returns a fresh [`Edit`]. Offsets are UTF-8 byte offsets.
//! Out-of-range offsets are clamped (and snapped down to a char boundary)
//! rather than reported, so callers can pass whatever the widget handed them.

/// A selection `(start, end)` into a buffer. `start == end` is a plain caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    pub fn caret(offset: usize) -> Self {
        Self { start: offset, end: offset }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.is_caret()
    }

    /// Clamps both ends into `buffer` and normalises the order.
    pub fn clamp_to(&self, buffer: &str) -> Self {
        Self::new(clamp_offset(buffer, self.start), clamp_offset(buffer, self.end))
    }
}

/// Result of a mutation: the replacement buffer and the selection to restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub buffer: String,
    pub selection: Selection,
}

/// Clamps `offset` to `[0, buffer.len()]` and moves it back to the nearest
/// char boundary.
pub fn clamp_offset(buffer: &str, offset: usize) -> usize {
    let mut offset = offset.min(buffer.len());
    while !buffer.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Wraps `buffer[sel_start..sel_end]` in `before`/`after`.
///
/// The returned selection covers exactly the originally selected text in its
/// new position, so a second action wraps the same text again rather than the
/// delimiters inserted by the first.
pub fn wrap_selection(
    buffer: &str,
    sel_start: usize,
    sel_end: usize,
    before: &str,
    after: &str,
) -> Edit {
    let sel = Selection::new(sel_start, sel_end).clamp_to(buffer);

    if before.is_empty() && after.is_empty() {
        return Edit {
            buffer: buffer.to_string(),
            selection: sel,
        };
    }

    let selected = &buffer[sel.start..sel.end];
    let mut out = String::with_capacity(buffer.len() + before.len() + after.len());
    out.push_str(&buffer[..sel.start]);
    out.push_str(before);
    out.push_str(selected);
    out.push_str(after);
    out.push_str(&buffer[sel.end..]);

    let start = sel.start + before.len();
    Edit {
        buffer: out,
        selection: Selection {
            start,
            end: start + selected.len(),
        },
    }
}

/// Inserts `text` at `caret`, leaving everything around it untouched. The
/// returned selection is a caret just past the inserted text.
pub fn insert_at_cursor(buffer: &str, caret: usize, text: &str) -> Edit {
    let caret = clamp_offset(buffer, caret);
    let mut out = String::with_capacity(buffer.len() + text.len());
    out.push_str(&buffer[..caret]);
    out.push_str(text);
    out.push_str(&buffer[caret..]);
    Edit {
        buffer: out,
        selection: Selection::caret(caret + text.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_wraps_first_word() {
        let edit = wrap_selection("hello world", 0, 5, "**", "**");
        assert_eq!(edit.buffer, "**hello** world");
        assert_eq!(edit.selection, Selection::new(2, 7));
        assert_eq!(&edit.buffer[2..7], "hello");
    }

    #[test]
    fn test_second_action_wraps_original_text_only() {
        let first = wrap_selection("hello world", 0, 5, "**", "**");
        let second = wrap_selection(
            &first.buffer,
            first.selection.start,
            first.selection.end,
            "*",
            "*",
        );
        assert_eq!(second.buffer, "***hello*** world");
        assert_eq!(&second.buffer[second.selection.start..second.selection.end], "hello");
    }

    #[test]
    fn test_wrap_caret_inserts_delimiters_around_nothing() {
        let edit = wrap_selection("ab", 1, 1, "`", "`");
        assert_eq!(edit.buffer, "a``b");
        assert_eq!(edit.selection, Selection::caret(2));
    }

    #[test]
    fn test_wrap_with_prefix_only() {
        let edit = wrap_selection("title", 0, 5, "# ", "");
        assert_eq!(edit.buffer, "# title");
        assert_eq!(edit.selection, Selection::new(2, 7));
    }

    #[test]
    fn test_wrap_empty_delimiters_is_noop() {
        let edit = wrap_selection("abc", 1, 2, "", "");
        assert_eq!(edit.buffer, "abc");
        assert_eq!(edit.selection, Selection::new(1, 2));
    }

    #[test]
    fn test_wrap_clamps_out_of_range() {
        let edit = wrap_selection("abc", 1, 99, "[", "](url)");
        assert_eq!(edit.buffer, "a[bc](url)");
        assert_eq!(edit.selection, Selection::new(2, 4));
    }

    #[test]
    fn test_wrap_reversed_selection_is_normalised() {
        let edit = wrap_selection("hello", 5, 0, "<u>", "</u>");
        assert_eq!(edit.buffer, "<u>hello</u>");
        assert_eq!(edit.selection, Selection::new(3, 8));
    }

    #[test]
    fn test_clamp_snaps_to_char_boundary() {
        // 'é' is two bytes; offset 2 falls inside it
        assert_eq!(clamp_offset("hé", 2), 1);
        assert_eq!(clamp_offset("hé", 3), 3);
        assert_eq!(clamp_offset("hé", 10), 3);
    }

    #[test]
    fn test_wrap_multibyte_selection() {
        let edit = wrap_selection("café au lait", 0, 5, "**", "**");
        assert_eq!(edit.buffer, "**café** au lait");
        assert_eq!(&edit.buffer[edit.selection.start..edit.selection.end], "café");
    }

    #[test]
    fn test_insert_into_empty_buffer() {
        let edit = insert_at_cursor("", 0, "\n![Alt text](image-url)\n");
        assert_eq!(edit.buffer, "\n![Alt text](image-url)\n");
        assert_eq!(edit.selection, Selection::caret(edit.buffer.len()));
    }

    #[test]
    fn test_insert_mid_buffer() {
        let edit = insert_at_cursor("ac", 1, "b");
        assert_eq!(edit.buffer, "abc");
        assert_eq!(edit.selection, Selection::caret(2));
    }

    #[test]
    fn test_insert_clamps_caret() {
        let edit = insert_at_cursor("ab", 7, "!");
        assert_eq!(edit.buffer, "ab!");
        assert_eq!(edit.selection, Selection::caret(3));
    }
}
