use ratatui::style::{Modifier, Style};
use tui_textarea::TextArea;

use crate::theme;

/// Builds an editor widget holding `content`, styled for the editor pane.
pub fn textarea_from(content: &str) -> TextArea<'static> {
    let lines: Vec<String> = if content.is_empty() {
        vec![String::new()]
    } else {
        content.split('\n').map(String::from).collect()
    };
    let mut textarea = TextArea::new(lines);
    configure_textarea(&mut textarea);
    textarea
}

pub fn configure_textarea(textarea: &mut TextArea) {
    textarea.set_cursor_line_style(theme::cursor_line_style());
    textarea.set_line_number_style(theme::line_number_style());
    textarea.set_style(theme::editor_style());
    textarea.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD));
    textarea.set_selection_style(Style::default().bg(theme::SELECTION));

    // Tab = 2 spaces
    textarea.set_tab_length(2);
    textarea.set_hard_tab_indent(false);
}
