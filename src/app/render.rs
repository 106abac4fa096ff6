//! UI rendering: main frame layout, editor view, preview delegation, and
//! help modal overlay.

use super::format::{FORMAT_KEYS, MEDIA_KEYS};
use super::*;

/// Fixed bindings shown in the help modal. Must match the key handlers.
const GLOBAL_BINDINGS: [(&str, &str); 5] = [
    ("Tab", "Switch mode"),
    ("Ctrl+S", "Save"),
    ("Ctrl+Q", "Save & quit"),
    ("Esc", "Back to editor"),
    ("F1", "This help"),
];

const EDITOR_BINDINGS: [(&str, &str); 6] = [
    ("Ctrl+Z / Ctrl+Y", "Undo / Redo"),
    ("Ctrl+A", "Select all"),
    ("Ctrl+L", "Go to line start"),
    ("Ctrl+C / Ctrl+V", "Copy / Paste (system)"),
    ("Ctrl+H / Ctrl+D", "Delete word before / after"),
    ("Ctrl+K", "Delete to end of line"),
];

const MOUSE_BINDINGS: [(&str, &str); 3] = [
    ("Click + drag", "Select text"),
    ("Click tabs", "Switch mode"),
    ("Click link", "Open in browser (preview)"),
];

fn binding_line(keys: String, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<17}", keys), Style::default().fg(theme::LINK)),
        Span::raw(description.to_string()),
    ])
}

/// Every line of the help modal, grouped by section.
pub(crate) fn help_lines() -> Vec<Line<'static>> {
    let section = |title: &str| {
        Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(theme::HEADING)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let mut lines = vec![section("Keybindings"), Line::from("")];
    lines.extend(
        GLOBAL_BINDINGS
            .iter()
            .map(|(keys, desc)| binding_line(keys.to_string(), desc)),
    );
    lines.push(Line::from(""));
    lines.extend(
        EDITOR_BINDINGS
            .iter()
            .map(|(keys, desc)| binding_line(keys.to_string(), desc)),
    );
    lines.push(Line::from(""));
    lines.push(section("Formatting"));
    lines.extend(
        FORMAT_KEYS
            .iter()
            .map(|(key, format)| binding_line(format!("Alt+{}", key), format.action().label)),
    );
    lines.extend(
        MEDIA_KEYS
            .iter()
            .map(|(key, media)| binding_line(format!("Alt+{}", key), media.label())),
    );
    lines.push(Line::from(""));
    lines.extend(
        MOUSE_BINDINGS
            .iter()
            .map(|(keys, desc)| binding_line(keys.to_string(), desc)),
    );
    lines
}

impl<'a> App<'a> {
    /// Runs one frame of the main loop: draw + tick.
    /// This is the canonical render path -- tested by render_test to ensure
    /// no accidental screen clears (which cause flicker).
    pub fn render_frame<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut ratatui::Terminal<B>,
    ) -> std::io::Result<()> {
        terminal.draw(|frame| self.render(frame))?;
        self.tick();
        Ok(())
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    pub fn render(&mut self, frame: &mut Frame) {
        let full = frame.area();

        // Fill entire frame background first (covers margins outside capped area)
        frame.render_widget(Paragraph::new("").style(theme::editor_style()), full);

        // Cap width and center horizontally
        let capped_width = full.width.min(MAX_WIDTH);
        let x_offset = (full.width - capped_width) / 2;
        let usable_area = Rect::new(x_offset, full.y, capped_width, full.height);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Header
            Constraint::Length(1), // Divider
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Divider
            Constraint::Length(1), // Status
        ])
        .split(usable_area);

        self.viewport_height = chunks[2].height;
        self.content_area = chunks[2];

        header::render(
            frame,
            chunks[0],
            header::HeaderInfo {
                document: &self.document_name,
                modified: self.modified,
                mode: self.mode,
            },
        );

        // Thin dividers between bars and content
        let divider_style = Style::default().fg(theme::BORDER);
        for divider in [chunks[1], chunks[3]] {
            let rule =
                Paragraph::new("\u{2500}".repeat(divider.width as usize)).style(divider_style);
            frame.render_widget(rule, divider);
        }

        match self.mode {
            Mode::Editor => self.render_editor(frame, chunks[2]),
            Mode::Preview => {
                let content = self.textarea_content();
                preview::render(frame, chunks[2], &content, &mut self.preview);
            }
        }

        let (line, col) = self.textarea.cursor();
        status::render(
            frame,
            chunks[4],
            status::StatusInfo {
                line: line + 1,
                col: col + 1,
                message: &self.status_message,
                message_kind: self.status_kind,
                selected: self.selection().len(),
                word_count: self.word_count(),
                modified: self.modified,
            },
        );

        // Help modal overlay -- rendered last so it sits on top of everything
        if self.show_help {
            self.render_help(frame);
        }
    }

    /// Renders a centered modal overlay listing all keybindings.
    /// Dismissed by pressing any key.
    fn render_help(&self, frame: &mut Frame) {
        let help_text = help_lines();

        let area = frame.area();
        // Size the modal to fit content (plus borders), clamped to terminal size
        let width = 50u16.min(area.width.saturating_sub(4));
        let height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
        let x = (area.width.saturating_sub(width)) / 2;
        let y = (area.height.saturating_sub(height)) / 2;
        let help_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, help_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BORDER))
            .style(Style::default().fg(theme::FG).bg(theme::BAR_BG));

        let paragraph = Paragraph::new(help_text)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, help_area);
    }

    /// Renders the tui-textarea widget plus tilde markers for empty lines.
    fn render_editor(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(&self.textarea, area);

        // Track scroll position (mirrors tui-textarea's internal viewport logic)
        // so we can translate mouse coordinates -> buffer positions correctly.
        let cursor_row = self.textarea.cursor().0 as u16;
        if cursor_row < self.editor_scroll_top {
            self.editor_scroll_top = cursor_row;
        } else if self.editor_scroll_top + area.height <= cursor_row {
            self.editor_scroll_top = cursor_row + 1 - area.height;
        }

        // Vim-style tilde markers for lines beyond the document
        let total_lines = self.textarea.lines().len();
        let gutter_width = total_lines.to_string().len() + 1;
        let visible_content_lines = (total_lines as u16).saturating_sub(self.editor_scroll_top);
        let tilde_style = Style::default().fg(theme::TILDE);
        for row in visible_content_lines..area.height {
            let tilde_area = Rect::new(area.x, area.y + row, area.width, 1);
            let tilde = Paragraph::new(Line::from(vec![
                Span::styled(" ".repeat(gutter_width), tilde_style),
                Span::styled("~", tilde_style),
            ]));
            frame.render_widget(tilde, tilde_area);
        }
    }
}
