use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme;

/// How the centre status message should be coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKind {
    #[default]
    Info,
    Success,
    Error,
}

pub struct StatusInfo<'a> {
    pub line: usize,
    pub col: usize,
    pub message: &'a str,
    pub message_kind: MessageKind,
    /// Byte length of the current selection; zero for a bare caret.
    pub selected: usize,
    pub word_count: usize,
    pub modified: bool,
}

pub fn render(frame: &mut Frame, area: Rect, info: StatusInfo) {
    // Fill the entire status bar background
    frame.render_widget(Paragraph::new("").style(theme::status_style()), area);

    let chunks = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Fill(2),
        Constraint::Fill(1),
    ])
    .split(area);

    let mut position = format!("  Ln {}, Col {}", info.line, info.col);
    if info.selected > 0 {
        position.push_str(&format!(" ({} selected)", info.selected));
    }
    let left = Paragraph::new(Line::from(Span::styled(position, theme::status_style())));
    frame.render_widget(left, chunks[0]);

    if !info.message.is_empty() {
        let style = match info.message_kind {
            MessageKind::Info => theme::status_style(),
            MessageKind::Success => Style::default().fg(theme::SUCCESS),
            MessageKind::Error => Style::default().fg(theme::ERROR),
        };
        let center = Paragraph::new(Line::from(Span::styled(info.message.to_string(), style)))
            .alignment(Alignment::Center);
        frame.render_widget(center, chunks[1]);
    }

    let save_status = if info.modified { "Modified" } else { "Saved" };
    let right = Paragraph::new(Line::from(Span::styled(
        format!("{} words | {}  ", info.word_count, save_status),
        theme::status_style(),
    )))
    .alignment(Alignment::Right);
    frame.render_widget(right, chunks[2]);
}
