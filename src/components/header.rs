use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::Mode;
use crate::theme;

/// Label widths of the mode tabs, used for mouse hit-testing.
pub const TAB_EDITOR_W: u16 = 8;
pub const TAB_PREVIEW_W: u16 = 9;

pub struct HeaderInfo<'a> {
    pub document: &'a str,
    pub modified: bool,
    pub mode: Mode,
}

pub fn render(frame: &mut Frame, area: Rect, info: HeaderInfo) {
    let mut left_spans = vec![Span::styled(
        format!("  {}", info.document),
        theme::header_style(),
    )];
    if info.modified {
        left_spans.push(Span::styled(
            " \u{2022}",
            Style::default().fg(theme::WARNING).bg(theme::BAR_BG),
        ));
    }

    let right_spans: Vec<Span> = [("EDITOR", Mode::Editor), ("PREVIEW", Mode::Preview)]
        .into_iter()
        .map(|(label, tab_mode)| tab_span(label, info.mode == tab_mode))
        .collect();

    let chunks = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(TAB_EDITOR_W + TAB_PREVIEW_W),
    ])
    .split(area);

    // Fill background
    frame.render_widget(Paragraph::new("").style(theme::header_style()), area);
    frame.render_widget(Paragraph::new(Line::from(left_spans)), chunks[0]);
    frame.render_widget(Paragraph::new(Line::from(right_spans)), chunks[1]);
}

fn tab_span(label: &str, active: bool) -> Span<'static> {
    let style = if active {
        Style::default()
            .fg(theme::WHITE)
            .bg(theme::ACTIVE_TAB)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme::INACTIVE_TAB).bg(theme::BAR_BG)
    };
    Span::styled(format!(" {} ", label), style)
}
