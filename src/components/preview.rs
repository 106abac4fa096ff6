use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use crate::markdown::{self, markup_view::LinkRegion};
use crate::theme;

/// A clickable link region in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickableLink {
    pub y: u16,
    pub x_start: u16,
    pub x_end: u16,
    pub url: String,
}

#[derive(Default)]
pub struct PreviewState {
    pub scroll_offset: u16,
    pub content_height: u16,
    /// Clickable link regions from the last render.
    pub click_links: Vec<ClickableLink>,
}

impl PreviewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: u16, viewport_height: u16) {
        let max_scroll = self.content_height.saturating_sub(viewport_height);
        self.scroll_offset = (self.scroll_offset + amount).min(max_scroll);
    }

    pub fn page_up(&mut self, viewport_height: u16) {
        self.scroll_up(viewport_height.saturating_sub(2));
    }

    pub fn page_down(&mut self, viewport_height: u16) {
        self.scroll_down(viewport_height.saturating_sub(2), viewport_height);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self, viewport_height: u16) {
        self.scroll_offset = self.content_height.saturating_sub(viewport_height);
    }

    /// Find the URL at a given screen position, if any.
    pub fn url_at(&self, x: u16, y: u16) -> Option<&str> {
        self.click_links
            .iter()
            .find(|link| link.y == y && x >= link.x_start && x < link.x_end)
            .map(|link| link.url.as_str())
    }
}

/// Renders the sanitized preview of `content` into `area`.
pub fn render(frame: &mut Frame, area: Rect, content: &str, state: &mut PreviewState) {
    let tree = markdown::render_tree(content);
    let rendered =
        markdown::markup_view::markup_to_text(&tree, area.width.saturating_sub(2) as usize);

    state.content_height = rendered.text.lines.len() as u16;
    // Content may have shrunk since the last frame
    state.scroll_offset = state
        .scroll_offset
        .min(state.content_height.saturating_sub(area.height));

    let paragraph = Paragraph::new(rendered.text)
        .style(theme::editor_style())
        .scroll((state.scroll_offset, 0));
    frame.render_widget(paragraph, area);

    build_link_regions(area, state.scroll_offset, &rendered.links, &mut state.click_links);

    if state.content_height > area.height {
        let mut scrollbar_state = ScrollbarState::new(state.content_height as usize)
            .position(state.scroll_offset as usize)
            .viewport_content_length(area.height as usize);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .thumb_style(Style::default().fg(theme::LINE_NUMBER))
            .track_style(Style::default().fg(theme::BORDER));
        frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

/// Open a URL in the system default browser. Returns whether a browser was
/// launched; unsafe schemes are refused before anything is spawned.
pub fn open_url(url: &str) -> bool {
    if !markdown::sanitize::is_safe_url(url) {
        tracing::warn!(url, "refusing to open link with unsafe scheme");
        return false;
    }
    tracing::debug!(url, "opening link");
    match webbrowser::open(url) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(url, error = %err, "failed to open link");
            false
        }
    }
}

/// Maps link regions from rendered-line coordinates onto the visible area.
fn build_link_regions(
    area: Rect,
    scroll_offset: u16,
    links: &[LinkRegion],
    out: &mut Vec<ClickableLink>,
) {
    out.clear();
    let top = scroll_offset as usize;
    let bottom = top + area.height as usize;
    for link in links {
        if link.line < top || link.line >= bottom {
            continue;
        }
        let x_start = area.x.saturating_add(link.col_start as u16);
        let x_end = area
            .x
            .saturating_add(link.col_end as u16)
            .min(area.x.saturating_add(area.width));
        if x_start >= x_end {
            continue;
        }
        out.push(ClickableLink {
            y: area.y + (link.line - top) as u16,
            x_start,
            x_end,
            url: link.url.clone(),
        });
    }
}
