//! Draws sanitized preview markup as styled terminal lines.
//!
//! Input is the tree from [`crate::markdown::render_tree`], so only the
//! allowlisted elements appear. Anything else is ignored rather than shown.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::dom::{Handle, Node, NodeData};
use crate::theme;

/// Rendered preview lines plus link positions for click handling.
pub struct RenderedMarkup {
    pub text: Text<'static>,
    /// Where each link's visible text landed.
    pub links: Vec<LinkRegion>,
}

/// A run of link text on one rendered line, in line/column coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRegion {
    pub line: usize,
    pub col_start: usize,
    pub col_end: usize,
    pub url: String,
}

/// Converts a sanitized tree into terminal lines wrapped at `width` columns.
pub fn markup_to_text(body: &Handle, width: usize) -> RenderedMarkup {
    let mut view = MarkupView::new(width);
    view.walk(body);
    view.finish()
}

struct MarkupView {
    width: usize,
    lines: Vec<Line<'static>>,
    current_spans: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    blockquote_depth: usize,
    /// True right after a block element ends; the next `<br>` is swallowed.
    after_block: bool,
    in_pre: bool,
    code_block_lang: String,
    code_block_content: String,
    /// `Some` while inside `<video>`: the collected `<source>` URL.
    video_src: Option<String>,
    link_url: String,
    links: Vec<LinkRegion>,
}

impl MarkupView {
    fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
            current_spans: Vec::new(),
            style_stack: vec![Style::default().fg(theme::FG)],
            blockquote_depth: 0,
            after_block: false,
            in_pre: false,
            code_block_lang: String::new(),
            code_block_content: String::new(),
            video_src: None,
            link_url: String::new(),
            links: Vec::new(),
        }
    }

    fn walk(&mut self, parent: &Handle) {
        for child in parent.children.borrow().iter() {
            match &child.data {
                NodeData::Text(text) => self.text(&text.borrow()),
                NodeData::Element { name, .. } => {
                    self.start_tag(&name.local, child);
                    self.walk(child);
                    self.end_tag(&name.local);
                }
                NodeData::Document | NodeData::Comment => {}
            }
        }
    }

    fn start_tag(&mut self, name: &str, element: &Node) {
        match name {
            "h1" | "h2" | "h3" => {
                self.flush_line();
                self.push_bq_prefix();
                let level = name[1..].parse::<usize>().unwrap_or(1);
                self.current_spans.push(Span::styled(
                    format!("{} ", "#".repeat(level)),
                    theme::heading_style(),
                ));
                self.style_stack.push(theme::heading_style());
            }
            "strong" => self.push_style(theme::bold_style()),
            "em" => self.push_style(theme::italic_style()),
            "u" => self.push_style(theme::underline_style()),
            "code" if self.in_pre => {
                self.code_block_lang = element
                    .attr("class")
                    .and_then(|c| c.strip_prefix("language-").map(str::to_string))
                    .unwrap_or_default();
            }
            "code" => self.push_style(theme::code_style()),
            "a" => {
                self.push_style(theme::link_style());
                self.link_url = element.attr("href").unwrap_or_default();
            }
            "blockquote" => {
                self.flush_line();
                self.blockquote_depth += 1;
                self.push_style(theme::quote_style());
            }
            "ul" | "p" => self.flush_line(),
            "li" => {
                self.flush_line();
                self.push_bq_prefix();
                self.current_spans
                    .push(Span::styled("• ".to_string(), Style::default().fg(theme::FG)));
            }
            "pre" => {
                self.flush_line();
                self.in_pre = true;
                self.code_block_content.clear();
                self.code_block_lang.clear();
            }
            "br" => {
                if self.in_pre || self.video_src.is_some() {
                    return;
                }
                if !self.current_spans.is_empty() {
                    self.flush_line();
                } else if self.after_block {
                    self.after_block = false;
                } else {
                    self.push_blank_line();
                }
            }
            "img" => {
                self.flush_line();
                let alt = element
                    .attr("alt")
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| "Image".to_string());
                let src = element.attr("src").unwrap_or_default();
                self.media_box(&alt, &src, "▣");
            }
            "video" => {
                self.flush_line();
                self.video_src = Some(String::new());
            }
            "source" => {
                if let (Some(slot), Some(src)) = (self.video_src.as_mut(), element.attr("src")) {
                    if slot.is_empty() {
                        *slot = src;
                    }
                }
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, name: &str) {
        match name {
            "h1" | "h2" | "h3" => {
                self.pop_style();
                self.flush_line();
                let rule_char = match name {
                    "h1" => Some("━"),
                    "h2" => Some("─"),
                    _ => None,
                };
                if let Some(rule_char) = rule_char {
                    let rule =
                        rule_char.repeat(self.width.saturating_sub(self.blockquote_depth * 2));
                    self.push_bq_prefix();
                    self.current_spans
                        .push(Span::styled(rule, Style::default().fg(theme::HEADING)));
                    self.flush_line();
                }
                self.after_block = true;
            }
            "strong" | "em" | "u" => {
                self.pop_style();
            }
            "code" if self.in_pre => {}
            "code" => {
                self.pop_style();
            }
            "a" => {
                self.pop_style();
                if !self.link_url.is_empty() {
                    // Append the URL in dimmed parentheses after the link text
                    self.current_spans.push(Span::styled(
                        format!(" ({})", self.link_url),
                        Style::default().fg(theme::LINE_NUMBER),
                    ));
                }
                self.link_url.clear();
            }
            "blockquote" => {
                self.pop_style();
                self.flush_line();
                self.blockquote_depth = self.blockquote_depth.saturating_sub(1);
                self.after_block = true;
            }
            "ul" | "p" => {
                self.flush_line();
                self.after_block = true;
            }
            "li" => self.flush_line(),
            "pre" => {
                self.in_pre = false;
                self.code_block();
                self.after_block = true;
            }
            "video" => {
                if let Some(src) = self.video_src.take() {
                    self.media_box("Video", &src, "▶");
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() || self.video_src.is_some() {
            return;
        }
        if self.in_pre {
            self.code_block_content.push_str(text);
            return;
        }

        self.after_block = false;
        self.push_bq_prefix();
        let style = self.current_style();
        let wrapped = word_wrap(text, self.width, &self.current_spans);
        for (i, chunk) in wrapped.iter().enumerate() {
            if i > 0 {
                self.flush_line();
                self.push_bq_prefix();
            }
            if !self.link_url.is_empty() {
                let col_start = line_width(&self.current_spans);
                self.links.push(LinkRegion {
                    line: self.lines.len(),
                    col_start,
                    col_end: col_start + chunk.chars().count(),
                    url: self.link_url.clone(),
                });
            }
            self.current_spans.push(Span::styled(chunk.clone(), style));
        }
    }

    fn finish(mut self) -> RenderedMarkup {
        if self.in_pre {
            self.code_block();
        }
        self.flush_line();
        RenderedMarkup {
            text: Text::from(self.lines),
            links: self.links,
        }
    }

    fn push_style(&mut self, overlay: Style) {
        let base = self.current_style();
        self.style_stack.push(compose_style(base, overlay));
    }

    /// Pops an element's style; the base style always stays.
    fn pop_style(&mut self) {
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn current_style(&self) -> Style {
        self.style_stack
            .last()
            .copied()
            .unwrap_or(Style::default().fg(theme::FG))
    }

    fn code_block(&mut self) {
        let content = std::mem::take(&mut self.code_block_content);
        if !self.code_block_lang.is_empty() {
            self.push_bq_prefix();
            self.current_spans.push(Span::styled(
                format!("  {}", self.code_block_lang),
                Style::default().fg(theme::LINE_NUMBER),
            ));
            self.flush_line();
        }
        for code_line in content.split('\n') {
            self.push_bq_prefix();
            self.current_spans
                .push(Span::styled(format!("  {}", code_line), theme::code_style()));
            self.flush_line();
        }
    }

    /// Draws a bordered placeholder box for an image or video.
    fn media_box(&mut self, label: &str, url: &str, icon: &str) {
        let filename = url.rsplit('/').next().unwrap_or(url).to_string();
        let border_style = Style::default().fg(theme::BORDER);
        let title = format!("{} {}", icon, label);
        let inner_width = title
            .chars()
            .count()
            .max(filename.chars().count())
            .max(6)
            + 2;

        let top = format!("╭─{}─╮", "─".repeat(inner_width));
        let bot = format!("╰─{}─╯", "─".repeat(inner_width));
        self.push_bq_prefix();
        self.current_spans.push(Span::styled(top, border_style));
        self.flush_line();

        for (content, style) in [
            (
                title,
                Style::default().fg(theme::MEDIA).add_modifier(Modifier::ITALIC),
            ),
            (filename, Style::default().fg(theme::LINE_NUMBER)),
        ] {
            let pad = inner_width.saturating_sub(content.chars().count());
            self.push_bq_prefix();
            self.current_spans.push(Span::styled("│ ", border_style));
            self.current_spans.push(Span::styled(content, style));
            self.current_spans
                .push(Span::styled(format!("{} │", " ".repeat(pad)), border_style));
            self.flush_line();
        }

        self.push_bq_prefix();
        self.current_spans.push(Span::styled(bot, border_style));
        self.flush_line();
        self.after_block = true;
    }

    fn flush_line(&mut self) {
        if !self.current_spans.is_empty() {
            self.lines
                .push(Line::from(self.current_spans.drain(..).collect::<Vec<_>>()));
        }
    }

    /// Push blockquote `│ ` prefix if at start of a new line (spans empty).
    fn push_bq_prefix(&mut self) {
        if self.blockquote_depth > 0 && self.current_spans.is_empty() {
            self.current_spans.push(Span::styled(
                "│ ".repeat(self.blockquote_depth),
                Style::default().fg(theme::QUOTE_BORDER),
            ));
        }
    }

    /// Push a blank line, with blockquote prefix if inside a blockquote.
    fn push_blank_line(&mut self) {
        if self.blockquote_depth > 0 {
            self.lines.push(Line::from(Span::styled(
                "│ ".repeat(self.blockquote_depth),
                Style::default().fg(theme::QUOTE_BORDER),
            )));
        } else {
            self.lines.push(Line::from(""));
        }
    }
}

fn line_width(spans: &[Span]) -> usize {
    spans.iter().map(|s| s.content.chars().count()).sum()
}

fn word_wrap(text: &str, max_width: usize, existing_spans: &[Span]) -> Vec<String> {
    let current_col = line_width(existing_spans);
    let remaining = max_width.saturating_sub(current_col);

    if text.chars().count() <= remaining {
        return vec![text.to_string()];
    }

    let mut result = Vec::new();
    let mut current = String::new();
    let mut col = current_col;

    for word in text.split_inclusive(' ') {
        let word_len = word.chars().count();
        if col + word_len > max_width && !current.is_empty() {
            result.push(std::mem::take(&mut current));
            col = 0;
        }
        current.push_str(word);
        col += word_len;
    }

    if !current.is_empty() {
        result.push(current);
    }

    if result.is_empty() {
        vec![text.to_string()]
    } else {
        result
    }
}

/// Compose two styles: overlay's colors win, but modifiers accumulate.
fn compose_style(base: Style, overlay: Style) -> Style {
    let mut result = overlay;
    result.add_modifier |= base.add_modifier;
    if result.fg.is_none() {
        result.fg = base.fg;
    }
    result
}
