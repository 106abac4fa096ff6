use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use tui_textarea::{CursorMove, Input, Key, TextArea};

use crate::components::{editor, header, preview, status};
use crate::editor::continuation::{self, Continuation};
use crate::editor::model::Selection;
use crate::editor::position;
use crate::store::{DocumentStore, StoreError};
use crate::theme;

/// How long status bar messages stay visible before auto-clearing.
const STATUS_DURATION: Duration = Duration::from_secs(3);

/// Lines to scroll per mouse wheel tick in preview mode.
const SCROLL_LINES: u16 = 3;

/// Maximum time between clicks to count as multi-click (double/triple).
const MULTI_CLICK_MS: u64 = 500;

const TAB_TOTAL_W: u16 = header::TAB_EDITOR_W + header::TAB_PREVIEW_W;

/// Maximum width for the UI content area. Wider terminals get centered, capped layout.
const MAX_WIDTH: u16 = 120;

/// The two top-level view modes, toggled via Tab or header tab clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Editor,
    Preview,
}

pub struct App<'a> {
    // --- Core state ---
    pub mode: Mode,
    store: Box<dyn DocumentStore>,
    pub document_name: String,
    pub textarea: TextArea<'a>,
    pub modified: bool,
    /// Content as of the last successful load or save.
    pub saved_content: String,
    pub should_quit: bool,

    // --- Mode-specific state ---
    pub preview: preview::PreviewState,

    // --- Status bar ---
    pub status_message: String,
    pub status_kind: status::MessageKind,
    pub status_time: Option<Instant>,

    // --- Help modal (F1) ---
    pub show_help: bool,

    // --- Internal tracking ---
    viewport_height: u16,
    /// Cached content area rect from last render (used for mouse hit-testing).
    content_area: Rect,
    /// Tracks tui-textarea's scroll position for mouse click → buffer position math.
    editor_scroll_top: u16,
    /// True while left mouse button is held down for drag selection.
    mouse_dragging: bool,
    /// Timestamp of last left-click in content area, for double/triple-click detection.
    last_click_time: Option<Instant>,
    /// Terminal position of last click, for multi-click detection.
    last_click_pos: (u16, u16),
    /// Click count (1=single, 2=double, 3=triple), resets on timeout or position change.
    click_count: u8,
    /// Formatting actions that took several widget edits, newest last.
    undo_groups: Vec<format::EditGroup>,
    /// Groups undone by Ctrl+Z, ready for Ctrl+Y.
    redo_groups: Vec<format::EditGroup>,
}

/// Classifies a character for word-boundary detection (double-click selection).
/// Same class = same "word". Classes: 0=word, 1=whitespace, 2=punctuation.
fn char_class(c: char) -> u8 {
    if c.is_alphanumeric() || c == '_' {
        0
    } else if c.is_whitespace() {
        1
    } else {
        2
    }
}

impl<'a> App<'a> {
    /// Opens the document held by `store`. A document that does not exist
    /// yet starts as an empty buffer.
    pub fn new(store: Box<dyn DocumentStore>) -> Result<Self, StoreError> {
        let content = store.load()?;
        let document_name = store.name();
        tracing::info!(document = %document_name, bytes = content.len(), "document opened");

        Ok(Self {
            mode: Mode::Editor,
            store,
            document_name,
            textarea: editor::textarea_from(&content),
            modified: false,
            saved_content: content,
            should_quit: false,
            preview: preview::PreviewState::new(),
            status_message: "F1: help | Tab: switch mode | Ctrl+S: save | Ctrl+Q: quit"
                .to_string(),
            status_kind: status::MessageKind::Info,
            status_time: Some(Instant::now()),
            show_help: false,
            viewport_height: 0,
            content_area: Rect::default(),
            editor_scroll_top: 0,
            mouse_dragging: false,
            last_click_time: None,
            last_click_pos: (0, 0),
            click_count: 0,
            undo_groups: Vec::new(),
            redo_groups: Vec::new(),
        })
    }

    /// Returns the full editor content as a single string.
    pub fn textarea_content(&self) -> String {
        self.textarea.lines().join("\n")
    }

    /// The widget's selection (or caret) as byte offsets into
    /// [`Self::textarea_content`].
    pub fn selection(&self) -> Selection {
        let lines = self.textarea.lines();
        match self.textarea.selection_range() {
            Some(((sr, sc), (er, ec))) => Selection::new(
                position::offset_of(lines, sr, sc),
                position::offset_of(lines, er, ec),
            ),
            None => {
                let (row, col) = self.textarea.cursor();
                Selection::caret(position::offset_of(lines, row, col))
            }
        }
    }

    // ─── Tick / timers ───────────────────────────────────────────────────

    /// Called every 100ms from the main loop. Handles timer-based state cleanup.
    pub fn tick(&mut self) {
        // Auto-clear status messages after STATUS_DURATION
        if let Some(time) = self.status_time {
            if time.elapsed() >= STATUS_DURATION {
                self.status_message.clear();
                self.status_kind = status::MessageKind::Info;
                self.status_time = None;
            }
        }
    }

    // ─── Event dispatch ──────────────────────────────────────────────────

    /// Top-level event handler. Dispatches to key, mouse, or paste handlers.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            // Bracketed paste: terminal sends entire clipboard as one event
            Event::Paste(text) => self.handle_paste(text),
            _ => {}
        }
    }

    /// Counts the total number of words in the editor.
    fn word_count(&self) -> usize {
        self.textarea
            .lines()
            .iter()
            .map(|line| line.split_whitespace().count())
            .sum()
    }

    /// Recomputes the `modified` flag against the last saved content.
    fn update_modified(&mut self) {
        self.modified = self.textarea_content() != self.saved_content;
    }

    /// Switches to a new mode, resetting scroll as needed.
    fn set_mode(&mut self, target: Mode) {
        if self.mode == target {
            return;
        }
        if target == Mode::Preview {
            self.preview.scroll_to_top();
        }
        tracing::debug!(?target, "mode switched");
        self.mode = target;
    }

    /// Shows a temporary message in the status bar.
    pub fn set_status(&mut self, msg: &str) {
        self.set_status_kind(msg, status::MessageKind::Info);
    }

    fn set_status_kind(&mut self, msg: &str, kind: status::MessageKind) {
        self.status_message = msg.to_string();
        self.status_kind = kind;
        self.status_time = Some(Instant::now());
    }
}

mod clipboard;
mod format;
mod input;
mod render;
mod save;
mod selection;
