//! The formatting-action table and the media insertion templates.
//!
//! Delimiters here must stay in step with the passes in
//! [`crate::markdown::render`]; every pair round-trips through the renderer.

use super::model::{self, Edit, Selection};

/// A named formatting command, in toolbar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Bold,
    Italic,
    Underline,
    InlineCode,
    Link,
    Quote,
    BulletList,
    NumberedList,
    Heading1,
    Heading2,
    Heading3,
}

/// One row of the action table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatAction {
    pub format: Format,
    pub label: &'static str,
    pub before: &'static str,
    pub after: &'static str,
}

impl FormatAction {
    /// Line-prefix actions (quote, lists, headings) have no closing delimiter.
    /// They are inserted at the selection start, not at the start of the line.
    pub fn is_line_prefix(&self) -> bool {
        self.after.is_empty()
    }
}

pub const FORMAT_ACTIONS: [FormatAction; 11] = [
    FormatAction {
        format: Format::Bold,
        label: "Bold",
        before: "**",
        after: "**",
    },
    FormatAction {
        format: Format::Italic,
        label: "Italic",
        before: "*",
        after: "*",
    },
    FormatAction {
        format: Format::Underline,
        label: "Underline",
        before: "<u>",
        after: "</u>",
    },
    FormatAction {
        format: Format::InlineCode,
        label: "Inline code",
        before: "`",
        after: "`",
    },
    FormatAction {
        format: Format::Link,
        label: "Link",
        before: "[",
        after: "](url)",
    },
    FormatAction {
        format: Format::Quote,
        label: "Quote",
        before: "> ",
        after: "",
    },
    FormatAction {
        format: Format::BulletList,
        label: "Bullet list",
        before: "- ",
        after: "",
    },
    FormatAction {
        format: Format::NumberedList,
        label: "Numbered list",
        before: "1. ",
        after: "",
    },
    FormatAction {
        format: Format::Heading1,
        label: "Heading 1",
        before: "# ",
        after: "",
    },
    FormatAction {
        format: Format::Heading2,
        label: "Heading 2",
        before: "## ",
        after: "",
    },
    FormatAction {
        format: Format::Heading3,
        label: "Heading 3",
        before: "### ",
        after: "",
    },
];

impl Format {
    pub fn action(self) -> &'static FormatAction {
        // The table is indexed in declaration order.
        &FORMAT_ACTIONS[self as usize]
    }

    /// Applies this format around `selection`.
    pub fn apply(self, buffer: &str, selection: Selection) -> Edit {
        let action = self.action();
        model::wrap_selection(buffer, selection.start, selection.end, action.before, action.after)
    }
}

/// Fixed snippets inserted at the caret, each padded onto its own paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Media {
    Image,
    Video,
    CodeBlock,
}

impl Media {
    pub fn label(self) -> &'static str {
        match self {
            Media::Image => "Image",
            Media::Video => "Video",
            Media::CodeBlock => "Code block",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            Media::Image => "\n![Alt text](image-url)\n",
            Media::Video => {
                "\n<video controls>\n  <source src=\"video-url\" type=\"video/mp4\">\n</video>\n"
            }
            Media::CodeBlock => "\n```language\n// Your code here\n```\n",
        }
    }

    /// Inserts the template at the selection start; any selected text is kept.
    pub fn insert(self, buffer: &str, selection: Selection) -> Edit {
        model::insert_at_cursor(buffer, selection.start, self.template())
    }
}
