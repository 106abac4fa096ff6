/// Result of analyzing a line for Enter-key continuation.
#[derive(Debug, PartialEq)]
pub enum Continuation {
    /// Insert a new line with the given prefix (e.g. "- ", "1. ", "> ").
    Continue(String),
    /// The line is an empty list item or quote — clear it (exit list/quote mode).
    ClearLine,
    /// No special continuation — delegate to normal newline.
    None,
}

/// Line prefixes the renderer understands as list items or quotes.
/// Numbered items always continue as `1. `: the renderer only matches that literal.
const PREFIXES: [&str; 3] = ["> ", "- ", "1. "];

/// Analyzes the current line to decide what should happen when Enter is pressed
/// at the end of the line.
pub fn analyze_line_for_continuation(line: &str) -> Continuation {
    let indent = &line[..line.len() - line.trim_start().len()];
    let trimmed = line.trim_start();

    for prefix in PREFIXES {
        // Empty item: just the marker, with or without its trailing space
        if trimmed == prefix || trimmed == prefix.trim_end() {
            return Continuation::ClearLine;
        }
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            if !rest.is_empty() {
                return Continuation::Continue(format!("{}{}", indent, prefix));
            }
        }
    }

    Continuation::None
}

/// Determines the closing character for an auto-close pair.
/// Returns None if the character shouldn't be auto-closed.
pub fn auto_close_pair(ch: char) -> Option<char> {
    match ch {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        '`' => Some('`'),
        _ => None,
    }
}

/// Returns true if backtick auto-pairing should be skipped.
/// Skip when the previous character is also a backtick (code fence typing).
pub fn should_skip_backtick_pair(prev_char: Option<char>) -> bool {
    prev_char == Some('`')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_continuation() {
        assert_eq!(
            analyze_line_for_continuation("- item text"),
            Continuation::Continue("- ".to_string())
        );
    }

    #[test]
    fn test_numbered_continues_with_literal_one() {
        assert_eq!(
            analyze_line_for_continuation("1. first"),
            Continuation::Continue("1. ".to_string())
        );
    }

    #[test]
    fn test_other_ordinals_are_plain_text() {
        assert_eq!(analyze_line_for_continuation("2. second"), Continuation::None);
    }

    #[test]
    fn test_blockquote_continuation() {
        assert_eq!(
            analyze_line_for_continuation("> quote text"),
            Continuation::Continue("> ".to_string())
        );
    }

    #[test]
    fn test_star_is_not_a_list_marker() {
        assert_eq!(analyze_line_for_continuation("* item"), Continuation::None);
    }

    #[test]
    fn test_empty_items_clear() {
        assert_eq!(analyze_line_for_continuation("- "), Continuation::ClearLine);
        assert_eq!(analyze_line_for_continuation("1. "), Continuation::ClearLine);
        assert_eq!(analyze_line_for_continuation("> "), Continuation::ClearLine);
        assert_eq!(analyze_line_for_continuation(">"), Continuation::ClearLine);
    }

    #[test]
    fn test_indent_is_preserved() {
        assert_eq!(
            analyze_line_for_continuation("  - nested"),
            Continuation::Continue("  - ".to_string())
        );
    }

    #[test]
    fn test_plain_and_empty_lines() {
        assert_eq!(analyze_line_for_continuation("just text"), Continuation::None);
        assert_eq!(analyze_line_for_continuation(""), Continuation::None);
        assert_eq!(analyze_line_for_continuation("-dash"), Continuation::None);
    }

    #[test]
    fn test_auto_close_pairs() {
        assert_eq!(auto_close_pair('('), Some(')'));
        assert_eq!(auto_close_pair('['), Some(']'));
        assert_eq!(auto_close_pair('{'), Some('}'));
        assert_eq!(auto_close_pair('`'), Some('`'));
        assert_eq!(auto_close_pair('*'), None);
    }

    #[test]
    fn test_skip_backtick_after_backtick() {
        assert!(should_skip_backtick_pair(Some('`')));
        assert!(!should_skip_backtick_pair(Some('a')));
        assert!(!should_skip_backtick_pair(None));
    }
}
