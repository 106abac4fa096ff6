//! Markdown-to-markup rendering for the preview dialect.
//!
//! The dialect is line-oriented and small: three heading levels, bold,
//! italic, inline code, images, links, block quotes, `- ` and `1. ` list
//! items, and fenced code blocks. Rendering is a fixed sequence of regex
//! substitutions over the whole buffer; later passes see the markup produced
//! by earlier ones, so [`PASSES`] order is part of the output format.
//!
//! The output is NOT safe to display as-is. Raw HTML in the source (for
//! example `<u>` from the underline action or `<video>` from the media
//! template) passes straight through. Run it through
//! [`crate::markdown::sanitize`] first.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// One substitution applied to the whole buffer.
pub struct Pass {
    pub pattern: Regex,
    pub replacement: &'static str,
}

impl Pass {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("preview pass patterns are valid"),
            replacement,
        }
    }
}

/// The substitution passes, in application order.
///
/// The image pass extends the dialect beyond links: it runs before the link
/// pass so that `![alt](src)` becomes an `<img>` instead of a `!` followed by
/// a link.
pub static PASSES: LazyLock<Vec<Pass>> = LazyLock::new(|| {
    vec![
        Pass::new(r"(?m)^### (.*)$", "<h3>${1}</h3>"),
        Pass::new(r"(?m)^## (.*)$", "<h2>${1}</h2>"),
        Pass::new(r"(?m)^# (.*)$", "<h1>${1}</h1>"),
        Pass::new(r"\*\*(.*?)\*\*", "<strong>${1}</strong>"),
        Pass::new(r"\*(.*?)\*", "<em>${1}</em>"),
        Pass::new(r"`(.*?)`", "<code>${1}</code>"),
        Pass::new(r"!\[(.*?)\]\((.*?)\)", r#"<img src="${2}" alt="${1}">"#),
        Pass::new(r"\[(.*?)\]\((.*?)\)", r#"<a href="${2}">${1}</a>"#),
        Pass::new(r"(?m)^> (.*)$", "<blockquote>${1}</blockquote>"),
        Pass::new(r"(?m)^- (.*)$", "<li>${1}</li>"),
        Pass::new(r"(?m)^1\. (.*)$", "<li>${1}</li>"),
        Pass::new(r"\n", "<br>"),
    ]
});

/// A maximal run of list items, optionally separated by line breaks.
static LIST_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<li>.*?</li>(?:(?:<br>)?<li>.*?</li>)*").expect("list run pattern is valid")
});

/// A fenced code block: opening fence with optional info string, body, closing fence.
static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^```([^\n`]*)\n(.*?)^```[ \t]*$").expect("fence pattern is valid")
});

// Private-use delimiters: no pass matches them, so stashed code survives untouched.
const STASH_OPEN: char = '\u{E000}';
const STASH_CLOSE: char = '\u{E001}';

/// Renders `source` to preview markup. Pure: the same input always yields
/// byte-identical output.
pub fn render(source: &str) -> String {
    // Stash delimiters typed into the source must not address a stashed block
    let normalized = source
        .replace("\r\n", "\n")
        .replace([STASH_OPEN, STASH_CLOSE], "");

    let mut code_blocks: Vec<String> = Vec::new();
    let mut out = FENCE
        .replace_all(&normalized, |caps: &Captures| {
            let lang = caps[1].trim();
            let body = caps[2].strip_suffix('\n').unwrap_or(&caps[2]);
            code_blocks.push(code_block(lang, body));
            format!("{}{}{}", STASH_OPEN, code_blocks.len() - 1, STASH_CLOSE)
        })
        .into_owned();

    for pass in PASSES.iter() {
        out = pass.pattern.replace_all(&out, pass.replacement).into_owned();
    }

    out = group_list_items(&out);

    for (i, block) in code_blocks.iter().enumerate() {
        out = out.replace(&format!("{}{}{}", STASH_OPEN, i, STASH_CLOSE), block);
    }
    out
}

/// Wraps every run of adjacent `<li>` elements in a single `<ul>`, dropping
/// the `<br>` markers between items of the same run.
pub fn group_list_items(markup: &str) -> String {
    LIST_RUN
        .replace_all(markup, |caps: &Captures| {
            format!("<ul>{}</ul>", caps[0].replace("</li><br><li>", "</li><li>"))
        })
        .into_owned()
}

fn code_block(lang: &str, body: &str) -> String {
    if lang.is_empty() {
        format!("<pre><code>{}</code></pre>", escape_html(body))
    } else {
        format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            escape_html(lang),
            escape_html(body)
        )
    }
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_order() {
        let replacements: Vec<&str> = PASSES.iter().map(|p| p.replacement).collect();
        assert_eq!(
            replacements,
            vec![
                "<h3>${1}</h3>",
                "<h2>${1}</h2>",
                "<h1>${1}</h1>",
                "<strong>${1}</strong>",
                "<em>${1}</em>",
                "<code>${1}</code>",
                r#"<img src="${2}" alt="${1}">"#,
                r#"<a href="${2}">${1}</a>"#,
                "<blockquote>${1}</blockquote>",
                "<li>${1}</li>",
                "<li>${1}</li>",
                "<br>",
            ]
        );
    }

    #[test]
    fn test_typed_stash_markers_do_not_repeat_code() {
        let source = "\u{E000}0\u{E001}\n```\nsecret\n```";
        let out = render(source);
        assert_eq!(out.matches("secret").count(), 1);
        assert!(out.starts_with("0<br><pre><code>secret</code></pre>"));
        assert!(!out.contains('\u{E000}'));
    }

    #[test]
    fn test_render_headings() {
        assert_eq!(render("# Title\n## Sub"), "<h1>Title</h1><br><h2>Sub</h2>");
        assert_eq!(render("### Deep"), "<h3>Deep</h3>");
    }

    #[test]
    fn test_heading_needs_space() {
        assert_eq!(render("#hashtag"), "#hashtag");
    }

    #[test]
    fn test_bold_and_italic_do_not_overlap() {
        assert_eq!(
            render("**bold** and *italic*"),
            "<strong>bold</strong> and <em>italic</em>"
        );
    }

    #[test]
    fn test_bold_is_non_greedy() {
        assert_eq!(
            render("**a** x **b**"),
            "<strong>a</strong> x <strong>b</strong>"
        );
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(render("run `cargo` now"), "run <code>cargo</code> now");
    }

    #[test]
    fn test_link() {
        assert_eq!(
            render("[site](https://example.com)"),
            r#"<a href="https://example.com">site</a>"#
        );
    }

    #[test]
    fn test_image_template_renders_image() {
        assert_eq!(
            render("\n![Alt text](image-url)\n"),
            r#"<br><img src="image-url" alt="Alt text"><br>"#
        );
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(render("> wise words"), "<blockquote>wise words</blockquote>");
    }

    #[test]
    fn test_list_grouping_single_container() {
        assert_eq!(render("- a\n- b\n- c"), "<ul><li>a</li><li>b</li><li>c</li></ul>");
    }

    #[test]
    fn test_numbered_items_group_like_bullets() {
        assert_eq!(render("1. a\n1. b"), "<ul><li>a</li><li>b</li></ul>");
        // Only the literal "1. " prefix is a list item
        assert_eq!(render("2. b"), "2. b");
    }

    #[test]
    fn test_separate_lists_get_separate_containers() {
        assert_eq!(
            render("- a\ntext\n- b"),
            "<ul><li>a</li></ul><br>text<br><ul><li>b</li></ul>"
        );
    }

    #[test]
    fn test_newlines_become_breaks() {
        assert_eq!(render("a\nb\n\nc"), "a<br>b<br><br>c");
    }

    #[test]
    fn test_crlf_is_normalized() {
        assert_eq!(render("# T\r\nx"), "<h1>T</h1><br>x");
    }

    #[test]
    fn test_raw_html_passes_through() {
        assert_eq!(render("<u>under</u>"), "<u>under</u>");
    }

    #[test]
    fn test_fenced_code_is_protected() {
        let out = render("```rust\nlet x = **y** < 3;\n```");
        assert_eq!(
            out,
            "<pre><code class=\"language-rust\">let x = **y** &lt; 3;</code></pre>"
        );
    }

    #[test]
    fn test_code_block_template() {
        let out = render("\n```language\n// Your code here\n```\n");
        assert_eq!(
            out,
            "<br><pre><code class=\"language-language\">// Your code here</code></pre><br>"
        );
    }

    #[test]
    fn test_fence_without_lang_and_multiline_body() {
        let out = render("```\n- a\n# b\n```");
        assert_eq!(out, "<pre><code>- a\n# b</code></pre>");
    }

    #[test]
    fn test_unterminated_fence_renders_literally() {
        let out = render("```rust\nx");
        assert!(!out.contains("<pre>"));
        assert!(out.ends_with("<br>x"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let src = "# T\n**b** *i* `c`\n- x\n- y\n> q\n```\ncode\n```";
        assert_eq!(render(src), render(src));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
