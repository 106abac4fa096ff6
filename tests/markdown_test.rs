use std::path::PathBuf;

use inkpost::markdown::{render::render, render_safe, sanitize::sanitize};

// Integration tests for the preview pipeline: render, then sanitize.
// The unit tests in src/markdown/render.rs cover individual passes.

fn fixture() -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("sample.md");
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn test_render_is_deterministic() {
    let source = fixture();
    assert_eq!(render(&source), render(&source));
    assert_eq!(render_safe(&source), render_safe(&source));
}

#[test]
fn test_bold_and_italic_are_distinct() {
    let out = render("**bold** and *italic*");
    assert_eq!(out, "<strong>bold</strong> and <em>italic</em>");
}

#[test]
fn test_consecutive_items_share_one_list() {
    let out = render("- a\n- b\n- c");
    assert_eq!(out, "<ul><li>a</li><li>b</li><li>c</li></ul>");
    assert_eq!(out.matches("<ul>").count(), 1);
    assert_eq!(out.matches("<li>").count(), 3);
}

#[test]
fn test_headings_in_order() {
    assert_eq!(render("# Title\n## Sub"), "<h1>Title</h1><br><h2>Sub</h2>");
}

#[test]
fn test_link() {
    assert_eq!(
        render("[site](https://example.com)"),
        r#"<a href="https://example.com">site</a>"#
    );
}

#[test]
fn test_sample_fixture_is_valid_markdown() {
    let content = fixture();
    assert!(content.contains("# Sample Post"));
    assert!(content.contains("**sample**"));
    assert!(content.contains("*Italic*"));
    assert!(content.contains("```javascript"));
    assert!(content.contains("> This is a quote"));
}

#[test]
fn test_fixture_renders_every_construct() {
    let out = render_safe(&fixture());
    assert!(out.contains("<h1>Sample Post</h1>"));
    assert!(out.contains("<h2>Links and media</h2>"));
    assert!(out.contains("<h3>Lists</h3>"));
    assert!(out.contains("<strong>sample</strong>"));
    assert!(out.contains("<em>Italic</em>"));
    assert!(out.contains("<u>underlined</u>"));
    assert!(out.contains("<code>inline code</code>"));
    assert!(out.contains(r#"<a href="https://example.com/docs">docs</a>"#));
    assert!(out.contains(r#"<a href="notes/next.md">relative page</a>"#));
    assert!(out.contains(r#"<img src="images/cat.png" alt="A cat">"#));
    assert!(out.contains(r#"<source src="clips/demo.mp4" type="video/mp4">"#));
    assert!(out.contains("<blockquote>This is a quote</blockquote>"));
    assert!(out.contains(
        "<ul><li>first bullet</li><li>second bullet</li><li>numbered</li><li>numbered again</li></ul>"
    ));
}

#[test]
fn test_fixture_code_block_is_literal() {
    let out = render_safe(&fixture());
    assert!(out.contains(r#"<pre><code class="language-javascript">"#));
    assert!(out.contains("if (a &lt; b &amp;&amp; c &gt; d)"));
    // Inline passes never run inside a fence
    assert!(out.contains("**not bold**"));
    assert!(!out.contains("<strong>not bold</strong>"));
}

#[test]
fn test_fixture_unsafe_markup_is_removed() {
    let out = render_safe(&fixture());
    assert!(!out.contains("<script"));
    assert!(!out.contains("nope"));
    assert!(!out.contains("javascript:"));
    assert!(!out.contains("onclick"));
    assert!(out.contains("<a>bad link</a>"));
}

#[test]
fn test_render_output_is_raw_until_sanitized() {
    let source = "<b onmouseover=\"x()\">hi</b>";
    assert!(render(source).contains("onmouseover"));
    assert!(!render_safe(source).contains("onmouseover"));
}

#[test]
fn test_sanitize_is_idempotent_on_fixture() {
    let once = render_safe(&fixture());
    assert_eq!(sanitize(&once), once);
}

#[test]
fn test_stray_and_unclosed_tags_are_balanced() {
    let out = render_safe("[a](x)</strong></strong>\n<h1>open");
    assert_eq!(out, r#"<a href="x">a</a><br><h1>open</h1>"#);
}

#[test]
fn test_fixture_output_is_balanced() {
    let out = render_safe(&fixture());
    for tag in ["a", "blockquote", "code", "em", "h1", "h2", "h3", "li", "pre", "strong", "ul"] {
        assert_eq!(
            out.matches(&format!("<{tag}>")).count() + out.matches(&format!("<{tag} ")).count(),
            out.matches(&format!("</{tag}>")).count(),
            "unbalanced <{tag}>"
        );
    }
}
