//! Allowlist sanitizer for preview markup.
//!
//! Rendering and sanitizing are separate stages: [`super::render::render`]
//! passes raw HTML in the source straight through, and this module decides
//! what of it may be shown. The markup is parsed by html5ever into a
//! [`dom`](super::dom) tree, and the allowlist is applied to that tree. Only
//! the elements the preview dialect produces (plus `<u>`, `<video>` and
//! `<source>` from the editor's own actions) survive, each with a fixed set of
//! attributes. URL attributes must be relative or use `http`, `https` or
//! `mailto`.
//!
//! Serialized output is balanced and canonical (lowercase names,
//! double-quoted escaped values), so sanitizing twice gives the same result
//! as sanitizing once.

use super::dom::{self, Handle, NodeData};
use super::render::escape_html;

const ALLOWED_TAGS: &[&str] = &[
    "a",
    "blockquote",
    "br",
    "code",
    "em",
    "h1",
    "h2",
    "h3",
    "img",
    "li",
    "p",
    "pre",
    "source",
    "strong",
    "u",
    "ul",
    "video",
];

/// Elements that never have content or a closing tag.
const VOID_TAGS: &[&str] = &["br", "img", "source"];

/// Elements removed together with everything inside them.
const DROP_CONTENT_TAGS: &[&str] = &[
    "embed", "iframe", "noembed", "noframes", "noscript", "object", "script", "style", "template",
    "textarea", "title", "xmp",
];

const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Sanitizes `markup`, keeping allowlisted elements and attributes and
/// escaping everything else as text.
pub fn sanitize(markup: &str) -> String {
    serialize(&sanitized_tree(markup))
}

/// Parses `markup` and strips everything outside the allowlist. Returns the
/// `<body>` element whose children are the cleaned content.
pub fn sanitized_tree(markup: &str) -> Handle {
    let body = dom::parse_fragment(markup);
    clean_children(&body);
    body
}

fn clean_children(parent: &Handle) {
    let children: Vec<Handle> = parent.children.borrow().clone();
    for child in children {
        let NodeData::Element { name, attrs } = &child.data else {
            if !matches!(child.data, NodeData::Text(_)) {
                dom::detach(&child);
            }
            continue;
        };
        let tag = &*name.local;
        if DROP_CONTENT_TAGS.contains(&tag) {
            dom::detach(&child);
            continue;
        }
        // Children first, so an unwrapped element hoists already-clean nodes
        clean_children(&child);
        if name.ns != html5ever::ns!(html) || !ALLOWED_TAGS.contains(&tag) {
            dom::unwrap(&child);
            continue;
        }
        let kept: Vec<(String, String)> = attrs
            .borrow()
            .iter()
            .filter(|(attr, value)| allowed_attr(tag, attr, value))
            .cloned()
            .collect();
        *attrs.borrow_mut() = kept;
    }
}

/// Whether the attribute may stay on this element.
fn allowed_attr(tag: &str, attr: &str, value: &str) -> bool {
    match (tag, attr) {
        ("video", "controls") | ("img", "alt") => true,
        ("a", "href") | ("img", "src") | ("source", "src") => is_safe_url(value),
        ("source", "type") => {
            !value.is_empty()
                && value
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '+' | '.' | '-'))
        }
        ("code", "class") => value.strip_prefix("language-").is_some_and(|lang| {
            !lang.is_empty()
                && lang
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-'))
        }),
        _ => false,
    }
}

/// A URL is safe if it has no scheme (relative) or one of [`SAFE_SCHEMES`].
pub fn is_safe_url(url: &str) -> bool {
    // Browsers ignore whitespace and control characters inside a scheme.
    let compact: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .collect();
    let scheme_end = compact.find(|c: char| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(pos) if compact[pos..].starts_with(':') => {
            let scheme = compact[..pos].to_ascii_lowercase();
            SAFE_SCHEMES.contains(&scheme.as_str())
        }
        _ => true,
    }
}

/// Serializes the children of a cleaned tree.
pub fn serialize(body: &Handle) -> String {
    let mut out = String::new();
    for child in body.children.borrow().iter() {
        serialize_node(child, &mut out);
    }
    out
}

fn serialize_node(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text(text) => out.push_str(&escape_html(&text.borrow())),
        NodeData::Element { name, attrs } => {
            let tag = &*name.local;
            out.push('<');
            out.push_str(tag);
            for (attr, value) in attrs.borrow().iter() {
                out.push(' ');
                out.push_str(attr);
                if attr != "controls" {
                    out.push_str("=\"");
                    out.push_str(&escape_html(value));
                    out.push('"');
                }
            }
            out.push('>');
            if VOID_TAGS.contains(&tag) {
                return;
            }
            // The parser drops one newline right after <pre>
            if tag == "pre" && starts_with_newline(node) {
                out.push('\n');
            }
            for child in node.children.borrow().iter() {
                serialize_node(child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        NodeData::Document | NodeData::Comment => {}
    }
}

fn starts_with_newline(node: &Handle) -> bool {
    node.children.borrow().first().is_some_and(|first| match &first.data {
        NodeData::Text(text) => text.borrow().starts_with('\n'),
        _ => false,
    })
}
