pub mod dom;
pub mod markup_view;
pub mod render;
pub mod sanitize;

/// Renders `source` and sanitizes the result into a tree. The preview walks
/// this tree directly.
pub fn render_tree(source: &str) -> dom::Handle {
    sanitize::sanitized_tree(&render::render(source))
}

/// Renders `source` and runs the result through the sanitizer. Together with
/// [`render_tree`] this is the only path from a buffer to anything that gets
/// displayed or exported.
pub fn render_safe(source: &str) -> String {
    sanitize::serialize(&render_tree(source))
}
