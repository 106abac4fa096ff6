//! System clipboard integration for Ctrl+C / Ctrl+V.

use super::*;

impl<'a> App<'a> {
    // arboard::Clipboard is created on demand (not stored in App — it's not Send
    // and creating it is cheap).

    /// Writes text to the system clipboard via arboard.
    pub(super) fn copy_to_clipboard(&self, text: &str) {
        match arboard::Clipboard::new().and_then(|mut clip| clip.set_text(text.to_string())) {
            Ok(()) => tracing::debug!(bytes = text.len(), "copied selection"),
            Err(e) => tracing::warn!(error = %e, "clipboard copy failed"),
        }
    }

    /// Reads text from the system clipboard. Returns None on failure.
    pub(super) fn paste_from_clipboard(&self) -> Option<String> {
        arboard::Clipboard::new().ok()?.get_text().ok()
    }
}
