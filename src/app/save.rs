//! Saving: hand the buffer to the document store.

use super::*;

impl<'a> App<'a> {
    /// Writes the current editor content through the store. Returns whether
    /// the save succeeded; on failure the buffer and `modified` flag are left
    /// as they were so the save can be retried.
    pub(super) fn save(&mut self) -> bool {
        let content = self.textarea_content();
        match self.store.save(&content) {
            Ok(()) => {
                self.saved_content = content;
                self.modified = false;
                self.set_status_kind("Saved", status::MessageKind::Success);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, document = %self.document_name, "save failed");
                self.set_status_kind(&format!("Error saving: {}", e), status::MessageKind::Error);
                false
            }
        }
    }
}
