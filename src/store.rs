//! Where documents live between editing sessions.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or saving a document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading the document failed.
    #[error("failed to read {path}: {error}")]
    Read {
        /// The document that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        error: io::Error,
    },

    /// Writing the document failed. The previous version is left in place.
    #[error("failed to write {path}: {error}")]
    Write {
        /// The document that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        error: io::Error,
    },
}

/// A persistence backend for one document.
pub trait DocumentStore {
    /// Short display name for the header.
    fn name(&self) -> String;

    /// Loads the stored content. A document that does not exist yet loads as
    /// an empty buffer.
    fn load(&self) -> Result<String, StoreError>;

    /// Replaces the stored content with `content`.
    fn save(&self, content: &str) -> Result<(), StoreError>;
}

/// A document kept in a single markdown file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sibling path the content is staged in before the rename.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".inkpost-{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }
}

impl DocumentStore for FileStore {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn load(&self) -> Result<String, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = ?self.path, "document does not exist yet, starting empty");
                Ok(String::new())
            }
            Err(error) => Err(StoreError::Read {
                path: self.path.clone(),
                error,
            }),
        }
    }

    fn save(&self, content: &str) -> Result<(), StoreError> {
        let staging = self.staging_path();
        let result = fs::write(&staging, content).and_then(|()| fs::rename(&staging, &self.path));
        if let Err(error) = result {
            let _ = fs::remove_file(&staging);
            return Err(StoreError::Write {
                path: self.path.clone(),
                error,
            });
        }
        tracing::info!(path = ?self.path, bytes = content.len(), "document saved");
        Ok(())
    }
}
