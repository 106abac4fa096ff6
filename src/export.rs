//! Standalone HTML export of a document's sanitized preview.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::markdown::{self, render::escape_html};

/// Errors raised while exporting a document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to read {path}: {error}")]
    Read { path: PathBuf, error: io::Error },

    #[error("failed to write {path}: {error}")]
    Write { path: PathBuf, error: io::Error },
}

/// Wraps the sanitized rendering of `source` in a minimal HTML5 page.
pub fn to_html(source: &str, title: &str) -> String {
    let body = markdown::render_safe(source);
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<article>\n{}\n</article>\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

/// Title used when none is given: the file stem of `input`.
pub fn default_title(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Untitled".to_string())
}

/// Reads the markdown file at `input` and returns its HTML page.
pub fn export_string(input: &Path, title: Option<&str>) -> Result<String, ExportError> {
    let source = fs::read_to_string(input).map_err(|error| ExportError::Read {
        path: input.to_path_buf(),
        error,
    })?;
    let title = title.map_or_else(|| default_title(input), str::to_string);
    Ok(to_html(&source, &title))
}

/// Reads the markdown file at `input` and writes its HTML page to `output`.
pub fn export_file(input: &Path, output: &Path, title: Option<&str>) -> Result<(), ExportError> {
    let page = export_string(input, title)?;
    fs::write(output, &page).map_err(|error| ExportError::Write {
        path: output.to_path_buf(),
        error,
    })?;
    tracing::info!(input = ?input, output = ?output, bytes = page.len(), "exported html");
    Ok(())
}
