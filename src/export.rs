//! Plain-text export of the composition.
//!
//! Format: the mentor title, a blank line, then one line per paragraph with
//! its sentences joined by single spaces. Paragraphs are separated by a blank
//! line.

use crate::error::{ExportError, ExportResult};
use crate::store::EntityStore;
use std::path::{Path, PathBuf};
use tracing::info;

/// Destination for "copy to clipboard".
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> ExportResult<()>;
}

/// Each paragraph's resolved sentence texts joined by spaces, paragraphs
/// separated by blank lines. Ids that no longer resolve are skipped.
pub fn composition_text(store: &EntityStore) -> String {
    store
        .paragraphs()
        .iter()
        .map(|p| {
            store
                .resolve_paragraph(p)
                .iter()
                .map(|s| s.current_text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Full export text: title, blank line, composition.
pub fn export_text(title: &str, store: &EntityStore) -> String {
    format!("{}\n\n{}", title, composition_text(store))
}

/// Write `text` to `dir/file_name`, returning the written path.
pub fn download_txt(dir: &Path, file_name: &str, text: &str) -> ExportResult<PathBuf> {
    let path = dir.join(file_name);
    std::fs::write(&path, text).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), bytes = text.len(), "Draft downloaded");
    Ok(path)
}
