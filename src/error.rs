//! Error types for lesson loading, store mutations and export.
//!
//! Every failure in the core is either surfaced once (load, export) or
//! swallowed after logging (store mutations driven by drag gestures). Nothing
//! is retried automatically.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a lesson
#[derive(Error, Debug)]
pub enum LoadError {
    /// No lesson with this id in the content source
    #[error("Lesson \"{0}\" could not be found")]
    NotFound(String),

    /// IO error while reading a lesson file
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error from serde_json
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Lesson parsed but its content is incomplete or inconsistent
    #[error("Lesson data is incomplete or malformed: {0}")]
    Malformed(String),
}

impl LoadError {
    /// Message shown on the "not found" screen.
    pub fn user_message(&self, lesson_id: &str) -> String {
        format!(
            "The lesson \"{}\" could not be loaded. It may be missing or contains errors.",
            lesson_id
        )
    }
}

/// Errors raised by entity store mutations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Unknown paragraph: {0}")]
    UnknownParagraph(String),

    #[error("Paragraph {0} already exists")]
    DuplicateParagraph(String),

    #[error("Unknown bank item: {0}")]
    UnknownBankItem(String),

    #[error("Unknown sentence: {0}")]
    UnknownSentence(String),

    /// A sentence id would appear more than once across paragraphs
    #[error("Sentence {0} would appear in more than one place")]
    DuplicateSentence(String),

    /// Permanent deletion is only allowed from the trash
    #[error("Bank item {0} is not in the trash")]
    NotInTrash(String),

    /// A paragraph sequence replacement changed the set of paragraphs
    #[error("Paragraph order must be a permutation of the current paragraphs")]
    NotAPermutation,
}

/// Errors from the export surface
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors reading settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for lesson loading
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type alias for store mutations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;
