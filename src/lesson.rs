//! Lesson content sources.
//!
//! A lesson is read once, validated, and then handed to the workspace as an
//! immutable snapshot. Nothing here is retried: a lesson that fails to load
//! produces a [`LoadError`] and the workspace is never built from it.

use crate::constants::{WEATHERING_LESSON_FILE, WEATHERING_LESSON_ID};
use crate::error::{LoadError, LoadResult};
use crate::types::{BankSentence, Lesson, MentorContent};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Anything that can produce a lesson by id.
pub trait LessonSource {
    fn load(&self, lesson_id: &str) -> LoadResult<Lesson>;
}

// ============================================================================
// Catalog
// ============================================================================

/// An entry on the lesson picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonSummary {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// Lessons offered on the landing page.
pub static LESSON_CATALOG: Lazy<Vec<LessonSummary>> = Lazy::new(|| {
    vec![
        LessonSummary {
            id: WEATHERING_LESSON_ID,
            title: "Grade 4 Science: Weathering and Erosion",
            description: "Learn how natural processes shape our planet through weathering and erosion.",
        },
        LessonSummary {
            id: "g4-argue-plastic",
            title: "Grade 4 Architecture: Reducing Plastic Pollution",
            description: "Arguing for sustainable solutions to reduce environmental impact.",
        },
    ]
});

/// File name a lesson id is stored under.
pub fn lesson_file_name(lesson_id: &str) -> String {
    if lesson_id == WEATHERING_LESSON_ID {
        WEATHERING_LESSON_FILE.to_string()
    } else {
        format!("{}.json", lesson_id)
    }
}

// ============================================================================
// Parsing & Validation
// ============================================================================

/// Lesson document as stored. Top-level parts are optional so that a missing
/// part is reported as malformed content rather than a JSON error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLesson {
    id: Option<String>,
    title: Option<String>,
    mentor_content: Option<MentorContent>,
    default_bank: Option<Vec<BankSentence>>,
}

impl RawLesson {
    fn validate(self, lesson_id: &str) -> LoadResult<Lesson> {
        let mentor_content = self
            .mentor_content
            .ok_or_else(|| LoadError::Malformed("missing mentorContent".into()))?;
        let default_bank = self
            .default_bank
            .ok_or_else(|| LoadError::Malformed("missing defaultBank".into()))?;

        validate_mentor_content(&mentor_content)?;
        validate_bank(&default_bank, &mentor_content)?;

        Ok(Lesson {
            id: self.id.unwrap_or_else(|| lesson_id.to_string()),
            title: self.title.unwrap_or_else(|| mentor_content.title.clone()),
            mentor_content,
            default_bank,
        })
    }
}

fn validate_mentor_content(content: &MentorContent) -> LoadResult<()> {
    for (key, sentence) in &content.sentences {
        if *key != sentence.id {
            return Err(LoadError::Malformed(format!(
                "sentence keyed \"{}\" has id \"{}\"",
                key, sentence.id
            )));
        }
        if !sentence.chunks_reconstruct() {
            return Err(LoadError::Malformed(format!(
                "chunks of sentence \"{}\" do not reconstruct its text",
                sentence.id
            )));
        }
    }

    let mut paragraph_ids = HashSet::new();
    let mut placed = HashSet::new();
    for paragraph in &content.paragraphs {
        if !paragraph_ids.insert(paragraph.id.as_str()) {
            return Err(LoadError::Malformed(format!("duplicate paragraph \"{}\"", paragraph.id)));
        }
        for sentence_id in &paragraph.sentence_ids {
            if !content.sentences.contains_key(sentence_id) {
                return Err(LoadError::Malformed(format!(
                    "paragraph \"{}\" references unknown sentence \"{}\"",
                    paragraph.id, sentence_id
                )));
            }
            if !placed.insert(sentence_id.as_str()) {
                return Err(LoadError::Malformed(format!(
                    "sentence \"{}\" is placed more than once",
                    sentence_id
                )));
            }
        }
    }
    Ok(())
}

fn validate_bank(bank: &[BankSentence], content: &MentorContent) -> LoadResult<()> {
    let mut seen = HashSet::new();
    for item in bank {
        if !seen.insert(item.id()) || content.sentences.contains_key(item.id()) {
            return Err(LoadError::Malformed(format!("duplicate id \"{}\" in defaultBank", item.id())));
        }
        if !item.sentence.chunks_reconstruct() {
            return Err(LoadError::Malformed(format!(
                "chunks of bank item \"{}\" do not reconstruct its text",
                item.id()
            )));
        }
    }
    Ok(())
}

/// Parse and validate a lesson document.
pub fn parse_lesson(lesson_id: &str, json: &str) -> LoadResult<Lesson> {
    let raw: RawLesson = serde_json::from_str(json)?;
    let lesson = raw.validate(lesson_id)?;
    debug!(
        lesson_id,
        paragraphs = lesson.mentor_content.paragraphs.len(),
        sentences = lesson.mentor_content.sentences.len(),
        bank = lesson.default_bank.len(),
        "Lesson parsed"
    );
    Ok(lesson)
}

/// Read and validate a lesson file at an explicit path.
pub fn load_lesson_file(path: &Path) -> LoadResult<Lesson> {
    let lesson_id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("lesson")
        .to_string();
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound(lesson_id.clone())
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let lesson = parse_lesson(&lesson_id, &content)?;
    info!(path = %path.display(), title = %lesson.title, "Lesson loaded");
    Ok(lesson)
}

// ============================================================================
// Sources
// ============================================================================

/// Lessons stored as JSON files in a directory.
#[derive(Clone, Debug)]
pub struct FileLessonSource {
    dir: PathBuf,
}

impl FileLessonSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a lesson id resolves to, or `None` for ids that would escape the directory.
    pub fn path_for(&self, lesson_id: &str) -> Option<PathBuf> {
        let escapes = lesson_id.is_empty()
            || lesson_id.contains(['/', '\\'])
            || lesson_id.starts_with('.');
        (!escapes).then(|| self.dir.join(lesson_file_name(lesson_id)))
    }
}

impl LessonSource for FileLessonSource {
    fn load(&self, lesson_id: &str) -> LoadResult<Lesson> {
        let path = self
            .path_for(lesson_id)
            .ok_or_else(|| LoadError::NotFound(lesson_id.to_string()))?;
        let content = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound(lesson_id.to_string())
            } else {
                LoadError::Io { path: path.clone(), source }
            }
        })?;
        let lesson = parse_lesson(lesson_id, &content)?;
        info!(lesson_id, path = %path.display(), "Lesson loaded");
        Ok(lesson)
    }
}

/// Lessons compiled into the crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct BundledLessons;

const BUNDLED_WEATHERING: &str = include_str!("../lessons/g4-explain-weathering.json");

impl LessonSource for BundledLessons {
    fn load(&self, lesson_id: &str) -> LoadResult<Lesson> {
        match lesson_id {
            WEATHERING_LESSON_ID => parse_lesson(lesson_id, BUNDLED_WEATHERING),
            _ => Err(LoadError::NotFound(lesson_id.to_string())),
        }
    }
}
