//! Core types for the mentorboard writing workspace.
//!
//! This module defines the data model shared by the entity store, the transfer
//! engine and the presentation layer: sentences and their phrase chunks, bank
//! entries, paragraphs and the read-only lesson snapshot they are loaded from.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// Rhetorical Functions
// ============================================================================

/// Rhetorical category of a sentence within an explanatory text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RhetoricalFunction {
    Intro,
    Seq,
    CauseEffect,
    ExampleDetail,
    Conclusion,
    /// Any category this build does not know about
    #[serde(other)]
    Unknown,
}

impl RhetoricalFunction {
    /// Stable category key used by the presentation layer for color coding.
    pub fn category_key(self) -> &'static str {
        match self {
            Self::Intro => "function-intro",
            Self::Seq => "function-seq",
            Self::CauseEffect => "function-cause_effect",
            Self::ExampleDetail => "function-example_detail",
            Self::Conclusion => "function-conclusion",
            Self::Unknown => "function-none",
        }
    }

    /// Starter text for a sentence created from the category picker.
    pub fn template(self) -> &'static str {
        match self {
            Self::Intro => "To start with, ____.",
            Self::Seq => "Then, ____.",
            Self::CauseEffect => "Because of this, ____ happens.",
            Self::ExampleDetail => "For example, ____.",
            Self::Conclusion => "In conclusion, ____.",
            Self::Unknown => "____.",
        }
    }
}

// ============================================================================
// Phrase Chunks
// ============================================================================

/// Functional-grammar role of a phrase chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkCategory {
    Participant,
    Process,
    Detail,
}

/// A labeled sub-span of a sentence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub id: String,
    pub text: String,
    pub functional_category: ChunkCategory,
    pub label: String,
}

/// Normalize user input for storage in a chunk.
///
/// Non-empty text is trimmed and padded with a single space on each side so
/// that concatenated chunks stay whitespace separated. Empty input becomes a
/// single space.
pub fn pad_chunk_text(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        " ".to_string()
    } else {
        format!(" {} ", trimmed)
    }
}

// ============================================================================
// Sentences
// ============================================================================

/// A sentence in the workspace (or the sentence part of a bank entry).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    pub id: String,
    pub original_text: String,
    pub current_text: String,
    pub function: RhetoricalFunction,
    /// Overrides `function` when the sentence arrived with a different category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_function: Option<RhetoricalFunction>,
    /// Optional phrase decomposition; empty means phrase mode shows plain text
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chunks: Vec<Chunk>,
}

impl Sentence {
    pub fn new(id: impl Into<String>, text: impl Into<String>, function: RhetoricalFunction) -> Self {
        let text = text.into();
        Self {
            id: id.into(),
            original_text: text.clone(),
            current_text: text,
            function,
            current_function: None,
            chunks: Vec::new(),
        }
    }

    pub fn with_chunks(mut self, chunks: Vec<Chunk>) -> Self {
        self.chunks = chunks;
        self
    }

    /// The category used for display: `current_function` if set, else `function`.
    pub fn effective_function(&self) -> RhetoricalFunction {
        self.current_function.unwrap_or(self.function)
    }

    /// True when the override differs from the authored category.
    pub fn has_function_mismatch(&self) -> bool {
        self.current_function.is_some_and(|f| f != self.function)
    }

    pub fn category_key(&self) -> &'static str {
        self.effective_function().category_key()
    }

    pub fn has_chunks(&self) -> bool {
        !self.chunks.is_empty()
    }

    /// Concatenation of all chunk texts in order.
    pub fn chunk_text(&self) -> String {
        self.chunks.iter().map(|c| c.text.as_str()).collect()
    }

    /// Whether the chunk decomposition reconstructs `current_text` exactly.
    /// Sentences without chunks trivially satisfy this.
    pub fn chunks_reconstruct(&self) -> bool {
        !self.has_chunks() || self.chunk_text() == self.current_text
    }
}

// ============================================================================
// Bank
// ============================================================================

/// Bucket classifying a bank entry's provenance or status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BankSection {
    Starters,
    MySentences,
    MentorSentences,
    Trash,
}

impl BankSection {
    /// Sections in display order.
    pub const ORDER: [BankSection; 4] = [
        Self::Starters,
        Self::MySentences,
        Self::MentorSentences,
        Self::Trash,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Starters => "Starters",
            Self::MySentences => "My Sentences",
            Self::MentorSentences => "Mentor Sentences",
            Self::Trash => "Trash",
        }
    }

    /// Starters are rendered even when empty; other headers hide.
    pub fn always_visible(self) -> bool {
        matches!(self, Self::Starters)
    }
}

/// A reusable sentence fragment in the bank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BankSentence {
    #[serde(flatten)]
    pub sentence: Sentence,
    pub section: BankSection,
}

impl BankSentence {
    pub fn new(sentence: Sentence, section: BankSection) -> Self {
        Self { sentence, section }
    }

    pub fn id(&self) -> &str {
        &self.sentence.id
    }

    pub fn text(&self) -> &str {
        &self.sentence.current_text
    }

    pub fn is_trashed(&self) -> bool {
        self.section == BankSection::Trash
    }
}

// ============================================================================
// Paragraphs & Lessons
// ============================================================================

/// An ordered sequence of sentence ids in reading order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    pub id: String,
    pub sentence_ids: Vec<String>,
}

impl Paragraph {
    pub fn new(id: impl Into<String>, sentence_ids: Vec<String>) -> Self {
        Self {
            id: id.into(),
            sentence_ids,
        }
    }

    pub fn contains(&self, sentence_id: &str) -> bool {
        self.sentence_ids.iter().any(|id| id == sentence_id)
    }

    pub fn position(&self, sentence_id: &str) -> Option<usize> {
        self.sentence_ids.iter().position(|id| id == sentence_id)
    }
}

/// The authored model text of a lesson.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorContent {
    pub title: String,
    pub paragraphs: Vec<Paragraph>,
    pub sentences: HashMap<String, Sentence>,
    #[serde(default)]
    pub functional_labels: BTreeMap<RhetoricalFunction, String>,
}

/// Immutable starting configuration of a workspace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub mentor_content: MentorContent,
    pub default_bank: Vec<BankSentence>,
}

impl Lesson {
    /// Display label for a function, falling back to the category key.
    pub fn label_for(&self, function: RhetoricalFunction) -> &str {
        self.mentor_content
            .functional_labels
            .get(&function)
            .map(String::as_str)
            .unwrap_or_else(|| function.category_key())
    }
}
