//! In-place text editing of bank items, workspace sentences and phrase chunks.
//!
//! An edit session remembers the text and chunks as they were when editing
//! began, so that Escape can put them back. Chunk edits keep the chunk reconstruction
//! invariant: `current_text` is always recomputed from the chunks.

use crate::error::{StoreError, StoreResult};
use crate::store::{EntityStore, SentencePatch};
use crate::types::{Chunk, pad_chunk_text};
use tracing::debug;

/// What is being edited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditTarget {
    BankItem(String),
    Sentence(String),
}

/// An open text edit with the state to restore on cancel.
#[derive(Clone, Debug, PartialEq)]
pub struct EditSession {
    pub target: EditTarget,
    pub pre_edit_text: String,
    /// Live edits may drop a sentence's chunks; cancel brings them back.
    pub pre_edit_chunks: Vec<Chunk>,
}

impl EditSession {
    /// Open an edit on an existing bank item or sentence.
    pub fn begin(store: &EntityStore, target: EditTarget) -> Option<Self> {
        let (pre_edit_text, pre_edit_chunks) = match &target {
            EditTarget::BankItem(id) => (store.bank_item(id)?.text().to_string(), Vec::new()),
            EditTarget::Sentence(id) => {
                let sentence = store.sentence(id)?;
                (sentence.current_text.clone(), sentence.chunks.clone())
            }
        };
        Some(Self {
            target,
            pre_edit_text,
            pre_edit_chunks,
        })
    }

    /// Write live text into the target while the edit is open.
    pub fn update(&self, store: &mut EntityStore, text: &str) -> StoreResult<()> {
        apply_text(store, &self.target, text)
    }

    /// Close the edit, keeping `text`.
    pub fn commit(self, store: &mut EntityStore, text: &str) -> StoreResult<()> {
        apply_text(store, &self.target, text)
    }

    /// Close the edit, restoring the pre-edit text and chunks.
    pub fn cancel(self, store: &mut EntityStore) -> StoreResult<()> {
        debug!(target = ?self.target, "Edit cancelled, restoring text");
        match self.target {
            EditTarget::BankItem(id) => store.set_bank_text(&id, self.pre_edit_text),
            EditTarget::Sentence(id) => {
                let patch = SentencePatch::text(self.pre_edit_text).with_chunks(self.pre_edit_chunks);
                if store.upsert_sentence(&id, patch) {
                    Ok(())
                } else {
                    Err(StoreError::UnknownSentence(id))
                }
            }
        }
    }
}

fn apply_text(store: &mut EntityStore, target: &EditTarget, text: &str) -> StoreResult<()> {
    match target {
        EditTarget::BankItem(id) => store.set_bank_text(id, text),
        EditTarget::Sentence(id) => {
            if edit_sentence_text(store, id, text) {
                Ok(())
            } else {
                Err(StoreError::UnknownSentence(id.clone()))
            }
        }
    }
}

/// Replace a workspace sentence's text.
///
/// If the sentence carries chunks that no longer reconstruct the new text,
/// the chunk decomposition is dropped and phrase mode shows plain text.
pub fn edit_sentence_text(store: &mut EntityStore, sentence_id: &str, text: &str) -> bool {
    let Some(sentence) = store.sentence(sentence_id) else {
        return false;
    };
    let mut patch = SentencePatch::text(text);
    if sentence.has_chunks() && sentence.chunk_text() != text {
        patch = patch.with_chunks(Vec::new());
    }
    store.upsert_sentence(sentence_id, patch)
}

/// Replace one chunk's text and recompute the sentence text from its chunks.
pub fn update_chunk_text(store: &mut EntityStore, sentence_id: &str, chunk_id: &str, text: &str) -> bool {
    let Some(sentence) = store.sentence(sentence_id) else {
        return false;
    };
    if !sentence.chunks.iter().any(|c| c.id == chunk_id) {
        return false;
    }
    let padded = pad_chunk_text(text);
    let chunks: Vec<_> = sentence
        .chunks
        .iter()
        .cloned()
        .map(|mut c| {
            if c.id == chunk_id {
                c.text = padded.clone();
            }
            c
        })
        .collect();
    let current_text: String = chunks.iter().map(|c| c.text.as_str()).collect();
    store.upsert_sentence(sentence_id, SentencePatch::text(current_text).with_chunks(chunks))
}
