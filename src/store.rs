//! Entity store - the single source of truth for sentences, bank and paragraphs.
//!
//! The store holds plain data and a handful of mutations. Each mutation keeps
//! the model invariants intact:
//! - a sentence id appears in at most one paragraph, at most once
//! - bank ids are unique
//!
//! Container membership is looked up here by id instead of being inferred from
//! whatever UI context an item happened to be picked up from.

use crate::drag::ContainerId;
use crate::error::{StoreError, StoreResult};
use crate::types::{BankSection, BankSentence, Chunk, Lesson, Paragraph, Sentence};
use std::collections::{HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Partial update for a sentence. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SentencePatch {
    pub current_text: Option<String>,
    pub chunks: Option<Vec<Chunk>>,
}

impl SentencePatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            current_text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_chunks(mut self, chunks: Vec<Chunk>) -> Self {
        self.chunks = Some(chunks);
        self
    }

    fn apply(self, sentence: &mut Sentence) {
        if let Some(text) = self.current_text {
            sentence.current_text = text;
        }
        if let Some(chunks) = self.chunks {
            sentence.chunks = chunks;
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityStore {
    sentences: HashMap<String, Sentence>,
    bank: Vec<BankSentence>,
    paragraphs: Vec<Paragraph>,
    last_minted: u64,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a lesson by structural copy.
    pub fn from_lesson(lesson: &Lesson) -> Self {
        Self {
            sentences: lesson.mentor_content.sentences.clone(),
            bank: lesson.default_bank.clone(),
            paragraphs: lesson.mentor_content.paragraphs.clone(),
            last_minted: 0,
        }
    }

    // ==================== Reads ====================

    pub fn sentence(&self, id: &str) -> Option<&Sentence> {
        self.sentences.get(id)
    }

    pub fn sentences(&self) -> &HashMap<String, Sentence> {
        &self.sentences
    }

    pub fn bank(&self) -> &[BankSentence] {
        &self.bank
    }

    pub fn bank_item(&self, id: &str) -> Option<&BankSentence> {
        self.bank.iter().find(|b| b.id() == id)
    }

    pub fn bank_index(&self, id: &str) -> Option<usize> {
        self.bank.iter().position(|b| b.id() == id)
    }

    /// Bank items of one section, in bank order.
    pub fn bank_section(&self, section: BankSection) -> impl Iterator<Item = &BankSentence> {
        self.bank.iter().filter(move |b| b.section == section)
    }

    /// First bank entry whose current text equals `text` exactly.
    pub fn find_bank_by_text(&self, text: &str) -> Option<&BankSentence> {
        self.bank.iter().find(|b| b.text() == text)
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn paragraph(&self, id: &str) -> Option<&Paragraph> {
        self.paragraphs.iter().find(|p| p.id == id)
    }

    pub fn paragraph_index(&self, id: &str) -> Option<usize> {
        self.paragraphs.iter().position(|p| p.id == id)
    }

    /// The paragraph currently holding `sentence_id`, if any.
    pub fn paragraph_of(&self, sentence_id: &str) -> Option<&Paragraph> {
        self.paragraphs.iter().find(|p| p.contains(sentence_id))
    }

    /// Container an entity currently lives in.
    ///
    /// Paragraph membership wins over bank membership: a bank id spliced into
    /// a paragraph by a hover preview reports that paragraph.
    pub fn container_of(&self, id: &str) -> Option<ContainerId> {
        if let Some(p) = self.paragraph_of(id) {
            return Some(ContainerId::Paragraph(p.id.clone()));
        }
        self.bank_index(id).map(|_| ContainerId::Bank)
    }

    /// Sentences of a paragraph, skipping ids that no longer resolve.
    pub fn resolve_paragraph(&self, paragraph: &Paragraph) -> Vec<&Sentence> {
        paragraph
            .sentence_ids
            .iter()
            .filter_map(|id| {
                let sentence = self.sentences.get(id);
                if sentence.is_none() {
                    debug!(sentence_id = %id, paragraph = %paragraph.id, "Skipping unresolved sentence");
                }
                sentence
            })
            .collect()
    }

    /// Ids that appear more than once across all paragraphs.
    pub fn duplicate_sentence_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut dupes = Vec::new();
        for id in self.paragraphs.iter().flat_map(|p| p.sentence_ids.iter()) {
            if !seen.insert(id.as_str()) {
                dupes.push(id.clone());
            }
        }
        dupes
    }

    // ==================== Sentence Mutations ====================

    /// Insert (or replace) a sentence. Used when minting.
    pub fn insert_sentence(&mut self, sentence: Sentence) {
        self.sentences.insert(sentence.id.clone(), sentence);
    }

    /// Merge `patch` into an existing sentence. Returns false (no-op) if the id is unknown.
    pub fn upsert_sentence(&mut self, id: &str, patch: SentencePatch) -> bool {
        match self.sentences.get_mut(id) {
            Some(sentence) => {
                patch.apply(sentence);
                true
            }
            None => {
                debug!(sentence_id = id, "Ignoring patch for unknown sentence");
                false
            }
        }
    }

    // ==================== Paragraph Mutations ====================

    /// Replace one paragraph's sequence wholesale.
    ///
    /// Fails without touching the store if the new sequence repeats an id or
    /// contains an id that lives in another paragraph.
    pub fn set_paragraph_order(&mut self, paragraph_id: &str, sentence_ids: Vec<String>) -> StoreResult<()> {
        let index = self
            .paragraph_index(paragraph_id)
            .ok_or_else(|| StoreError::UnknownParagraph(paragraph_id.to_string()))?;

        let mut seen = HashSet::new();
        for id in &sentence_ids {
            if !seen.insert(id.as_str()) {
                return Err(StoreError::DuplicateSentence(id.clone()));
            }
            let elsewhere = self
                .paragraphs
                .iter()
                .enumerate()
                .any(|(i, p)| i != index && p.contains(id));
            if elsewhere {
                return Err(StoreError::DuplicateSentence(id.clone()));
            }
        }

        self.paragraphs[index].sentence_ids = sentence_ids;
        Ok(())
    }

    /// Reorder the paragraph sequence itself. `order` must be a permutation of the current ids.
    pub fn set_paragraph_sequence(&mut self, order: &[String]) -> StoreResult<()> {
        let is_permutation = order.len() == self.paragraphs.len()
            && order.iter().collect::<HashSet<_>>().len() == order.len()
            && order.iter().all(|id| self.paragraph_index(id).is_some());
        if !is_permutation {
            return Err(StoreError::NotAPermutation);
        }

        let mut by_id: HashMap<String, Paragraph> = self
            .paragraphs
            .drain(..)
            .map(|p| (p.id.clone(), p))
            .collect();
        self.paragraphs = order.iter().filter_map(|id| by_id.remove(id)).collect();
        Ok(())
    }

    /// Append a paragraph to the sequence.
    pub fn push_paragraph(&mut self, paragraph: Paragraph) -> StoreResult<()> {
        if self.paragraph_index(&paragraph.id).is_some() {
            return Err(StoreError::DuplicateParagraph(paragraph.id));
        }
        let mut seen = HashSet::new();
        for id in &paragraph.sentence_ids {
            if !seen.insert(id.as_str()) || self.paragraph_of(id).is_some() {
                return Err(StoreError::DuplicateSentence(id.clone()));
            }
        }
        self.paragraphs.push(paragraph);
        Ok(())
    }

    /// Remove `sentence_id` from every paragraph. Returns how many occurrences were removed.
    pub fn remove_from_paragraphs(&mut self, sentence_id: &str) -> usize {
        let mut removed = 0;
        for p in &mut self.paragraphs {
            let before = p.sentence_ids.len();
            p.sentence_ids.retain(|id| id != sentence_id);
            removed += before - p.sentence_ids.len();
        }
        removed
    }

    /// Replace every occurrence of `old_id` in paragraph sequences with `new_id`.
    ///
    /// Only the first occurrence survives, so the replacement can never
    /// introduce a duplicate. Returns whether anything was replaced.
    pub fn replace_in_paragraphs(&mut self, old_id: &str, new_id: &str) -> bool {
        let mut placed = self.paragraph_of(new_id).is_some();
        let mut replaced = false;
        for p in &mut self.paragraphs {
            p.sentence_ids.retain_mut(|id| {
                if id != old_id {
                    return true;
                }
                replaced = true;
                if placed {
                    false
                } else {
                    *id = new_id.to_string();
                    placed = true;
                    true
                }
            });
        }
        replaced
    }

    // ==================== Bank Mutations ====================

    /// Replace the bank sequence. Ids must stay unique.
    pub fn set_bank_order(&mut self, bank: Vec<BankSentence>) -> StoreResult<()> {
        let mut seen = HashSet::new();
        for item in &bank {
            if !seen.insert(item.id().to_string()) {
                return Err(StoreError::DuplicateSentence(item.id().to_string()));
            }
        }
        self.bank = bank;
        Ok(())
    }

    pub fn append_bank(&mut self, item: BankSentence) -> StoreResult<()> {
        if self.bank_index(item.id()).is_some() {
            return Err(StoreError::DuplicateSentence(item.id().to_string()));
        }
        self.bank.push(item);
        Ok(())
    }

    pub fn remove_bank(&mut self, id: &str) -> Option<BankSentence> {
        let index = self.bank_index(id)?;
        Some(self.bank.remove(index))
    }

    pub fn set_bank_section(&mut self, id: &str, section: BankSection) -> StoreResult<()> {
        let item = self
            .bank
            .iter_mut()
            .find(|b| b.id() == id)
            .ok_or_else(|| StoreError::UnknownBankItem(id.to_string()))?;
        item.section = section;
        Ok(())
    }

    pub fn set_bank_text(&mut self, id: &str, text: impl Into<String>) -> StoreResult<()> {
        let item = self
            .bank
            .iter_mut()
            .find(|b| b.id() == id)
            .ok_or_else(|| StoreError::UnknownBankItem(id.to_string()))?;
        item.sentence.current_text = text.into();
        Ok(())
    }

    // ==================== Id Minting ====================

    /// Mint a fresh `<prefix><timestamp>` id unused by any sentence or bank item.
    ///
    /// Timestamps are milliseconds since the epoch, bumped past the last minted
    /// value so ids stay unique within the same millisecond.
    pub fn mint_id(&mut self, prefix: &str) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut stamp = now.max(self.last_minted + 1);
        loop {
            let id = format!("{}{}", prefix, stamp);
            if !self.sentences.contains_key(&id) && self.bank_index(&id).is_none() {
                self.last_minted = stamp;
                return id;
            }
            warn!(id = %id, "Minted id already taken, bumping");
            stamp += 1;
        }
    }
}
