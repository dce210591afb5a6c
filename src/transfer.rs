//! Transfer engine - commits moves between the bank and paragraph containers.
//!
//! The drag transition table, evaluated in precedence order:
//!
//! ```text
//! over  | same paragraph              -> array-move within the paragraph
//! end   | bank -> bank                -> array-move within the bank (sections ignored)
//! over  | bank -> paragraph, unplaced -> preview splice of the raw bank id
//! over  | paragraph -> paragraph      -> remove everywhere, insert at over's index
//! end   | bank -> paragraph           -> mint `custom-<ts>`, replace the raw id
//! end   | paragraph -> bank           -> clone into bank as `bank-<ts>`, unplace
//! *     | anything else               -> no change
//! ```
//!
//! Identity rules: a bank item entering the workspace always becomes a new
//! sentence, and a sentence leaving the workspace always becomes a new bank
//! item. The originals are never moved across the boundary.
//!
//! Every function here is a complete read-modify-write of the store. A store
//! error drops the mutation and is logged; nothing is retried.

use crate::constants::{BANK_ID_PREFIX, CUSTOM_ID_PREFIX};
use crate::drag::ContainerId;
use crate::error::{StoreError, StoreResult};
use crate::store::EntityStore;
use crate::types::{BankSection, BankSentence, RhetoricalFunction, Sentence};
use tracing::{debug, warn};

/// What a transfer call changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed
    None,
    ReorderedParagraph { paragraph_id: String },
    ReorderedBank,
    /// Raw bank id spliced into a paragraph as a hover preview
    PreviewInserted { paragraph_id: String, index: usize },
    MovedBetweenParagraphs { paragraph_id: String, index: usize },
    /// A bank item became a new workspace sentence
    Minted { sentence_id: String, paragraph_id: String },
    /// A workspace sentence became a new bank item
    ReturnedToBank { bank_id: String },
    /// A sentence was removed explicitly, optionally leaving a bank clone
    Removed { bank_id: Option<String> },
    ReorderedParagraphs,
}

impl Transition {
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Direction of a keyboard move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Nudge {
    Up,
    Down,
}

/// Move the element at `from` so that it ends up at `to`.
///
/// Out-of-range indices leave the slice untouched. Moving an element to its
/// own index is a no-op.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

fn settle(result: StoreResult<Transition>, operation: &str) -> Transition {
    match result {
        Ok(transition) => {
            if transition.is_change() {
                debug!(operation, ?transition, "Transfer committed");
            }
            transition
        }
        Err(e) => {
            warn!(operation, error = %e, "Transfer dropped");
            Transition::None
        }
    }
}

// ============================================================================
// Drag Transitions
// ============================================================================

/// Hover tick. May fire many times per drag; each call is atomic.
pub fn drag_over(
    store: &mut EntityStore,
    active_id: &str,
    over_id: &str,
    active_container: &ContainerId,
    over_container: &ContainerId,
) -> Transition {
    if active_id == over_id {
        return Transition::None;
    }
    settle(
        try_drag_over(store, active_id, over_id, active_container, over_container),
        "drag_over",
    )
}

fn try_drag_over(
    store: &mut EntityStore,
    active_id: &str,
    over_id: &str,
    active_container: &ContainerId,
    over_container: &ContainerId,
) -> StoreResult<Transition> {
    if active_container == over_container {
        return match active_container {
            ContainerId::Paragraph(paragraph_id) => reorder_within_paragraph(store, paragraph_id, active_id, over_id),
            // Bank reorders are committed on drop
            ContainerId::Bank => Ok(Transition::None),
        };
    }

    let ContainerId::Paragraph(dest_id) = over_container else {
        return Ok(Transition::None);
    };
    let dest = store
        .paragraph(dest_id)
        .ok_or_else(|| StoreError::UnknownParagraph(dest_id.clone()))?;

    let placed = store.paragraph_of(active_id).is_some();
    if !placed && !active_container.is_bank() {
        return Ok(Transition::None);
    }

    let mut ids: Vec<String> = dest.sentence_ids.iter().filter(|id| *id != active_id).cloned().collect();
    let index = ids.iter().position(|id| id == over_id).unwrap_or(ids.len());
    ids.insert(index, active_id.to_string());

    if placed {
        store.remove_from_paragraphs(active_id);
    }
    store.set_paragraph_order(dest_id, ids)?;

    Ok(if placed {
        Transition::MovedBetweenParagraphs {
            paragraph_id: dest_id.clone(),
            index,
        }
    } else {
        Transition::PreviewInserted {
            paragraph_id: dest_id.clone(),
            index,
        }
    })
}

fn reorder_within_paragraph(
    store: &mut EntityStore,
    paragraph_id: &str,
    active_id: &str,
    over_id: &str,
) -> StoreResult<Transition> {
    let paragraph = store
        .paragraph(paragraph_id)
        .ok_or_else(|| StoreError::UnknownParagraph(paragraph_id.to_string()))?;
    let (Some(from), Some(to)) = (paragraph.position(active_id), paragraph.position(over_id)) else {
        return Ok(Transition::None);
    };
    if from == to {
        return Ok(Transition::None);
    }
    let mut ids = paragraph.sentence_ids.clone();
    array_move(&mut ids, from, to);
    store.set_paragraph_order(paragraph_id, ids)?;
    Ok(Transition::ReorderedParagraph {
        paragraph_id: paragraph_id.to_string(),
    })
}

/// Terminal drop. `source` is the container resolved at drag start; `over` is
/// the final target and its container, or `None` when nothing was hovered.
pub fn drag_end(
    store: &mut EntityStore,
    active_id: &str,
    source: &ContainerId,
    over: Option<(&str, &ContainerId)>,
) -> Transition {
    let Some((over_id, over_container)) = over else {
        return Transition::None;
    };
    settle(try_drag_end(store, active_id, source, over_id, over_container), "drag_end")
}

fn try_drag_end(
    store: &mut EntityStore,
    active_id: &str,
    source: &ContainerId,
    over_id: &str,
    over_container: &ContainerId,
) -> StoreResult<Transition> {
    match (source, over_container) {
        (ContainerId::Bank, ContainerId::Paragraph(dest_id)) => mint_from_bank(store, active_id, over_id, dest_id),
        (ContainerId::Paragraph(_), ContainerId::Bank) => return_to_bank(store, active_id),
        (ContainerId::Bank, ContainerId::Bank) => {
            // A hover preview may have left the raw bank id in a paragraph
            if store.remove_from_paragraphs(active_id) > 0 {
                debug!(bank_id = active_id, "Cleared preview splice on bank drop");
            }
            if active_id == over_id {
                return Ok(Transition::None);
            }
            let (Some(from), Some(to)) = (store.bank_index(active_id), store.bank_index(over_id)) else {
                return Ok(Transition::None);
            };
            let mut bank = store.bank().to_vec();
            array_move(&mut bank, from, to);
            store.set_bank_order(bank)?;
            Ok(Transition::ReorderedBank)
        }
        // Paragraph-to-paragraph placement already happened during hover
        (ContainerId::Paragraph(_), ContainerId::Paragraph(_)) => Ok(Transition::None),
    }
}

fn mint_from_bank(
    store: &mut EntityStore,
    bank_id: &str,
    over_id: &str,
    dest_id: &str,
) -> StoreResult<Transition> {
    let Some(item) = store.bank_item(bank_id).cloned() else {
        return Ok(Transition::None);
    };
    if store.paragraph(dest_id).is_none() {
        return Err(StoreError::UnknownParagraph(dest_id.to_string()));
    }

    let sentence_id = store.mint_id(CUSTOM_ID_PREFIX);
    let sentence = Sentence {
        id: sentence_id.clone(),
        ..item.sentence
    };
    store.insert_sentence(sentence);

    let mut paragraph_id = dest_id.to_string();
    if store.replace_in_paragraphs(bank_id, &sentence_id) {
        if let Some(p) = store.paragraph_of(&sentence_id) {
            paragraph_id = p.id.clone();
        }
    } else {
        // No preview splice happened; place it at the drop position
        let mut ids = store
            .paragraph(dest_id)
            .map(|p| p.sentence_ids.clone())
            .unwrap_or_default();
        let index = ids.iter().position(|id| id == over_id).unwrap_or(ids.len());
        ids.insert(index, sentence_id.clone());
        store.set_paragraph_order(dest_id, ids)?;
    }

    Ok(Transition::Minted {
        sentence_id,
        paragraph_id,
    })
}

fn clone_into_bank(store: &mut EntityStore, sentence: &Sentence) -> StoreResult<String> {
    let bank_id = store.mint_id(BANK_ID_PREFIX);
    let clone = Sentence {
        id: bank_id.clone(),
        ..sentence.clone()
    };
    store.append_bank(BankSentence::new(clone, BankSection::MentorSentences))?;
    Ok(bank_id)
}

fn return_to_bank(store: &mut EntityStore, sentence_id: &str) -> StoreResult<Transition> {
    let Some(sentence) = store.sentence(sentence_id).cloned() else {
        return Ok(Transition::None);
    };
    let bank_id = clone_into_bank(store, &sentence)?;
    store.remove_from_paragraphs(sentence_id);
    Ok(Transition::ReturnedToBank { bank_id })
}

/// Discourse mode drop: move paragraph `active_id` to the slot of paragraph `over_id`.
pub fn reorder_paragraphs(store: &mut EntityStore, active_id: &str, over_id: &str) -> Transition {
    let result = (|| -> StoreResult<Transition> {
        let (Some(from), Some(to)) = (store.paragraph_index(active_id), store.paragraph_index(over_id)) else {
            return Ok(Transition::None);
        };
        if from == to {
            return Ok(Transition::None);
        }
        let mut order: Vec<String> = store.paragraphs().iter().map(|p| p.id.clone()).collect();
        array_move(&mut order, from, to);
        store.set_paragraph_sequence(&order)?;
        Ok(Transition::ReorderedParagraphs)
    })();
    settle(result, "reorder_paragraphs")
}

// ============================================================================
// Explicit Operations
// ============================================================================

/// Remove a sentence from the composition.
///
/// With `add_to_bank`, a `MENTOR_SENTENCES` clone is appended unless some
/// bank entry already has exactly the same text.
pub fn remove_sentence(store: &mut EntityStore, sentence_id: &str, add_to_bank: bool) -> Transition {
    let result = (|| -> StoreResult<Transition> {
        let Some(sentence) = store.sentence(sentence_id).cloned() else {
            return Ok(Transition::None);
        };
        let bank_id = if add_to_bank && store.find_bank_by_text(&sentence.current_text).is_none() {
            Some(clone_into_bank(store, &sentence)?)
        } else {
            None
        };
        store.remove_from_paragraphs(sentence_id);
        Ok(Transition::Removed { bank_id })
    })();
    settle(result, "remove_sentence")
}

/// Keyboard move: shift an item one slot within its own container.
pub fn nudge(store: &mut EntityStore, id: &str, direction: Nudge) -> Transition {
    let step = |index: usize, len: usize| match direction {
        Nudge::Up => index.checked_sub(1),
        Nudge::Down => (index + 1 < len).then_some(index + 1),
    };

    let result = (|| -> StoreResult<Transition> {
        if let Some(from) = store.paragraph_index(id) {
            let Some(to) = step(from, store.paragraphs().len()) else {
                return Ok(Transition::None);
            };
            let mut order: Vec<String> = store.paragraphs().iter().map(|p| p.id.clone()).collect();
            array_move(&mut order, from, to);
            store.set_paragraph_sequence(&order)?;
            return Ok(Transition::ReorderedParagraphs);
        }

        match store.container_of(id) {
            Some(ContainerId::Paragraph(paragraph_id)) => {
                let mut ids = store
                    .paragraph(&paragraph_id)
                    .map(|p| p.sentence_ids.clone())
                    .unwrap_or_default();
                let Some(from) = ids.iter().position(|s| s == id) else {
                    return Ok(Transition::None);
                };
                let Some(to) = step(from, ids.len()) else {
                    return Ok(Transition::None);
                };
                array_move(&mut ids, from, to);
                store.set_paragraph_order(&paragraph_id, ids)?;
                Ok(Transition::ReorderedParagraph { paragraph_id })
            }
            Some(ContainerId::Bank) => {
                let mut bank = store.bank().to_vec();
                let Some(from) = store.bank_index(id) else {
                    return Ok(Transition::None);
                };
                let Some(to) = step(from, bank.len()) else {
                    return Ok(Transition::None);
                };
                array_move(&mut bank, from, to);
                store.set_bank_order(bank)?;
                Ok(Transition::ReorderedBank)
            }
            None => Ok(Transition::None),
        }
    })();
    settle(result, "nudge")
}

// ============================================================================
// Bank Lifecycle
// ============================================================================

/// Soft-delete: move a bank item to the trash.
pub fn move_to_trash(store: &mut EntityStore, bank_id: &str) -> StoreResult<()> {
    store.set_bank_section(bank_id, BankSection::Trash)?;
    debug!(bank_id, "Moved to trash");
    Ok(())
}

/// Hard-delete a trashed bank item. Irreversible.
pub fn delete_permanently(store: &mut EntityStore, bank_id: &str) -> StoreResult<BankSentence> {
    let item = store
        .bank_item(bank_id)
        .ok_or_else(|| StoreError::UnknownBankItem(bank_id.to_string()))?;
    if !item.is_trashed() {
        return Err(StoreError::NotInTrash(bank_id.to_string()));
    }
    let removed = store
        .remove_bank(bank_id)
        .ok_or_else(|| StoreError::UnknownBankItem(bank_id.to_string()))?;
    debug!(bank_id, "Deleted permanently");
    Ok(removed)
}

/// The bank card's delete button: trash first, delete from the trash.
pub fn discard_bank_item(store: &mut EntityStore, bank_id: &str) -> StoreResult<()> {
    let trashed = store
        .bank_item(bank_id)
        .map(BankSentence::is_trashed)
        .ok_or_else(|| StoreError::UnknownBankItem(bank_id.to_string()))?;
    if trashed {
        delete_permanently(store, bank_id).map(|_| ())
    } else {
        move_to_trash(store, bank_id)
    }
}

/// Section a recovered item goes back to, judged from its id.
///
/// `bank-` ids were created in this session (templates or workspace clones)
/// and go to My Sentences; anything else came with the lesson.
pub fn recovery_section(bank_id: &str) -> BankSection {
    if bank_id.starts_with(BANK_ID_PREFIX) {
        BankSection::MySentences
    } else {
        BankSection::MentorSentences
    }
}

/// Restore a trashed item.
pub fn recover_from_trash(store: &mut EntityStore, bank_id: &str) -> StoreResult<BankSection> {
    let section = recovery_section(bank_id);
    store.set_bank_section(bank_id, section)?;
    debug!(bank_id, ?section, "Recovered from trash");
    Ok(section)
}

/// Add a `MY_SENTENCES` bank item holding the template text for `function`.
pub fn create_templated_sentence(store: &mut EntityStore, function: RhetoricalFunction) -> StoreResult<String> {
    let bank_id = store.mint_id(BANK_ID_PREFIX);
    let sentence = Sentence::new(bank_id.clone(), function.template(), function);
    store.append_bank(BankSentence::new(sentence, BankSection::MySentences))?;
    Ok(bank_id)
}
