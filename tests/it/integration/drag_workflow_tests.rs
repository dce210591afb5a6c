//! Integration tests for complete drag workflows.
//!
//! Every test drives the workspace the way the presentation layer does:
//! pointer events plus hover ticks against a drop target layout.

use crate::helpers::{
    assert_invariants, bank_ids, drag, fixture_store, layout, paragraph_ids, pick_up, pointer_rect, workspace,
    workspace_with,
};
use mentorboard::drag::{CollisionResolver, ContainerId, ItemHint, Rect};
use mentorboard::mode::EditMode;
use mentorboard::settings::Settings;
use mentorboard::transfer::Transition;
use mentorboard::types::BankSection;
use mentorboard::workspace::{DragOverlay, Key};

// ============================================================================
// Bank -> Paragraph
// ============================================================================

#[test]
fn test_bank_item_dropped_into_paragraph_becomes_new_sentence() {
    let mut ws = workspace();
    let t = drag(&mut ws, "bank1", &["s5"]);

    let Transition::Minted { sentence_id, paragraph_id } = t else {
        panic!("expected a mint, got {t:?}");
    };
    assert!(sentence_id.starts_with("custom-"));
    assert_eq!(paragraph_id, "p2");
    assert_eq!(
        paragraph_ids(ws.store(), "p2"),
        vec!["s4".to_string(), sentence_id.clone(), "s5".into(), "s6".into()]
    );
    assert_eq!(
        ws.store().sentence(&sentence_id).map(|s| s.current_text.as_str()),
        Some("Water flows over rocks and carries them away.")
    );
    // The bank keeps its item for reuse
    assert_eq!(bank_ids(ws.store()), vec!["bank1", "bank2", "bank3", "bank4"]);
    assert!(ws.session().is_idle());
    assert_invariants(ws.store());
}

#[test]
fn test_hover_preview_shows_bank_card_in_paragraph() {
    let mut ws = workspace();
    let targets = layout();
    pick_up(&mut ws, "bank2");

    let t = ws.hover(&pointer_rect("s2"), &targets);
    assert_eq!(t, Transition::PreviewInserted { paragraph_id: "p1".into(), index: 1 });

    let items = ws.paragraph_items("p1");
    assert_eq!(items[1].id, "bank2");
    assert_eq!(items[1].text, "Ice can split huge boulders apart over time.");
    assert_eq!(items[1].hint, ItemHint::Hole { opacity: 0.3 });
    assert_eq!(items[0].hint, ItemHint::Normal);

    assert_eq!(ws.session().insertion_marker(), Some((&ContainerId::paragraph("p1"), 1)));
    assert_eq!(
        ws.drag_overlay(),
        Some(DragOverlay::BankCard {
            text: "Ice can split huge boulders apart over time.".into(),
            category_key: "function-cause_effect",
        })
    );
    assert_eq!(ws.hover_stats().count(), 1);
}

#[test]
fn test_preview_follows_pointer_across_paragraphs() {
    let mut ws = workspace();
    let t = drag(&mut ws, "bank1", &["s2", "s5"]);

    let Transition::Minted { paragraph_id, .. } = t else {
        panic!("expected a mint, got {t:?}");
    };
    assert_eq!(paragraph_id, "p2");
    assert_eq!(paragraph_ids(ws.store(), "p1"), vec!["s1", "s2", "s3"]);
    assert_eq!(paragraph_ids(ws.store(), "p2").len(), 4);
    assert_invariants(ws.store());
}

#[test]
fn test_same_bank_item_can_be_used_twice() {
    let mut ws = workspace();
    drag(&mut ws, "bank1", &["p-p1"]);
    drag(&mut ws, "bank1", &["p-p1"]);

    let p1 = paragraph_ids(ws.store(), "p1");
    assert_eq!(p1.len(), 5);
    assert_ne!(p1[3], p1[4]);
    assert!(p1[3].starts_with("custom-") && p1[4].starts_with("custom-"));
    assert_invariants(ws.store());
}

// ============================================================================
// Paragraph -> Bank
// ============================================================================

#[test]
fn test_sentence_round_trip_through_bank() {
    let mut ws = workspace();

    let t = drag(&mut ws, "s5", &["bank2"]);
    let Transition::ReturnedToBank { bank_id } = t else {
        panic!("expected a return to the bank, got {t:?}");
    };
    assert_eq!(paragraph_ids(ws.store(), "p2"), vec!["s4", "s6"]);
    let clone = ws.store().bank_item(&bank_id).unwrap();
    assert_eq!(clone.section, BankSection::MentorSentences);
    assert_eq!(clone.text(), "The water freezes and expands.");

    let t = drag(&mut ws, &bank_id, &["p-p1"]);
    let Transition::Minted { sentence_id, paragraph_id } = t else {
        panic!("expected a mint, got {t:?}");
    };
    assert_eq!(paragraph_id, "p1");
    assert_eq!(paragraph_ids(ws.store(), "p1").last(), Some(&sentence_id));
    assert_ne!(sentence_id, "s5");
    assert_eq!(
        ws.store().sentence(&sentence_id).map(|s| s.current_text.as_str()),
        Some("The water freezes and expands.")
    );
    // The clone stays in the bank as well
    assert!(ws.store().bank_item(&bank_id).is_some());
    assert_invariants(ws.store());
}

#[test]
fn test_bank_item_round_trip_leaves_original_in_place() {
    let mut ws = workspace();
    let original = ws.store().bank_item("bank1").unwrap().clone();

    let Transition::Minted { sentence_id, .. } = drag(&mut ws, "bank1", &["s5"]) else {
        panic!("expected a mint");
    };
    let t = drag(&mut ws, &sentence_id, &["bank2"]);
    let Transition::ReturnedToBank { bank_id } = t else {
        panic!("expected a return to the bank, got {t:?}");
    };

    assert_eq!(ws.store().bank_item("bank1"), Some(&original));
    assert_eq!(paragraph_ids(ws.store(), "p2"), vec!["s4", "s5", "s6"]);
    let clone = ws.store().bank().last().unwrap();
    assert_eq!(clone.id(), bank_id);
    assert_eq!(clone.section, BankSection::MentorSentences);
    assert_eq!(clone.text(), original.text());
    assert_invariants(ws.store());
}

// ============================================================================
// Paragraph -> Paragraph
// ============================================================================

#[test]
fn test_sentence_moves_between_paragraphs_live() {
    let mut ws = workspace();
    let targets = layout();
    pick_up(&mut ws, "s2");

    let t = ws.hover(&pointer_rect("s5"), &targets);
    assert_eq!(t, Transition::MovedBetweenParagraphs { paragraph_id: "p2".into(), index: 1 });
    assert_eq!(paragraph_ids(ws.store(), "p1"), vec!["s1", "s3"]);
    assert_eq!(paragraph_ids(ws.store(), "p2"), vec!["s4", "s2", "s5", "s6"]);

    // Now inside p2, further hovering reorders within it
    let t = ws.hover(&pointer_rect("s6"), &targets);
    assert_eq!(t, Transition::ReorderedParagraph { paragraph_id: "p2".into() });
    assert_eq!(paragraph_ids(ws.store(), "p2"), vec!["s4", "s5", "s6", "s2"]);

    assert_eq!(ws.pointer_up(), Transition::None);
    assert_eq!(paragraph_ids(ws.store(), "p2"), vec!["s4", "s5", "s6", "s2"]);
    assert_invariants(ws.store());
}

#[test]
fn test_sentence_into_empty_paragraph() {
    let mut ws = workspace();
    for id in ["s4", "s5", "s6"] {
        ws.remove_sentence(id, false);
    }
    drag(&mut ws, "s1", &["p-p2"]);

    assert_eq!(paragraph_ids(ws.store(), "p1"), vec!["s2", "s3"]);
    assert_eq!(paragraph_ids(ws.store(), "p2"), vec!["s1"]);
    assert_invariants(ws.store());
}

#[test]
fn test_reorder_within_paragraph() {
    let mut ws = workspace();
    drag(&mut ws, "s1", &["s3"]);
    assert_eq!(paragraph_ids(ws.store(), "p1"), vec!["s2", "s3", "s1"]);
}

// ============================================================================
// Bank -> Bank
// ============================================================================

#[test]
fn test_bank_reorders_on_drop_only() {
    let mut ws = workspace();
    let targets = layout();
    pick_up(&mut ws, "bank1");

    ws.hover(&pointer_rect("bank4"), &targets);
    assert_eq!(bank_ids(ws.store()), vec!["bank1", "bank2", "bank3", "bank4"]);

    assert_eq!(ws.pointer_up(), Transition::ReorderedBank);
    assert_eq!(bank_ids(ws.store()), vec!["bank2", "bank3", "bank4", "bank1"]);
}

#[test]
fn test_bank_drop_after_preview_leaves_no_residue() {
    let mut ws = workspace();
    let t = drag(&mut ws, "bank1", &["s2", "bank3"]);

    assert_eq!(t, Transition::ReorderedBank);
    assert_eq!(paragraph_ids(ws.store(), "p1"), vec!["s1", "s2", "s3"]);
    assert_eq!(bank_ids(ws.store()), vec!["bank2", "bank3", "bank1", "bank4"]);
    assert_invariants(ws.store());
}

// ============================================================================
// Cancel & Drop Outside
// ============================================================================

#[test]
fn test_cancel_keeps_hover_changes_by_default() {
    let mut ws = workspace();
    pick_up(&mut ws, "s2");
    ws.hover(&pointer_rect("s5"), &layout());

    ws.key(Key::Escape);
    assert!(ws.session().is_idle());
    assert_eq!(paragraph_ids(ws.store(), "p2"), vec!["s4", "s2", "s5", "s6"]);
    assert_invariants(ws.store());
}

#[test]
fn test_cancel_rolls_back_when_enabled() {
    let mut ws = workspace_with(Settings {
        rollback_on_cancel: true,
        ..Settings::default()
    });
    pick_up(&mut ws, "s2");
    ws.hover(&pointer_rect("s5"), &layout());
    ws.hover(&pointer_rect("s6"), &layout());

    assert!(ws.cancel_drag());
    assert_eq!(ws.store(), &fixture_store());
}

#[test]
fn test_mode_switch_rolls_back_when_enabled() {
    let mut ws = workspace_with(Settings {
        rollback_on_cancel: true,
        ..Settings::default()
    });
    pick_up(&mut ws, "s3");
    ws.hover(&pointer_rect("s1"), &layout());
    assert_eq!(paragraph_ids(ws.store(), "p1"), vec!["s3", "s1", "s2"]);

    ws.set_mode(EditMode::Discourse);
    assert!(ws.session().is_idle());
    assert_eq!(ws.store(), &fixture_store());
}

#[test]
fn test_finish_rolls_back_when_enabled() {
    let mut ws = workspace_with(Settings {
        rollback_on_cancel: true,
        ..Settings::default()
    });
    pick_up(&mut ws, "s2");
    ws.hover(&pointer_rect("s5"), &layout());

    ws.finish();
    assert_eq!(ws.store(), &fixture_store());
}

#[test]
fn test_cancelled_bank_preview_is_cleared() {
    let mut ws = workspace();
    pick_up(&mut ws, "bank1");
    ws.hover(&pointer_rect("s5"), &layout());
    assert!(paragraph_ids(ws.store(), "p2").contains(&"bank1".to_string()));

    ws.key(Key::Escape);
    assert_eq!(paragraph_ids(ws.store(), "p2"), vec!["s4", "s5", "s6"]);
    assert!(ws.store().bank_item("bank1").is_some());
}

#[test]
fn test_drop_outside_any_target_changes_nothing() {
    let mut ws = workspace();
    pick_up(&mut ws, "s1");
    let t = ws.hover(&Rect::new(5000.0, 5000.0, 10.0, 10.0), &CollisionResolver::new());
    assert_eq!(t, Transition::None);
    assert!(ws.session().over().is_none());

    assert_eq!(ws.pointer_up(), Transition::None);
    assert_eq!(ws.store(), &fixture_store());
}

#[test]
fn test_finish_mid_drag_leaves_store_as_is() {
    let mut ws = workspace();
    pick_up(&mut ws, "s2");
    ws.hover(&pointer_rect("s5"), &layout());
    let during = ws.store().clone();

    ws.finish();
    assert!(ws.session().is_idle());
    assert_eq!(ws.store(), &during);
}
