//! Integration tests for export, read-aloud and text editing through the workspace.

use crate::helpers::{FailingClipboard, RecordingClipboard, drag, fixture_lesson, workspace, workspace_with};
use mentorboard::Workspace;
use mentorboard::lesson::BundledLessons;
use mentorboard::editing::EditTarget;
use mentorboard::notifications::ToastVariant;
use mentorboard::settings::Settings;
use mentorboard::speech::{OnEnd, SilentEngine, SpeechEngine};
use mentorboard::types::RhetoricalFunction;
use tempfile::TempDir;

// ============================================================================
// Export
// ============================================================================

#[test]
fn test_copy_to_clipboard_acknowledges() {
    let mut ws = workspace();
    let mut clipboard = RecordingClipboard::default();
    ws.copy_to_clipboard(&mut clipboard).unwrap();

    assert_eq!(clipboard.contents.as_deref(), Some(ws.export_text().as_str()));
    let toast = ws.toasts().latest().unwrap();
    assert_eq!(toast.message, "Text copied to clipboard!");
    assert_eq!(toast.variant, ToastVariant::Success);
}

#[test]
fn test_clipboard_failure_raises_error_toast() {
    let mut ws = workspace();
    assert!(ws.copy_to_clipboard(&mut FailingClipboard).is_err());

    let toast = ws.toasts().latest().unwrap();
    assert_eq!(toast.variant, ToastVariant::Error);
    assert_eq!(toast.message, "Could not copy text: Clipboard unavailable: permission denied");
}

#[test]
fn test_export_reflects_edits() {
    let mut ws = workspace();
    drag(&mut ws, "s3", &["bank1"]);
    ws.edit_sentence_text("s1", "Weathering slowly breaks rocks.");

    let text = ws.export_text();
    assert!(text.starts_with("How Weathering and Erosion Shape the Earth\n\n"));
    assert!(text.contains("Weathering slowly breaks rocks. Erosion moves the pieces.\n\n"));
    assert!(!text.contains("Together they shape land."));
}

#[test]
fn test_download_writes_configured_file() {
    let dir = TempDir::new().unwrap();
    let mut ws = workspace_with(Settings {
        export_file_name: "my-draft.txt".into(),
        ..Settings::default()
    });

    let path = ws.download(dir.path()).unwrap();
    assert_eq!(path, dir.path().join("my-draft.txt"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), ws.export_text());
    assert_eq!(ws.toasts().latest().unwrap().message, "Saved my-draft.txt");
}

#[test]
fn test_download_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let mut ws = workspace();

    assert!(ws.download(&dir.path().join("missing")).is_err());
    let toast = ws.toasts().latest().unwrap();
    assert_eq!(toast.variant, ToastVariant::Error);
    assert!(toast.message.starts_with("Could not save draft:"));
}

// ============================================================================
// Read Aloud
// ============================================================================

/// Engine whose utterances finish only when the test says so.
#[derive(Default)]
struct ManualEngine {
    spoken: Vec<String>,
    pending: Vec<OnEnd>,
    cancels: usize,
}

impl ManualEngine {
    fn finish_all(&mut self) {
        for on_end in self.pending.drain(..) {
            on_end();
        }
    }
}

impl SpeechEngine for ManualEngine {
    fn speak(&mut self, text: &str, on_end: OnEnd) {
        self.spoken.push(text.to_string());
        self.pending.push(on_end);
    }

    fn cancel(&mut self) {
        self.cancels += 1;
    }
}

fn narrated() -> Workspace<ManualEngine> {
    Workspace::new(fixture_lesson(), Settings::default(), ManualEngine::default())
}

#[test]
fn test_read_selected_highlights_until_done() {
    let mut ws = narrated();
    ws.select(Some("s2"));
    assert!(ws.read_selected());
    assert_eq!(ws.reading_id().as_deref(), Some("s2"));
    assert_eq!(ws.narrator_mut().engine().spoken, vec!["Erosion moves the pieces."]);

    ws.narrator_mut().engine_mut().finish_all();
    assert_eq!(ws.reading_id(), None);
}

#[test]
fn test_late_completion_does_not_clear_newer_reading() {
    let mut ws = narrated();
    ws.select(Some("s1"));
    ws.read_selected();
    let stale: Vec<OnEnd> = ws.narrator_mut().engine_mut().pending.drain(..).collect();

    ws.select(Some("s4"));
    ws.read_selected();
    for on_end in stale {
        on_end();
    }
    assert_eq!(ws.reading_id().as_deref(), Some("s4"));
}

#[test]
fn test_bank_items_are_not_read() {
    let mut ws = narrated();
    ws.select(Some("bank1"));
    assert!(!ws.read_selected());
    assert!(ws.narrator_mut().engine().spoken.is_empty());
}

#[test]
fn test_read_full_text_and_stop() {
    let mut ws = narrated();
    ws.read_full_text();
    assert_eq!(ws.reading_id(), None);
    let spoken = ws.narrator_mut().engine().spoken.clone();
    assert_eq!(spoken.len(), 1);
    assert!(spoken[0].starts_with("Weathering breaks rocks."));

    ws.select(Some("s1"));
    ws.read_selected();
    let cancels = ws.narrator_mut().engine().cancels;
    ws.stop_reading();
    assert_eq!(ws.reading_id(), None);
    assert_eq!(ws.narrator_mut().engine().cancels, cancels + 1);
}

// ============================================================================
// Editing
// ============================================================================

#[test]
fn test_templated_sentence_opens_edit() {
    let mut ws = workspace();
    let id = ws.create_templated_sentence(RhetoricalFunction::Conclusion).unwrap();

    let session = ws.edit_session().unwrap();
    assert_eq!(session.target, EditTarget::BankItem(id.clone()));
    assert_eq!(session.pre_edit_text, "In conclusion, ____.");

    ws.update_edit("In conclusion, rocks are always changing.").unwrap();
    assert_eq!(ws.store().bank_item(&id).unwrap().text(), "In conclusion, rocks are always changing.");

    assert!(ws.cancel_edit());
    assert_eq!(ws.store().bank_item(&id).unwrap().text(), "In conclusion, ____.");
    assert!(!ws.cancel_edit());
}

#[test]
fn test_commit_edit_keeps_text() {
    let mut ws = workspace();
    assert!(ws.begin_edit(EditTarget::BankItem("bank2".into())));
    ws.commit_edit("Ice splits boulders.").unwrap();

    assert!(ws.edit_session().is_none());
    assert_eq!(ws.store().bank_item("bank2").unwrap().text(), "Ice splits boulders.");
    assert!(!ws.begin_edit(EditTarget::BankItem("ghost".into())));
}

#[test]
fn test_cancelled_edit_restores_phrase_chunks() {
    let mut ws = Workspace::load(&BundledLessons, "weathering", Settings::default(), SilentEngine).unwrap();
    let before = ws.store().sentence("s10").unwrap().clone();
    assert_eq!(before.chunks.len(), 5);

    assert!(ws.begin_edit(EditTarget::Sentence("s10".into())));
    ws.update_edit("Partial").unwrap();
    assert!(ws.cancel_edit());
    assert_eq!(ws.store().sentence("s10").unwrap(), &before);
}
