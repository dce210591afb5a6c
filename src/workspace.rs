//! Workspace - one loaded lesson and everything the student does with it.
//!
//! Owns the entity store, the drag session, the mode/view state, the
//! selection, any open text edit, the narrator and the toast queue. Input
//! events come in through the methods here and are dispatched to the transfer
//! engine; the presentation layer reads back through the view methods.
//!
//! All mutation is synchronous. Each call is a complete read-modify-write.

use crate::constants::CLIPBOARD_ACK;
use crate::drag::{CollisionResolver, ContainerId, DragKind, DragSession, DropCandidate, ItemHint, Point, Rect};
use crate::editing::{self, EditSession, EditTarget};
use crate::error::{ExportResult, LoadResult, StoreResult};
use crate::export::{self, Clipboard};
use crate::lesson::LessonSource;
use crate::mode::{EditMode, ModeController};
use crate::notifications::{Toast, ToastManager};
use crate::perf::{TickStats, measure};
use crate::profile_scope;
use crate::settings::Settings;
use crate::speech::{Narrator, SilentEngine, SpeechEngine};
use crate::store::EntityStore;
use crate::transfer::{self, Nudge, Transition};
use crate::types::{BankSection, BankSentence, Lesson, RhetoricalFunction};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Keys the workspace reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowUp,
    ArrowDown,
}

/// What the floating drag overlay shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragOverlay {
    BankCard { text: String, category_key: &'static str },
    SentenceCard { text: String, category_key: &'static str },
    /// Whole paragraph, sentences joined by spaces
    Paragraph { text: String },
}

/// One card in a paragraph on the edit surface.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemView {
    pub id: String,
    pub text: String,
    pub category_key: Option<&'static str>,
    /// Category was changed away from the authored one
    pub mismatch: bool,
    pub hint: ItemHint,
}

/// A visible bank section with its items in bank order.
#[derive(Clone, Debug)]
pub struct BankSectionView<'a> {
    pub section: BankSection,
    pub title: &'static str,
    pub items: Vec<&'a BankSentence>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegendEntry {
    pub function: RhetoricalFunction,
    pub label: String,
    pub category_key: &'static str,
}

/// A run of text in the finish view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub category_key: Option<&'static str>,
}

pub struct Workspace<E: SpeechEngine = SilentEngine> {
    lesson: Lesson,
    store: EntityStore,
    session: DragSession,
    modes: ModeController,
    settings: Settings,
    selected: Option<String>,
    editing: Option<EditSession>,
    narrator: Narrator<E>,
    toasts: ToastManager,
    hover_stats: TickStats,
}

impl Workspace<SilentEngine> {
    /// Workspace without speech output.
    pub fn silent(lesson: Lesson, settings: Settings) -> Self {
        Self::new(lesson, settings, SilentEngine)
    }
}

impl<E: SpeechEngine> Workspace<E> {
    pub fn new(lesson: Lesson, settings: Settings, engine: E) -> Self {
        info!(lesson_id = %lesson.id, title = %lesson.title, "Opening workspace");
        Self {
            store: EntityStore::from_lesson(&lesson),
            modes: ModeController::new(settings.default_mode, settings.show_colors),
            lesson,
            session: DragSession::default(),
            settings,
            selected: None,
            editing: None,
            narrator: Narrator::new(engine),
            toasts: ToastManager::new(),
            hover_stats: TickStats::default(),
        }
    }

    /// Load a lesson and open it. Nothing is constructed if loading fails.
    pub fn load(source: &dyn LessonSource, lesson_id: &str, settings: Settings, engine: E) -> LoadResult<Self> {
        let lesson = source.load(lesson_id).inspect_err(|e| {
            warn!(lesson_id, error = %e, "Lesson failed to load");
        })?;
        Ok(Self::new(lesson, settings, engine))
    }

    // ==================== Accessors ====================

    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn modes(&self) -> &ModeController {
        &self.modes
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn toasts(&self) -> &ToastManager {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastManager {
        &mut self.toasts
    }

    pub fn reading_id(&self) -> Option<String> {
        self.narrator.reading_id()
    }

    pub fn narrator_mut(&mut self) -> &mut Narrator<E> {
        &mut self.narrator
    }

    pub fn hover_stats(&self) -> &TickStats {
        &self.hover_stats
    }

    /// What kind of draggable `id` names, judged from where it lives now.
    pub fn classify(&self, id: &str) -> Option<DragKind> {
        if self.store.paragraph_index(id).is_some() {
            Some(DragKind::Paragraph)
        } else if self.store.bank_index(id).is_some() {
            Some(DragKind::BankItem)
        } else if self.store.sentence(id).is_some() && self.store.paragraph_of(id).is_some() {
            Some(DragKind::Sentence)
        } else {
            None
        }
    }

    // ==================== Mode & View ====================

    /// Switch editing granularity. An active drag is dropped without committing.
    pub fn set_mode(&mut self, mode: EditMode) -> bool {
        if self.modes.mode() == mode {
            return false;
        }
        self.abandon_drag();
        self.close_edit();
        self.modes.set_mode(mode)
    }

    /// Show the read-only composition. The store is left untouched.
    pub fn finish(&mut self) {
        self.abandon_drag();
        self.close_edit();
        self.modes.finish();
        debug!("Switched to finish view");
    }

    pub fn back_to_edit(&mut self) {
        self.modes.back_to_edit();
    }

    pub fn toggle_colors(&mut self) -> bool {
        self.modes.toggle_colors()
    }

    pub fn toggle_bank(&mut self) -> bool {
        self.modes.toggle_bank()
    }

    /// Reset to the lesson's starting state and return to the edit view.
    pub fn start_fresh(&mut self) {
        self.store = EntityStore::from_lesson(&self.lesson);
        self.session.reset();
        self.editing = None;
        self.selected = None;
        self.narrator.stop();
        self.modes.back_to_edit();
        info!(lesson_id = %self.lesson.id, "Workspace reset to lesson start");
    }

    // ==================== Selection ====================

    pub fn select(&mut self, id: Option<&str>) {
        self.selected = id.map(str::to_string);
    }

    // ==================== Pointer & Drag ====================

    /// Press on an item. Returns whether the item can be dragged in the current mode.
    pub fn pointer_down(&mut self, item_id: &str, position: Point) -> bool {
        let Some(kind) = self.classify(item_id).filter(|kind| self.modes.allows_drag(*kind)) else {
            return false;
        };
        self.session.press(item_id, kind, position);
        true
    }

    /// Pointer motion. Starts the drag once the press travelled far enough.
    pub fn pointer_move(&mut self, position: Point) -> bool {
        if !self.session.should_activate(position, self.settings.drag_activation_distance) {
            return false;
        }
        match self.session.pending().map(|(id, _)| id.to_string()) {
            Some(item_id) => self.drag_start(&item_id),
            None => false,
        }
    }

    /// Pointer release: a click when the drag never started, otherwise a drop.
    pub fn pointer_up(&mut self) -> Transition {
        if let Some((item_id, _)) = self.session.pending() {
            let item_id = item_id.to_string();
            self.session.reset();
            self.select(Some(&item_id));
            return Transition::None;
        }
        self.drag_end()
    }

    /// Enter the dragging state for `id`. The source container is resolved here, once.
    pub fn drag_start(&mut self, id: &str) -> bool {
        let Some(kind) = self.classify(id) else {
            debug!(id, "Drag start on unknown item ignored");
            self.session.reset();
            return false;
        };
        if !self.modes.allows_drag(kind) {
            self.session.reset();
            return false;
        }
        let source = match kind {
            DragKind::Paragraph => None,
            DragKind::BankItem | DragKind::Sentence => self.store.container_of(id),
        };
        let snapshot = self.settings.rollback_on_cancel.then(|| self.store.clone());
        debug!(id, ?kind, source = ?source.as_ref().map(ToString::to_string), "Drag started");
        self.session.start(id, kind, source, snapshot);
        true
    }

    /// Hover tick: resolve the target under the active item and apply live reordering.
    pub fn hover(&mut self, active_rect: &Rect, targets: &CollisionResolver) -> Transition {
        let (transition, elapsed_ms) = measure(|| self.hover_inner(active_rect, targets));
        self.hover_stats.record(elapsed_ms);
        transition
    }

    fn hover_inner(&mut self, active_rect: &Rect, targets: &CollisionResolver) -> Transition {
        profile_scope!("hover");
        let Some(active) = self.session.active() else {
            return Transition::None;
        };
        let active_id = active.active_id.clone();
        let kind = active.kind;

        let Some(over_id) = targets.resolve(&active_id, active_rect).map(str::to_string) else {
            self.session.set_over(None);
            return Transition::None;
        };

        if kind == DragKind::Paragraph {
            let candidate = self.paragraph_target(&over_id).and_then(|paragraph_id| {
                let index = self.store.paragraph_index(&paragraph_id)?;
                Some(DropCandidate {
                    over_id: paragraph_id.clone(),
                    container: ContainerId::Paragraph(paragraph_id),
                    index,
                })
            });
            self.session.set_over(candidate);
            return Transition::None;
        }

        let Some(over_container) = self.container_for_target(&over_id) else {
            self.session.set_over(None);
            return Transition::None;
        };
        let Some(active_container) = self.store.container_of(&active_id) else {
            return Transition::None;
        };

        let transition = {
            profile_scope!("drag_over");
            transfer::drag_over(&mut self.store, &active_id, &over_id, &active_container, &over_container)
        };

        let index = self.candidate_index(&active_id, &over_id, &over_container);
        self.session.set_over(Some(DropCandidate {
            over_id,
            container: over_container,
            index,
        }));
        transition
    }

    /// Container a hover target belongs to: items by store lookup, container droppables by id.
    fn container_for_target(&self, over_id: &str) -> Option<ContainerId> {
        self.store
            .container_of(over_id)
            .or_else(|| ContainerId::parse(over_id))
            .filter(|container| match container {
                ContainerId::Paragraph(id) => self.store.paragraph(id).is_some(),
                ContainerId::Bank => true,
            })
    }

    /// Paragraph a discourse-mode hover target stands for.
    fn paragraph_target(&self, over_id: &str) -> Option<String> {
        if self.store.paragraph_index(over_id).is_some() {
            return Some(over_id.to_string());
        }
        match ContainerId::parse(over_id) {
            Some(ContainerId::Paragraph(id)) if self.store.paragraph(&id).is_some() => Some(id),
            _ => self.store.paragraph_of(over_id).map(|p| p.id.clone()),
        }
    }

    fn candidate_index(&self, active_id: &str, over_id: &str, container: &ContainerId) -> usize {
        match container {
            ContainerId::Paragraph(paragraph_id) => self
                .store
                .paragraph(paragraph_id)
                .map(|p| {
                    p.position(active_id)
                        .or_else(|| p.position(over_id))
                        .unwrap_or(p.sentence_ids.len())
                })
                .unwrap_or(0),
            ContainerId::Bank => self.store.bank_index(over_id).unwrap_or(self.store.bank().len()),
        }
    }

    /// Terminal drop on the current candidate. Dropping with no candidate is a cancel.
    pub fn drag_end(&mut self) -> Transition {
        let Some(active) = self.session.finish() else {
            return Transition::None;
        };
        let Some(over) = active.over.clone() else {
            debug!(id = %active.active_id, "Dropped outside any target");
            self.clear_preview(&active.active_id, active.kind);
            self.restore_snapshot(active.snapshot);
            return Transition::None;
        };

        match (active.kind, &active.source) {
            (DragKind::Paragraph, _) => match over.container.paragraph_id() {
                Some(paragraph_id) => transfer::reorder_paragraphs(&mut self.store, &active.active_id, paragraph_id),
                None => Transition::None,
            },
            (_, Some(source)) => transfer::drag_end(
                &mut self.store,
                &active.active_id,
                source,
                Some((&over.over_id, &over.container)),
            ),
            (_, None) => Transition::None,
        }
    }

    /// Abort the drag. The store keeps any hover reordering unless rollback is enabled.
    pub fn cancel_drag(&mut self) -> bool {
        if self.session.is_pending() {
            self.session.reset();
            return true;
        }
        match self.session.finish() {
            Some(active) => {
                debug!(id = %active.active_id, "Drag cancelled");
                self.clear_preview(&active.active_id, active.kind);
                self.restore_snapshot(active.snapshot);
                true
            }
            None => false,
        }
    }

    /// End any drag without committing. Rolls back like a cancel when enabled.
    fn abandon_drag(&mut self) {
        if let Some(active) = self.session.finish() {
            self.clear_preview(&active.active_id, active.kind);
            self.restore_snapshot(active.snapshot);
        }
        self.session.reset();
    }

    /// A bank item only ever sits in a paragraph as a hover preview.
    fn clear_preview(&mut self, active_id: &str, kind: DragKind) {
        if kind == DragKind::BankItem && self.store.remove_from_paragraphs(active_id) > 0 {
            debug!(bank_id = active_id, "Cleared preview splice");
        }
    }

    fn restore_snapshot(&mut self, snapshot: Option<Box<EntityStore>>) {
        if let Some(snapshot) = snapshot {
            self.store = *snapshot;
            debug!("Restored pre-drag state");
        }
    }

    // ==================== Keyboard ====================

    pub fn key(&mut self, key: Key) -> Transition {
        match key {
            Key::Escape => {
                if !self.cancel_drag() && !self.cancel_edit() {
                    self.selected = None;
                }
                Transition::None
            }
            Key::ArrowUp => self.nudge_selected(Nudge::Up),
            Key::ArrowDown => self.nudge_selected(Nudge::Down),
        }
    }

    fn nudge_selected(&mut self, direction: Nudge) -> Transition {
        if !self.session.is_idle() || self.editing.is_some() {
            return Transition::None;
        }
        let Some(id) = self.selected.clone() else {
            return Transition::None;
        };
        match self.classify(&id) {
            Some(kind) if self.modes.allows_drag(kind) => transfer::nudge(&mut self.store, &id, direction),
            _ => Transition::None,
        }
    }

    // ==================== Explicit Operations ====================

    pub fn remove_sentence(&mut self, sentence_id: &str, add_to_bank: bool) -> Transition {
        let transition = transfer::remove_sentence(&mut self.store, sentence_id, add_to_bank);
        if self.selected.as_deref() == Some(sentence_id) {
            self.selected = None;
        }
        transition
    }

    pub fn move_to_trash(&mut self, bank_id: &str) -> StoreResult<()> {
        transfer::move_to_trash(&mut self.store, bank_id)
    }

    pub fn discard_bank_item(&mut self, bank_id: &str) -> StoreResult<()> {
        transfer::discard_bank_item(&mut self.store, bank_id)
    }

    pub fn delete_permanently(&mut self, bank_id: &str) -> StoreResult<()> {
        transfer::delete_permanently(&mut self.store, bank_id).map(|_| ())
    }

    pub fn recover_from_trash(&mut self, bank_id: &str) -> StoreResult<BankSection> {
        transfer::recover_from_trash(&mut self.store, bank_id)
    }

    /// Create a templated bank item and open it for editing.
    pub fn create_templated_sentence(&mut self, function: RhetoricalFunction) -> StoreResult<String> {
        let bank_id = transfer::create_templated_sentence(&mut self.store, function)?;
        self.begin_edit(EditTarget::BankItem(bank_id.clone()));
        Ok(bank_id)
    }

    // ==================== Text Editing ====================

    pub fn begin_edit(&mut self, target: EditTarget) -> bool {
        self.close_edit();
        self.editing = EditSession::begin(&self.store, target);
        self.editing.is_some()
    }

    pub fn update_edit(&mut self, text: &str) -> StoreResult<()> {
        match &self.editing {
            Some(session) => session.update(&mut self.store, text),
            None => Ok(()),
        }
    }

    pub fn commit_edit(&mut self, text: &str) -> StoreResult<()> {
        match self.editing.take() {
            Some(session) => session.commit(&mut self.store, text),
            None => Ok(()),
        }
    }

    /// Restore the pre-edit text. Returns whether an edit was open.
    pub fn cancel_edit(&mut self) -> bool {
        match self.editing.take() {
            Some(session) => {
                if let Err(e) = session.cancel(&mut self.store) {
                    warn!(error = %e, "Could not restore pre-edit text");
                }
                true
            }
            None => false,
        }
    }

    /// Live edits are already in the store, so closing keeps them.
    fn close_edit(&mut self) {
        self.editing = None;
    }

    pub fn edit_sentence_text(&mut self, sentence_id: &str, text: &str) -> bool {
        editing::edit_sentence_text(&mut self.store, sentence_id, text)
    }

    pub fn update_chunk_text(&mut self, sentence_id: &str, chunk_id: &str, text: &str) -> bool {
        editing::update_chunk_text(&mut self.store, sentence_id, chunk_id, text)
    }

    // ==================== Views ====================

    pub fn drag_overlay(&self) -> Option<DragOverlay> {
        let active = self.session.active()?;
        let id = active.active_id.as_str();
        match active.kind {
            DragKind::BankItem => self.store.bank_item(id).map(|item| DragOverlay::BankCard {
                text: item.text().to_string(),
                category_key: item.sentence.category_key(),
            }),
            DragKind::Sentence => self.store.sentence(id).map(|s| DragOverlay::SentenceCard {
                text: s.current_text.clone(),
                category_key: s.category_key(),
            }),
            DragKind::Paragraph => self.store.paragraph(id).map(|p| DragOverlay::Paragraph {
                text: self
                    .store
                    .resolve_paragraph(p)
                    .iter()
                    .map(|s| s.current_text.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
            }),
        }
    }

    /// Cards of a paragraph on the edit surface. A bank id spliced in by a hover
    /// preview is shown with the bank item's text; unresolvable ids are skipped.
    pub fn paragraph_items(&self, paragraph_id: &str) -> Vec<ItemView> {
        let Some(paragraph) = self.store.paragraph(paragraph_id) else {
            return Vec::new();
        };
        let colors = self.modes.show_colors();
        paragraph
            .sentence_ids
            .iter()
            .filter_map(|id| {
                let sentence = self
                    .store
                    .sentence(id)
                    .or_else(|| self.store.bank_item(id).map(|b| &b.sentence))?;
                Some(ItemView {
                    id: id.clone(),
                    text: sentence.current_text.clone(),
                    category_key: colors.then(|| sentence.category_key()),
                    mismatch: sentence.has_function_mismatch(),
                    hint: self.session.hint_for(id),
                })
            })
            .collect()
    }

    /// Bank sections in display order. Empty sections other than Starters are hidden.
    pub fn bank_sections(&self) -> Vec<BankSectionView<'_>> {
        BankSection::ORDER
            .iter()
            .filter_map(|&section| {
                let items: Vec<_> = self.store.bank_section(section).collect();
                (section.always_visible() || !items.is_empty()).then(|| BankSectionView {
                    section,
                    title: section.title(),
                    items,
                })
            })
            .collect()
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        self.lesson
            .mentor_content
            .functional_labels
            .iter()
            .map(|(&function, label)| LegendEntry {
                function,
                label: label.clone(),
                category_key: function.category_key(),
            })
            .collect()
    }

    /// Read-only composition: one span list per paragraph.
    pub fn finish_view(&self) -> Vec<Vec<Span>> {
        let colors = self.modes.show_colors();
        self.store
            .paragraphs()
            .iter()
            .map(|p| {
                self.store
                    .resolve_paragraph(p)
                    .into_iter()
                    .map(|s| Span {
                        text: s.current_text.clone(),
                        category_key: colors.then(|| s.category_key()),
                    })
                    .collect()
            })
            .collect()
    }

    // ==================== Export ====================

    pub fn export_text(&self) -> String {
        export::export_text(&self.lesson.mentor_content.title, &self.store)
    }

    pub fn copy_to_clipboard(&mut self, clipboard: &mut dyn Clipboard) -> ExportResult<()> {
        let text = self.export_text();
        match clipboard.write_text(&text) {
            Ok(()) => {
                self.toasts.push(Toast::success(CLIPBOARD_ACK));
                info!(bytes = text.len(), "Copied draft to clipboard");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Clipboard write failed");
                self.toasts.push(Toast::error(format!("Could not copy text: {}", e)));
                Err(e)
            }
        }
    }

    /// Save the export text as the configured file name inside `dir`.
    pub fn download(&mut self, dir: &Path) -> ExportResult<PathBuf> {
        let text = self.export_text();
        match export::download_txt(dir, &self.settings.export_file_name, &text) {
            Ok(path) => {
                self.toasts.push(Toast::success(format!("Saved {}", self.settings.export_file_name)));
                Ok(path)
            }
            Err(e) => {
                warn!(error = %e, "Download failed");
                self.toasts.push(Toast::error(format!("Could not save draft: {}", e)));
                Err(e)
            }
        }
    }

    // ==================== Reading ====================

    /// Read the selected workspace sentence aloud.
    pub fn read_selected(&mut self) -> bool {
        let Some(id) = self.selected.clone() else {
            return false;
        };
        let Some(text) = self.store.sentence(&id).map(|s| s.current_text.clone()) else {
            return false;
        };
        self.narrator.read_sentence(&id, &text);
        true
    }

    pub fn read_full_text(&mut self) {
        let text = export::composition_text(&self.store);
        self.narrator.read_text(&text);
    }

    pub fn stop_reading(&mut self) {
        self.narrator.stop();
    }
}
