//! Editing granularity and top-level view.
//!
//! Purely an interaction switch: nothing in here touches the entity store.

use crate::drag::DragKind;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which unit the student manipulates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditMode {
    /// Drag whole sentences
    #[default]
    Sentence,
    /// Edit chunks in place; workspace sentences are not draggable
    Phrase,
    /// Drag whole paragraphs
    Discourse,
}

impl EditMode {
    /// Whether an item of `kind` can be picked up in this mode.
    pub fn allows_drag(self, kind: DragKind) -> bool {
        match (self, kind) {
            (Self::Sentence, DragKind::Sentence | DragKind::BankItem) => true,
            (Self::Phrase, DragKind::BankItem) => true,
            (Self::Discourse, DragKind::Paragraph) => true,
            _ => false,
        }
    }
}

/// Top-level view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum View {
    #[default]
    Edit,
    /// Read-only composition with export actions
    Finish,
}

/// Mode and view state for one workspace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModeController {
    mode: EditMode,
    view: View,
    show_colors: bool,
    bank_open: bool,
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new(EditMode::default(), true)
    }
}

impl ModeController {
    pub fn new(mode: EditMode, show_colors: bool) -> Self {
        Self {
            mode,
            view: View::Edit,
            show_colors,
            bank_open: true,
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn show_colors(&self) -> bool {
        self.show_colors
    }

    pub fn bank_open(&self) -> bool {
        self.bank_open
    }

    pub fn is_editing(&self) -> bool {
        self.view == View::Edit
    }

    /// Returns true when the mode actually changed.
    pub fn set_mode(&mut self, mode: EditMode) -> bool {
        if self.mode == mode {
            return false;
        }
        debug!(from = ?self.mode, to = ?mode, "Edit mode changed");
        self.mode = mode;
        true
    }

    pub fn finish(&mut self) {
        self.view = View::Finish;
    }

    pub fn back_to_edit(&mut self) {
        self.view = View::Edit;
    }

    pub fn toggle_colors(&mut self) -> bool {
        self.show_colors = !self.show_colors;
        self.show_colors
    }

    pub fn toggle_bank(&mut self) -> bool {
        self.bank_open = !self.bank_open;
        self.bank_open
    }

    /// Dragging is only possible on the edit surface.
    pub fn allows_drag(&self, kind: DragKind) -> bool {
        self.is_editing() && self.mode.allows_drag(kind)
    }
}
