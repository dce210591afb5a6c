//! Drag session state machine.
//!
//! Tracks what is being dragged, where it came from and which container /
//! position is the current drop candidate. The session itself never touches
//! the entity store; it only carries the transient state the transfer engine
//! and the presentation layer read.

use super::collision::Point;
use super::container::ContainerId;
use crate::store::EntityStore;

/// What kind of entity the active drag carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragKind {
    /// A bank entry (becomes a new sentence when dropped in a paragraph)
    BankItem,
    /// A workspace sentence
    Sentence,
    /// A whole paragraph block (discourse mode)
    Paragraph,
}

/// Current hover position of the drag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropCandidate {
    /// Id of the hovered target (an item or a container droppable)
    pub over_id: String,
    /// Container the hovered target belongs to
    pub container: ContainerId,
    /// Index an insertion marker should be drawn at
    pub index: usize,
}

/// State carried while a drag is active.
#[derive(Clone, Debug)]
pub struct ActiveDrag {
    pub active_id: String,
    pub kind: DragKind,
    /// Container resolved once at drag start; `None` for paragraph blocks
    pub source: Option<ContainerId>,
    pub over: Option<DropCandidate>,
    /// Store state at drag start, kept only when cancel should roll back
    pub snapshot: Option<Box<EntityStore>>,
}

/// How the presentation layer should draw an item right now.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ItemHint {
    Normal,
    /// The active item's slot: dimmed, with a pulsing caret in place of its content
    Hole { opacity: f32 },
}

/// Drag session state.
///
/// ```text
/// Idle -> Pending   (press on a draggable)
/// Pending -> Dragging (moved past activation distance)
/// Pending -> Idle   (release before activation)
/// Dragging -> Idle  (drop or cancel)
/// ```
#[derive(Clone, Debug, Default)]
pub enum DragSession {
    #[default]
    Idle,

    /// Pressed but not yet moved far enough to count as a drag
    Pending {
        item_id: String,
        kind: DragKind,
        origin: Point,
    },

    Dragging(ActiveDrag),
}

impl DragSession {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        match self {
            Self::Dragging(active) => Some(active),
            _ => None,
        }
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active().map(|a| a.active_id.as_str())
    }

    pub fn over(&self) -> Option<&DropCandidate> {
        self.active().and_then(|a| a.over.as_ref())
    }

    /// Record a press on a draggable item.
    pub fn press(&mut self, item_id: impl Into<String>, kind: DragKind, origin: Point) {
        *self = Self::Pending {
            item_id: item_id.into(),
            kind,
            origin,
        };
    }

    /// Whether a pending press has travelled far enough to start dragging.
    pub fn should_activate(&self, position: Point, activation_distance: f32) -> bool {
        match self {
            Self::Pending { origin, .. } => origin.distance_to(position) >= activation_distance,
            _ => false,
        }
    }

    /// The pending press, if any.
    pub fn pending(&self) -> Option<(&str, DragKind)> {
        match self {
            Self::Pending { item_id, kind, .. } => Some((item_id, *kind)),
            _ => None,
        }
    }

    /// Enter `Dragging`. Any pending press is replaced.
    pub fn start(
        &mut self,
        active_id: impl Into<String>,
        kind: DragKind,
        source: Option<ContainerId>,
        snapshot: Option<EntityStore>,
    ) {
        *self = Self::Dragging(ActiveDrag {
            active_id: active_id.into(),
            kind,
            source,
            over: None,
            snapshot: snapshot.map(Box::new),
        });
    }

    /// Update the drop candidate of an active drag.
    pub fn set_over(&mut self, candidate: Option<DropCandidate>) {
        if let Self::Dragging(active) = self {
            active.over = candidate;
        }
    }

    /// End the session, returning the drag that was active (if any).
    pub fn finish(&mut self) -> Option<ActiveDrag> {
        match std::mem::take(self) {
            Self::Dragging(active) => Some(active),
            _ => None,
        }
    }

    /// Reset to Idle
    pub fn reset(&mut self) {
        *self = Self::Idle;
    }

    /// Visual hint for an item.
    pub fn hint_for(&self, item_id: &str) -> ItemHint {
        match self.active_id() {
            Some(active) if active == item_id => ItemHint::Hole {
                opacity: crate::constants::DRAG_HOLE_OPACITY,
            },
            _ => ItemHint::Normal,
        }
    }

    /// Where an insertion marker should be drawn.
    pub fn insertion_marker(&self) -> Option<(&ContainerId, usize)> {
        self.over().map(|c| (&c.container, c.index))
    }
}
