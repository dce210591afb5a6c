//! Drag-and-drop plumbing for the workspace.
//!
//! This module holds everything a drag gesture needs before the transfer
//! engine commits anything:
//!
//! - `container` - container identity (`"bank-droppable"` / `"p-<id>"`)
//! - `session` - the drag session state machine (idle, pending, dragging)
//! - `collision` - hybrid drop target resolution over an R-tree
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Pending      (pointer down on a draggable item)
//! Pending -> Dragging  (pointer travelled past the activation distance)
//! Pending -> Idle      (pointer up before activation, treated as a click)
//! Dragging -> Idle     (drop or cancel)
//! ```

mod collision;
mod container;
mod session;

pub use collision::{CollisionResolver, DropTarget, Point, Rect};
pub use container::ContainerId;
pub use session::{ActiveDrag, DragKind, DragSession, DropCandidate, ItemHint};
