//! Application-wide constants.
//!
//! Centralizes container ids, id prefixes and interaction thresholds so the
//! transfer logic and the presentation layer agree on them.

// ============================================================================
// Container Identity
// ============================================================================

/// Droppable id of the sentence bank container
pub const BANK_CONTAINER_ID: &str = "bank-droppable";

/// Prefix of paragraph container ids (`p-<paragraph id>`)
pub const PARAGRAPH_CONTAINER_PREFIX: &str = "p-";

// ============================================================================
// Id Minting
// ============================================================================

/// Prefix for workspace sentences minted from bank items
pub const CUSTOM_ID_PREFIX: &str = "custom-";

/// Prefix for bank items created by the user or cloned from the workspace
pub const BANK_ID_PREFIX: &str = "bank-";

// ============================================================================
// Interaction
// ============================================================================

/// Pointer travel (pixels) before a press turns into a drag
pub const DRAG_ACTIVATION_DISTANCE: f32 = 5.0;

/// Opacity of the active item while it is being dragged (the "hole")
pub const DRAG_HOLE_OPACITY: f32 = 0.3;

/// Slow-operation warning threshold for a single hover tick, in milliseconds
pub const HOVER_TICK_BUDGET_MS: f64 = 4.0;

// ============================================================================
// Export
// ============================================================================

/// Default file name for the downloaded draft
pub const DEFAULT_EXPORT_FILE_NAME: &str = "WIDA-Explain-Draft.txt";

/// Acknowledgment shown after a successful clipboard copy
pub const CLIPBOARD_ACK: &str = "Text copied to clipboard!";

// ============================================================================
// Lessons
// ============================================================================

/// Lesson id whose file name does not follow the `<id>.json` convention
pub const WEATHERING_LESSON_ID: &str = "weathering";

/// File name of the weathering lesson
pub const WEATHERING_LESSON_FILE: &str = "g4-explain-weathering.json";
