//! Mentorboard - a sentence bank and paragraph workspace for scaffolded
//! writing lessons.
//!
//! Students assemble a composition from mentor sentences and a bank of
//! reusable sentences by dragging them between the bank and ordered
//! paragraphs. The crate holds the interaction core: the entity store, the
//! drag session, drop target resolution, the transfer engine and the
//! mode/view state, plus the lesson source, export and read-aloud surfaces
//! around them. Rendering is left to the embedding application.

pub mod constants;
pub mod drag;
pub mod editing;
pub mod error;
pub mod export;
pub mod lesson;
pub mod mode;
pub mod notifications;
pub mod perf;
pub mod settings;
pub mod speech;
pub mod store;
pub mod transfer;
pub mod types;
pub mod workspace;

pub use error::{LoadError, StoreError};
pub use store::EntityStore;
pub use workspace::Workspace;
