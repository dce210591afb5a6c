//! Container identity for draggable entities.

use crate::constants::{BANK_CONTAINER_ID, PARAGRAPH_CONTAINER_PREFIX};
use std::fmt;

/// A logical container a sentence-like entity can live in.
///
/// The wire forms match the droppable ids used by the presentation layer:
/// the bank is `"bank-droppable"`, a paragraph is `"p-" + paragraph id`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContainerId {
    Bank,
    Paragraph(String),
}

impl ContainerId {
    pub fn paragraph(id: impl Into<String>) -> Self {
        Self::Paragraph(id.into())
    }

    /// Parse a droppable id. Returns `None` for ids that name an item rather than a container.
    pub fn parse(droppable_id: &str) -> Option<Self> {
        if droppable_id == BANK_CONTAINER_ID {
            return Some(Self::Bank);
        }
        droppable_id
            .strip_prefix(PARAGRAPH_CONTAINER_PREFIX)
            .filter(|id| !id.is_empty())
            .map(|id| Self::Paragraph(id.to_string()))
    }

    pub fn is_bank(&self) -> bool {
        matches!(self, Self::Bank)
    }

    pub fn paragraph_id(&self) -> Option<&str> {
        match self {
            Self::Paragraph(id) => Some(id),
            Self::Bank => None,
        }
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bank => f.write_str(BANK_CONTAINER_ID),
            Self::Paragraph(id) => write!(f, "{}{}", PARAGRAPH_CONTAINER_PREFIX, id),
        }
    }
}
