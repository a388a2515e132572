//! Runtime event stream payloads.

use crate::{
    core::reorder::DragIndicator,
    op::Change,
    types::{ChangeSeq, SnippetId},
};

/// Events emitted from the single-writer composer loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerEvent {
    /// A snippet was created.
    Added {
        /// New snippet id.
        id: SnippetId,
        /// Position it landed at.
        index: usize,
    },
    /// A snippet payload was replaced.
    Updated {
        /// Updated snippet id.
        id: SnippetId,
    },
    /// A snippet was removed.
    Deleted {
        /// Removed snippet id.
        id: SnippetId,
    },
    /// A snippet moved.
    Moved {
        /// Moved snippet id.
        id: SnippetId,
        /// Source position.
        from: usize,
        /// Landing position.
        to: usize,
    },
    /// A paragraph edit is waiting out its debounce window.
    EditPending {
        /// Edited snippet id.
        id: SnippetId,
    },
    /// The drag indicator changed.
    DragChanged(DragIndicator),
    /// The preview was recomputed through this change sequence.
    PreviewUpdated {
        /// Latest change included.
        seq: ChangeSeq,
    },
}

impl From<&Change> for ComposerEvent {
    fn from(change: &Change) -> Self {
        match change {
            Change::Added { record, index } => ComposerEvent::Added {
                id: record.id,
                index: *index,
            },
            Change::Updated { id, .. } => ComposerEvent::Updated { id: *id },
            Change::Deleted { record, .. } => ComposerEvent::Deleted { id: record.id },
            Change::Moved { id, from, to } => ComposerEvent::Moved {
                id: *id,
                from: *from,
                to: *to,
            },
        }
    }
}
