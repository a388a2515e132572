//! Change records emitted by registry mutations.

use serde::{Deserialize, Serialize};

use crate::{
    snippet::{SnippetPayload, SnippetRecord},
    types::{ChangeSeq, SnippetId},
};

/// One applied registry mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
    /// A record was created at `index`.
    Added {
        /// Inserted record.
        record: SnippetRecord,
        /// Position it landed at.
        index: usize,
    },
    /// A record's payload was replaced.
    Updated {
        /// Mutated record id.
        id: SnippetId,
        /// New payload.
        payload: SnippetPayload,
        /// Payload before the update.
        prev: SnippetPayload,
    },
    /// A record was removed from `index`.
    Deleted {
        /// Removed record.
        record: SnippetRecord,
        /// Position it occupied.
        index: usize,
    },
    /// A record moved from `from` to `to` (post-removal coordinates).
    Moved {
        /// Moved record id.
        id: SnippetId,
        /// Source position.
        from: usize,
        /// Landing position.
        to: usize,
    },
}

impl Change {
    /// Id of the record the change touched.
    pub fn snippet_id(&self) -> SnippetId {
        match self {
            Change::Added { record, .. } | Change::Deleted { record, .. } => record.id,
            Change::Updated { id, .. } | Change::Moved { id, .. } => *id,
        }
    }

    /// True when the change shifted record positions.
    pub fn changes_order(&self) -> bool {
        !matches!(self, Change::Updated { .. })
    }
}

/// Change plus its sequence metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredChange {
    /// Monotonic change sequence.
    pub seq: ChangeSeq,
    /// Wall-clock timestamp in milliseconds.
    pub ts_ms: u64,
    /// Change body.
    pub change: Change,
}
