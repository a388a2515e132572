use std::time::{SystemTime, UNIX_EPOCH};

use hashbrown::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::{
    core::reorder::apply_move,
    op::{Change, StoredChange},
    snippet::{MetaFields, SnippetPayload, SnippetRecord},
    types::{ChangeSeq, SnippetId, SnippetKind},
};

/// Reasons a registry request is rejected. A rejected request never mutates state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A second Meta record was requested.
    #[error("a meta snippet already exists")]
    DuplicateMeta,
    /// No record with this id.
    #[error("snippet {0} not found")]
    NotFound(SnippetId),
    /// Replacement payload has a different kind than the record.
    #[error("snippet {id} is {expected}, got {found} payload")]
    KindMismatch {
        /// Target record.
        id: SnippetId,
        /// Kind of the stored record.
        expected: SnippetKind,
        /// Kind of the offered payload.
        found: SnippetKind,
    },
    /// Position outside the current list.
    #[error("index {index} out of range for {len} snippets")]
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Current list length.
        len: usize,
    },
}

/// Ordered, explicitly owned collection of snippet records.
///
/// All mutation goes through [`Registry::add`], [`Registry::update`],
/// [`Registry::delete`] and [`Registry::move_item`]; each successful call
/// queues one [`StoredChange`] that callers collect with
/// [`Registry::drain_changes`] to refresh derived views.
#[derive(Debug, Default)]
pub struct Registry {
    records: HashMap<SnippetId, SnippetRecord>,
    order: Vec<SnippetId>,
    pos: HashMap<SnippetId, usize>,
    meta_id: Option<SnippetId>,
    pending_changes: Vec<StoredChange>,
    next_change_seq: ChangeSeq,
    next_id: SnippetId,
}

impl Registry {
    /// Empty registry whose ids start at the current wall-clock millisecond.
    pub fn new() -> Self {
        Self::starting_at(now_ms().max(1))
    }

    /// Empty registry whose first id is `first_id`.
    pub fn starting_at(first_id: SnippetId) -> Self {
        Self {
            next_change_seq: 1,
            next_id: first_id,
            ..Self::default()
        }
    }

    /// Builds a registry from imported payloads, keeping their order.
    pub fn load(payloads: impl IntoIterator<Item = SnippetPayload>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for payload in payloads {
            if payload.kind() == SnippetKind::Meta && registry.meta_id.is_some() {
                return Err(RegistryError::DuplicateMeta);
            }
            let id = registry.take_next_id();
            if payload.kind() == SnippetKind::Meta {
                registry.meta_id = Some(id);
            }
            registry.pos.insert(id, registry.order.len());
            registry.order.push(id);
            registry.records.insert(id, SnippetRecord { id, payload });
        }
        Ok(registry)
    }

    /// Creates a record of `kind` with its default payload.
    ///
    /// Meta is inserted at position 0; every other kind is appended.
    pub fn add(&mut self, kind: SnippetKind) -> Result<(SnippetId, StoredChange), RegistryError> {
        if kind == SnippetKind::Meta && self.meta_id.is_some() {
            debug!(kind = %kind, "rejecting duplicate meta snippet");
            return Err(RegistryError::DuplicateMeta);
        }

        let id = self.take_next_id();
        let record = SnippetRecord {
            id,
            payload: SnippetPayload::default_for(kind),
        };

        let index = if kind == SnippetKind::Meta {
            self.meta_id = Some(id);
            self.order.insert(0, id);
            self.reindex_from(0);
            0
        } else {
            self.pos.insert(id, self.order.len());
            self.order.push(id);
            self.order.len() - 1
        };
        self.records.insert(id, record.clone());

        debug!(id, kind = %kind, index, "snippet added");
        let stored = self.record_change(Change::Added { record, index });
        Ok((id, stored))
    }

    /// Replaces the payload of record `id`; the payload kind must match.
    pub fn update(&mut self, id: SnippetId, payload: SnippetPayload) -> Result<StoredChange, RegistryError> {
        let rec = self.records.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        if rec.kind() != payload.kind() {
            return Err(RegistryError::KindMismatch {
                id,
                expected: rec.kind(),
                found: payload.kind(),
            });
        }

        let prev = std::mem::replace(&mut rec.payload, payload.clone());
        debug!(id, "snippet updated");
        Ok(self.record_change(Change::Updated { id, payload, prev }))
    }

    /// Removes record `id`.
    pub fn delete(&mut self, id: SnippetId) -> Result<StoredChange, RegistryError> {
        let index = *self.pos.get(&id).ok_or(RegistryError::NotFound(id))?;
        let record = self.records.remove(&id).ok_or(RegistryError::NotFound(id))?;

        self.order.remove(index);
        self.pos.remove(&id);
        self.reindex_from(index);
        if self.meta_id == Some(id) {
            self.meta_id = None;
        }

        debug!(id, index, "snippet deleted");
        Ok(self.record_change(Change::Deleted { record, index }))
    }

    /// Moves the record at `from` so it lands at `to`, where `to` is read
    /// against the list with the record already removed.
    ///
    /// Returns `Ok(None)` when `from == to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<Option<StoredChange>, RegistryError> {
        let len = self.order.len();
        if from >= len {
            return Err(RegistryError::IndexOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(RegistryError::IndexOutOfRange { index: to, len });
        }
        if from == to {
            return Ok(None);
        }

        let id = self.order[from];
        apply_move(&mut self.order, from, to);
        self.reindex_from(from.min(to));

        debug!(id, from, to, "snippet moved");
        Ok(Some(self.record_change(Change::Moved { id, from, to })))
    }

    /// Ordered snapshot of every record.
    pub fn list(&self) -> Vec<SnippetRecord> {
        self.iter().cloned().collect()
    }

    /// Records in display order.
    pub fn iter(&self) -> impl Iterator<Item = &SnippetRecord> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// True iff a Meta record exists.
    pub fn has_meta(&self) -> bool {
        self.meta_id.is_some()
    }

    /// The Meta record's fields, if present.
    pub fn meta(&self) -> Option<&MetaFields> {
        self.meta_id
            .and_then(|id| self.records.get(&id))
            .and_then(SnippetRecord::as_meta)
    }

    /// Record with `id`, if present.
    pub fn get(&self, id: SnippetId) -> Option<&SnippetRecord> {
        self.records.get(&id)
    }

    /// Current position of record `id`.
    pub fn position(&self, id: SnippetId) -> Option<usize> {
        self.pos.get(&id).copied()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when no records are held.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in document order.
    pub fn ordered_ids(&self) -> &[SnippetId] {
        &self.order
    }

    /// Takes every change recorded since the last drain.
    pub fn drain_changes(&mut self) -> Vec<StoredChange> {
        std::mem::take(&mut self.pending_changes)
    }

    /// Sequence number of the last recorded change, 0 before any.
    pub fn latest_change_seq(&self) -> ChangeSeq {
        self.next_change_seq.saturating_sub(1)
    }

    fn record_change(&mut self, change: Change) -> StoredChange {
        let stored = StoredChange {
            seq: self.take_next_change_seq(),
            ts_ms: now_ms(),
            change,
        };
        self.pending_changes.push(stored.clone());
        stored
    }

    fn reindex_from(&mut self, start: usize) {
        for (idx, id) in self.order.iter().copied().enumerate().skip(start) {
            self.pos.insert(id, idx);
        }
    }

    fn take_next_id(&mut self) -> SnippetId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn take_next_change_seq(&mut self) -> ChangeSeq {
        let seq = self.next_change_seq.max(1);
        self.next_change_seq = seq + 1;
        seq
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_track_order_after_meta_insert_and_delete() {
        let mut reg = Registry::starting_at(1);
        let (a, _) = reg.add(SnippetKind::Verse).unwrap();
        let (b, _) = reg.add(SnippetKind::Lesson).unwrap();
        let (m, _) = reg.add(SnippetKind::Meta).unwrap();

        assert_eq!(reg.ordered_ids(), &[m, a, b]);
        for (idx, id) in reg.ordered_ids().iter().enumerate() {
            assert_eq!(reg.position(*id), Some(idx));
        }

        reg.delete(a).unwrap();
        assert_eq!(reg.position(m), Some(0));
        assert_eq!(reg.position(b), Some(1));
        assert_eq!(reg.position(a), None);
    }

    #[test]
    fn change_sequence_is_monotonic_and_drained_once() {
        let mut reg = Registry::starting_at(10);
        reg.add(SnippetKind::Paragraph).unwrap();
        reg.add(SnippetKind::Prayer).unwrap();
        let changes = reg.drain_changes();
        assert_eq!(changes.iter().map(|c| c.seq).collect::<Vec<_>>(), vec![1, 2]);
        assert!(reg.drain_changes().is_empty());
        assert_eq!(reg.latest_change_seq(), 2);
    }
}
