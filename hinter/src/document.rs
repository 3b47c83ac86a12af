//! Per-document tracking: stable engine-visible names, dirty line ranges,
//! and the deferred large-document resync schedule.

use std::collections::HashMap;
use std::time::Instant;

use tracing::debug;

use crate::buffer::{Change, DocumentId};
use crate::sync::SyncConfig;

/// Line span known to be stale relative to the engine's last snapshot.
/// `to` is one past the last stale line. Once set, the span only grows or is
/// cleared wholesale by a full sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRange {
    pub from: usize,
    pub to: usize,
}

impl DirtyRange {
    pub fn span(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    pub fn contains_line(&self, line: usize) -> bool {
        self.from <= line && line < self.to
    }
}

#[derive(Debug)]
pub(crate) struct DocRecord {
    pub(crate) name: String,
    pub(crate) dirty: Option<DirtyRange>,
    pub(crate) synced_once: bool,
    pub(crate) resync_due: Option<Instant>,
}

/// The set of documents the engine has seen. Names are assigned at first
/// sight and never reused while this set lives.
#[derive(Debug, Default)]
pub(crate) struct DocumentSet {
    docs: HashMap<DocumentId, DocRecord>,
    next_name: u32,
}

impl DocumentSet {
    pub(crate) fn new() -> Self {
        DocumentSet::default()
    }

    pub(crate) fn ensure(&mut self, id: DocumentId) -> &mut DocRecord {
        self.docs.entry(id).or_insert_with(|| {
            let name = if self.next_name == 0 {
                "[doc]".to_string()
            } else {
                format!("[doc{}]", self.next_name)
            };
            self.next_name += 1;
            debug!(?id, name = %name, "registered document");
            DocRecord {
                name,
                dirty: None,
                synced_once: false,
                resync_due: None,
            }
        })
    }

    pub(crate) fn get(&self, id: DocumentId) -> Option<&DocRecord> {
        self.docs.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: DocumentId) -> Option<&mut DocRecord> {
        self.docs.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: DocumentId) {
        self.docs.remove(&id);
    }

    /// Documents other than `current` that still carry uncommitted changes.
    pub(crate) fn other_dirty(&self, current: DocumentId) -> Vec<DocumentId> {
        let mut ids: Vec<DocumentId> = self
            .docs
            .iter()
            .filter(|(id, rec)| **id != current && rec.dirty.is_some())
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    /// Folds one edit into the document's dirty range and, for a large
    /// document accumulating a large span, schedules a deferred full resync.
    /// Returns the resync deadline if one was scheduled.
    pub(crate) fn track_change(
        &mut self,
        id: DocumentId,
        line_count: usize,
        change: &Change,
        config: &SyncConfig,
        now: Instant,
    ) -> Option<Instant> {
        let record = self.ensure(id);
        let inserted_end = change.inserted_end_line();

        let mut dirty = record.dirty.unwrap_or(DirtyRange {
            from: change.from.line,
            to: change.from.line,
        });

        if change.from.line < dirty.to {
            // Shift the tail by the net line delta of this edit.
            let delta = change.to.line as isize - inserted_end as isize;
            dirty.to = usize::try_from(dirty.to as isize - delta).unwrap_or(0);
        }
        if inserted_end >= dirty.to {
            dirty.to = inserted_end + 1;
        }
        if dirty.from > change.from.line {
            dirty.from = change.from.line;
        }
        if dirty.to < dirty.from {
            dirty.to = dirty.from;
        }
        record.dirty = Some(dirty);

        if line_count > config.big_doc_lines && dirty.span() > config.fragment_max_span {
            let due = now + config.resync_debounce;
            record.resync_due = Some(due);
            debug!(?id, span = dirty.span(), "scheduled deferred resync");
            return Some(due);
        }
        None
    }

    /// Documents whose deferred resync deadline has passed.
    pub(crate) fn resync_due(&self, now: Instant) -> Vec<DocumentId> {
        let mut ids: Vec<DocumentId> = self
            .docs
            .iter()
            .filter(|(_, rec)| rec.resync_due.is_some_and(|due| due <= now))
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }
}
