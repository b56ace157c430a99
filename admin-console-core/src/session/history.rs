//! Dialog history stack

use serde_json::{Map, Value};

use crate::types::DialogTarget;

/// A dialog that was covered by another one, with the data it had then.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HistoryEntry<F> {
    pub target: DialogTarget,
    /// Pending data of a standard dialog.
    pub fields: Option<F>,
    /// Payload of a custom dialog.
    pub payload: Option<Map<String, Value>>,
}

/// Stack of covered dialogs. Cancelling the current dialog pops one level.
#[derive(Debug, Clone)]
pub(crate) struct DialogHistory<F> {
    entries: Vec<HistoryEntry<F>>,
}

impl<F> Default for DialogHistory<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<F> DialogHistory<F> {
    pub fn push(&mut self, entry: HistoryEntry<F>) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<HistoryEntry<F>> {
        self.entries.pop()
    }

    pub fn previous(&self) -> Option<&DialogTarget> {
        self.entries.last().map(|entry| &entry.target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
