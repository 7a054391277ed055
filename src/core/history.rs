//! Bounded undo/redo stacks of ledger snapshots.

use std::collections::VecDeque;

use crate::core::errors::{MooLahError, Result};
use crate::ledger::MooLah;

pub const MESSAGE_NO_UNDO: &str = "There is nothing to undo";
pub const MESSAGE_NO_REDO: &str = "There is nothing to redo";

/// Frozen ledger state tagged with the command that produced the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub description: String,
    pub snapshot: MooLah,
}

impl HistoryEntry {
    pub fn new(description: impl Into<String>, snapshot: MooLah) -> Self {
        Self {
            description: description.into(),
            snapshot,
        }
    }
}

/// Owns the `past` (oldest first) and `future` stacks.
///
/// Both stacks hold at most `max_depth` entries; the oldest entry is evicted
/// when a push would exceed it.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    past: VecDeque<HistoryEntry>,
    future: VecDeque<HistoryEntry>,
    max_depth: usize,
    pending: Option<PendingCommit>,
}

/// What the latest commit displaced, so [`HistoryManager::abandon_commit`]
/// can put it back.
#[derive(Debug, Clone)]
struct PendingCommit {
    recorded: bool,
    evicted: Option<HistoryEntry>,
    discarded_future: VecDeque<HistoryEntry>,
}

impl HistoryManager {
    pub fn new(max_depth: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            max_depth,
            pending: None,
        }
    }

    /// Records the pre-mutation `snapshot` and discards any redo branch.
    pub fn commit(&mut self, snapshot: MooLah, description: impl Into<String>) {
        let entry = HistoryEntry::new(description, snapshot);
        tracing::debug!(description = %entry.description, "history commit");
        let recorded = self.max_depth > 0;
        let evicted = push_bounded(&mut self.past, entry, self.max_depth);
        self.pending = Some(PendingCommit {
            recorded,
            evicted,
            discarded_future: std::mem::take(&mut self.future),
        });
    }

    /// Pops the newest past entry, parking `current` on the redo stack.
    pub fn undo(&mut self, current: MooLah) -> Result<HistoryEntry> {
        self.pending = None;
        let entry = self
            .past
            .pop_back()
            .ok_or_else(|| MooLahError::NoHistory(MESSAGE_NO_UNDO.to_string()))?;
        let parked = HistoryEntry::new(entry.description.clone(), current);
        push_bounded(&mut self.future, parked, self.max_depth);
        Ok(entry)
    }

    /// Pops the newest future entry, parking `current` on the undo stack.
    pub fn redo(&mut self, current: MooLah) -> Result<HistoryEntry> {
        self.pending = None;
        let entry = self
            .future
            .pop_back()
            .ok_or_else(|| MooLahError::NoHistory(MESSAGE_NO_REDO.to_string()))?;
        let parked = HistoryEntry::new(entry.description.clone(), current);
        push_bounded(&mut self.past, parked, self.max_depth);
        Ok(entry)
    }

    /// Reverts the most recent commit: drops its entry, reinstates any entry it
    /// evicted and the redo branch it discarded. Returns the dropped entry.
    ///
    /// Only the commit immediately preceding this call can be abandoned.
    pub fn abandon_commit(&mut self) -> Option<HistoryEntry> {
        let pending = self.pending.take()?;
        let entry = if pending.recorded {
            self.past.pop_back()
        } else {
            None
        };
        if let Some(evicted) = pending.evicted {
            self.past.push_front(evicted);
        }
        self.future = pending.discarded_future;
        entry
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.past.back().map(|entry| entry.description.as_str())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.future.back().map(|entry| entry.description.as_str())
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.pending = None;
    }
}

/// Pushes `entry`, returning the oldest entry if one had to make room.
fn push_bounded(
    stack: &mut VecDeque<HistoryEntry>,
    entry: HistoryEntry,
    max_depth: usize,
) -> Option<HistoryEntry> {
    if max_depth == 0 {
        return None;
    }
    let mut evicted = None;
    while stack.len() >= max_depth {
        evicted = stack.pop_front();
    }
    stack.push_back(entry);
    evicted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Description, Expense, Price};

    fn ledger_with(count: usize) -> MooLah {
        let mut moolah = MooLah::new();
        for idx in 0..count {
            moolah.add_expense(Expense::create(
                Description::new(format!("Item {idx}")).unwrap(),
                Price::from_cents(100),
                [Category::new("Misc").unwrap()],
            ));
        }
        moolah
    }

    #[test]
    fn undo_on_empty_history_fails() {
        let mut history = HistoryManager::new(10);
        let err = history.undo(MooLah::new()).expect_err("nothing to undo");
        assert_eq!(err, MooLahError::NoHistory(MESSAGE_NO_UNDO.to_string()));
        let err = history.redo(MooLah::new()).expect_err("nothing to redo");
        assert_eq!(err, MooLahError::NoHistory(MESSAGE_NO_REDO.to_string()));
    }

    #[test]
    fn undo_then_redo_swaps_snapshots() {
        let mut history = HistoryManager::new(10);
        let before = ledger_with(0);
        let after = ledger_with(1);

        history.commit(before.clone(), "Add expense");
        let undone = history.undo(after.clone()).unwrap();
        assert_eq!(undone.snapshot, before);
        assert_eq!(history.redo_description(), Some("Add expense"));

        let redone = history.redo(before.clone()).unwrap();
        assert_eq!(redone.snapshot, after);
        assert_eq!(history.undo_description(), Some("Add expense"));
        assert!(!history.can_redo());
    }

    #[test]
    fn commit_discards_redo_branch() {
        let mut history = HistoryManager::new(10);
        history.commit(ledger_with(0), "first");
        history.undo(ledger_with(1)).unwrap();
        assert!(history.can_redo());

        history.commit(ledger_with(0), "second");
        assert!(!history.can_redo());
        assert!(history.redo(ledger_with(0)).is_err());
    }

    #[test]
    fn overflow_evicts_oldest_entry() {
        let mut history = HistoryManager::new(2);
        history.commit(ledger_with(0), "one");
        history.commit(ledger_with(1), "two");
        history.commit(ledger_with(2), "three");

        assert_eq!(history.past_len(), 2);
        assert_eq!(history.undo(ledger_with(3)).unwrap().description, "three");
        assert_eq!(history.undo(ledger_with(2)).unwrap().description, "two");
        assert!(history.undo(ledger_with(1)).is_err());
    }

    #[test]
    fn zero_depth_records_nothing() {
        let mut history = HistoryManager::new(0);
        history.commit(ledger_with(0), "ignored");
        assert!(!history.can_undo());
    }

    #[test]
    fn abandon_commit_returns_latest_entry() {
        let mut history = HistoryManager::new(5);
        history.commit(ledger_with(2), "edit");
        let entry = history.abandon_commit().unwrap();
        assert_eq!(entry.snapshot.len(), 2);
        assert!(!history.can_undo());
    }

    #[test]
    fn abandon_commit_reinstates_evicted_entry_and_redo_branch() {
        let mut history = HistoryManager::new(2);
        history.commit(ledger_with(0), "one");
        history.commit(ledger_with(1), "two");
        history.undo(ledger_with(2)).unwrap();
        history.commit(ledger_with(1), "three");
        assert!(!history.can_redo());

        history.abandon_commit().unwrap();
        assert_eq!(history.past_len(), 1);
        assert_eq!(history.undo_description(), Some("one"));
        assert_eq!(history.redo_description(), Some("two"));

        let mut full = HistoryManager::new(2);
        full.commit(ledger_with(0), "one");
        full.commit(ledger_with(1), "two");
        full.commit(ledger_with(2), "three");
        full.abandon_commit().unwrap();
        assert_eq!(full.past_len(), 2);
        assert_eq!(full.undo(ledger_with(2)).unwrap().description, "two");
        assert_eq!(full.undo(ledger_with(1)).unwrap().description, "one");
    }

    #[test]
    fn abandon_without_pending_commit_is_a_noop() {
        let mut history = HistoryManager::new(0);
        history.commit(ledger_with(0), "ignored");
        assert!(history.abandon_commit().is_none());
        assert!(history.abandon_commit().is_none());

        let mut history = HistoryManager::new(3);
        history.commit(ledger_with(0), "kept");
        history.undo(ledger_with(1)).unwrap();
        assert!(history.abandon_commit().is_none());
        assert!(history.can_redo());
    }
}
