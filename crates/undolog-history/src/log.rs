/// The per-document undo log.
use std::collections::VecDeque;

use crate::entry::LogEntry;
use crate::error::Result;

/// Ordered record of a document's reversible edits, newest first.
///
/// Entries are only appended by the `UndoManager` recording calls and only
/// removed by truncation, an outer-limit hook, or `disable()`.
#[derive(Debug, Clone, Default)]
pub struct UndoLog {
    /// Entries with the head (most recent) at index 0.
    pub(crate) entries: VecDeque<LogEntry>,
    disabled: bool,
    /// Edge-trigger for the first-undoable-change notification.
    undoably_changed: bool,
    /// Modification tick at which the last `FirstChange` was recorded.
    first_change_tick: Option<u64>,
}

impl UndoLog {
    /// Creates an empty, recording log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log that never records.
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Stops recording and discards every entry.
    pub fn disable(&mut self) {
        self.disabled = true;
        self.entries = VecDeque::new();
        self.first_change_tick = None;
    }

    /// Resumes recording into an empty log.
    pub fn enable(&mut self) {
        self.disabled = false;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry.
    pub fn head(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Iterates entries from newest to oldest.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        self.entries.iter()
    }

    /// Whether the log sits between units: empty, or headed by a boundary.
    pub fn at_boundary(&self) -> bool {
        self.head().is_none_or(LogEntry::is_boundary)
    }

    /// Number of units, counting a trailing unit without a boundary.
    pub fn unit_count(&self) -> usize {
        let mut units = 0;
        let mut in_unit = false;
        for entry in &self.entries {
            if entry.is_boundary() {
                if in_unit {
                    units += 1;
                }
                in_unit = false;
            } else {
                in_unit = true;
            }
        }
        units + usize::from(in_unit)
    }

    /// Drops every entry, keeping the log enabled.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keeps the `len` newest entries and drops the rest.
    pub fn retain_newest(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// Whether the first-undoable-change notification has fired since the
    /// last reset.
    pub fn undoably_changed(&self) -> bool {
        self.undoably_changed
    }

    /// Re-arms the first-undoable-change notification.
    pub fn reset_undoably_changed(&mut self) {
        self.undoably_changed = false;
    }

    /// Sets the undoably-changed flag, returning whether it was clear.
    pub(crate) fn mark_undoably_changed(&mut self) -> bool {
        !std::mem::replace(&mut self.undoably_changed, true)
    }

    pub(crate) fn first_change_tick(&self) -> Option<u64> {
        self.first_change_tick
    }

    pub(crate) fn set_first_change_tick(&mut self, tick: u64) {
        self.first_change_tick = Some(tick);
    }

    /// Ensures room for `additional` entries plus one spare boundary slot.
    ///
    /// Once this succeeds, pushing up to `additional` entries and then a
    /// boundary does not allocate.
    pub(crate) fn reserve_with_spare(&mut self, additional: usize) -> Result<()> {
        self.entries.try_reserve(additional + 1)?;
        Ok(())
    }

    /// Whether a boundary can be pushed without allocating.
    pub(crate) fn has_spare_slot(&self) -> bool {
        self.entries.capacity() > self.entries.len()
    }

    /// Prepends an entry. Callers reserve capacity first.
    pub(crate) fn push(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
    }

    pub(crate) fn head_mut(&mut self) -> Option<&mut LogEntry> {
        self.entries.front_mut()
    }
}
