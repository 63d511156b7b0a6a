/// Core types for undo log entries.
use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local};
use serde_json::Value;

/// Cost of the chain link every entry occupies.
pub const LINK_COST: usize = 16;

/// Cost of the extra cell held by compound entries.
pub const CELL_COST: usize = 16;

/// Fixed cost of a saved text payload, on top of its characters.
pub const STRING_HEADER_COST: usize = 31;

/// Identifies a document across the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocId(u64);

/// Counter for allocating document ids within a session.
static NEXT_DOC_ID: AtomicU64 = AtomicU64::new(1);

impl DocId {
    /// Allocates a fresh, never reused document id.
    pub fn next() -> Self {
        Self(NEXT_DOC_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc-{}", self.0)
    }
}

/// A live position handle into a document's text.
///
/// Owned by the document through `Rc<Marker>`. The log only ever keeps a
/// `Weak` to it, so a marker dies with its last document-side owner.
#[derive(Debug)]
pub struct Marker {
    position: Cell<usize>,
    /// Whether the marker advances past text inserted at its position.
    inserted_text_end: bool,
}

impl Marker {
    pub fn new(position: usize, inserted_text_end: bool) -> Self {
        Self {
            position: Cell::new(position),
            inserted_text_end,
        }
    }

    pub fn position(&self) -> usize {
        self.position.get()
    }

    pub fn set_position(&self, position: usize) {
        self.position.set(position);
    }

    pub fn inserted_text_end(&self) -> bool {
        self.inserted_text_end
    }
}

/// Reverses a marker's automatic adjustment during a deletion.
#[derive(Debug, Clone)]
pub struct MarkerShift {
    marker: Weak<Marker>,
    delta: isize,
}

impl MarkerShift {
    pub fn new(marker: &Rc<Marker>, delta: isize) -> Self {
        Self {
            marker: Rc::downgrade(marker),
            delta,
        }
    }

    /// The marker, if the document still holds it.
    pub fn live_marker(&self) -> Option<Rc<Marker>> {
        self.marker.upgrade()
    }

    /// Amount to subtract from the marker's position on undo.
    pub fn delta(&self) -> isize {
        self.delta
    }

    /// Whether this entry refers to `marker`.
    pub fn refers_to(&self, marker: &Rc<Marker>) -> bool {
        std::ptr::eq(self.marker.as_ptr(), Rc::as_ptr(marker))
    }
}

impl PartialEq for MarkerShift {
    fn eq(&self, other: &Self) -> bool {
        self.delta == other.delta && Weak::ptr_eq(&self.marker, &other.marker)
    }
}

/// A text property overwritten in some document.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    /// Document whose text carried the property. May differ from the
    /// document whose log holds this entry.
    pub doc: DocId,
    /// Property name.
    pub prop: String,
    /// Value before the change; `Value::Null` when the property was unset.
    pub old_value: Value,
    pub start: usize,
    pub end: usize,
}

/// A single record in an undo log.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEntry {
    /// Separates undo units.
    Boundary,
    /// Text was inserted in `[start, end)`.
    Insert { start: usize, end: usize },
    /// `text` was removed starting at `at.unsigned_abs()`. A negative `at`
    /// means the cursor sat after the text and lands there again on undo.
    Delete { text: String, at: isize },
    /// Cursor position before the unit started recording.
    PointMove(usize),
    MarkerShift(MarkerShift),
    PropertyChange(PropertyChange),
    /// The document was unmodified before this edit. Carries the visited
    /// file's modification time at that moment.
    FirstChange(Option<DateTime<Local>>),
}

impl LogEntry {
    pub fn is_boundary(&self) -> bool {
        matches!(self, LogEntry::Boundary)
    }

    /// Bytes this entry is charged by the size accountant.
    pub fn byte_cost(&self) -> usize {
        match self {
            LogEntry::Boundary | LogEntry::PointMove(_) => LINK_COST,
            LogEntry::Delete { text, .. } => {
                LINK_COST + CELL_COST + STRING_HEADER_COST + text.chars().count()
            }
            _ => LINK_COST + CELL_COST,
        }
    }
}
