/// The document-side interface the undo machinery records against.
use std::rc::Rc;

use chrono::{DateTime, Local};

use crate::entry::{DocId, Marker};
use crate::log::UndoLog;

/// Modification clock pair of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModTicks {
    /// Bumped on every modification.
    pub modified: u64,
    /// Value of `modified` when the document was last saved.
    pub saved: u64,
}

impl ModTicks {
    /// True when there are no unsaved modifications.
    pub fn is_clean(&self) -> bool {
        self.modified <= self.saved
    }
}

/// A document that owns an undo log.
///
/// Offsets are character offsets into the document text.
pub trait UndoBuffer {
    fn doc_id(&self) -> DocId;

    /// Current cursor position.
    fn point(&self) -> usize;

    /// Snapshot of the text in `[start, end)`.
    fn text_range(&self, start: usize, end: usize) -> anyhow::Result<String>;

    /// Live markers of this document.
    fn markers(&self) -> &[Rc<Marker>];

    fn modification_ticks(&self) -> ModTicks;

    /// Modification time of the file this document visits, if any.
    fn visited_file_modtime(&self) -> Option<DateTime<Local>>;

    fn undo_log(&self) -> &UndoLog;

    fn undo_log_mut(&mut self) -> &mut UndoLog;
}
