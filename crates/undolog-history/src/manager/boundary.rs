//! Unit boundaries.
//!
//! Every recording call keeps one spare slot reserved in the log it records
//! into, and a call that starts a change claims that slot here for its
//! document. Inserting the boundary at the end of the command consumes the
//! claim, so the push never has to grow the log at a point where failing
//! would lose the unit's edge.

use crate::buffer::UndoBuffer;
use crate::entry::{DocId, LogEntry};
use crate::error::Result;

use super::UndoManager;

/// Where the cursor was when the last boundary was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LastBoundary {
    doc: DocId,
    position: usize,
}

/// Boundary bookkeeping shared by every document of a session.
#[derive(Debug, Default)]
pub(crate) struct BoundaryState {
    last: Option<LastBoundary>,
    /// Document whose log holds a reserved boundary slot.
    pending: Option<DocId>,
}

impl BoundaryState {
    pub(crate) fn last(&self) -> Option<(DocId, usize)> {
        self.last.map(|b| (b.doc, b.position))
    }

    pub(crate) fn pending(&self) -> Option<DocId> {
        self.pending
    }

    /// Cursor position at the last boundary, if that boundary was placed
    /// in `doc`.
    pub(crate) fn position_in(&self, doc: DocId) -> Option<usize> {
        self.last
            .filter(|b| b.doc == doc)
            .map(|b| b.position)
    }

    /// Records that `doc`'s log just reserved a spare slot.
    pub(crate) fn reserve(&mut self, doc: DocId) {
        self.pending = Some(doc);
    }

    /// Consumes the pending slot if it belongs to `doc`. A claim held by
    /// another document is left alone.
    fn take_pending(&mut self, doc: DocId) -> bool {
        if self.pending == Some(doc) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

impl UndoManager {
    /// Marks the end of an undo unit in `buf`'s log.
    ///
    /// Adds a `Boundary` only when the log has entries and is not already
    /// headed by one. Either way the cursor and document are remembered so
    /// the next unit can record where the cursor started.
    ///
    /// # Errors
    ///
    /// Fails only when no slot was reserved for this document and the log
    /// cannot grow.
    pub fn insert_boundary<B: UndoBuffer + ?Sized>(&mut self, buf: &mut B) -> Result<()> {
        if buf.undo_log().is_disabled() {
            return Ok(());
        }

        let doc = buf.doc_id();
        let position = buf.point();
        let log = buf.undo_log_mut();

        if !log.at_boundary() {
            if !self.boundary.take_pending(doc) || !log.has_spare_slot() {
                log.reserve_with_spare(0)?;
            }
            log.push(LogEntry::Boundary);
            tracing::trace!(%doc, position, "undo boundary");
        }

        self.boundary.last = Some(LastBoundary { doc, position });
        Ok(())
    }
}
