//! Change recording.
//!
//! Every entry point reserves room for all the entries it may add before
//! adding any, so a failed reservation leaves the log as it was.

use std::rc::Rc;

use serde_json::Value;

use crate::buffer::UndoBuffer;
use crate::entry::{LogEntry, Marker, MarkerShift, PropertyChange};
use crate::error::{Result, UndoError};

use super::UndoManager;

/// `FirstChange` and `PointMove` may precede the payload entries.
const PREAMBLE_ENTRIES: usize = 2;

impl UndoManager {
    /// Records an insertion of `length` chars at `beg`.
    ///
    /// Extends the head `Insert` when it ends exactly at `beg`, so typing
    /// a run of characters yields one entry.
    pub fn record_insert<B: UndoBuffer + ?Sized>(
        &mut self,
        buf: &mut B,
        beg: usize,
        length: usize,
    ) -> Result<()> {
        if buf.undo_log().is_disabled() {
            return Ok(());
        }
        buf.undo_log_mut().reserve_with_spare(PREAMBLE_ENTRIES + 1)?;
        self.record_point(buf, beg);

        let log = buf.undo_log_mut();
        if let Some(LogEntry::Insert { end, .. }) = log.head_mut() {
            if *end == beg {
                *end = beg + length;
                return Ok(());
            }
        }
        log.push(LogEntry::Insert {
            start: beg,
            end: beg + length,
        });
        Ok(())
    }

    /// Records that `text` is about to be deleted at `beg`.
    ///
    /// With `record_markers`, marker adjustments are recorded right before
    /// the `Delete` entry.
    pub fn record_delete<B: UndoBuffer + ?Sized>(
        &mut self,
        buf: &mut B,
        beg: usize,
        text: &str,
        record_markers: bool,
    ) -> Result<()> {
        if buf.undo_log().is_disabled() {
            return Ok(());
        }
        let end = beg + text.chars().count();
        let shifts = if record_markers {
            marker_adjustments(buf.markers(), beg, end)
        } else {
            Vec::new()
        };
        buf.undo_log_mut().reserve_with_spare(PREAMBLE_ENTRIES + shifts.len() + 1)?;

        let point = buf.point();
        let at = if point == end {
            self.record_point(buf, point);
            -(beg as isize)
        } else {
            self.record_point(buf, beg);
            beg as isize
        };
        if record_markers {
            self.begin_change(buf);
        }

        let log = buf.undo_log_mut();
        for shift in shifts {
            log.push(LogEntry::MarkerShift(shift));
        }
        log.push(LogEntry::Delete {
            text: text.to_string(),
            at,
        });
        Ok(())
    }

    /// Records an in-place, length-preserving replacement of `length` chars
    /// at `beg`. Call before the text changes.
    pub fn record_change<B: UndoBuffer + ?Sized>(
        &mut self,
        buf: &mut B,
        beg: usize,
        length: usize,
    ) -> Result<()> {
        if buf.undo_log().is_disabled() {
            return Ok(());
        }
        let text = buf.text_range(beg, beg + length).map_err(UndoError::Buffer)?;
        // Room for both halves up front.
        buf.undo_log_mut().reserve_with_spare(2 * (PREAMBLE_ENTRIES + 1))?;
        self.record_delete(buf, beg, &text, false)?;
        self.record_insert(buf, beg, length)
    }

    /// Records that an unmodified document is about to change.
    ///
    /// Adds `FirstChange` only while the modification clock is clean, and at
    /// most once per clock value. Neither claims the boundary slot nor fires
    /// the notification.
    pub fn record_first_change<B: UndoBuffer + ?Sized>(&mut self, buf: &mut B) -> Result<()> {
        if buf.undo_log().is_disabled() {
            return Ok(());
        }
        buf.undo_log_mut().reserve_with_spare(1)?;
        push_first_change(buf);
        Ok(())
    }

    /// Records that property `prop` of `target`, previously `old_value`, is
    /// being overwritten on `length` chars at `beg`.
    ///
    /// The entry goes into `target`'s log, whichever document the command
    /// is running in.
    pub fn record_property_change<B: UndoBuffer + ?Sized>(
        &mut self,
        target: &mut B,
        beg: usize,
        length: usize,
        prop: &str,
        old_value: Value,
    ) -> Result<()> {
        if target.undo_log().is_disabled() {
            return Ok(());
        }
        target.undo_log_mut().reserve_with_spare(PREAMBLE_ENTRIES)?;
        self.begin_change(target);
        push_first_change(target);

        let doc = target.doc_id();
        target
            .undo_log_mut()
            .push(LogEntry::PropertyChange(PropertyChange {
                doc,
                prop: prop.to_string(),
                old_value,
                start: beg,
                end: beg + length,
            }));
        Ok(())
    }

    /// Claims the boundary slot for `buf`'s log and fires the
    /// first-undoable-change notification. The log's capacity must already
    /// be reserved.
    fn begin_change<B: UndoBuffer + ?Sized>(&mut self, buf: &mut B) {
        let doc = buf.doc_id();
        self.boundary.reserve(doc);

        if buf.undo_log_mut().mark_undoably_changed() {
            tracing::debug!(%doc, "first undoable change");
            if let Some(listener) = self.first_change_listener.as_mut() {
                listener(doc);
            }
        }
    }

    /// Starts a text change and records where the cursor was when this unit
    /// started, if undoing the unit would not put it back there by itself.
    ///
    /// `pt` is where undoing the upcoming entry will leave the cursor. The
    /// cursor is only recorded at a unit boundary placed in this same
    /// document. Does nothing at all while point recording is inhibited.
    fn record_point<B: UndoBuffer + ?Sized>(&mut self, buf: &mut B, pt: usize) {
        if self.config.inhibit_record_point {
            return;
        }
        self.begin_change(buf);

        let at_boundary = buf.undo_log().at_boundary();
        push_first_change(buf);
        if !at_boundary {
            return;
        }
        if let Some(position) = self.boundary.position_in(buf.doc_id()) {
            if position != pt {
                buf.undo_log_mut().push(LogEntry::PointMove(position));
            }
        }
    }
}

/// Adjustments that undoing a deletion of `[from, to]` must apply to
/// markers inside that range.
///
/// A marker that stays before re-inserted text must move to where it was;
/// one that advances past it must be pulled back.
fn marker_adjustments(markers: &[Rc<Marker>], from: usize, to: usize) -> Vec<MarkerShift> {
    markers
        .iter()
        .filter_map(|marker| {
            let position = marker.position();
            if position < from || position > to {
                return None;
            }
            let settled = if marker.inserted_text_end() { to } else { from };
            let delta = settled as isize - position as isize;
            (delta != 0).then(|| MarkerShift::new(marker, delta))
        })
        .collect()
}

/// Adds `FirstChange` if the document is clean and none was recorded at
/// the current clock value. Capacity must already be reserved.
fn push_first_change<B: UndoBuffer + ?Sized>(buf: &mut B) {
    let ticks = buf.modification_ticks();
    if !ticks.is_clean() || buf.undo_log().first_change_tick() == Some(ticks.modified) {
        return;
    }
    let modtime = buf.visited_file_modtime();
    let log = buf.undo_log_mut();
    log.push(LogEntry::FirstChange(modtime));
    log.set_first_change_tick(ticks.modified);
}
