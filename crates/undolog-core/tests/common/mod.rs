//! Minimal undo replay for exercising recorded logs end to end.
//!
//! Walks units head first and applies the inverse of each entry through the
//! document's own editing operations, like an editor's undo command would.

#![allow(dead_code)]

use anyhow::Result;
use undolog_core::Document;
use undolog_history::{LogEntry, UndoBuffer, UndoLog, UndoManager};

/// Splits the log into units, newest first, dropping boundaries.
pub fn units(log: &UndoLog) -> Vec<Vec<LogEntry>> {
    let mut units = Vec::new();
    let mut current = Vec::new();
    for entry in log.entries() {
        if entry.is_boundary() {
            if !current.is_empty() {
                units.push(std::mem::take(&mut current));
            }
        } else {
            current.push(entry.clone());
        }
    }
    if !current.is_empty() {
        units.push(current);
    }
    units
}

/// Undoes the `count` newest units of `doc`.
///
/// The units are taken from the log before anything is replayed, so the
/// entries the replay itself records are never undone.
pub fn undo(mgr: &mut UndoManager, doc: &mut Document, count: usize) -> Result<()> {
    let pending: Vec<_> = units(doc.log()).into_iter().take(count).collect();
    mgr.insert_boundary(doc)?;
    for unit in pending {
        for entry in unit {
            apply_inverse(mgr, doc, entry)?;
        }
        mgr.insert_boundary(doc)?;
    }
    Ok(())
}

fn apply_inverse(mgr: &mut UndoManager, doc: &mut Document, entry: LogEntry) -> Result<()> {
    match entry {
        LogEntry::Boundary => {}
        LogEntry::Insert { start, end } => {
            doc.delete_range(mgr, start, end)?;
            doc.set_point(start);
        }
        LogEntry::Delete { text, at } => {
            let pos = at.unsigned_abs();
            doc.set_point(pos);
            doc.insert(mgr, &text)?;
            if at >= 0 {
                doc.set_point(pos);
            }
        }
        LogEntry::PointMove(pos) => doc.set_point(pos),
        LogEntry::MarkerShift(shift) => {
            if let Some(marker) = shift.live_marker() {
                let restored = marker.position() as isize - shift.delta();
                marker.set_position(restored.max(0) as usize);
            }
        }
        LogEntry::PropertyChange(change) => {
            anyhow::ensure!(
                change.doc == doc.doc_id(),
                "property change for {} replayed in {}",
                change.doc,
                doc.doc_id()
            );
            doc.put_property(mgr, change.start, change.end, &change.prop, change.old_value)?;
        }
        LogEntry::FirstChange(modtime) => {
            if modtime == doc.visited_file_modtime() {
                doc.mark_unmodified();
            }
        }
    }
    Ok(())
}
