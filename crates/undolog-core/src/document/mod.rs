//! Document model combining text buffer, point, markers, and undo log.
//!
//! A `Document` is the editor's primitive layer in miniature: every editing
//! operation reports to the `UndoManager` before it touches the text, then
//! applies the edit and keeps point, markers, and text properties in step.
//! Text properties live in the `properties` submodule.

mod properties;

use std::rc::Rc;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use undolog_history::{DocId, Marker, ModTicks, UndoBuffer, UndoLog, UndoManager};

use crate::buffer::TextBuffer;

use properties::PropertySpan;

/// Moves a position past `len` chars inserted at `at`.
///
/// A position exactly at `at` stays put unless it advances with insertions.
fn shift_for_insert(pos: usize, at: usize, len: usize, advances: bool) -> usize {
    if pos > at || (pos == at && advances) {
        pos + len
    } else {
        pos
    }
}

/// Maps a position through the removal of `[from, to)`.
fn shift_for_delete(pos: usize, from: usize, to: usize) -> usize {
    if pos <= from {
        pos
    } else if pos <= to {
        from
    } else {
        pos - (to - from)
    }
}

/// A text document with its cursor, markers, properties, and undo log.
pub struct Document {
    id: DocId,
    buffer: TextBuffer,
    point: usize,
    markers: Vec<Rc<Marker>>,
    /// Bumped on every modification.
    pub modified_tick: u64,
    /// Value of `modified_tick` at the last save.
    pub saved_tick: u64,
    /// Modification time of the visited file when it was last saved.
    visited_modtime: Option<DateTime<Local>>,
    properties: Vec<PropertySpan>,
    log: UndoLog,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("buffer", &self.buffer)
            .field("point", &self.point)
            .field("markers", &self.markers.len())
            .field("modified_tick", &self.modified_tick)
            .field("saved_tick", &self.saved_tick)
            .field("log_len", &self.log.len())
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self {
            buffer: TextBuffer::from(text),
            ..Self::new()
        }
    }
}

impl Document {
    /// Creates an empty, unmodified document with recording enabled.
    pub fn new() -> Self {
        Self {
            id: DocId::next(),
            buffer: TextBuffer::new(),
            point: 0,
            markers: Vec::new(),
            modified_tick: 0,
            saved_tick: 0,
            visited_modtime: None,
            properties: Vec::new(),
            log: UndoLog::new(),
        }
    }

    pub fn id(&self) -> DocId {
        self.id
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    /// Moves the cursor, clamped to the end of the text.
    pub fn set_point(&mut self, pos: usize) {
        self.point = pos.min(self.buffer.len_chars());
    }

    pub fn is_modified(&self) -> bool {
        self.modified_tick > self.saved_tick
    }

    pub fn log(&self) -> &UndoLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut UndoLog {
        &mut self.log
    }

    /// Records a save of the visited file at `modtime`.
    pub fn mark_saved(&mut self, modtime: DateTime<Local>) {
        self.mark_unmodified();
        self.visited_modtime = Some(modtime);
    }

    /// Clears the modified state without touching the visited file time.
    pub fn mark_unmodified(&mut self) {
        self.saved_tick = self.modified_tick;
    }

    /// Creates a marker at `pos` (clamped to the text).
    pub fn make_marker(&mut self, pos: usize, inserted_text_end: bool) -> Rc<Marker> {
        let marker = Rc::new(Marker::new(
            pos.min(self.buffer.len_chars()),
            inserted_text_end,
        ));
        self.markers.push(Rc::clone(&marker));
        marker
    }

    /// Detaches a marker. Returns false if it did not belong to this document.
    pub fn drop_marker(&mut self, marker: &Rc<Marker>) -> bool {
        let before = self.markers.len();
        self.markers.retain(|m| !Rc::ptr_eq(m, marker));
        self.markers.len() != before
    }

    /// Inserts `text` at point, leaving point after it.
    ///
    /// # Errors
    ///
    /// Fails if the recorder cannot log the insertion; the text is then
    /// unchanged.
    pub fn insert(&mut self, recorder: &mut UndoManager, text: &str) -> Result<()> {
        let len = text.chars().count();
        if len == 0 {
            return Ok(());
        }
        let at = self.point;
        recorder
            .record_insert(self, at, len)
            .context("recording insertion")?;
        self.buffer.insert(at, text)?;

        for marker in &self.markers {
            marker.set_position(shift_for_insert(
                marker.position(),
                at,
                len,
                marker.inserted_text_end(),
            ));
        }
        properties::shift_for_insert(&mut self.properties, at, len);
        self.point = at + len;
        self.touch();
        Ok(())
    }

    /// Deletes `[from, to)`, recording marker adjustments.
    ///
    /// # Errors
    ///
    /// Fails on an out-of-range span or if the recorder cannot log the
    /// deletion.
    pub fn delete_range(
        &mut self,
        recorder: &mut UndoManager,
        from: usize,
        to: usize,
    ) -> Result<()> {
        let text = self
            .buffer
            .slice_to_string(from, to)
            .with_context(|| format!("deleting {from}..{to}"))?;
        if text.is_empty() {
            return Ok(());
        }
        recorder
            .record_delete(self, from, &text, true)
            .context("recording deletion")?;
        self.buffer.remove(from, to)?;

        for marker in &self.markers {
            marker.set_position(shift_for_delete(marker.position(), from, to));
        }
        properties::shift_for_delete(&mut self.properties, from, to);
        self.point = shift_for_delete(self.point, from, to);
        self.touch();
        Ok(())
    }

    /// Overwrites the text at `beg` with `text` of the same length.
    ///
    /// Markers and point stay where they are.
    ///
    /// # Errors
    ///
    /// Fails if the replaced span runs past the end of the text or the
    /// recorder cannot log the change.
    pub fn replace_range(
        &mut self,
        recorder: &mut UndoManager,
        beg: usize,
        text: &str,
    ) -> Result<()> {
        let len = text.chars().count();
        let end = beg + len;
        if end > self.buffer.len_chars() {
            anyhow::bail!(
                "replacement {}..{} out of bounds (document has {} chars)",
                beg,
                end,
                self.buffer.len_chars()
            );
        }
        recorder
            .record_change(self, beg, len)
            .context("recording replacement")?;
        self.buffer.overwrite(beg, text)?;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.modified_tick += 1;
    }
}

impl UndoBuffer for Document {
    fn doc_id(&self) -> DocId {
        self.id
    }

    fn point(&self) -> usize {
        self.point
    }

    fn text_range(&self, start: usize, end: usize) -> Result<String> {
        self.buffer.slice_to_string(start, end)
    }

    fn markers(&self) -> &[Rc<Marker>] {
        &self.markers
    }

    fn modification_ticks(&self) -> ModTicks {
        ModTicks {
            modified: self.modified_tick,
            saved: self.saved_tick,
        }
    }

    fn visited_file_modtime(&self) -> Option<DateTime<Local>> {
        self.visited_modtime
    }

    fn undo_log(&self) -> &UndoLog {
        &self.log
    }

    fn undo_log_mut(&mut self) -> &mut UndoLog {
        &mut self.log
    }
}
