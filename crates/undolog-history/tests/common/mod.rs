//! Shared test document for the history integration tests.

#![allow(dead_code)]

use std::rc::Rc;

use chrono::{DateTime, Local};
use undolog_history::{DocId, LogEntry, Marker, ModTicks, UndoBuffer, UndoLog, UndoManager};

/// Plain-string document that applies its own edits.
pub struct Doc {
    pub id: DocId,
    pub text: Vec<char>,
    pub point: usize,
    pub markers: Vec<Rc<Marker>>,
    pub ticks: ModTicks,
    pub modtime: Option<DateTime<Local>>,
    pub log: UndoLog,
}

impl Doc {
    pub fn new(text: &str) -> Self {
        Self {
            id: DocId::next(),
            text: text.chars().collect(),
            point: 0,
            markers: Vec::new(),
            ticks: ModTicks::default(),
            modtime: None,
            log: UndoLog::new(),
        }
    }

    pub fn type_str(&mut self, mgr: &mut UndoManager, s: &str) {
        for c in s.chars() {
            mgr.record_insert(self, self.point, 1).unwrap();
            self.text.insert(self.point, c);
            self.point += 1;
            self.ticks.modified += 1;
        }
    }

    pub fn backspace(&mut self, mgr: &mut UndoManager) {
        let beg = self.point - 1;
        let removed = self.text[beg].to_string();
        mgr.record_delete(self, beg, &removed, true).unwrap();
        self.text.remove(beg);
        self.point = beg;
        self.ticks.modified += 1;
    }

    pub fn save(&mut self) {
        self.ticks.saved = self.ticks.modified;
        self.modtime = Some(Local::now());
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.log.entries().cloned().collect()
    }
}

impl UndoBuffer for Doc {
    fn doc_id(&self) -> DocId {
        self.id
    }

    fn point(&self) -> usize {
        self.point
    }

    fn text_range(&self, start: usize, end: usize) -> anyhow::Result<String> {
        let slice = self
            .text
            .get(start..end)
            .ok_or_else(|| anyhow::anyhow!("range {start}..{end} out of bounds"))?;
        Ok(slice.iter().collect())
    }

    fn markers(&self) -> &[Rc<Marker>] {
        &self.markers
    }

    fn modification_ticks(&self) -> ModTicks {
        self.ticks
    }

    fn visited_file_modtime(&self) -> Option<DateTime<Local>> {
        self.modtime
    }

    fn undo_log(&self) -> &UndoLog {
        &self.log
    }

    fn undo_log_mut(&mut self) -> &mut UndoLog {
        &mut self.log
    }
}
