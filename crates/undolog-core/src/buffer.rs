//! Char-addressed text storage for reference documents.
//!
//! Every offset is a char index, the same unit undo entries carry, so a
//! span read here can be stored in a `Delete` entry and put back verbatim.

use std::fmt;
use std::ops::Range;

use anyhow::Result;
use ropey::Rope;

/// Document text, backed by a rope.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rope)
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Inserts `text` before char `at`. `at == len_chars()` appends.
    pub fn insert(&mut self, at: usize, text: &str) -> Result<()> {
        let len = self.len_chars();
        if at > len {
            anyhow::bail!("cannot insert at char {at}: text ends at {len}");
        }
        self.rope.insert(at, text);
        Ok(())
    }

    /// Removes chars `[start, end)`.
    pub fn remove(&mut self, start: usize, end: usize) -> Result<()> {
        let span = self.span(start, end)?;
        self.rope.remove(span);
        Ok(())
    }

    /// Copy of chars `[start, end)`.
    pub fn slice_to_string(&self, start: usize, end: usize) -> Result<String> {
        let span = self.span(start, end)?;
        Ok(self.rope.slice(span).to_string())
    }

    /// Replaces as many chars at `at` as `text` holds, keeping the length.
    pub fn overwrite(&mut self, at: usize, text: &str) -> Result<()> {
        let span = self.span(at, at + text.chars().count())?;
        self.rope.remove(span);
        self.rope.insert(at, text);
        Ok(())
    }

    fn span(&self, start: usize, end: usize) -> Result<Range<usize>> {
        let len = self.len_chars();
        if start > end || end > len {
            anyhow::bail!("span {start}..{end} is not within the text (0..{len})");
        }
        Ok(start..end)
    }
}
