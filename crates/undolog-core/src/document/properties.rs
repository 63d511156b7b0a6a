//! Text properties: named values over char ranges.
//!
//! Spans are kept in the order they were put; the latest span covering a
//! position wins. A position no span covers has the value `Null`.

use anyhow::{Context, Result};
use serde_json::Value;
use undolog_history::UndoManager;

use super::Document;

#[derive(Debug, Clone, PartialEq)]
pub(super) struct PropertySpan {
    start: usize,
    end: usize,
    name: String,
    value: Value,
}

/// Text inserted at a span's start lands outside it; at its end, too.
pub(super) fn shift_for_insert(spans: &mut [PropertySpan], at: usize, len: usize) {
    for span in spans {
        if span.start >= at {
            span.start += len;
        }
        if span.end > at {
            span.end += len;
        }
    }
}

pub(super) fn shift_for_delete(spans: &mut Vec<PropertySpan>, from: usize, to: usize) {
    for span in spans.iter_mut() {
        span.start = super::shift_for_delete(span.start, from, to);
        span.end = super::shift_for_delete(span.end, from, to);
    }
    spans.retain(|span| span.start < span.end);
}

impl Document {
    /// Value of property `name` at `pos`.
    pub fn property_at(&self, pos: usize, name: &str) -> Value {
        self.properties
            .iter()
            .rev()
            .find(|span| span.name == name && span.start <= pos && pos < span.end)
            .map_or(Value::Null, |span| span.value.clone())
    }

    /// Sets property `name` to `value` over `[from, to)`.
    ///
    /// Each run of chars whose old value differs from `value` is recorded
    /// as one property change. Nothing is recorded or modified when every
    /// char already has `value`.
    ///
    /// # Errors
    ///
    /// Fails on an out-of-range span or if the recorder cannot log a run.
    pub fn put_property(
        &mut self,
        recorder: &mut UndoManager,
        from: usize,
        to: usize,
        name: &str,
        value: Value,
    ) -> Result<()> {
        if from > to || to > self.buffer.len_chars() {
            anyhow::bail!(
                "property range {}..{} out of bounds (document has {} chars)",
                from,
                to,
                self.buffer.len_chars()
            );
        }

        let runs = self.changed_runs(from, to, name, &value);
        if runs.is_empty() {
            return Ok(());
        }
        for (start, end, old_value) in runs {
            recorder
                .record_property_change(self, start, end - start, name, old_value)
                .with_context(|| format!("recording property {name} over {start}..{end}"))?;
        }

        self.properties.push(PropertySpan {
            start: from,
            end: to,
            name: name.to_string(),
            value,
        });
        self.touch();
        Ok(())
    }

    /// Maximal runs in `[from, to)` of uniform old value differing from
    /// `value`.
    fn changed_runs(
        &self,
        from: usize,
        to: usize,
        name: &str,
        value: &Value,
    ) -> Vec<(usize, usize, Value)> {
        let mut runs: Vec<(usize, usize, Value)> = Vec::new();
        for pos in from..to {
            let old = self.property_at(pos, name);
            if old == *value {
                continue;
            }
            match runs.last_mut() {
                Some((_, end, run_value)) if *end == pos && *run_value == old => *end = pos + 1,
                _ => runs.push((pos, pos + 1, old)),
            }
        }
        runs
    }
}
