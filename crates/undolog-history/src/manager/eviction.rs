//! Size accounting and truncation of undo logs.
//!
//! Truncation runs at collection time, never during normal editing. The
//! newest unit always survives; older units are kept while the running size
//! stays under the soft limit and dropped once it passes the strong limit.
//! A newest unit over the outer limit goes to the outer-limit hook first.

use std::cell::Cell;

use crate::buffer::UndoBuffer;
use crate::error::{Result, UndoError};
use crate::log::UndoLog;

use super::UndoManager;

thread_local! {
    /// Depth of active `CollectionGuard`s on the editor thread.
    static COLLECTION_INHIBIT: Cell<usize> = const { Cell::new(0) };
}

/// Whether a collection pass must not start right now.
pub fn collection_inhibited() -> bool {
    COLLECTION_INHIBIT.with(|depth| depth.get() > 0)
}

/// Suppresses nested collection while alive.
#[must_use = "collection is only inhibited while the guard is alive"]
#[derive(Debug)]
pub struct CollectionGuard(());

impl CollectionGuard {
    pub fn acquire() -> Self {
        COLLECTION_INHIBIT.with(|depth| depth.set(depth.get() + 1));
        Self(())
    }
}

impl Drop for CollectionGuard {
    fn drop(&mut self) {
        COLLECTION_INHIBIT.with(|depth| depth.set(depth.get() - 1));
    }
}

/// What a truncation pass did to a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncateOutcome {
    /// The log fit the limits (or was disabled).
    Untouched,
    /// Older entries were cut off.
    Truncated { kept: usize, dropped: usize },
    /// The outer-limit hook took care of the log.
    HandledByHook,
    /// Collection was inhibited; the log was not examined.
    Skipped,
}

/// Stock outer-limit hook: discards the whole log with a warning.
pub fn discard_oversized_unit(log: &mut UndoLog, size: usize) -> anyhow::Result<bool> {
    tracing::warn!(
        size,
        "Undo info for the current command exceeded the outer limit and was discarded"
    );
    log.clear();
    Ok(true)
}

impl UndoLog {
    /// Byte size of the log.
    ///
    /// With `unit_limit` of `n > 0`, counts from the head up to and
    /// including the `n`th boundary crossed; a boundary at the head is
    /// counted but not crossed. `None` or `Some(0)` counts the whole log.
    /// Returns `Ok(None)` for a disabled log.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a negative `unit_limit`.
    pub fn compute_size(&self, unit_limit: Option<i64>) -> Result<Option<usize>> {
        if self.is_disabled() {
            return Ok(None);
        }
        let limit = match unit_limit {
            None | Some(0) => None,
            Some(n) => Some(usize::try_from(n).map_err(|_| {
                UndoError::InvalidArgument(format!("unit limit must be a count, got {n}"))
            })?),
        };

        let mut size = 0;
        let mut crossed = 0;
        for (index, entry) in self.entries.iter().enumerate() {
            size += entry.byte_cost();
            if entry.is_boundary() && index > 0 {
                crossed += 1;
                if limit.is_some_and(|limit| crossed >= limit) {
                    break;
                }
            }
        }
        Ok(Some(size))
    }

    /// Index just past the newest unit and the size up to there, including
    /// a leading boundary.
    fn newest_unit_extent(&self) -> (usize, usize) {
        let mut index = 0;
        let mut size = 0;
        if let Some(head) = self.entries.front().filter(|e| e.is_boundary()) {
            size += head.byte_cost();
            index = 1;
        }
        while let Some(entry) = self.entries.get(index).filter(|e| !e.is_boundary()) {
            size += entry.byte_cost();
            index += 1;
        }
        (index, size)
    }
}

impl UndoManager {
    /// Shrinks `buf`'s log to fit the configured limits.
    ///
    /// Meant to be called from a collection pass. Nested collection is
    /// inhibited until it returns, including while the outer-limit hook runs.
    ///
    /// # Errors
    ///
    /// Propagates a failure of the outer-limit hook; the log is then left
    /// as the hook left it.
    pub fn truncate<B: UndoBuffer + ?Sized>(&mut self, buf: &mut B) -> Result<TruncateOutcome> {
        if collection_inhibited() {
            tracing::debug!("Undo truncation skipped: collection inhibited");
            return Ok(TruncateOutcome::Skipped);
        }
        let _guard = CollectionGuard::acquire();

        let doc = buf.doc_id();
        let log = buf.undo_log_mut();
        if log.is_disabled() {
            return Ok(TruncateOutcome::Untouched);
        }

        let (mut index, mut size) = log.newest_unit_extent();

        if let (Some(outer), Some(hook)) =
            (self.config.undo_outer_limit, self.outer_limit_hook.as_mut())
        {
            if size > outer {
                tracing::debug!(%doc, size, outer, "Newest undo unit exceeds outer limit");
                if hook(&mut *log, size).map_err(UndoError::OuterLimitHook)? {
                    return Ok(TruncateOutcome::HandledByHook);
                }
                // The hook may have edited the log before declining.
                (index, size) = log.newest_unit_extent();
            }
        }

        let total = log.len();
        if index == total {
            return Ok(TruncateOutcome::Untouched);
        }

        // The boundary closing the newest unit is always a valid cut.
        let mut keep = index + 1;
        while index < total {
            let entry = &log.entries[index];
            if entry.is_boundary() {
                if size > self.config.undo_strong_limit {
                    break;
                }
                keep = index + 1;
                if size > self.config.undo_limit {
                    break;
                }
            }
            size += entry.byte_cost();
            index += 1;
        }

        if index == total {
            return Ok(TruncateOutcome::Untouched);
        }

        log.retain_newest(keep);
        let dropped = total - keep;
        tracing::debug!(%doc, kept = keep, dropped, size, "Truncated undo log");
        Ok(TruncateOutcome::Truncated {
            kept: keep,
            dropped,
        })
    }
}
