//! The undo manager: change recording, unit boundaries, and eviction.
//!
//! One `UndoManager` serves every document of a session. Each document owns
//! its `UndoLog`; the manager keeps only the state that spans documents (the
//! last boundary's position, the pending boundary slot) plus configuration
//! and the two callbacks. Recording lives in the `record` submodule, unit
//! boundaries in `boundary`, and size accounting and truncation in
//! `eviction`.

mod boundary;
pub mod eviction;
mod record;

use crate::config::HistoryConfig;
use crate::entry::DocId;
use crate::log::UndoLog;

use boundary::BoundaryState;

/// Called when a unit's size passes the outer limit. Receives the log and
/// the size of its newest unit; returns `true` when it fully handled the
/// eviction itself.
pub type OuterLimitHook = Box<dyn FnMut(&mut UndoLog, usize) -> anyhow::Result<bool>>;

/// Called once per document when it gets its first undoable change since
/// its flag was last reset.
pub type FirstChangeListener = Box<dyn FnMut(DocId)>;

/// Records edits into document undo logs and keeps them bounded.
///
/// Single-threaded: every call runs synchronously on the editor's command
/// thread.
pub struct UndoManager {
    config: HistoryConfig,
    boundary: BoundaryState,
    outer_limit_hook: Option<OuterLimitHook>,
    first_change_listener: Option<FirstChangeListener>,
}

impl std::fmt::Debug for UndoManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UndoManager")
            .field("config", &self.config)
            .field("boundary", &self.boundary)
            .field("has_outer_limit_hook", &self.outer_limit_hook.is_some())
            .field(
                "has_first_change_listener",
                &self.first_change_listener.is_some(),
            )
            .finish()
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl UndoManager {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            config,
            boundary: BoundaryState::default(),
            outer_limit_hook: None,
            first_change_listener: None,
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Mutable access to limits and the point-recording switch. Changes take
    /// effect on the next call.
    pub fn config_mut(&mut self) -> &mut HistoryConfig {
        &mut self.config
    }

    /// Installs the outer-limit hook, replacing any previous one.
    pub fn set_outer_limit_hook(&mut self, hook: OuterLimitHook) {
        self.outer_limit_hook = Some(hook);
    }

    /// Removes the outer-limit hook; oversized units then go through the
    /// tiered walk like any other.
    pub fn clear_outer_limit_hook(&mut self) -> Option<OuterLimitHook> {
        self.outer_limit_hook.take()
    }

    /// Registers the first-undoable-change listener.
    pub fn on_first_undoable_change(&mut self, listener: FirstChangeListener) {
        self.first_change_listener = Some(listener);
    }

    /// Document and cursor position recorded by the last `insert_boundary`.
    pub fn last_boundary(&self) -> Option<(DocId, usize)> {
        self.boundary.last()
    }

    /// Document whose log most recently claimed the boundary slot and has
    /// not yet consumed it with a boundary.
    pub fn pending_boundary(&self) -> Option<DocId> {
        self.boundary.pending()
    }
}
