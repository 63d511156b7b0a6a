/// Per-document edit-history log.
///
/// Provides an `UndoManager` that records reversible edits into each
/// document's `UndoLog`, separates them into undo units with boundaries, and
/// shrinks the log at collection time under a three-tier size policy.
/// Documents plug in through the `UndoBuffer` trait.
pub mod buffer;
pub mod config;
pub mod entry;
pub mod error;
pub mod log;
pub mod manager;

pub use buffer::{ModTicks, UndoBuffer};
pub use config::HistoryConfig;
pub use entry::{DocId, LogEntry, Marker, MarkerShift, PropertyChange};
pub use error::{Result, UndoError};
pub use log::UndoLog;
pub use manager::eviction::{
    collection_inhibited, discard_oversized_unit, CollectionGuard, TruncateOutcome,
};
pub use manager::{FirstChangeListener, OuterLimitHook, UndoManager};
