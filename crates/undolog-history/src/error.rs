/// Errors raised while recording into or shrinking an undo log.
use std::collections::TryReserveError;

/// Result alias used throughout the history crate.
pub type Result<T> = std::result::Result<T, UndoError>;

#[derive(Debug, thiserror::Error)]
pub enum UndoError {
    /// A caller-supplied argument was out of range. Nothing was changed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The log could not grow to hold the entries of a recording call.
    #[error("failed to reserve undo log capacity: {0}")]
    AllocationFailed(#[from] TryReserveError),

    /// The document could not provide the text needed for a snapshot.
    #[error("failed to read document text: {0}")]
    Buffer(#[source] anyhow::Error),

    /// The outer-limit hook returned an error.
    #[error("outer limit hook failed: {0}")]
    OuterLimitHook(#[source] anyhow::Error),
}
