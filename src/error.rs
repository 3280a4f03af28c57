//! Error types for reconciliation and surface updates.

/// Which side of a sequence pair an item came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Old,
    New,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Old => f.write_str("old"),
            Side::New => f.write_str("new"),
        }
    }
}

/// Errors raised while computing an edit script.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// An identity key occurs more than once within one sequence.
    #[error("duplicate key {key} in {side} sequence at index {index} (first seen at index {first_index})")]
    InvalidInput {
        side: Side,
        index: usize,
        first_index: usize,
        key: String,
    },
}

/// Errors raised when an edit script does not fit the row counts it is laid out against.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("{side} row index {index} out of bounds (row count {len})")]
    IndexOutOfBounds { side: Side, index: usize, len: usize },

    #[error("old row {index} is deleted or moved more than once")]
    SourceReused { index: usize },

    #[error("new row {index} is targeted more than once")]
    TargetConflict { index: usize },

    #[error("script expects {expected} rows after update, found {actual}")]
    CountMismatch { expected: usize, actual: usize },
}

/// Errors raised by a rendering surface while applying edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("section {section} does not exist (surface has {sections} section(s))")]
    NoSuchSection { section: usize, sections: usize },

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Errors raised by the full reconcile-and-apply step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReloadError {
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}
