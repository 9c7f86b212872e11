//! Error types for the save/load boundary.
//!
//! The simulation itself is total: placement, deletion, and the tick all
//! return discrete outcomes rather than errors. Errors only arise at the
//! IO boundary when reading or writing persisted state.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for save/load operations.
#[derive(Debug, Error)]
pub enum GameError {
    /// Underlying IO failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A tile value in a legacy save was not a valid deposit code.
    #[error("invalid deposit code '{token}' at row {row}, column {column}")]
    InvalidDepositCode {
        /// The offending token.
        token: String,
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        column: usize,
    },

    /// Rows of a legacy save had inconsistent lengths.
    #[error("ragged save data: row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Tiles found in the row.
        found: usize,
        /// Tiles expected (width of the first row).
        expected: usize,
    },

    /// The save contained no tiles at all.
    #[error("save data is empty")]
    EmptySave,

    /// A full-session snapshot failed to encode or decode.
    #[error("snapshot error: {0}")]
    Snapshot(String),
}
