//! Error types for core operations.

use thiserror::Error;

/// Errors raised by core data structures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A selection grid was requested with a negative size.
    #[error("Invalid selection grid dimension: {rows} x {columns}")]
    InvalidDimension {
        /// Requested row count.
        rows: i64,
        /// Requested column count.
        columns: i64,
    },

    /// A selection grid was requested with more cells than it may hold.
    #[error("Selection grid too large: {rows} x {columns} exceeds {max} cells")]
    GridTooLarge {
        /// Requested row count.
        rows: i64,
        /// Requested column count.
        columns: i64,
        /// Largest accepted cell count.
        max: usize,
    },
}
