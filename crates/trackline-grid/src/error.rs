//! Error types for the grid engine.

use thiserror::Error;

/// Errors that can occur constructing or updating a grid.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("grid has no rows")]
    EmptyGrid,

    #[error("all rows must be the same length: row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("header index {index} for field {field:?} is out of bounds for width {width}")]
    HeaderOutOfBounds {
        field: String,
        index: usize,
        width: usize,
    },

    #[error("one-based header index for field {field:?} must be at least 1")]
    OneBasedIndexZero { field: String },

    #[error("cannot map more fields ({fields}) than there are columns ({width})")]
    TooManyHeaders { fields: usize, width: usize },

    #[error("at least one field must be mapped")]
    NoHeaders,

    #[error("fields {first:?} and {second:?} both map to column {index}")]
    DuplicateHeaderIndex {
        first: String,
        second: String,
        index: usize,
    },

    #[error("duplicate field name {0:?}")]
    DuplicateField(String),

    #[error("unknown field {0:?}")]
    UnknownField(String),

    #[error("cannot mix scalar and column values across fields (field {field:?})")]
    MixedFieldShapes { field: String },

    #[error("column {field:?} has {len} values, expected {expected}")]
    ColumnLengthMismatch {
        field: String,
        len: usize,
        expected: usize,
    },

    #[error("mismatched row counts: {left} vs {right}")]
    RowCountMismatch { left: usize, right: usize },

    #[error("mismatched row lengths at row {row}: {left} vs {right}")]
    RowLengthMismatch {
        row: usize,
        left: usize,
        right: usize,
    },
}

pub type Result<T> = std::result::Result<T, GridError>;
