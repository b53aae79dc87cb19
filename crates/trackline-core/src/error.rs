//! Error types for the document and cache layer.

use thiserror::Error;

/// Errors that can occur in the document model or its storage.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("cannot remove the block at the document end")]
    BlockAtDocumentEnd,

    #[error("block has no preceding block to merge into")]
    NoPrecedingBlock,

    #[error("unknown block id {0}")]
    UnknownBlock(u64),

    #[error("unknown named range id {0}")]
    UnknownRange(u64),

    #[error("no file path set")]
    NoFilePath,

    #[error("content producer returned no blocks")]
    EmptyContent,

    #[error("{0}")]
    Producer(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
