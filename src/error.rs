use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while opening or decoding a heap dump.
///
/// Every decode failure is fatal for the pass: `Heap::load` aborts and no
/// partial heap is returned. Queries on a successfully loaded heap never
/// fail; missing lookups return `None`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open heap dump {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a go1.3 or go1.7 heap dump")]
    InvalidHeapFile,

    #[error("heap dump truncated at offset {offset}")]
    Truncated { offset: u64 },

    #[error("invalid varint at offset {offset}")]
    InvalidVarint { offset: u64 },

    #[error("invalid boolean value {value} at offset {offset}")]
    InvalidBool { value: u64, offset: u64 },

    #[error("invalid record tag {tag} at offset {offset}")]
    InvalidTag { tag: u64, offset: u64 },

    #[error("{record} record at offset {offset} has no owner")]
    OrphanedChild { record: &'static str, offset: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns true if the error indicates malformed dump content rather
    /// than an environment problem (open or I/O failure).
    pub fn is_format_error(&self) -> bool {
        !matches!(self, Self::Open { .. } | Self::Io(_))
    }
}
