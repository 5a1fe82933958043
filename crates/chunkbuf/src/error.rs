use std::{io, result};

use thiserror::Error;

use crate::Version;

pub type Result<T, E = Error> = result::Result<T, E>;

/// Error types for chunkbuf operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] io::Error),

    // Write errors
    #[error(
        "Invalid append range: offset {offset}, length {len} for a slice of {bytes_len} bytes"
    )]
    InvalidArgument {
        offset: usize,
        len: usize,
        bytes_len: usize,
    },

    #[error("Buffer full: all {max_chunks} chunk(s) in use")]
    CapacityExceeded { max_chunks: usize },

    // Configuration errors
    #[error("Chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("Failed to allocate a chunk of {size} bytes")]
    AllocationFailed { size: usize },

    // Decode errors
    #[error("Stream corrupted. Unknown version: {0}")]
    UnsupportedVersion(Version),

    #[error("Stream corrupted. Negative payload length: {0}")]
    NegativeLength(i64),

    #[error("Payload length {0} does not fit the wire format")]
    LengthOverflow(u64),

    #[error("Payload truncated: expected {expected} bytes, {missing} missing")]
    TruncatedInput { expected: u64, missing: u64 },
}

impl From<Error> for io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::IO(e) => e,
            e @ Error::InvalidArgument { .. } => io::Error::new(io::ErrorKind::InvalidInput, e),
            e @ Error::TruncatedInput { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, e),
            e => io::Error::other(e),
        }
    }
}
