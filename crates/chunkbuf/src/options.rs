use crate::{Error, KiB, MiB, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 64 * KiB;
pub const DEFAULT_MAX_SIZE: usize = 64 * MiB;

/// Sizing of a [`ChunkedBuffer`](crate::ChunkedBuffer).
///
/// A buffer can hold up to `chunk_size * (max_size / chunk_size)` bytes.
/// Larger chunks mean fewer allocations but every buffer pays for at least
/// one full chunk, so oversized chunks waste memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    chunk_size: usize,
    max_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl Options {
    pub fn new(chunk_size: usize, max_size: usize) -> Self {
        Self {
            chunk_size,
            max_size,
        }
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    #[must_use]
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    #[inline(always)]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    #[inline(always)]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Number of chunks the buffer may allocate while appending.
    ///
    /// A `max_size` below one chunk yields zero, which still leaves the
    /// buffer its initial chunk.
    #[inline]
    pub fn max_chunk_count(&self) -> usize {
        self.max_size.checked_div(self.chunk_size).unwrap_or(0)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidChunkSize);
        }
        Ok(())
    }
}
