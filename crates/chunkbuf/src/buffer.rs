use std::io::{self, Read, Write};

use log::{debug, trace};

use crate::{
    Chunk, Error, MAX_CHUNK_CAPACITY, MemoryUsage, Options, ReadView, Result, Version,
    WireHeader,
};

/// Growable byte sink made of fixed-size chunks, bounded by a chunk budget.
///
/// Bytes are appended into the active chunk; when it fills up the next chunk
/// is taken (reused after a [`reset`](Self::reset), allocated otherwise) until
/// `max_size / chunk_size` chunks are in use. Past that, appends fail with
/// [`Error::CapacityExceeded`].
///
/// The contents can be persisted with [`serialize`](Self::serialize), restored
/// with [`deserialize`](Self::deserialize) and streamed out without copying
/// through [`open_read_view`](Self::open_read_view).
///
/// A single writer is assumed: every mutating method takes `&mut self`.
#[derive(Debug)]
#[must_use = "ChunkedBuffer should be stored to keep the written data"]
pub struct ChunkedBuffer {
    /// In byte order. Never shrinks, chunks past `active` are empty.
    chunks: Vec<Chunk>,
    /// Index of the chunk accepting writes. Every chunk before it is full.
    active: usize,
    /// Logical bytes written since creation or the last reset.
    len: u64,
    options: Options,
}

impl ChunkedBuffer {
    /// Creates a buffer of `chunk_size` byte chunks holding up to
    /// `chunk_size * (max_size / chunk_size)` bytes.
    pub fn new(chunk_size: usize, max_size: usize) -> Result<Self> {
        Self::with_options(Options::new(chunk_size, max_size))
    }

    pub fn with_options(options: Options) -> Result<Self> {
        options.validate()?;

        let first = Chunk::allocate(options.chunk_size())?;
        debug!(
            "Buffer created: {} byte chunks, at most {}.",
            options.chunk_size(),
            options.max_chunk_count()
        );

        Ok(Self {
            chunks: vec![first],
            active: 0,
            len: 0,
            options,
        })
    }

    /// Appends a single byte.
    ///
    /// Each call takes the active chunk's lock once; prefer
    /// [`append_slice`](Self::append_slice) or
    /// [`append_range`](Self::append_range) for bulk writes, which lock once
    /// per chunk touched.
    #[inline]
    pub fn append_byte(&mut self, byte: u8) -> Result<()> {
        if self.chunks[self.active].is_full() {
            self.add_chunk()?;
        }
        self.chunks[self.active].push(byte)?;
        self.len += 1;
        Ok(())
    }

    /// Appends `len` bytes of `bytes` starting at `offset`.
    ///
    /// `offset` must point inside `bytes`, so an empty slice is rejected even
    /// with `len == 0`. The logical length is only updated once every byte is
    /// in place: a write that fails with [`Error::CapacityExceeded`] midway
    /// leaves bytes in the chunks that [`len`](Self::len) does not account
    /// for, and the buffer must be [`reset`](Self::reset) before further use.
    pub fn append_range(&mut self, bytes: &[u8], offset: usize, len: usize) -> Result<()> {
        if offset >= bytes.len() || len > bytes.len() - offset {
            return Err(Error::InvalidArgument {
                offset,
                len,
                bytes_len: bytes.len(),
            });
        }

        let mut remaining = &bytes[offset..offset + len];
        while !remaining.is_empty() {
            if self.chunks[self.active].is_full() {
                self.add_chunk()?;
            }
            let written = self.chunks[self.active].put(remaining)?;
            remaining = &remaining[written..];
        }

        self.len += len as u64;
        Ok(())
    }

    /// Appends all of `bytes`. An empty slice is a no-op.
    #[inline]
    pub fn append_slice(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.append_range(bytes, 0, bytes.len())
    }

    /// Moves the write position to the next chunk, allocating it if needed.
    #[cold]
    fn add_chunk(&mut self) -> Result<()> {
        let next = self.active + 1;
        let max_chunks = self.options.max_chunk_count();
        if next >= max_chunks {
            return Err(Error::CapacityExceeded { max_chunks });
        }

        if next == self.chunks.len() {
            self.chunks.push(Chunk::allocate(self.options.chunk_size())?);
            debug!("Chunk {next} allocated.");
        } else {
            self.chunks[next].clear();
            trace!("Chunk {next} reused.");
        }

        self.active = next;
        Ok(())
    }

    /// Empties the buffer while keeping every chunk for reuse.
    ///
    /// Only cursors are rewound, stored bytes are not zeroed. Outstanding
    /// [`ReadView`]s keep valid memory but may observe the new contents.
    pub fn reset(&mut self) {
        self.len = 0;
        self.active = 0;
        self.chunks.iter_mut().for_each(Chunk::clear);
        debug!("Buffer reset, {} chunk(s) kept.", self.chunks.len());
    }

    /// Writes the version 1 header followed by the logical contents.
    ///
    /// Chunks past the active one hold nothing and are never emitted.
    pub fn serialize<W: Write>(&self, writer: &mut W) -> Result<()> {
        WireHeader::new(Version::CURRENT, self.len)?.write_to(writer)?;

        for chunk in &self.chunks[..=self.active] {
            chunk.write_to(writer)?;
        }

        debug!(
            "Serialized {} bytes from {} chunk(s).",
            self.len,
            self.active + 1
        );
        Ok(())
    }

    /// Serializes into a freshly allocated `Vec`.
    pub fn serialize_to_vec(&self) -> Result<Vec<u8>> {
        let header = WireHeader::new(Version::CURRENT, self.len)?;
        let mut out = Vec::with_capacity(header.encoded_len() + self.len as usize);
        self.serialize(&mut out)?;
        Ok(out)
    }

    /// Replaces the contents with a serialized buffer read from `reader`.
    ///
    /// Existing chunks are refilled in order; when they run out, new chunks
    /// are sized to the remaining payload (capped at [`MAX_CHUNK_CAPACITY`])
    /// rather than to the configured chunk size, so a restored buffer can have
    /// a different chunk layout than the one that was serialized. The chunk
    /// budget is not applied here.
    ///
    /// The declared length is not trusted for allocation: new chunks reserve
    /// memory as payload bytes actually arrive, so a header claiming more
    /// than the source holds costs only what was read.
    ///
    /// On [`Error::TruncatedInput`] or an I/O error the buffer holds a partial
    /// payload and should be reset before reuse.
    pub fn deserialize<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        match WireHeader::read_from(reader)? {
            WireHeader::V1(fields) => self.read_v1_payload(reader, fields.len()),
        }
    }

    fn read_v1_payload<R: Read>(&mut self, reader: &mut R, len: u64) -> Result<()> {
        self.reset();

        let mut to_read = len;
        let mut index = 0;
        while to_read > 0 {
            if index == self.chunks.len() {
                let size = to_read.min(MAX_CHUNK_CAPACITY as u64) as usize;
                self.chunks.push(Chunk::allocate_lazy(size));
                debug!("Chunk {index} added ({size} bytes) for restore.");
            } else {
                trace!("Chunk {index} reused for restore.");
            }

            let chunk = &mut self.chunks[index];
            let want = to_read.min(chunk.capacity() as u64) as usize;
            let copied = chunk.fill_from(reader, want)?;

            self.active = index;
            to_read -= copied as u64;
            self.len = len - to_read;

            if copied < want {
                return Err(Error::TruncatedInput {
                    expected: len,
                    missing: to_read,
                });
            }
            index += 1;
        }

        debug!(
            "Deserialized {len} bytes into {} chunk(s).",
            self.active + 1
        );
        Ok(())
    }

    /// Opens a forward-only cursor over the bytes written so far.
    ///
    /// Chunk boundaries and read limits are captured now, but the bytes are
    /// not copied: writes made to the active chunk after this call, or after
    /// a [`reset`](Self::reset), can show up in the view.
    pub fn open_read_view(&self) -> ReadView {
        ReadView::new(&self.chunks)
    }

    /// Logical length in bytes.
    #[inline(always)]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of chunks allocated, including unused ones kept after a reset.
    #[inline(always)]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    #[inline(always)]
    pub fn chunk_size(&self) -> usize {
        self.options.chunk_size()
    }

    #[inline(always)]
    pub fn max_chunk_count(&self) -> usize {
        self.options.max_chunk_count()
    }

    #[inline(always)]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Memory held by chunk storage against the logical length.
    pub fn memory_usage(&self) -> MemoryUsage {
        let allocated = self
            .chunks
            .iter()
            .map(|chunk| chunk.reserved() as u64)
            .sum();
        MemoryUsage::new(allocated, self.len)
    }
}

impl Write for ChunkedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append_slice(buf)?;
        Ok(buf.len())
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
