use std::{
    collections::VecDeque,
    io::{self, Read},
    iter::FusedIterator,
};

use crate::{Chunk, ChunkData};

/// Unread part of one chunk.
#[derive(Debug)]
struct Segment {
    data: ChunkData,
    pos: usize,
    limit: usize,
}

impl Segment {
    #[inline(always)]
    fn remaining(&self) -> usize {
        self.limit - self.pos
    }
}

/// One-shot, forward-only cursor over the bytes of a
/// [`ChunkedBuffer`](crate::ChunkedBuffer).
///
/// Created by [`ChunkedBuffer::open_read_view`](crate::ChunkedBuffer::open_read_view).
/// The view shares chunk storage with the buffer instead of copying it: how
/// many bytes each chunk yields is fixed when the view is opened, but their
/// content is read live. Bytes appended to the active chunk afterwards are not
/// reached, while bytes rewritten after a reset are. Exhausted chunks are
/// released as the cursor moves past them.
#[derive(Debug)]
#[must_use = "ReadView does nothing unless read from"]
pub struct ReadView {
    segments: VecDeque<Segment>,
}

impl ReadView {
    pub(crate) fn new(chunks: &[Chunk]) -> Self {
        let segments = chunks
            .iter()
            .map(Chunk::snapshot)
            .map(|(data, limit)| Segment {
                data,
                pos: 0,
                limit,
            })
            .collect();
        Self { segments }
    }

    /// Bytes left before end of data.
    pub fn remaining(&self) -> u64 {
        self.segments
            .iter()
            .map(|segment| segment.remaining() as u64)
            .sum()
    }

    /// Drops exhausted segments and returns the one to read from next.
    fn current(&mut self) -> Option<&mut Segment> {
        while self
            .segments
            .front()
            .is_some_and(|segment| segment.remaining() == 0)
        {
            self.segments.pop_front();
        }
        self.segments.front_mut()
    }

    /// Returns the next byte, or `None` at end of data.
    ///
    /// Takes the chunk's read lock for every byte, as does iterating the view.
    /// [`read_into`](Self::read_into) and [`io::Read`] lock once per chunk
    /// span and are the way to drain large views.
    #[inline]
    pub fn read_byte(&mut self) -> Option<u8> {
        let segment = self.current()?;
        let byte = segment.data.read()[segment.pos];
        segment.pos += 1;
        Some(byte)
    }

    /// Fills `buf` from the view.
    ///
    /// Returns the number of bytes copied, which is short of `buf.len()` only
    /// when the view runs out, or `None` if it was already exhausted. An empty
    /// `buf` yields `Some(0)`.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Option<usize> {
        if buf.is_empty() {
            return Some(0);
        }

        let mut read = 0;
        while read < buf.len() {
            let Some(segment) = self.current() else {
                break;
            };
            let n = (buf.len() - read).min(segment.remaining());
            buf[read..read + n].copy_from_slice(&segment.data.read()[segment.pos..segment.pos + n]);
            segment.pos += n;
            read += n;
        }

        (read > 0).then_some(read)
    }
}

impl Read for ReadView {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_into(buf).unwrap_or(0))
    }
}

impl Iterator for ReadView {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        self.read_byte()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining()).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ReadView {}

impl FusedIterator for ReadView {}
