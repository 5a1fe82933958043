use std::{
    fmt,
    io::{self, Read, Write},
    sync::Arc,
};

use parking_lot::RwLock;

use crate::{Error, Result, TRANSFER_BUFFER_SIZE};

pub(crate) type ChunkData = Arc<RwLock<Vec<u8>>>;

/// Fixed-capacity block of storage plus its write cursor.
///
/// The bytes live behind an `Arc` so read views can keep referring to them,
/// but only the owning buffer ever writes through it. Storage is never
/// zero-filled: the vector holds exactly the bytes written so far (or more,
/// after a rewind) and grows into its reservation as data arrives.
///
/// Every access takes the lock once, so [`push`](Self::push) costs one write
/// lock per byte while [`put`](Self::put) and [`fill_from`](Self::fill_from)
/// take one per call.
pub(crate) struct Chunk {
    data: ChunkData,
    /// Logical capacity, which the storage never grows past.
    capacity: usize,
    /// Bytes filled so far, `<= capacity` and `<= data.len()`.
    len: usize,
}

impl Chunk {
    /// Reserves the whole capacity up front.
    pub fn allocate(capacity: usize) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| Error::AllocationFailed { size: capacity })?;
        Ok(Self::from_storage(data, capacity))
    }

    /// Reserves nothing yet: storage grows as bytes are written, so a large
    /// capacity only costs memory once it is actually filled.
    pub fn allocate_lazy(capacity: usize) -> Self {
        Self::from_storage(Vec::new(), capacity)
    }

    fn from_storage(data: Vec<u8>, capacity: usize) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
            capacity,
            len: 0,
        }
    }

    /// Bytes of memory currently held by the storage.
    #[inline]
    pub fn reserved(&self) -> usize {
        self.data.read().capacity()
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.capacity - self.len
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Rewinds the cursor. Content is left in place.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Appends one byte.
    ///
    /// # Panics
    /// Panics if the chunk is full.
    #[inline]
    pub fn push(&mut self, byte: u8) -> Result<()> {
        assert!(!self.is_full(), "push into a full chunk");
        let mut data = self.data.write();
        if self.len < data.len() {
            data[self.len] = byte;
        } else {
            self.reserve(&mut data, 1)?;
            data.push(byte);
        }
        self.len += 1;
        Ok(())
    }

    /// Appends as much of `bytes` as fits and returns how many were taken.
    pub fn put(&mut self, bytes: &[u8]) -> Result<usize> {
        let n = bytes.len().min(self.remaining());
        if n == 0 {
            return Ok(0);
        }

        let mut data = self.data.write();
        // Overwrite what a previous fill left behind, extend past it
        let overlap = (data.len() - self.len).min(n);
        data[self.len..self.len + overlap].copy_from_slice(&bytes[..overlap]);
        if overlap < n {
            self.reserve(&mut data, n - overlap)?;
            data.extend_from_slice(&bytes[overlap..n]);
        }

        self.len += n;
        Ok(n)
    }

    /// Makes room for `additional` bytes past the end of `data`, doubling the
    /// storage but never past the logical capacity.
    fn reserve(&self, data: &mut Vec<u8>, additional: usize) -> Result<()> {
        let needed = data.len() + additional;
        if needed <= data.capacity() {
            return Ok(());
        }

        let target = needed.max(data.capacity() * 2).min(self.capacity);
        data.try_reserve_exact(target - data.len())
            .map_err(|_| Error::AllocationFailed { size: target })
    }

    /// Writes the filled portion to `writer`, staged through a stack buffer so
    /// the lock is never held across a call into the writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut transfer = [0u8; TRANSFER_BUFFER_SIZE];
        let mut offset = 0;
        while offset < self.len {
            let n = (self.len - offset).min(TRANSFER_BUFFER_SIZE);
            transfer[..n].copy_from_slice(&self.data.read()[offset..offset + n]);
            writer.write_all(&transfer[..n])?;
            offset += n;
        }
        Ok(())
    }

    /// Fills the next `n` bytes of the chunk from `reader`.
    ///
    /// Returns the number of bytes copied before the reader ran dry, which is
    /// `n` on success. Other I/O errors are returned as is.
    pub fn fill_from<R: Read>(&mut self, reader: &mut R, n: usize) -> Result<usize> {
        assert!(n <= self.remaining(), "fill past chunk capacity");
        let mut transfer = [0u8; TRANSFER_BUFFER_SIZE];
        let mut copied = 0;
        while copied < n {
            let want = (n - copied).min(TRANSFER_BUFFER_SIZE);
            let got = read_up_to(reader, &mut transfer[..want])?;
            self.put(&transfer[..got])?;
            copied += got;
            if got < want {
                break;
            }
        }
        Ok(copied)
    }

    /// Shares the storage together with the current cursor as read limit.
    #[inline]
    pub fn snapshot(&self) -> (ChunkData, usize) {
        (self.data.clone(), self.len)
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("capacity", &self.capacity)
            .field("len", &self.len)
            .finish()
    }
}

/// Like `read_exact`, but reports how many bytes arrived instead of failing
/// on a short source.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
