use std::io::{Read, Write};

use smallvec::SmallVec;

use crate::{Error, Result, Version};

const SIZE_OF_VERSION: usize = size_of::<i32>();
const SIZE_OF_I64: usize = size_of::<i64>();
pub const SIZE_OF_HEADER_V1: usize = SIZE_OF_VERSION + SIZE_OF_I64;

/// Encoded header bytes, kept inline for every known version.
pub type HeaderBytes = SmallVec<[u8; SIZE_OF_HEADER_V1]>;

/// Fixed-layout prefix framing a serialized buffer.
///
/// Layout is a big-endian signed 32-bit version tag followed by the fields of
/// that version. The header never carries payload bytes itself.
///
/// | Offset | Size | Field |
/// |---|---|---|
/// | 0 | 4 | version = 1 |
/// | 4 | 8 | logical length (big-endian signed 64-bit) |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireHeader {
    V1(HeaderV1),
}

/// Fields of a version 1 header.
///
/// The length is always encodable: it can only be built through
/// [`HeaderV1::new`], which rejects values above `i64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderV1 {
    len: u64,
}

impl HeaderV1 {
    pub fn new(len: u64) -> Result<Self> {
        if i64::try_from(len).is_err() {
            return Err(Error::LengthOverflow(len));
        }
        Ok(Self { len })
    }

    #[allow(clippy::len_without_is_empty)]
    #[inline(always)]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    fn to_be_bytes(self) -> [u8; SIZE_OF_I64] {
        // Bounded by `new`
        (self.len as i64).to_be_bytes()
    }
}

impl WireHeader {
    /// Builds the header for `version` framing `len` payload bytes.
    pub fn new(version: Version, len: u64) -> Result<Self> {
        match version {
            Version::ONE => Ok(Self::V1(HeaderV1::new(len)?)),
            version => Err(Error::UnsupportedVersion(version)),
        }
    }

    /// Encodes `version` and `len` in one step.
    #[inline]
    pub fn encode(version: Version, len: u64) -> Result<HeaderBytes> {
        Ok(Self::new(version, len)?.to_bytes())
    }

    #[inline]
    pub fn version(&self) -> Version {
        match self {
            Self::V1(_) => Version::ONE,
        }
    }

    /// Logical length of the payload that follows the header.
    #[allow(clippy::len_without_is_empty)]
    #[inline]
    pub fn len(&self) -> u64 {
        match self {
            Self::V1(fields) => fields.len(),
        }
    }

    #[inline]
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::V1(_) => SIZE_OF_HEADER_V1,
        }
    }

    /// Serialize to bytes using big endian encoding
    pub fn to_bytes(&self) -> HeaderBytes {
        let mut bytes = HeaderBytes::new();
        bytes.extend_from_slice(&self.version().to_bytes());
        match self {
            Self::V1(fields) => bytes.extend_from_slice(&fields.to_be_bytes()),
        }
        bytes
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Reads a header from `reader`.
    ///
    /// The version tag is read first. An unknown tag fails with
    /// [`Error::UnsupportedVersion`] right away, leaving the reader positioned
    /// immediately after the four tag bytes.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut tag = [0u8; SIZE_OF_VERSION];
        reader.read_exact(&mut tag)?;

        match Version::from_bytes(tag) {
            Version::ONE => {
                let mut len = [0u8; SIZE_OF_I64];
                reader.read_exact(&mut len)?;
                let len = i64::from_be_bytes(len);
                let len = u64::try_from(len).map_err(|_| Error::NegativeLength(len))?;
                Ok(Self::V1(HeaderV1 { len }))
            }
            version => Err(Error::UnsupportedVersion(version)),
        }
    }

    /// Deserialize from the start of `bytes`, ignoring anything after the header.
    #[inline]
    pub fn from_bytes(mut bytes: &[u8]) -> Result<Self> {
        Self::read_from(&mut bytes)
    }
}
