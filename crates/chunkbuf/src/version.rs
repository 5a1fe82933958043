use std::fmt;

/// Wire format version tag.
///
/// Encoded as the first four bytes of every serialized buffer, big-endian
/// and signed. Only [`Version::ONE`] has a known payload layout.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[must_use = "Version values should be used for compatibility checks"]
pub struct Version(i32);

impl Version {
    pub const ONE: Self = Self(1);

    /// Version written by [`ChunkedBuffer::serialize`](crate::ChunkedBuffer::serialize).
    pub const CURRENT: Self = Self::ONE;

    pub const fn new(v: i32) -> Self {
        Self(v)
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; size_of::<i32>()] {
        self.0.to_be_bytes()
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; size_of::<i32>()]) -> Self {
        Self(i32::from_be_bytes(bytes))
    }
}

impl From<Version> for i32 {
    fn from(value: Version) -> i32 {
        value.0
    }
}

impl From<i32> for Version {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
