use std::fmt;

use crate::{GiB, KiB, MiB};

/// Bytes of chunk storage a buffer holds, whether filled or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MemoryUsage {
    allocated: u64,
    used: u64,
}

impl MemoryUsage {
    #[inline]
    pub(crate) fn new(allocated: u64, used: u64) -> Self {
        Self { allocated, used }
    }

    /// Bytes of storage reserved across every chunk.
    #[inline]
    pub fn allocated(&self) -> u64 {
        self.allocated
    }

    /// Logical bytes currently written.
    #[inline]
    pub fn used(&self) -> u64 {
        self.used
    }

    /// Allocated bytes not holding logical data.
    #[inline]
    pub fn slack(&self) -> u64 {
        self.allocated.saturating_sub(self.used)
    }
}

/// Binary units from largest to smallest, bytes below the last one print as is.
const UNITS: [(&str, usize); 3] = [("GiB", GiB), ("MiB", MiB), ("KiB", KiB)];

struct HumanBytes(u64);

impl fmt::Display for HumanBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match UNITS
            .iter()
            .find(|(_, unit)| self.0 >= *unit as u64)
        {
            Some((name, unit)) => write!(f, "{:.1} {name}", self.0 as f64 / *unit as f64),
            None => write!(f, "{} B", self.0),
        }
    }
}

impl fmt::Display for MemoryUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} used of {} allocated",
            HumanBytes(self.used),
            HumanBytes(self.allocated)
        )
    }
}
