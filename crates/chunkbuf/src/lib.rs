#![doc = include_str!("../README.md")]

mod buffer;
mod chunk;
pub mod error;
mod header;
mod memory_usage;
mod options;
mod version;
mod view;

pub use buffer::*;
use chunk::*;
pub use error::*;
pub use header::*;
pub use memory_usage::*;
pub use options::*;
pub use version::*;
pub use view::*;

/// One kibibyte (1024 bytes).
#[allow(non_upper_case_globals)]
pub const KiB: usize = 1024;
/// One mebibyte (1024^2 bytes).
#[allow(non_upper_case_globals)]
pub const MiB: usize = 1024 * KiB;
/// One gibibyte (1024^3 bytes).
#[allow(non_upper_case_globals)]
pub const GiB: usize = 1024 * MiB;

/// Size of the stack buffer bytes are staged through when moving them
/// between chunks and an external sink or source.
pub const TRANSFER_BUFFER_SIZE: usize = 512;

/// Largest chunk allocated while restoring a serialized buffer.
pub const MAX_CHUNK_CAPACITY: usize = i32::MAX as usize;
